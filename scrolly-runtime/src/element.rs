//! Element references that may not be mounted yet

use crate::Viewport;
use scrolly_core::TargetRect;
use std::cell::Cell;
use std::rc::Rc;

/// Layout of a mounted element in document coordinates
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Element {
    /// Distance from the top of the document in pixels
    pub offset_top: f64,
    /// Rendered height in pixels
    pub height: f64,
}

impl Element {
    /// Creates a new element layout
    pub fn new(offset_top: f64, height: f64) -> Self {
        Self { offset_top, height }
    }
}

/// Shared, possibly empty slot for an element.
///
/// Clones point at the same slot, so a component holding a clone sees the
/// element once the host attaches it.
#[derive(Debug, Clone, Default)]
pub struct ElementRef {
    slot: Rc<Cell<Option<Element>>>,
}

impl ElementRef {
    /// Creates an empty reference
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reference with `element` already mounted
    pub fn attached(element: Element) -> Self {
        let element_ref = Self::new();
        element_ref.attach(element);
        element_ref
    }

    pub fn attach(&self, element: Element) {
        self.slot.set(Some(element));
    }

    pub fn detach(&self) {
        self.slot.set(None);
    }

    pub fn get(&self) -> Option<Element> {
        self.slot.get()
    }

    pub fn is_attached(&self) -> bool {
        self.get().is_some()
    }

    /// Sets the element's height; returns false when nothing is mounted
    pub fn set_height(&self, height: f64) -> bool {
        match self.get() {
            Some(element) => {
                self.slot.set(Some(Element { height, ..element }));
                true
            }
            None => false,
        }
    }

    /// Bounds relative to the viewport's current scroll position
    pub fn rect_in(&self, scroll_y: f64) -> Option<TargetRect> {
        self.get()
            .map(|element| TargetRect::new(element.offset_top - scroll_y, element.height))
    }

    /// Bounds relative to `viewport`
    pub fn rect_in_viewport(&self, viewport: &Viewport) -> Option<TargetRect> {
        self.rect_in(viewport.scroll_y())
    }

    /// True when both references share the same slot
    pub fn ptr_eq(&self, other: &ElementRef) -> bool {
        Rc::ptr_eq(&self.slot, &other.slot)
    }
}
