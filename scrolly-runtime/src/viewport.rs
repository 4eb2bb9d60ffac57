//! Viewport event hub: scroll, resize and animation frames
//!
//! Hosts push native events in through [`Viewport::scroll_to`],
//! [`Viewport::resize`] and [`Viewport::run_animation_frame`]; components
//! subscribe to them the way page code subscribes to window events.

use crate::registry::Registry;
use crate::Subscription;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use tracing::trace;

/// Viewport metrics delivered with every scroll and resize event
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportEvent {
    /// Vertical scroll offset of the page in pixels
    pub scroll_y: f64,
    /// Viewport height in pixels
    pub height: f64,
}

type FrameCallback = Box<dyn FnOnce()>;

/// Cloneable handle to one viewport; clones share state and listeners
#[derive(Clone)]
pub struct Viewport {
    height: Rc<Cell<f64>>,
    scroll_y: Rc<Cell<f64>>,
    scroll: Registry<ViewportEvent>,
    resize: Registry<ViewportEvent>,
    frames: Rc<RefCell<Vec<FrameCallback>>>,
}

impl Viewport {
    /// Creates a viewport of `height` pixels scrolled to the top
    pub fn new(height: f64) -> Self {
        Self {
            height: Rc::new(Cell::new(height.max(0.0))),
            scroll_y: Rc::new(Cell::new(0.0)),
            scroll: Registry::new(),
            resize: Registry::new(),
            frames: Rc::new(RefCell::new(Vec::new())),
        }
    }

    pub fn height(&self) -> f64 {
        self.height.get()
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y.get()
    }

    /// Current metrics
    pub fn event(&self) -> ViewportEvent {
        ViewportEvent {
            scroll_y: self.scroll_y(),
            height: self.height(),
        }
    }

    /// Largest scroll offset for a document of `document_height` pixels
    pub fn max_scroll_y(&self, document_height: f64) -> f64 {
        (document_height - self.height()).max(0.0)
    }

    /// Scrolls to `offset` and notifies scroll listeners.
    ///
    /// Negative offsets clamp to 0. Nothing is dispatched when the position
    /// does not change.
    pub fn scroll_to(&self, offset: f64) {
        let offset = if offset.is_finite() { offset.max(0.0) } else { 0.0 };
        if offset == self.scroll_y.get() {
            return;
        }
        self.scroll_y.set(offset);
        trace!(scroll_y = offset, "scroll");
        self.scroll.emit(&self.event());
    }

    /// Sets the viewport height and notifies resize listeners
    pub fn resize(&self, height: f64) {
        self.height.set(height.max(0.0));
        trace!(height = self.height(), "resize");
        self.resize.emit(&self.event());
    }

    /// Subscribes to scroll events
    pub fn on_scroll(&self, handler: impl Fn(&ViewportEvent) + 'static) -> Subscription {
        self.scroll.subscribe(handler)
    }

    /// Subscribes to resize events
    pub fn on_resize(&self, handler: impl Fn(&ViewportEvent) + 'static) -> Subscription {
        self.resize.subscribe(handler)
    }

    /// Number of live scroll and resize listeners
    pub fn listener_count(&self) -> usize {
        self.scroll.len() + self.resize.len()
    }

    /// Queues `callback` for the next animation frame
    pub fn request_animation_frame(&self, callback: impl FnOnce() + 'static) {
        self.frames.borrow_mut().push(Box::new(callback));
    }

    /// Number of callbacks waiting for the next frame
    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().len()
    }

    /// Runs every callback queued before this frame and returns how many ran.
    ///
    /// Callbacks requested while the frame runs wait for the next one.
    pub fn run_animation_frame(&self) -> usize {
        let callbacks = std::mem::take(&mut *self.frames.borrow_mut());
        let count = callbacks.len();
        for callback in callbacks {
            callback();
        }
        count
    }
}

impl std::fmt::Debug for Viewport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Viewport")
            .field("height", &self.height())
            .field("scroll_y", &self.scroll_y())
            .field("listeners", &self.listener_count())
            .field("pending_frames", &self.pending_frames())
            .finish()
    }
}
