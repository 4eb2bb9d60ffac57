//! Intersection observer driven by viewport scroll and resize events

use crate::{ElementRef, Subscription, Viewport, ViewportEvent};
use scrolly_core::{IntersectionEntry, ObserverOptions};
use std::cell::Cell;
use std::rc::Rc;
use tracing::{debug, info};

struct ObserverState {
    target: ElementRef,
    options: ObserverOptions,
    // (threshold index, intersecting) of the last reported entry
    last: Cell<Option<(usize, bool)>>,
    callback: Box<dyn Fn(IntersectionEntry)>,
}

impl ObserverState {
    fn check(&self, event: &ViewportEvent) {
        let Some(rect) = self.target.rect_in(event.scroll_y) else {
            return;
        };
        let entry = IntersectionEntry::compute(rect, event.height, &self.options);
        let key = (
            self.options.threshold_index(entry.intersection_ratio),
            entry.is_intersecting,
        );
        if self.last.replace(Some(key)) != Some(key) {
            debug!(
                is_intersecting = entry.is_intersecting,
                ratio = entry.intersection_ratio,
                "intersection changed"
            );
            (self.callback)(entry);
        }
    }
}

/// Reports intersection entries for one target
pub struct IntersectionObserver;

impl IntersectionObserver {
    /// Starts observing `target`.
    ///
    /// The callback fires right away when the target is mounted, then on
    /// every scroll or resize that crosses a threshold or flips the
    /// intersecting flag. A target that is not mounted is skipped until it
    /// is. Dropping the returned handle disconnects the observer.
    pub fn observe(
        viewport: &Viewport,
        target: ElementRef,
        options: ObserverOptions,
        callback: impl Fn(IntersectionEntry) + 'static,
    ) -> Subscription {
        if !target.is_attached() {
            info!("observer target not mounted yet; waiting for it");
        }

        let state = Rc::new(ObserverState {
            target,
            options,
            last: Cell::new(None),
            callback: Box::new(callback),
        });
        state.check(&viewport.event());

        let on_scroll = {
            let state = Rc::downgrade(&state);
            viewport.on_scroll(move |event| {
                if let Some(state) = state.upgrade() {
                    state.check(event);
                }
            })
        };
        let on_resize = {
            let state = Rc::downgrade(&state);
            viewport.on_resize(move |event| {
                if let Some(state) = state.upgrade() {
                    state.check(event);
                }
            })
        };

        Subscription::new(move || {
            drop(on_scroll);
            drop(on_resize);
            drop(state);
        })
    }
}
