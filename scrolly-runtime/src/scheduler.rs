//! Single-slot per-frame scheduler
//!
//! At most one frame is requested while a value is pending. Values offered
//! before the frame runs are coalesced and the last one wins.

use crate::Viewport;
use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

struct Slot<T> {
    ticking: Cell<bool>,
    pending: RefCell<Option<T>>,
    task: Box<dyn Fn(T)>,
}

/// Throttles a task to one run per animation frame
pub struct FrameScheduler<T> {
    viewport: Viewport,
    slot: Rc<Slot<T>>,
}

impl<T: 'static> FrameScheduler<T> {
    /// Creates a scheduler that runs `task` on `viewport`'s animation frames
    pub fn new(viewport: Viewport, task: impl Fn(T) + 'static) -> Self {
        Self {
            viewport,
            slot: Rc::new(Slot {
                ticking: Cell::new(false),
                pending: RefCell::new(None),
                task: Box::new(task),
            }),
        }
    }

    /// Offers a value for the next frame.
    ///
    /// Returns true when this call requested a new frame, false when it was
    /// folded into the one already pending.
    pub fn schedule(&self, value: T) -> bool {
        *self.slot.pending.borrow_mut() = Some(value);
        if self.slot.ticking.replace(true) {
            return false;
        }

        let weak: Weak<Slot<T>> = Rc::downgrade(&self.slot);
        self.viewport.request_animation_frame(move || {
            // Scheduler dropped before the frame: nothing to run.
            let Some(slot) = weak.upgrade() else {
                return;
            };
            slot.ticking.set(false);
            let value = slot.pending.borrow_mut().take();
            if let Some(value) = value {
                (slot.task)(value);
            }
        });
        true
    }

    /// True while a frame is requested and has not run yet
    pub fn is_pending(&self) -> bool {
        self.slot.ticking.get()
    }
}
