//! Visibility gate: is the video container on screen?

use crate::registry::Registry;
use crate::{ElementRef, IntersectionObserver, Subscription, Viewport};
use scrolly_core::{IntersectionEntry, ObserverOptions, VisibilityState};
use std::cell::Cell;
use std::rc::Rc;
use tracing::debug;

#[derive(Default)]
struct GateShared {
    state: Cell<VisibilityState>,
    changes: Registry<bool>,
}

impl GateShared {
    fn apply(&self, entry: IntersectionEntry) {
        let mut state = self.state.get();
        if state.observe(entry) {
            self.state.set(state);
            debug!(is_in_viewport = state.is_in_viewport(), "visibility changed");
            self.changes.emit(&state.is_in_viewport());
        }
    }
}

/// Exposes the latest `is_intersecting` of an observed target.
///
/// Starts out visible. Changing the target or the options re-subscribes the
/// observer; dropping the gate releases it.
pub struct VisibilityGate {
    viewport: Viewport,
    target: ElementRef,
    options: ObserverOptions,
    shared: Rc<GateShared>,
    subscription: Option<Subscription>,
}

impl VisibilityGate {
    /// Creates the gate and starts observing `target`
    pub fn new(viewport: &Viewport, target: ElementRef, options: ObserverOptions) -> Self {
        let mut gate = Self {
            viewport: viewport.clone(),
            target,
            options,
            shared: Rc::new(GateShared::default()),
            subscription: None,
        };
        gate.subscribe();
        gate
    }

    fn subscribe(&mut self) {
        // Release the old observer before the new one reports.
        self.subscription = None;
        let shared = Rc::downgrade(&self.shared);
        self.subscription = Some(IntersectionObserver::observe(
            &self.viewport,
            self.target.clone(),
            self.options.clone(),
            move |entry| {
                if let Some(shared) = shared.upgrade() {
                    shared.apply(entry);
                }
            },
        ));
    }

    /// Latest visibility
    pub fn is_in_viewport(&self) -> bool {
        self.shared.state.get().is_in_viewport()
    }

    /// Feeds an observation from a host-side observer
    pub fn handle_entry(&self, entry: IntersectionEntry) {
        self.shared.apply(entry);
    }

    /// Subscribes to visibility changes
    pub fn on_change(&self, handler: impl Fn(bool) + 'static) -> Subscription {
        self.shared.changes.subscribe(move |visible| handler(*visible))
    }

    pub fn target(&self) -> &ElementRef {
        &self.target
    }

    pub fn options(&self) -> &ObserverOptions {
        &self.options
    }

    /// Observes a different target; no-op if it is the same reference
    pub fn set_target(&mut self, target: ElementRef) {
        if target.ptr_eq(&self.target) {
            return;
        }
        self.target = target;
        self.subscribe();
    }

    /// Switches options; no-op if they are unchanged
    pub fn set_options(&mut self, options: ObserverOptions) {
        if options == self.options {
            return;
        }
        self.options = options;
        self.subscribe();
    }

    /// Disconnects the observer, keeping the last visibility value
    pub fn teardown(&mut self) {
        self.subscription = None;
    }

    /// True while an observer is connected
    pub fn is_observing(&self) -> bool {
        self.subscription.is_some()
    }
}
