//! Teardown handles for listeners and observers

use std::fmt;

/// Keeps a listener, observer or scheduled task alive.
///
/// Dropping the handle (or calling [`Subscription::cancel`]) runs its
/// teardown exactly once; after that the callback it guarded is never
/// invoked again.
#[must_use = "dropping a Subscription immediately tears it down"]
pub struct Subscription {
    teardown: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    /// Wraps a teardown closure
    pub fn new(teardown: impl FnOnce() + 'static) -> Self {
        Self {
            teardown: Some(Box::new(teardown)),
        }
    }

    /// A handle with nothing to release, for components that had nothing to
    /// observe
    pub fn noop() -> Self {
        Self { teardown: None }
    }

    /// Tears down now
    pub fn cancel(mut self) {
        self.release();
    }

    fn release(&mut self) {
        if let Some(teardown) = self.teardown.take() {
            teardown();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.teardown.is_some())
            .finish()
    }
}
