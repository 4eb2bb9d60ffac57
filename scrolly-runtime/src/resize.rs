//! Keeps the scroll container sized to the viewport plus extra distance

use crate::{ElementRef, Subscription, Viewport};
use scrolly_core::ExtraDistances;
use tracing::{debug, info};

/// Sets the container height to `viewport + scroll extra + after-video extra`
#[derive(Debug, Clone)]
pub struct ResizeController {
    container: ElementRef,
    distances: ExtraDistances,
}

impl ResizeController {
    /// Creates a controller for `container`
    pub fn new(container: ElementRef, distances: ExtraDistances) -> Self {
        Self {
            container,
            distances,
        }
    }

    /// Applies the height for `viewport_height`.
    ///
    /// Returns the height that was set, or `None` when the container is not
    /// mounted and nothing changed.
    pub fn apply(&self, viewport_height: f64) -> Option<f64> {
        let height = self.distances.container_height(viewport_height);
        if self.container.set_height(height) {
            debug!(viewport_height, container_height = height, "container resized");
            Some(height)
        } else {
            info!("scroll container not mounted; skipping resize");
            None
        }
    }

    /// Applies the height now and again on every viewport resize.
    ///
    /// Dropping the returned handle removes the resize listener.
    pub fn attach(self, viewport: &Viewport) -> Subscription {
        self.apply(viewport.height());
        viewport.on_resize(move |event| {
            self.apply(event.height);
        })
    }
}
