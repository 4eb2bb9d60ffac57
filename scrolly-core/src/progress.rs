//! Scroll offset to narrative progress mapping

/// Container geometry needed to normalize a scroll offset
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScrollGeometry {
    /// Current height of the scroll container in pixels
    pub container_height: f64,
    /// Current viewport height in pixels
    pub viewport_height: f64,
}

impl ScrollGeometry {
    /// Creates a new geometry
    pub fn new(container_height: f64, viewport_height: f64) -> Self {
        Self {
            container_height,
            viewport_height,
        }
    }

    /// Distance the container can actually scroll beyond one viewport
    pub fn scrollable_range(&self) -> f64 {
        self.container_height - self.viewport_height
    }
}

/// Normalizes `scroll_offset` against the geometry's scrollable range.
///
/// The result is clamped at 0 but not above 1: values past 1 mean the user
/// has scrolled beyond the video into trailing content. A container that is
/// not taller than the viewport has nothing to scroll and maps to 0.
pub fn progress_for(scroll_offset: f64, geometry: ScrollGeometry) -> f64 {
    let range = geometry.scrollable_range();
    if range.is_nan() || range <= 0.0 || !scroll_offset.is_finite() {
        return 0.0;
    }
    (scroll_offset / range).max(0.0)
}

/// Direction of travel between two successive progress values
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum ScrollDirection {
    Forward,
    Backward,
    Still,
}

/// Keeps the latest progress and the one before it
#[derive(Debug, Clone, Default)]
pub struct ProgressTracker {
    current: f64,
    previous: f64,
}

impl ProgressTracker {
    /// Creates a tracker at progress 0
    pub fn new() -> Self {
        Self::default()
    }

    /// Recomputes progress for a new scroll offset and returns it
    pub fn update(&mut self, scroll_offset: f64, geometry: ScrollGeometry) -> f64 {
        self.previous = self.current;
        self.current = progress_for(scroll_offset, geometry);
        self.current
    }

    /// Latest progress value
    pub fn current(&self) -> f64 {
        self.current
    }

    /// Progress before the latest update
    pub fn previous(&self) -> f64 {
        self.previous
    }

    /// Direction of the latest update
    pub fn direction(&self) -> ScrollDirection {
        if self.current > self.previous {
            ScrollDirection::Forward
        } else if self.current < self.previous {
            ScrollDirection::Backward
        } else {
            ScrollDirection::Still
        }
    }
}
