//! Viewport intersection model for the visibility gate
//!
//! Several thresholds plus a root margin make the on-screen flag change in
//! steps as the target slides in and out, instead of a single flip at the
//! edge of the viewport.

use crate::{Error, Result};

/// Default intersection thresholds
pub const DEFAULT_THRESHOLDS: [f64; 4] = [0.0, 0.1, 0.5, 0.9];

/// Default root margin in pixels
pub const DEFAULT_ROOT_MARGIN_PX: f64 = 20.0;

/// Intersection observer options
#[derive(Debug, Clone, PartialEq)]
pub struct ObserverOptions {
    thresholds: Vec<f64>,
    root_margin_px: f64,
}

impl Default for ObserverOptions {
    fn default() -> Self {
        Self {
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            root_margin_px: DEFAULT_ROOT_MARGIN_PX,
        }
    }
}

impl ObserverOptions {
    /// Creates options, validating and sorting the thresholds
    pub fn new(mut thresholds: Vec<f64>, root_margin_px: f64) -> Result<Self> {
        if thresholds.is_empty() {
            return Err(Error::NoThresholds);
        }
        if let Some(&bad) = thresholds.iter().find(|t| !(0.0..=1.0).contains(*t)) {
            return Err(Error::InvalidThreshold(bad));
        }
        thresholds.sort_by(f64::total_cmp);
        thresholds.dedup();

        Ok(Self {
            thresholds,
            root_margin_px: if root_margin_px.is_finite() {
                root_margin_px
            } else {
                0.0
            },
        })
    }

    /// Sorted, deduplicated thresholds
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Margin added around the viewport (negative shrinks it)
    pub fn root_margin_px(&self) -> f64 {
        self.root_margin_px
    }

    /// Number of thresholds at or below `ratio`.
    ///
    /// An observer only reports a new entry when this index (or the
    /// intersecting flag) changes.
    pub fn threshold_index(&self, ratio: f64) -> usize {
        self.thresholds.iter().take_while(|t| **t <= ratio).count()
    }
}

/// Target bounds relative to the top of the viewport, in pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetRect {
    pub top: f64,
    pub height: f64,
}

impl TargetRect {
    /// Creates a new rect
    pub fn new(top: f64, height: f64) -> Self {
        Self { top, height }
    }

    /// Bottom edge relative to the viewport top
    pub fn bottom(&self) -> f64 {
        self.top + self.height.max(0.0)
    }
}

/// One intersection observation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionEntry {
    pub is_intersecting: bool,
    pub intersection_ratio: f64,
}

impl IntersectionEntry {
    /// Creates an entry directly, as a host-side observer would report it
    pub fn new(is_intersecting: bool, intersection_ratio: f64) -> Self {
        Self {
            is_intersecting,
            intersection_ratio,
        }
    }

    /// Intersects `target` with the viewport grown by the root margin.
    ///
    /// Edge-adjacent rects count as intersecting with ratio 0.
    pub fn compute(target: TargetRect, viewport_height: f64, options: &ObserverOptions) -> Self {
        let margin = options.root_margin_px();
        let root_top = -margin;
        let root_bottom = viewport_height + margin;
        if root_bottom < root_top {
            return Self::new(false, 0.0);
        }

        let overlap = target.bottom().min(root_bottom) - target.top.max(root_top);
        let is_intersecting = overlap >= 0.0;
        let intersection_ratio = if target.height > 0.0 {
            (overlap.max(0.0) / target.height).clamp(0.0, 1.0)
        } else if is_intersecting {
            1.0
        } else {
            0.0
        };

        Self::new(is_intersecting, intersection_ratio)
    }
}

/// Latest on-screen flag fed by intersection observations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibilityState {
    is_in_viewport: bool,
}

impl Default for VisibilityState {
    /// Visible until an observation says otherwise
    fn default() -> Self {
        Self {
            is_in_viewport: true,
        }
    }
}

impl VisibilityState {
    /// Creates a state that starts visible
    pub fn new() -> Self {
        Self::default()
    }

    /// Current flag
    pub fn is_in_viewport(&self) -> bool {
        self.is_in_viewport
    }

    /// Applies an observation; returns true if the flag changed
    pub fn observe(&mut self, entry: IntersectionEntry) -> bool {
        let changed = self.is_in_viewport != entry.is_intersecting;
        self.is_in_viewport = entry.is_intersecting;
        changed
    }
}
