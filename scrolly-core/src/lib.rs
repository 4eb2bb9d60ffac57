//! Scrolly Core Library
//!
//! This library provides the pure model behind a scroll-driven video
//! narrative: mapping scroll offset to progress, progress to text segments,
//! intersection observations to a visibility flag, and the per-line
//! enter/exit state machine.

pub mod config;
pub mod playback;
pub mod progress;
pub mod segment;
pub mod snapshot;
pub mod text_line;
pub mod visibility;

pub use config::{ExtraDistances, NarrativeConfig, Platform};
pub use playback::playback_time;
pub use progress::{progress_for, ProgressTracker, ScrollDirection, ScrollGeometry};
pub use segment::{resolve, SegmentCount, SegmentState};
pub use snapshot::NarrativeSnapshot;
pub use text_line::{LinePresentation, LineState, LineTransition, TextLine};
pub use visibility::{IntersectionEntry, ObserverOptions, TargetRect, VisibilityState};

/// Result type for scrolly-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for scrolly-core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid segment count: {0} (at least one segment is required)")]
    InvalidSegmentCount(u32),

    #[error("Negative distance for {name}: {value}")]
    NegativeDistance { name: &'static str, value: f64 },

    #[error("Intersection threshold out of range [0, 1]: {0}")]
    InvalidThreshold(f64),

    #[error("At least one intersection threshold is required")]
    NoThresholds,

    #[error("Invalid video duration: {0}")]
    InvalidDuration(f64),

    #[cfg(feature = "serde")]
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
