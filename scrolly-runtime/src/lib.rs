//! Scrolly Runtime Library
//!
//! This library wires the `scrolly-core` model to viewport events: scroll
//! and resize dispatch, per-frame throttling, intersection observation and
//! container sizing, all on a single thread with explicit teardown handles.

pub mod element;
pub mod gate;
pub mod narrative;
pub mod observer;
mod registry;
pub mod resize;
pub mod scheduler;
pub mod subscription;
pub mod viewport;

pub use element::{Element, ElementRef};
pub use gate::VisibilityGate;
pub use narrative::{LineEvent, NarrativeOptions, ScrollNarrative};
pub use observer::IntersectionObserver;
pub use resize::ResizeController;
pub use scheduler::FrameScheduler;
pub use subscription::Subscription;
pub use viewport::{Viewport, ViewportEvent};

/// Result type for scrolly-runtime operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for scrolly-runtime operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Scrolly core error: {0}")]
    Core(#[from] scrolly_core::Error),

    #[error("Got {lines} text lines for {segments} segments")]
    LineCountMismatch { lines: usize, segments: u32 },
}
