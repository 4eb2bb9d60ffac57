//! Narrative configuration
//!
//! All tunable distances and counts live here. With the `serde` feature the
//! config deserializes from any serde format, and every missing field falls
//! back to its default.

use crate::visibility::{ObserverOptions, DEFAULT_ROOT_MARGIN_PX, DEFAULT_THRESHOLDS};
use crate::{Error, Result, SegmentCount};
use std::fmt;

/// Base extra scroll distance in pixels on most platforms
pub const DEFAULT_SCROLL_EXTRA_PX: f64 = 4000.0;

/// Extra scroll distance on platforms whose viewport height changes while
/// scrolling (collapsing address bar)
pub const PLATFORM_SCROLL_EXTRA_PX: f64 = 6000.0;

/// Trailing scroll padding after the video ends
pub const AFTER_VIDEO_EXTRA_HEIGHT: f64 = 200.0;

/// Default number of text acts
pub const DEFAULT_SEGMENT_COUNT: u32 = 5;

/// Platform the narrative is presented on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Platform {
    #[default]
    Standard,
    /// Reports a different viewport height while the address bar shows or
    /// hides, so it needs a longer scroll distance for the same pacing
    Ios,
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Platform::Standard => write!(f, "standard"),
            Platform::Ios => write!(f, "ios"),
        }
    }
}

/// Extra distances added to the viewport height to size the scroll container
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExtraDistances {
    /// Scroll distance mapped onto the video
    pub scroll_extra_px: f64,
    /// Trailing padding scrolled after the video
    pub after_video_extra_px: f64,
}

impl ExtraDistances {
    /// Creates a new pair of distances
    pub fn new(scroll_extra_px: f64, after_video_extra_px: f64) -> Self {
        Self {
            scroll_extra_px,
            after_video_extra_px,
        }
    }

    /// Container height for a viewport of `viewport_height` pixels.
    ///
    /// Negative distances count as zero so the container never ends up
    /// shorter than the viewport.
    pub fn container_height(&self, viewport_height: f64) -> f64 {
        viewport_height + self.scroll_extra_px.max(0.0) + self.after_video_extra_px.max(0.0)
    }
}

/// Configuration for one scroll-driven narrative
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct NarrativeConfig {
    /// Base scroll distance in pixels
    pub default_scroll_extra_px: f64,
    /// Scroll distance on [`Platform::Ios`]
    pub platform_scroll_extra_px: f64,
    /// Trailing padding after the video in pixels
    pub after_video_extra_height: f64,
    /// Number of text acts when the caller does not override it
    pub default_segment_count: SegmentCount,
    /// Intersection thresholds for the visibility gate
    pub thresholds: Vec<f64>,
    /// Root margin for the visibility gate in pixels
    pub root_margin_px: f64,
    /// Video duration, used to report a playback position
    pub video_duration_secs: Option<f64>,
}

impl Default for NarrativeConfig {
    fn default() -> Self {
        Self {
            default_scroll_extra_px: DEFAULT_SCROLL_EXTRA_PX,
            platform_scroll_extra_px: PLATFORM_SCROLL_EXTRA_PX,
            after_video_extra_height: AFTER_VIDEO_EXTRA_HEIGHT,
            default_segment_count: SegmentCount::DEFAULT,
            thresholds: DEFAULT_THRESHOLDS.to_vec(),
            root_margin_px: DEFAULT_ROOT_MARGIN_PX,
            video_duration_secs: None,
        }
    }
}

impl NarrativeConfig {
    /// Checks distances, thresholds and duration
    pub fn validate(&self) -> Result<()> {
        for (name, value) in [
            ("default_scroll_extra_px", self.default_scroll_extra_px),
            ("platform_scroll_extra_px", self.platform_scroll_extra_px),
            ("after_video_extra_height", self.after_video_extra_height),
        ] {
            if value.is_nan() || value < 0.0 {
                return Err(Error::NegativeDistance { name, value });
            }
        }

        if let Some(duration) = self.video_duration_secs {
            if !duration.is_finite() || duration <= 0.0 {
                return Err(Error::InvalidDuration(duration));
            }
        }

        self.observer_options().map(|_| ())
    }

    /// Base scroll distance for `platform`
    pub fn scroll_extra_px(&self, platform: Platform) -> f64 {
        match platform {
            Platform::Standard => self.default_scroll_extra_px,
            Platform::Ios => self.platform_scroll_extra_px,
        }
    }

    /// Both extra distances for `platform`
    pub fn distances(&self, platform: Platform) -> ExtraDistances {
        ExtraDistances::new(self.scroll_extra_px(platform), self.after_video_extra_height)
    }

    /// Observer options built from the configured thresholds and margin
    pub fn observer_options(&self) -> Result<ObserverOptions> {
        ObserverOptions::new(self.thresholds.clone(), self.root_margin_px)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_container_height() {
        let distances = ExtraDistances::new(4000.0, 200.0);
        assert_eq!(distances.container_height(800.0), 5000.0);
        // same input, same output
        assert_eq!(distances.container_height(800.0), 5000.0);
    }

    #[test]
    fn test_container_never_shorter_than_viewport() {
        let distances = ExtraDistances::new(-100.0, -50.0);
        assert_eq!(distances.container_height(700.0), 700.0);
    }

    #[test]
    fn test_platform_distance() {
        let config = NarrativeConfig::default();
        assert_eq!(config.scroll_extra_px(Platform::Standard), DEFAULT_SCROLL_EXTRA_PX);
        assert_eq!(config.scroll_extra_px(Platform::Ios), PLATFORM_SCROLL_EXTRA_PX);
        assert_eq!(
            config.distances(Platform::Ios).after_video_extra_px,
            AFTER_VIDEO_EXTRA_HEIGHT
        );
    }

    #[test]
    fn test_default_config_is_valid() {
        let config = NarrativeConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.default_segment_count.get(), DEFAULT_SEGMENT_COUNT);
    }

    #[test]
    fn test_validate_rejects_bad_values() {
        let config = NarrativeConfig {
            after_video_extra_height: -1.0,
            ..NarrativeConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(Error::NegativeDistance {
                name: "after_video_extra_height",
                ..
            })
        ));

        let config = NarrativeConfig {
            thresholds: vec![0.0, 1.5],
            ..NarrativeConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidThreshold(_))));

        let config = NarrativeConfig {
            video_duration_secs: Some(0.0),
            ..NarrativeConfig::default()
        };
        assert!(matches!(config.validate(), Err(Error::InvalidDuration(_))));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_partial_json_uses_defaults() {
        let config: NarrativeConfig =
            serde_json::from_str(r#"{"default_segment_count": 3, "root_margin_px": 0}"#).unwrap();
        assert_eq!(config.default_segment_count.get(), 3);
        assert_eq!(config.root_margin_px, 0.0);
        assert_eq!(config.default_scroll_extra_px, DEFAULT_SCROLL_EXTRA_PX);

        assert!(serde_json::from_str::<NarrativeConfig>(r#"{"default_segment_count": 0}"#).is_err());
    }
}
