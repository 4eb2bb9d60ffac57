//! Narrative outputs handed to presentational collaborators

use crate::{playback_time, SegmentState};

/// Everything a renderer reads after one scroll, resize or intersection event
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NarrativeSnapshot {
    /// Normalized scroll progress, may exceed 1
    pub progress: f64,
    /// Index of the text line to show, if any
    pub active_text_index: Option<u32>,
    /// Scroll has passed the end of the video
    pub after_video: bool,
    /// Video container intersects the viewport
    pub is_in_viewport: bool,
    /// Playback position when a video duration is configured
    pub playback_secs: Option<f64>,
}

impl Default for NarrativeSnapshot {
    fn default() -> Self {
        Self {
            progress: 0.0,
            active_text_index: None,
            after_video: false,
            is_in_viewport: true,
            playback_secs: None,
        }
    }
}

impl NarrativeSnapshot {
    /// Assembles a snapshot from the derived values
    pub fn new(
        progress: f64,
        segments: SegmentState,
        is_in_viewport: bool,
        video_duration_secs: Option<f64>,
    ) -> Self {
        Self {
            progress,
            active_text_index: segments.active_index,
            after_video: segments.after_video,
            is_in_viewport,
            playback_secs: video_duration_secs.map(|d| playback_time(progress, d)),
        }
    }

    /// Serializes the snapshot as a single JSON line
    #[cfg(feature = "serde")]
    pub fn to_json_line(&self) -> crate::Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_from_segments() {
        let segments = SegmentState {
            active_index: Some(2),
            after_video: false,
        };
        let snapshot = NarrativeSnapshot::new(0.4, segments, true, Some(10.0));
        assert_eq!(snapshot.active_text_index, Some(2));
        assert!(!snapshot.after_video);
        assert_eq!(snapshot.playback_secs, Some(4.0));

        let snapshot = NarrativeSnapshot::new(0.4, segments, false, None);
        assert_eq!(snapshot.playback_secs, None);
        assert!(!snapshot.is_in_viewport);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_json_line() {
        let line = NarrativeSnapshot::default().to_json_line().unwrap();
        assert!(line.contains("\"active_text_index\":null"));
        assert!(!line.contains('\n'));
    }
}
