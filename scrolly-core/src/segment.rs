//! Segment resolution: which text act is active at a given progress

use crate::config::DEFAULT_SEGMENT_COUNT;
use crate::{Error, Result};
use std::fmt;
use std::num::NonZeroU32;

/// Number of text segments spread evenly over progress space.
///
/// One extra implicit unit is reserved for the trailing region, so each
/// segment owns `1 / (count + 1)` of progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(try_from = "u32", into = "u32"))]
pub struct SegmentCount(NonZeroU32);

impl SegmentCount {
    /// Default number of text acts
    pub const DEFAULT: Self = match NonZeroU32::new(DEFAULT_SEGMENT_COUNT) {
        Some(count) => Self(count),
        None => panic!("default segment count must be non-zero"),
    };

    /// Creates a segment count, rejecting zero
    pub fn new(count: u32) -> Result<Self> {
        NonZeroU32::new(count)
            .map(Self)
            .ok_or(Error::InvalidSegmentCount(count))
    }

    /// Returns the count as a plain integer
    pub fn get(self) -> u32 {
        self.0.get()
    }

    /// Length of one segment in progress units
    pub fn segment_len(self) -> f64 {
        1.0 / (f64::from(self.get()) + 1.0)
    }

    /// Progress at which the last segment ends and the trailing region begins
    pub fn trailing_start(self) -> f64 {
        self.segment_len() * f64::from(self.get())
    }

    /// Half-open progress interval `[start, end)` owned by segment `index`
    pub fn bounds(self, index: u32) -> Option<(f64, f64)> {
        if index >= self.get() {
            return None;
        }
        let len = self.segment_len();
        Some((len * f64::from(index), len * f64::from(index + 1)))
    }
}

impl Default for SegmentCount {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<u32> for SegmentCount {
    type Error = Error;

    fn try_from(count: u32) -> Result<Self> {
        Self::new(count)
    }
}

impl From<SegmentCount> for u32 {
    fn from(count: SegmentCount) -> Self {
        count.get()
    }
}

impl fmt::Display for SegmentCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.get())
    }
}

/// Output of segment resolution for one progress value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SegmentState {
    /// Index of the active text segment, if any
    pub active_index: Option<u32>,
    /// True once progress has reached the end of the video
    pub after_video: bool,
}

/// Resolves the active segment and after-video flag for `progress`.
///
/// Segments finish at `count / (count + 1)`, before the video itself ends at
/// progress 1, so there is a band where no text is shown yet `after_video`
/// is still false.
pub fn resolve(progress: f64, count: SegmentCount) -> SegmentState {
    let len = count.segment_len();

    let mut active_index = None;
    for i in 0..count.get() {
        let start = len * f64::from(i);
        let end = len * f64::from(i + 1);
        if progress >= start && progress < end {
            active_index = Some(i);
            break;
        }
    }

    if progress >= count.trailing_start() {
        active_index = None;
    }

    SegmentState {
        active_index,
        after_video: progress >= 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn five() -> SegmentCount {
        SegmentCount::new(5).unwrap()
    }

    #[test]
    fn test_zero_count_rejected() {
        assert!(matches!(
            SegmentCount::new(0),
            Err(Error::InvalidSegmentCount(0))
        ));
    }

    #[test]
    fn test_start_is_first_segment() {
        let state = resolve(0.0, five());
        assert_eq!(state.active_index, Some(0));
        assert!(!state.after_video);
    }

    #[test]
    fn test_boundary_belongs_to_next_segment() {
        let state = resolve(1.0 / 6.0, five());
        assert_eq!(state.active_index, Some(1));
    }

    #[test]
    fn test_trailing_region_before_video_end() {
        let state = resolve(0.99, five());
        assert_eq!(state.active_index, None);
        assert!(!state.after_video);
    }

    #[test]
    fn test_after_video() {
        let state = resolve(1.0, five());
        assert_eq!(state.active_index, None);
        assert!(state.after_video);

        let state = resolve(3.5, five());
        assert_eq!(state.active_index, None);
        assert!(state.after_video);
    }

    #[test]
    fn test_negative_progress_outside_segments() {
        let state = resolve(-0.25, five());
        assert_eq!(state.active_index, None);
        assert!(!state.after_video);
    }

    #[test]
    fn test_trailing_start_is_exclusive_end_of_last_segment() {
        let count = five();
        let (_, last_end) = count.bounds(4).unwrap();
        assert_eq!(last_end, count.trailing_start());
        assert_eq!(resolve(count.trailing_start(), count).active_index, None);
        assert!(count.bounds(5).is_none());
    }

    #[test]
    fn test_index_within_range_for_all_counts() {
        for n in 1..=12 {
            let count = SegmentCount::new(n).unwrap();
            for step in 0..1000 {
                let progress = f64::from(step) / 1000.0;
                let state = resolve(progress, count);
                match state.active_index {
                    Some(i) => {
                        assert!(i < n);
                        let (start, end) = count.bounds(i).unwrap();
                        assert!(progress >= start && progress < end);
                    }
                    None => assert!(progress >= count.trailing_start()),
                }
                assert!(!state.after_video);
            }
        }
    }

    #[test]
    fn test_after_video_monotonic() {
        let count = SegmentCount::new(3).unwrap();
        let mut seen = false;
        for step in 0..=300 {
            let state = resolve(f64::from(step) / 200.0, count);
            if seen {
                assert!(state.after_video);
            }
            seen = state.after_video;
        }
        assert!(seen);
    }
}
