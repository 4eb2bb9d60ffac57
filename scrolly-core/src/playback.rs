//! Progress to video playback position

/// Playback time in seconds for `progress` over a video of `duration_secs`.
///
/// Clamped to `[0, duration]`: progress past 1 holds the last frame.
pub fn playback_time(progress: f64, duration_secs: f64) -> f64 {
    if !duration_secs.is_finite() || duration_secs <= 0.0 || progress.is_nan() {
        return 0.0;
    }
    (progress * duration_secs).clamp(0.0, duration_secs)
}
