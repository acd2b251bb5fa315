//! Display helpers for the countdown

use crate::error::TimerError;

/// Format seconds as `MM:SS`. Minutes are not capped.
pub fn format_time(total_seconds: i64) -> Result<String, TimerError> {
    let seconds = u64::try_from(total_seconds).map_err(|_| TimerError::InvalidDuration(total_seconds))?;
    Ok(format_seconds(seconds))
}

/// Infallible form of [`format_time`] for values that cannot be negative
pub fn format_seconds(total_seconds: u64) -> String {
    format!("{:02}:{:02}", total_seconds / 60, total_seconds % 60)
}

/// Fraction of `total` still remaining: 1 when just started, 0 when expired.
///
/// A zero `total` yields 1. Inputs outside `0..=total` are not clamped.
pub fn calculate_progress(remaining: u64, total: u64) -> f64 {
    if total == 0 {
        return 1.0;
    }
    remaining as f64 / total as f64
}
