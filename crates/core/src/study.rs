//! Study-session arithmetic: XP and hours earned from an elapsed duration.

use crate::error::CoreError;

/// Seconds per hour (3600).
pub const SECS_PER_HOUR: i64 = 3_600;

/// XP granted per full hour of study.
pub const XP_PER_HOUR: i64 = 100;

/// Subject stored when the client omits one.
pub const DEFAULT_SUBJECT: &str = "General";

/// Intent stored when the client omits one.
pub const DEFAULT_INTENT: &str = "STUDY";

/// Reject durations that are zero or negative. There is no upper bound.
pub fn validate_duration(duration_seconds: i64) -> Result<(), CoreError> {
    if duration_seconds <= 0 {
        return Err(CoreError::Validation(format!(
            "duration must be a positive number of seconds, got {duration_seconds}"
        )));
    }
    Ok(())
}

/// XP earned for a session: `floor(duration / 3600 * 100)`.
///
/// Computed in integer arithmetic so the truncation is exact for every input.
pub fn xp_for_duration(duration_seconds: i64) -> i64 {
    let xp = i128::from(duration_seconds.max(0)) * i128::from(XP_PER_HOUR)
        / i128::from(SECS_PER_HOUR);
    i64::try_from(xp).unwrap_or(i64::MAX)
}

/// Hours credited to quest progress. Not truncated.
pub fn hours_for_duration(duration_seconds: i64) -> f64 {
    duration_seconds as f64 / SECS_PER_HOUR as f64
}

/// Convert an aggregate of seconds to hours rounded to one decimal place.
pub fn seconds_to_rounded_hours(total_seconds: i64) -> f64 {
    (hours_for_duration(total_seconds) * 10.0).round() / 10.0
}

/// Split a duration into whole hours and leftover whole minutes.
pub fn split_hours_minutes(duration_seconds: i64) -> (i64, i64) {
    let hours = duration_seconds / SECS_PER_HOUR;
    let minutes = (duration_seconds % SECS_PER_HOUR) / 60;
    (hours, minutes)
}
