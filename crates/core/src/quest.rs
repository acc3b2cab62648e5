//! Quest reward math and the per-(user, quest) lifecycle.
//!
//! ```text
//! NotJoined --join--> Joined --sessions--> Completable --claim--> Claimed
//! ```
//!
//! Settlement only ever moves progress forward; it never completes or claims
//! a quest on its own. Claiming is an explicit, separate operation.

use serde::Serialize;

use crate::error::CoreError;
use crate::study::XP_PER_HOUR;

/// XP reward for a quest: `floor(target_hours * 100)`, fixed at creation.
pub fn xp_reward_for_target(target_hours: f64) -> i64 {
    (target_hours * XP_PER_HOUR as f64).floor() as i64
}

/// A quest target must be a finite, strictly positive number of hours.
pub fn validate_target_hours(target_hours: f64) -> Result<(), CoreError> {
    if !target_hours.is_finite() || target_hours <= 0.0 {
        return Err(CoreError::Validation(
            "target_hours must be a positive number".to_string(),
        ));
    }
    Ok(())
}

/// Lifecycle state of a user's participation in one quest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QuestState {
    NotJoined,
    Joined,
    Completable,
    Claimed,
}

impl QuestState {
    /// Derive the state from an optional progress row.
    ///
    /// `progress` is `(progress_hours, is_claimed)` when the user has joined.
    pub fn derive(progress: Option<(f64, bool)>, target_hours: f64) -> Self {
        match progress {
            None => Self::NotJoined,
            Some((_, true)) => Self::Claimed,
            Some((hours, false)) if hours >= target_hours => Self::Completable,
            Some(_) => Self::Joined,
        }
    }
}
