//! Activity feed vocabulary: entry types, feed text and list limits.

use serde::{Deserialize, Serialize};

use crate::study::split_hours_minutes;

/// Default number of feed entries returned.
pub const DEFAULT_FEED_LIMIT: i64 = 20;
/// Default number of leaderboard rows returned.
pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 10;
/// Upper bound on any list request.
pub const MAX_LIST_LIMIT: i64 = 100;

/// Kind of activity-log entry. Stored as the upper-case label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ActivityType {
    Study,
    Quest,
    Proof,
}

impl ActivityType {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Study => "STUDY",
            Self::Quest => "QUEST",
            Self::Proof => "PROOF",
        }
    }
}

/// Clamp a requested list size into `1..=MAX_LIST_LIMIT`, using `default`
/// when none was requested.
pub fn clamp_limit(requested: Option<i64>, default: i64) -> i64 {
    requested.unwrap_or(default).clamp(1, MAX_LIST_LIMIT)
}

// ---------------------------------------------------------------------------
// Feed text
// ---------------------------------------------------------------------------

/// `completed 1h 30m – Deep work`; the hours part is omitted below one hour.
pub fn study_summary(duration_seconds: i64, intent: &str) -> String {
    let (hours, minutes) = split_hours_minutes(duration_seconds);
    if hours > 0 {
        format!("completed {hours}h {minutes}m \u{2013} {intent}")
    } else {
        format!("completed {minutes}m \u{2013} {intent}")
    }
}

pub fn quest_created(title: &str) -> String {
    format!("created quest: {title}")
}

pub fn quest_joined(title: &str) -> String {
    format!("joined quest: {title}")
}

pub fn quest_completed(title: &str, xp_reward: i64) -> String {
    format!("completed quest: {title} [+{xp_reward} XP]")
}
