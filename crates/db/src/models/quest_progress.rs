//! Per-(user, quest) progress model.

use serde::Serialize;
use sqlx::FromRow;
use studyquest_core::types::{DbId, Timestamp};

/// A row from the `quest_progress` table.
///
/// `completed_at` is null until the reward is claimed and never changes after.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct QuestProgress {
    pub id: DbId,
    pub user_id: DbId,
    pub quest_id: DbId,
    pub progress_hours: f64,
    pub completed_at: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl QuestProgress {
    pub fn is_claimed(&self) -> bool {
        self.completed_at.is_some()
    }
}
