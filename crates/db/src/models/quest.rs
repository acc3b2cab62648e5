//! Quest entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use studyquest_core::types::{DbId, Timestamp};

/// A row from the `quests` table. `xp_reward` is fixed at creation.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Quest {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub target_hours: f64,
    pub xp_reward: i64,
    pub created_by: Option<DbId>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for creating a quest.
#[derive(Debug, Clone)]
pub struct CreateQuest {
    pub title: String,
    pub description: String,
    pub target_hours: f64,
    pub xp_reward: i64,
    pub created_by: Option<DbId>,
}
