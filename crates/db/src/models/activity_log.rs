//! Activity feed models: log entries and their comments.

use serde::Serialize;
use sqlx::FromRow;
use studyquest_core::activity::ActivityType;
use studyquest_core::types::{DbId, Timestamp};

/// A row from the `activity_logs` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct ActivityLog {
    pub id: DbId,
    pub user_id: DbId,
    pub activity_type: String,
    pub text: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for appending a feed entry.
#[derive(Debug, Clone)]
pub struct CreateActivityLog {
    pub user_id: DbId,
    pub activity_type: ActivityType,
    pub text: String,
    pub image_url: Option<String>,
}

/// Feed entry joined with its author's public fields.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityFeedRow {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub avatar_url: Option<String>,
    pub activity_type: String,
    pub text: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
}

/// DTO for attaching a comment to a feed entry.
#[derive(Debug, Clone)]
pub struct CreateComment {
    pub activity_log_id: DbId,
    pub user_id: DbId,
    pub text: String,
}

/// A comment joined with the commenter's username.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct CommentWithAuthor {
    pub id: DbId,
    pub activity_log_id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub text: String,
    pub created_at: Timestamp,
}
