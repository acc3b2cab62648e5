//! Study session model. Rows are immutable once inserted.

use serde::Serialize;
use sqlx::FromRow;
use studyquest_core::types::{DbId, Timestamp};

/// A completed timer run from the `study_sessions` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct StudySession {
    pub id: DbId,
    pub user_id: DbId,
    pub subject: String,
    pub intent: String,
    pub duration_seconds: i64,
    pub time_window: Option<String>,
    pub started_at: Timestamp,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for recording a study session. Text fields arrive already sanitised.
#[derive(Debug, Clone)]
pub struct CreateStudySession {
    pub user_id: DbId,
    pub subject: String,
    pub intent: String,
    pub duration_seconds: i64,
    pub time_window: Option<String>,
    pub started_at: Timestamp,
}
