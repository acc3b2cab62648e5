//! Repository for the `study_sessions` table.

use sqlx::{PgConnection, PgPool};
use studyquest_core::types::{DbId, Timestamp};

use crate::models::study_session::{CreateStudySession, StudySession};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, subject, intent, duration_seconds, time_window, \
                        started_at, created_at, updated_at";

/// Insert-only access to study sessions plus duration aggregates.
pub struct StudySessionRepo;

impl StudySessionRepo {
    /// Insert an immutable session row.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateStudySession,
    ) -> Result<StudySession, sqlx::Error> {
        let query = format!(
            "INSERT INTO study_sessions
                (user_id, subject, intent, duration_seconds, time_window, started_at)
             VALUES ($1, $2, $3, $4, $5, $6)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, StudySession>(&query)
            .bind(input.user_id)
            .bind(&input.subject)
            .bind(&input.intent)
            .bind(input.duration_seconds)
            .bind(&input.time_window)
            .bind(input.started_at)
            .fetch_one(conn)
            .await
    }

    /// Sum of `duration_seconds` for a user, optionally only for sessions
    /// recorded at or after `since`.
    pub async fn total_seconds(
        pool: &PgPool,
        user_id: DbId,
        since: Option<Timestamp>,
    ) -> Result<i64, sqlx::Error> {
        let row: (i64,) = sqlx::query_as(
            "SELECT COALESCE(SUM(duration_seconds), 0)::BIGINT
             FROM study_sessions
             WHERE user_id = $1
               AND ($2::TIMESTAMPTZ IS NULL OR created_at >= $2)",
        )
        .bind(user_id)
        .bind(since)
        .fetch_one(pool)
        .await?;
        Ok(row.0)
    }
}
