//! Repository for the `activity_logs` and `activity_comments` tables.

use sqlx::{PgConnection, PgPool};
use studyquest_core::types::DbId;

use crate::models::activity_log::{
    ActivityFeedRow, ActivityLog, CommentWithAuthor, CreateActivityLog, CreateComment,
};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, activity_type, text, image_url, created_at, updated_at";

/// Append-only feed access.
pub struct ActivityLogRepo;

impl ActivityLogRepo {
    /// Append a feed entry.
    pub async fn create(
        conn: &mut PgConnection,
        input: &CreateActivityLog,
    ) -> Result<ActivityLog, sqlx::Error> {
        let query = format!(
            "INSERT INTO activity_logs (user_id, activity_type, text, image_url)
             VALUES ($1, $2, $3, $4)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, ActivityLog>(&query)
            .bind(input.user_id)
            .bind(input.activity_type.as_str())
            .bind(&input.text)
            .bind(&input.image_url)
            .fetch_one(conn)
            .await
    }

    /// Whether a feed entry exists.
    pub async fn exists(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let row: (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM activity_logs WHERE id = $1)")
            .bind(id)
            .fetch_one(pool)
            .await?;
        Ok(row.0)
    }

    /// Most recent entries across all users, joined with author fields.
    pub async fn list_recent(pool: &PgPool, limit: i64) -> Result<Vec<ActivityFeedRow>, sqlx::Error> {
        sqlx::query_as::<_, ActivityFeedRow>(
            "SELECT a.id, a.user_id, u.username, u.avatar_url,
                    a.activity_type, a.text, a.image_url, a.created_at
             FROM activity_logs a
             JOIN users u ON u.id = a.user_id
             ORDER BY a.created_at DESC, a.id DESC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }

    /// Comments for the given entries, oldest first within each entry.
    pub async fn comments_for(
        pool: &PgPool,
        activity_ids: &[DbId],
    ) -> Result<Vec<CommentWithAuthor>, sqlx::Error> {
        if activity_ids.is_empty() {
            return Ok(Vec::new());
        }
        sqlx::query_as::<_, CommentWithAuthor>(
            "SELECT c.id, c.activity_log_id, c.user_id, u.username, c.text, c.created_at
             FROM activity_comments c
             JOIN users u ON u.id = c.user_id
             WHERE c.activity_log_id = ANY($1)
             ORDER BY c.created_at ASC, c.id ASC",
        )
        .bind(activity_ids)
        .fetch_all(pool)
        .await
    }

    /// Attach a comment and return it with the commenter's username.
    pub async fn create_comment(
        conn: &mut PgConnection,
        input: &CreateComment,
    ) -> Result<CommentWithAuthor, sqlx::Error> {
        sqlx::query_as::<_, CommentWithAuthor>(
            "WITH inserted AS (
                 INSERT INTO activity_comments (activity_log_id, user_id, text)
                 VALUES ($1, $2, $3)
                 RETURNING id, activity_log_id, user_id, text, created_at
             )
             SELECT i.id, i.activity_log_id, i.user_id, u.username, i.text, i.created_at
             FROM inserted i
             JOIN users u ON u.id = i.user_id",
        )
        .bind(input.activity_log_id)
        .bind(input.user_id)
        .bind(&input.text)
        .fetch_one(conn)
        .await
    }
}
