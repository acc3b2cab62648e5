//! Repository for the `quest_progress` table.

use sqlx::{PgConnection, PgPool};
use studyquest_core::types::{DbId, Timestamp};

use crate::models::quest_progress::QuestProgress;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, user_id, quest_id, progress_hours, completed_at, created_at, updated_at";

/// Unique constraint on `(user_id, quest_id)`.
pub const USER_QUEST_CONSTRAINT: &str = "uq_quest_progress_user_quest";

/// Join, accumulate and claim operations for quest progress.
pub struct QuestProgressRepo;

impl QuestProgressRepo {
    /// Insert a progress row at zero hours.
    ///
    /// A second join for the same pair fails with a unique violation on
    /// [`USER_QUEST_CONSTRAINT`]; callers map that to "already joined".
    pub async fn create(
        conn: &mut PgConnection,
        user_id: DbId,
        quest_id: DbId,
    ) -> Result<QuestProgress, sqlx::Error> {
        let query = format!(
            "INSERT INTO quest_progress (user_id, quest_id, progress_hours)
             VALUES ($1, $2, 0)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, QuestProgress>(&query)
            .bind(user_id)
            .bind(quest_id)
            .fetch_one(conn)
            .await
    }

    /// Find the progress row for a (user, quest) pair.
    pub async fn find(
        pool: &PgPool,
        user_id: DbId,
        quest_id: DbId,
    ) -> Result<Option<QuestProgress>, sqlx::Error> {
        let query =
            format!("SELECT {COLUMNS} FROM quest_progress WHERE user_id = $1 AND quest_id = $2");
        sqlx::query_as::<_, QuestProgress>(&query)
            .bind(user_id)
            .bind(quest_id)
            .fetch_optional(pool)
            .await
    }

    /// All progress rows belonging to a user.
    pub async fn list_by_user(
        pool: &PgPool,
        user_id: DbId,
    ) -> Result<Vec<QuestProgress>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quest_progress WHERE user_id = $1 ORDER BY id");
        sqlx::query_as::<_, QuestProgress>(&query)
            .bind(user_id)
            .fetch_all(pool)
            .await
    }

    /// Add `hours` to every unclaimed progress row of the user.
    ///
    /// Returns the number of rows advanced.
    pub async fn add_hours_to_open(
        conn: &mut PgConnection,
        user_id: DbId,
        hours: f64,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE quest_progress SET progress_hours = progress_hours + $2
             WHERE user_id = $1 AND completed_at IS NULL",
        )
        .bind(user_id)
        .bind(hours)
        .execute(conn)
        .await?;
        Ok(result.rows_affected())
    }

    /// Compare-and-set the completion stamp.
    ///
    /// Only succeeds while `completed_at` is still null at write time. A
    /// concurrent claim blocks on the row lock and then re-checks the
    /// predicate, so exactly one caller observes `true`.
    pub async fn mark_completed(
        conn: &mut PgConnection,
        id: DbId,
        at: Timestamp,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE quest_progress SET completed_at = $2 WHERE id = $1 AND completed_at IS NULL",
        )
        .bind(id)
        .bind(at)
        .execute(conn)
        .await?;
        Ok(result.rows_affected() > 0)
    }
}
