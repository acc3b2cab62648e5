//! Repository for the `quests` table.

use sqlx::{PgConnection, PgPool};
use studyquest_core::types::DbId;

use crate::models::quest::{CreateQuest, Quest};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, description, target_hours, xp_reward, created_by, \
                        created_at, updated_at";

pub struct QuestRepo;

impl QuestRepo {
    /// Insert a new quest, returning the created row.
    pub async fn create(conn: &mut PgConnection, input: &CreateQuest) -> Result<Quest, sqlx::Error> {
        let query = format!(
            "INSERT INTO quests (title, description, target_hours, xp_reward, created_by)
             VALUES ($1, $2, $3, $4, $5)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Quest>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.target_hours)
            .bind(input.xp_reward)
            .bind(input.created_by)
            .fetch_one(conn)
            .await
    }

    /// Find a quest by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<Quest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quests WHERE id = $1");
        sqlx::query_as::<_, Quest>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// List all quests, newest first.
    pub async fn list(pool: &PgPool) -> Result<Vec<Quest>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM quests ORDER BY created_at DESC, id DESC");
        sqlx::query_as::<_, Quest>(&query).fetch_all(pool).await
    }
}
