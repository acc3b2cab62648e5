//! Repository for the `users` table.

use sqlx::{PgConnection, PgPool};
use studyquest_core::types::DbId;

use crate::models::user::{CreateUser, LeaderboardRow, User};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, username, passphrase_hash, xp, rank, streak, avatar_url, \
                        created_at, updated_at";

/// Unique constraint on `users.username`.
pub const USERNAME_CONSTRAINT: &str = "uq_users_username";

/// Provides account lookups and XP/rank mutation for users.
pub struct UserRepo;

impl UserRepo {
    /// Insert a new user at zero XP in the novice rank, returning the created row.
    pub async fn create(pool: &PgPool, input: &CreateUser) -> Result<User, sqlx::Error> {
        let query = format!(
            "INSERT INTO users (username, passphrase_hash)
             VALUES ($1, $2)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, User>(&query)
            .bind(&input.username)
            .bind(&input.passphrase_hash)
            .fetch_one(pool)
            .await
    }

    /// Find a user by internal ID.
    pub async fn find_by_id(pool: &PgPool, id: DbId) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE id = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(id)
            .fetch_optional(pool)
            .await
    }

    /// Find a user by username (case-sensitive).
    pub async fn find_by_username(
        pool: &PgPool,
        username: &str,
    ) -> Result<Option<User>, sqlx::Error> {
        let query = format!("SELECT {COLUMNS} FROM users WHERE username = $1");
        sqlx::query_as::<_, User>(&query)
            .bind(username)
            .fetch_optional(pool)
            .await
    }

    /// Take the row lock on a user for the rest of the transaction.
    ///
    /// `FOR NO KEY UPDATE` is the lock a later `xp`/`rank` update would take
    /// anyway, so it does not block foreign-key inserts referencing the user.
    /// Returns `false` if the user does not exist.
    pub async fn lock(conn: &mut PgConnection, id: DbId) -> Result<bool, sqlx::Error> {
        let row: Option<(DbId,)> =
            sqlx::query_as("SELECT id FROM users WHERE id = $1 FOR NO KEY UPDATE")
                .bind(id)
                .fetch_optional(conn)
                .await?;
        Ok(row.is_some())
    }

    /// Apply a relative XP delta and return the new total.
    ///
    /// The increment is evaluated by the database under the row lock, so
    /// concurrent settlements never lose an update. Returns `None` if the
    /// user does not exist.
    pub async fn add_xp(
        conn: &mut PgConnection,
        id: DbId,
        delta: i64,
    ) -> Result<Option<i64>, sqlx::Error> {
        let row: Option<(i64,)> =
            sqlx::query_as("UPDATE users SET xp = xp + $2 WHERE id = $1 RETURNING xp")
                .bind(id)
                .bind(delta)
                .fetch_optional(conn)
                .await?;
        Ok(row.map(|(xp,)| xp))
    }

    /// Read the current XP and cached rank inside a transaction.
    pub async fn xp_and_rank(
        conn: &mut PgConnection,
        id: DbId,
    ) -> Result<Option<(i64, String)>, sqlx::Error> {
        sqlx::query_as("SELECT xp, rank FROM users WHERE id = $1")
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Overwrite the cached rank label. Returns `true` if the label changed.
    pub async fn set_rank(
        conn: &mut PgConnection,
        id: DbId,
        rank: &str,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("UPDATE users SET rank = $2 WHERE id = $1 AND rank <> $2")
            .bind(id)
            .bind(rank)
            .execute(conn)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Top users by XP (ties broken by id) with their lifetime study seconds.
    pub async fn leaderboard(pool: &PgPool, limit: i64) -> Result<Vec<LeaderboardRow>, sqlx::Error> {
        sqlx::query_as::<_, LeaderboardRow>(
            "SELECT u.id, u.username, u.avatar_url, u.xp, u.rank, u.streak,
                    COALESCE(s.total_seconds, 0)::BIGINT AS total_seconds
             FROM users u
             LEFT JOIN (
                 SELECT user_id, SUM(duration_seconds) AS total_seconds
                 FROM study_sessions
                 GROUP BY user_id
             ) s ON s.user_id = u.id
             ORDER BY u.xp DESC, u.id ASC
             LIMIT $1",
        )
        .bind(limit)
        .fetch_all(pool)
        .await
    }
}
