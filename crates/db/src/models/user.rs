//! User entity model and DTOs.

use serde::Serialize;
use sqlx::FromRow;
use studyquest_core::types::{DbId, Timestamp};

/// Full user row from the `users` table.
///
/// Contains the passphrase hash -- NEVER serialize this to API responses directly.
/// Use [`UserInfo`] or a read-side projection for external-facing output.
#[derive(Debug, Clone, FromRow)]
pub struct User {
    pub id: DbId,
    pub username: String,
    pub passphrase_hash: String,
    pub xp: i64,
    /// Cached [`studyquest_core::rank::rank_of`] label for `xp`.
    pub rank: String,
    pub streak: i32,
    pub avatar_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// Public identity embedded in auth responses.
#[derive(Debug, Clone, Serialize)]
pub struct UserInfo {
    pub id: DbId,
    pub username: String,
}

impl From<&User> for UserInfo {
    fn from(user: &User) -> Self {
        Self {
            id: user.id,
            username: user.username.clone(),
        }
    }
}

/// DTO for creating a new user.
#[derive(Debug)]
pub struct CreateUser {
    pub username: String,
    pub passphrase_hash: String,
}

/// One leaderboard candidate with its lifetime study total.
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardRow {
    pub id: DbId,
    pub username: String,
    pub avatar_url: Option<String>,
    pub xp: i64,
    pub rank: String,
    pub streak: i32,
    pub total_seconds: i64,
}
