//! Read side: activity feed, leaderboard and profile.
//!
//! Nothing here mutates the ledger except the rank resync in
//! [`QueryService::get_profile`], which repairs a cached label that drifted
//! from the user's XP.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use studyquest_core::activity::{clamp_limit, DEFAULT_FEED_LIMIT, DEFAULT_LEADERBOARD_LIMIT};
use studyquest_core::rank::{rank_of, resync, RankTier};
use studyquest_core::study::seconds_to_rounded_hours;
use studyquest_core::types::{DbId, Timestamp};
use studyquest_db::models::activity_log::CommentWithAuthor;

use crate::error::{LedgerError, LedgerResult};
use crate::store::LedgerStore;

/// A feed entry with its author and comments.
#[derive(Debug, Clone, Serialize)]
pub struct ActivityEntry {
    pub id: DbId,
    pub user_id: DbId,
    pub username: String,
    pub avatar_url: Option<String>,
    pub activity_type: String,
    pub text: String,
    pub image_url: Option<String>,
    pub created_at: Timestamp,
    /// Oldest first.
    pub comments: Vec<CommentWithAuthor>,
}

/// One leaderboard row. `rank` is the 1-based position, `tier` the rank label.
#[derive(Debug, Clone, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    pub user_id: DbId,
    pub username: String,
    pub avatar_url: Option<String>,
    pub xp: i64,
    pub tier: RankTier,
    pub total_hours: f64,
    pub streak: i32,
    pub is_current_user: bool,
}

/// The requesting user's own stats.
#[derive(Debug, Clone, Serialize)]
pub struct Profile {
    pub id: DbId,
    pub username: String,
    pub avatar_url: Option<String>,
    pub xp: i64,
    pub rank: RankTier,
    pub streak: i32,
    pub today_hours: f64,
    pub total_hours: f64,
    pub created_at: Timestamp,
}

/// Default page sizes when a list request carries no `limit`.
///
/// Requested and default limits alike are clamped to `1..=MAX_LIST_LIMIT`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListLimits {
    pub feed: i64,
    pub leaderboard: i64,
}

impl Default for ListLimits {
    fn default() -> Self {
        Self {
            feed: DEFAULT_FEED_LIMIT,
            leaderboard: DEFAULT_LEADERBOARD_LIMIT,
        }
    }
}

pub struct QueryService {
    store: Arc<dyn LedgerStore>,
    limits: ListLimits,
}

impl QueryService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self::with_limits(store, ListLimits::default())
    }

    pub fn with_limits(store: Arc<dyn LedgerStore>, limits: ListLimits) -> Self {
        Self { store, limits }
    }

    /// Most recent feed entries, newest first.
    pub async fn list_activity(&self, limit: Option<i64>) -> LedgerResult<Vec<ActivityEntry>> {
        let limit = clamp_limit(limit, self.limits.feed);
        let rows = self.store.recent_activity(limit).await?;

        let ids: Vec<DbId> = rows.iter().map(|r| r.id).collect();
        let mut comments: HashMap<DbId, Vec<CommentWithAuthor>> = HashMap::new();
        if !ids.is_empty() {
            for comment in self.store.comments_for(&ids).await? {
                comments
                    .entry(comment.activity_log_id)
                    .or_default()
                    .push(comment);
            }
        }

        Ok(rows
            .into_iter()
            .map(|row| ActivityEntry {
                comments: comments.remove(&row.id).unwrap_or_default(),
                id: row.id,
                user_id: row.user_id,
                username: row.username,
                avatar_url: row.avatar_url,
                activity_type: row.activity_type,
                text: row.text,
                image_url: row.image_url,
                created_at: row.created_at,
            })
            .collect())
    }

    /// Users ordered by XP, recomputed on every call.
    pub async fn list_leaderboard(
        &self,
        current_user: DbId,
        limit: Option<i64>,
    ) -> LedgerResult<Vec<LeaderboardEntry>> {
        let limit = clamp_limit(limit, self.limits.leaderboard);
        let rows = self.store.leaderboard(limit).await?;

        Ok(rows
            .into_iter()
            .enumerate()
            .map(|(idx, row)| LeaderboardEntry {
                rank: idx + 1,
                user_id: row.id,
                is_current_user: row.id == current_user,
                username: row.username,
                avatar_url: row.avatar_url,
                xp: row.xp,
                tier: rank_of(row.xp),
                total_hours: seconds_to_rounded_hours(row.total_seconds),
                streak: row.streak,
            })
            .collect())
    }

    /// Profile with study totals. A cached rank that no longer matches XP is
    /// rewritten before returning.
    pub async fn get_profile(&self, user_id: DbId) -> LedgerResult<Profile> {
        let user = self
            .store
            .find_user(user_id)
            .await?
            .ok_or(LedgerError::UserNotFound(user_id))?;

        let midnight = Utc::now()
            .date_naive()
            .and_hms_opt(0, 0, 0)
            .map(|t| t.and_utc());
        let today_seconds = match midnight {
            Some(since) => self.store.study_seconds(user_id, Some(since)).await?,
            None => 0,
        };
        let total_seconds = self.store.study_seconds(user_id, None).await?;

        let mut xp = user.xp;
        let mut rank = rank_of(user.xp);
        if resync(&user.rank, user.xp).is_some() {
            let mut tx = self.store.begin().await?;
            let (fresh_xp, cached) = tx
                .xp_and_rank(user_id)
                .await?
                .ok_or(LedgerError::UserNotFound(user_id))?;
            xp = fresh_xp;
            rank = rank_of(fresh_xp);
            if let Some(tier) = resync(&cached, fresh_xp) {
                tx.set_rank(user_id, tier.as_str()).await?;
                tracing::warn!(
                    user_id,
                    xp = fresh_xp,
                    stale = %cached,
                    fresh = %tier,
                    "Resynced drifted rank",
                );
            }
            tx.commit().await?;
        }

        Ok(Profile {
            id: user.id,
            username: user.username,
            avatar_url: user.avatar_url,
            xp,
            rank,
            streak: user.streak,
            today_hours: seconds_to_rounded_hours(today_seconds),
            total_hours: seconds_to_rounded_hours(total_seconds),
            created_at: user.created_at,
        })
    }
}
