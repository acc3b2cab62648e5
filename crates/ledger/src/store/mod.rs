//! The injected Ledger Store interface.
//!
//! [`LedgerStore`] exposes independent reads plus [`LedgerStore::begin`],
//! which opens a scoped [`LedgerTx`]. A transaction takes effect only when
//! [`LedgerTx::commit`] returns `Ok`; dropping it on any other path rolls
//! back and releases the underlying connection (or lock).
//!
//! Services must not call read methods on the store while they hold an open
//! transaction: all reads that feed a settlement happen before `begin`, and
//! everything after goes through the transaction handle.

use async_trait::async_trait;
use studyquest_core::types::{DbId, Timestamp};
use studyquest_db::models::activity_log::{
    ActivityFeedRow, ActivityLog, CommentWithAuthor, CreateActivityLog, CreateComment,
};
use studyquest_db::models::quest::{CreateQuest, Quest};
use studyquest_db::models::quest_progress::QuestProgress;
use studyquest_db::models::study_session::{CreateStudySession, StudySession};
use studyquest_db::models::user::{CreateUser, LeaderboardRow, User};

use crate::error::LedgerResult;

pub mod memory;
pub mod postgres;

pub use memory::MemoryLedgerStore;
pub use postgres::PgLedgerStore;

/// Persistent ledger of users, sessions, quests, progress and the feed.
#[async_trait]
pub trait LedgerStore: Send + Sync {
    /// Open a scoped transaction.
    async fn begin(&self) -> LedgerResult<Box<dyn LedgerTx>>;

    /// Check storage connectivity.
    async fn health_check(&self) -> LedgerResult<()>;

    // -- Accounts --------------------------------------------------------

    /// Create an account; fails with `UsernameTaken` on a duplicate name.
    async fn create_user(&self, input: &CreateUser) -> LedgerResult<User>;

    async fn find_user(&self, id: DbId) -> LedgerResult<Option<User>>;

    async fn find_user_by_username(&self, username: &str) -> LedgerResult<Option<User>>;

    // -- Quests ----------------------------------------------------------

    async fn find_quest(&self, id: DbId) -> LedgerResult<Option<Quest>>;

    /// All quests, newest first.
    async fn list_quests(&self) -> LedgerResult<Vec<Quest>>;

    async fn find_progress(&self, user_id: DbId, quest_id: DbId)
        -> LedgerResult<Option<QuestProgress>>;

    async fn list_progress(&self, user_id: DbId) -> LedgerResult<Vec<QuestProgress>>;

    // -- Feed ------------------------------------------------------------

    async fn activity_exists(&self, id: DbId) -> LedgerResult<bool>;

    /// Newest entries first, joined with author fields.
    async fn recent_activity(&self, limit: i64) -> LedgerResult<Vec<ActivityFeedRow>>;

    /// Comments for the given entries, oldest first.
    async fn comments_for(&self, activity_ids: &[DbId]) -> LedgerResult<Vec<CommentWithAuthor>>;

    // -- Aggregates ------------------------------------------------------

    /// Users by XP descending (ties by id) with lifetime study seconds.
    async fn leaderboard(&self, limit: i64) -> LedgerResult<Vec<LeaderboardRow>>;

    /// Total study seconds for a user, optionally only since `since`.
    async fn study_seconds(&self, user_id: DbId, since: Option<Timestamp>) -> LedgerResult<i64>;
}

/// One open transaction against the ledger.
///
/// Each method is applied in call order and becomes visible to others only
/// after [`commit`](LedgerTx::commit).
#[async_trait]
pub trait LedgerTx: Send {
    /// Lock the user's row until commit; `false` for an unknown user.
    ///
    /// Every settlement that touches a user calls this before any other
    /// write, so per-user writes always lock the user row first.
    async fn lock_user(&mut self, user_id: DbId) -> LedgerResult<bool>;

    async fn insert_session(&mut self, input: &CreateStudySession) -> LedgerResult<StudySession>;

    /// Apply a relative XP delta; returns the new total, or `None` for an
    /// unknown user.
    async fn add_xp(&mut self, user_id: DbId, delta: i64) -> LedgerResult<Option<i64>>;

    /// Current `(xp, cached rank label)` as seen by this transaction.
    async fn xp_and_rank(&mut self, user_id: DbId) -> LedgerResult<Option<(i64, String)>>;

    /// Persist a rank label; returns `true` if it differed from the stored one.
    async fn set_rank(&mut self, user_id: DbId, rank: &str) -> LedgerResult<bool>;

    /// Add hours to every unclaimed progress row of the user; returns rows advanced.
    async fn add_open_progress_hours(&mut self, user_id: DbId, hours: f64) -> LedgerResult<u64>;

    /// Insert a zero-hour progress row; `AlreadyJoined` if the pair exists.
    async fn insert_progress(&mut self, user_id: DbId, quest_id: DbId)
        -> LedgerResult<QuestProgress>;

    /// Compare-and-set `completed_at`; `false` if it was no longer null.
    async fn mark_progress_completed(&mut self, progress_id: DbId, at: Timestamp)
        -> LedgerResult<bool>;

    async fn insert_quest(&mut self, input: &CreateQuest) -> LedgerResult<Quest>;

    async fn append_activity(&mut self, input: &CreateActivityLog) -> LedgerResult<ActivityLog>;

    async fn insert_comment(&mut self, input: &CreateComment) -> LedgerResult<CommentWithAuthor>;

    /// Make every effect of this transaction visible atomically.
    async fn commit(self: Box<Self>) -> LedgerResult<()>;
}
