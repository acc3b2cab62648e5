//! PostgreSQL-backed [`LedgerStore`] delegating to the `studyquest_db` repositories.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, Transaction};
use studyquest_core::types::{DbId, Timestamp};
use studyquest_db::models::activity_log::{
    ActivityFeedRow, ActivityLog, CommentWithAuthor, CreateActivityLog, CreateComment,
};
use studyquest_db::models::quest::{CreateQuest, Quest};
use studyquest_db::models::quest_progress::QuestProgress;
use studyquest_db::models::study_session::{CreateStudySession, StudySession};
use studyquest_db::models::user::{CreateUser, LeaderboardRow, User};
use studyquest_db::repositories::quest_progress_repo::USER_QUEST_CONSTRAINT;
use studyquest_db::repositories::user_repo::USERNAME_CONSTRAINT;
use studyquest_db::repositories::{
    ActivityLogRepo, QuestProgressRepo, QuestRepo, StudySessionRepo, UserRepo,
};

use super::{LedgerStore, LedgerTx};
use crate::error::{LedgerError, LedgerResult};

/// Ledger store over a shared connection pool.
#[derive(Clone)]
pub struct PgLedgerStore {
    pool: PgPool,
}

impl PgLedgerStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LedgerStore for PgLedgerStore {
    async fn begin(&self) -> LedgerResult<Box<dyn LedgerTx>> {
        let tx = self.pool.begin().await?;
        Ok(Box::new(PgLedgerTx { tx }))
    }

    async fn health_check(&self) -> LedgerResult<()> {
        studyquest_db::health_check(&self.pool).await?;
        Ok(())
    }

    async fn create_user(&self, input: &CreateUser) -> LedgerResult<User> {
        UserRepo::create(&self.pool, input).await.map_err(|err| {
            if studyquest_db::is_unique_violation(&err, USERNAME_CONSTRAINT) {
                LedgerError::UsernameTaken(input.username.clone())
            } else {
                LedgerError::Storage(err)
            }
        })
    }

    async fn find_user(&self, id: DbId) -> LedgerResult<Option<User>> {
        Ok(UserRepo::find_by_id(&self.pool, id).await?)
    }

    async fn find_user_by_username(&self, username: &str) -> LedgerResult<Option<User>> {
        Ok(UserRepo::find_by_username(&self.pool, username).await?)
    }

    async fn find_quest(&self, id: DbId) -> LedgerResult<Option<Quest>> {
        Ok(QuestRepo::find_by_id(&self.pool, id).await?)
    }

    async fn list_quests(&self) -> LedgerResult<Vec<Quest>> {
        Ok(QuestRepo::list(&self.pool).await?)
    }

    async fn find_progress(
        &self,
        user_id: DbId,
        quest_id: DbId,
    ) -> LedgerResult<Option<QuestProgress>> {
        Ok(QuestProgressRepo::find(&self.pool, user_id, quest_id).await?)
    }

    async fn list_progress(&self, user_id: DbId) -> LedgerResult<Vec<QuestProgress>> {
        Ok(QuestProgressRepo::list_by_user(&self.pool, user_id).await?)
    }

    async fn activity_exists(&self, id: DbId) -> LedgerResult<bool> {
        Ok(ActivityLogRepo::exists(&self.pool, id).await?)
    }

    async fn recent_activity(&self, limit: i64) -> LedgerResult<Vec<ActivityFeedRow>> {
        Ok(ActivityLogRepo::list_recent(&self.pool, limit).await?)
    }

    async fn comments_for(&self, activity_ids: &[DbId]) -> LedgerResult<Vec<CommentWithAuthor>> {
        Ok(ActivityLogRepo::comments_for(&self.pool, activity_ids).await?)
    }

    async fn leaderboard(&self, limit: i64) -> LedgerResult<Vec<LeaderboardRow>> {
        Ok(UserRepo::leaderboard(&self.pool, limit).await?)
    }

    async fn study_seconds(&self, user_id: DbId, since: Option<Timestamp>) -> LedgerResult<i64> {
        Ok(StudySessionRepo::total_seconds(&self.pool, user_id, since).await?)
    }
}

/// An open database transaction. Dropping it without `commit` rolls back.
struct PgLedgerTx {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl LedgerTx for PgLedgerTx {
    async fn lock_user(&mut self, user_id: DbId) -> LedgerResult<bool> {
        Ok(UserRepo::lock(&mut self.tx, user_id).await?)
    }

    async fn insert_session(&mut self, input: &CreateStudySession) -> LedgerResult<StudySession> {
        Ok(StudySessionRepo::create(&mut self.tx, input).await?)
    }

    async fn add_xp(&mut self, user_id: DbId, delta: i64) -> LedgerResult<Option<i64>> {
        Ok(UserRepo::add_xp(&mut self.tx, user_id, delta).await?)
    }

    async fn xp_and_rank(&mut self, user_id: DbId) -> LedgerResult<Option<(i64, String)>> {
        Ok(UserRepo::xp_and_rank(&mut self.tx, user_id).await?)
    }

    async fn set_rank(&mut self, user_id: DbId, rank: &str) -> LedgerResult<bool> {
        Ok(UserRepo::set_rank(&mut self.tx, user_id, rank).await?)
    }

    async fn add_open_progress_hours(&mut self, user_id: DbId, hours: f64) -> LedgerResult<u64> {
        Ok(QuestProgressRepo::add_hours_to_open(&mut self.tx, user_id, hours).await?)
    }

    async fn insert_progress(
        &mut self,
        user_id: DbId,
        quest_id: DbId,
    ) -> LedgerResult<QuestProgress> {
        QuestProgressRepo::create(&mut self.tx, user_id, quest_id)
            .await
            .map_err(|err| {
                if studyquest_db::is_unique_violation(&err, USER_QUEST_CONSTRAINT) {
                    LedgerError::AlreadyJoined(quest_id)
                } else {
                    LedgerError::Storage(err)
                }
            })
    }

    async fn mark_progress_completed(
        &mut self,
        progress_id: DbId,
        at: Timestamp,
    ) -> LedgerResult<bool> {
        Ok(QuestProgressRepo::mark_completed(&mut self.tx, progress_id, at).await?)
    }

    async fn insert_quest(&mut self, input: &CreateQuest) -> LedgerResult<Quest> {
        Ok(QuestRepo::create(&mut self.tx, input).await?)
    }

    async fn append_activity(&mut self, input: &CreateActivityLog) -> LedgerResult<ActivityLog> {
        Ok(ActivityLogRepo::create(&mut self.tx, input).await?)
    }

    async fn insert_comment(&mut self, input: &CreateComment) -> LedgerResult<CommentWithAuthor> {
        Ok(ActivityLogRepo::create_comment(&mut self.tx, input).await?)
    }

    async fn commit(self: Box<Self>) -> LedgerResult<()> {
        self.tx.commit().await?;
        Ok(())
    }
}
