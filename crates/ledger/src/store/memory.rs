//! In-memory [`LedgerStore`] for tests and local experiments.
//!
//! A transaction holds the state lock from `begin` until it is committed or
//! dropped and works on a staged copy, so transactions are fully serialised
//! and a dropped transaction leaves no trace.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use studyquest_core::rank::RankTier;
use studyquest_core::types::{DbId, Timestamp};
use studyquest_db::models::activity_log::{
    ActivityFeedRow, ActivityLog, CommentWithAuthor, CreateActivityLog, CreateComment,
};
use studyquest_db::models::quest::{CreateQuest, Quest};
use studyquest_db::models::quest_progress::QuestProgress;
use studyquest_db::models::study_session::{CreateStudySession, StudySession};
use studyquest_db::models::user::{CreateUser, LeaderboardRow, User};

use super::{LedgerStore, LedgerTx};
use crate::error::{LedgerError, LedgerResult};

#[derive(Debug, Clone, Default)]
struct MemoryState {
    next_id: DbId,
    users: BTreeMap<DbId, User>,
    sessions: Vec<StudySession>,
    quests: BTreeMap<DbId, Quest>,
    progress: BTreeMap<DbId, QuestProgress>,
    activity: Vec<ActivityLog>,
    comments: Vec<CommentWithAuthor>,
}

impl MemoryState {
    fn allocate_id(&mut self) -> DbId {
        self.next_id += 1;
        self.next_id
    }
}

/// Ledger store backed by process memory.
#[derive(Clone, Default)]
pub struct MemoryLedgerStore {
    state: Arc<Mutex<MemoryState>>,
    fail_next_activity: Arc<AtomicBool>,
}

impl MemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the next `append_activity` call fail with a storage error.
    ///
    /// Used to exercise rollback of a settlement that fails at its last step.
    pub fn fail_next_activity_append(&self) {
        self.fail_next_activity.store(true, Ordering::SeqCst);
    }

    /// Number of study sessions recorded for a user.
    pub async fn session_count(&self, user_id: DbId) -> usize {
        let state = self.state.lock().await;
        state.sessions.iter().filter(|s| s.user_id == user_id).count()
    }

    /// Number of feed entries authored by a user.
    pub async fn activity_count(&self, user_id: DbId) -> usize {
        let state = self.state.lock().await;
        state.activity.iter().filter(|a| a.user_id == user_id).count()
    }

    /// Overwrite a user's cached rank label without touching XP.
    pub async fn set_cached_rank(&self, user_id: DbId, label: &str) {
        let mut state = self.state.lock().await;
        if let Some(user) = state.users.get_mut(&user_id) {
            user.rank = label.to_string();
        }
    }

    /// Feed entries authored by a user, oldest first.
    pub async fn activity_for(&self, user_id: DbId) -> Vec<ActivityLog> {
        let state = self.state.lock().await;
        state
            .activity
            .iter()
            .filter(|a| a.user_id == user_id)
            .cloned()
            .collect()
    }
}

#[async_trait]
impl LedgerStore for MemoryLedgerStore {
    async fn begin(&self) -> LedgerResult<Box<dyn LedgerTx>> {
        let guard = Arc::clone(&self.state).lock_owned().await;
        let staged = guard.clone();
        Ok(Box::new(MemoryTx {
            guard,
            staged,
            fail_next_activity: Arc::clone(&self.fail_next_activity),
        }))
    }

    async fn health_check(&self) -> LedgerResult<()> {
        Ok(())
    }

    async fn create_user(&self, input: &CreateUser) -> LedgerResult<User> {
        let mut state = self.state.lock().await;
        if state.users.values().any(|u| u.username == input.username) {
            return Err(LedgerError::UsernameTaken(input.username.clone()));
        }
        let now = Utc::now();
        let user = User {
            id: state.allocate_id(),
            username: input.username.clone(),
            passphrase_hash: input.passphrase_hash.clone(),
            xp: 0,
            rank: RankTier::NOVICE.as_str().to_string(),
            streak: 0,
            avatar_url: None,
            created_at: now,
            updated_at: now,
        };
        state.users.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find_user(&self, id: DbId) -> LedgerResult<Option<User>> {
        Ok(self.state.lock().await.users.get(&id).cloned())
    }

    async fn find_user_by_username(&self, username: &str) -> LedgerResult<Option<User>> {
        let state = self.state.lock().await;
        Ok(state.users.values().find(|u| u.username == username).cloned())
    }

    async fn find_quest(&self, id: DbId) -> LedgerResult<Option<Quest>> {
        Ok(self.state.lock().await.quests.get(&id).cloned())
    }

    async fn list_quests(&self) -> LedgerResult<Vec<Quest>> {
        let state = self.state.lock().await;
        let mut quests: Vec<Quest> = state.quests.values().cloned().collect();
        quests.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(quests)
    }

    async fn find_progress(
        &self,
        user_id: DbId,
        quest_id: DbId,
    ) -> LedgerResult<Option<QuestProgress>> {
        let state = self.state.lock().await;
        Ok(state
            .progress
            .values()
            .find(|p| p.user_id == user_id && p.quest_id == quest_id)
            .cloned())
    }

    async fn list_progress(&self, user_id: DbId) -> LedgerResult<Vec<QuestProgress>> {
        let state = self.state.lock().await;
        Ok(state
            .progress
            .values()
            .filter(|p| p.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn activity_exists(&self, id: DbId) -> LedgerResult<bool> {
        Ok(self.state.lock().await.activity.iter().any(|a| a.id == id))
    }

    async fn recent_activity(&self, limit: i64) -> LedgerResult<Vec<ActivityFeedRow>> {
        let state = self.state.lock().await;
        let mut entries: Vec<&ActivityLog> = state.activity.iter().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(entries
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .filter_map(|entry| {
                let author = state.users.get(&entry.user_id)?;
                Some(ActivityFeedRow {
                    id: entry.id,
                    user_id: entry.user_id,
                    username: author.username.clone(),
                    avatar_url: author.avatar_url.clone(),
                    activity_type: entry.activity_type.clone(),
                    text: entry.text.clone(),
                    image_url: entry.image_url.clone(),
                    created_at: entry.created_at,
                })
            })
            .collect())
    }

    async fn comments_for(&self, activity_ids: &[DbId]) -> LedgerResult<Vec<CommentWithAuthor>> {
        let state = self.state.lock().await;
        let mut comments: Vec<CommentWithAuthor> = state
            .comments
            .iter()
            .filter(|c| activity_ids.contains(&c.activity_log_id))
            .cloned()
            .collect();
        comments.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.id.cmp(&b.id)));
        Ok(comments)
    }

    async fn leaderboard(&self, limit: i64) -> LedgerResult<Vec<LeaderboardRow>> {
        let state = self.state.lock().await;
        let mut users: Vec<&User> = state.users.values().collect();
        users.sort_by(|a, b| b.xp.cmp(&a.xp).then(a.id.cmp(&b.id)));
        Ok(users
            .into_iter()
            .take(usize::try_from(limit).unwrap_or(0))
            .map(|u| LeaderboardRow {
                id: u.id,
                username: u.username.clone(),
                avatar_url: u.avatar_url.clone(),
                xp: u.xp,
                rank: u.rank.clone(),
                streak: u.streak,
                total_seconds: state
                    .sessions
                    .iter()
                    .filter(|s| s.user_id == u.id)
                    .map(|s| s.duration_seconds)
                    .sum(),
            })
            .collect())
    }

    async fn study_seconds(&self, user_id: DbId, since: Option<Timestamp>) -> LedgerResult<i64> {
        let state = self.state.lock().await;
        Ok(state
            .sessions
            .iter()
            .filter(|s| s.user_id == user_id)
            .filter(|s| since.map_or(true, |t| s.created_at >= t))
            .map(|s| s.duration_seconds)
            .sum())
    }
}

/// Staged changes over the locked state.
struct MemoryTx {
    guard: OwnedMutexGuard<MemoryState>,
    staged: MemoryState,
    fail_next_activity: Arc<AtomicBool>,
}

#[async_trait]
impl LedgerTx for MemoryTx {
    async fn lock_user(&mut self, user_id: DbId) -> LedgerResult<bool> {
        // The whole state is already held by this transaction.
        Ok(self.staged.users.contains_key(&user_id))
    }

    async fn insert_session(&mut self, input: &CreateStudySession) -> LedgerResult<StudySession> {
        let now = Utc::now();
        let session = StudySession {
            id: self.staged.allocate_id(),
            user_id: input.user_id,
            subject: input.subject.clone(),
            intent: input.intent.clone(),
            duration_seconds: input.duration_seconds,
            time_window: input.time_window.clone(),
            started_at: input.started_at,
            created_at: now,
            updated_at: now,
        };
        self.staged.sessions.push(session.clone());
        Ok(session)
    }

    async fn add_xp(&mut self, user_id: DbId, delta: i64) -> LedgerResult<Option<i64>> {
        Ok(self.staged.users.get_mut(&user_id).map(|user| {
            user.xp += delta;
            user.updated_at = Utc::now();
            user.xp
        }))
    }

    async fn xp_and_rank(&mut self, user_id: DbId) -> LedgerResult<Option<(i64, String)>> {
        Ok(self
            .staged
            .users
            .get(&user_id)
            .map(|u| (u.xp, u.rank.clone())))
    }

    async fn set_rank(&mut self, user_id: DbId, rank: &str) -> LedgerResult<bool> {
        match self.staged.users.get_mut(&user_id) {
            Some(user) if user.rank != rank => {
                user.rank = rank.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn add_open_progress_hours(&mut self, user_id: DbId, hours: f64) -> LedgerResult<u64> {
        let mut advanced = 0;
        for row in self.staged.progress.values_mut() {
            if row.user_id == user_id && row.completed_at.is_none() {
                row.progress_hours += hours;
                row.updated_at = Utc::now();
                advanced += 1;
            }
        }
        Ok(advanced)
    }

    async fn insert_progress(
        &mut self,
        user_id: DbId,
        quest_id: DbId,
    ) -> LedgerResult<QuestProgress> {
        if self
            .staged
            .progress
            .values()
            .any(|p| p.user_id == user_id && p.quest_id == quest_id)
        {
            return Err(LedgerError::AlreadyJoined(quest_id));
        }
        let now = Utc::now();
        let row = QuestProgress {
            id: self.staged.allocate_id(),
            user_id,
            quest_id,
            progress_hours: 0.0,
            completed_at: None,
            created_at: now,
            updated_at: now,
        };
        self.staged.progress.insert(row.id, row.clone());
        Ok(row)
    }

    async fn mark_progress_completed(
        &mut self,
        progress_id: DbId,
        at: Timestamp,
    ) -> LedgerResult<bool> {
        match self.staged.progress.get_mut(&progress_id) {
            Some(row) if row.completed_at.is_none() => {
                row.completed_at = Some(at);
                row.updated_at = at;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn insert_quest(&mut self, input: &CreateQuest) -> LedgerResult<Quest> {
        let now = Utc::now();
        let quest = Quest {
            id: self.staged.allocate_id(),
            title: input.title.clone(),
            description: input.description.clone(),
            target_hours: input.target_hours,
            xp_reward: input.xp_reward,
            created_by: input.created_by,
            created_at: now,
            updated_at: now,
        };
        self.staged.quests.insert(quest.id, quest.clone());
        Ok(quest)
    }

    async fn append_activity(&mut self, input: &CreateActivityLog) -> LedgerResult<ActivityLog> {
        if self.fail_next_activity.swap(false, Ordering::SeqCst) {
            return Err(LedgerError::Storage(sqlx::Error::Protocol(
                "injected activity append failure".to_string(),
            )));
        }
        let now = Utc::now();
        let entry = ActivityLog {
            id: self.staged.allocate_id(),
            user_id: input.user_id,
            activity_type: input.activity_type.as_str().to_string(),
            text: input.text.clone(),
            image_url: input.image_url.clone(),
            created_at: now,
            updated_at: now,
        };
        self.staged.activity.push(entry.clone());
        Ok(entry)
    }

    async fn insert_comment(&mut self, input: &CreateComment) -> LedgerResult<CommentWithAuthor> {
        let username = self
            .staged
            .users
            .get(&input.user_id)
            .map(|u| u.username.clone())
            .ok_or(LedgerError::UserNotFound(input.user_id))?;
        if !self.staged.activity.iter().any(|a| a.id == input.activity_log_id) {
            return Err(LedgerError::ActivityNotFound(input.activity_log_id));
        }
        let comment = CommentWithAuthor {
            id: self.staged.allocate_id(),
            activity_log_id: input.activity_log_id,
            user_id: input.user_id,
            username,
            text: input.text.clone(),
            created_at: Utc::now(),
        };
        self.staged.comments.push(comment.clone());
        Ok(comment)
    }

    async fn commit(self: Box<Self>) -> LedgerResult<()> {
        let MemoryTx {
            mut guard, staged, ..
        } = *self;
        *guard = staged;
        Ok(())
    }
}
