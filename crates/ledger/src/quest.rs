//! Quest lifecycle: creation, joining, and exactly-once reward claims.
//!
//! Joining relies on the `(user, quest)` uniqueness constraint and claiming on
//! a compare-and-set of `completed_at`; neither checks first and then acts.
//! The pre-checks in [`QuestRewardService::claim_reward`] exist only to pick
//! the most helpful error and never decide the outcome of a race.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use studyquest_core::activity::{quest_completed, quest_created, quest_joined, ActivityType};
use studyquest_core::quest::{validate_target_hours, xp_reward_for_target, QuestState};
use studyquest_core::rank::RankTier;
use studyquest_core::sanitize::strip_markup;
use studyquest_core::types::{DbId, Timestamp};
use studyquest_db::models::activity_log::CreateActivityLog;
use studyquest_db::models::quest::{CreateQuest, Quest};
use studyquest_db::models::quest_progress::QuestProgress;

use crate::error::{LedgerError, LedgerResult};
use crate::store::LedgerStore;
use crate::xp::{grant_xp, lock_account};

/// Input for [`QuestRewardService::create_quest`].
#[derive(Debug, Clone)]
pub struct NewQuest {
    pub created_by: DbId,
    pub title: String,
    pub description: Option<String>,
    pub target_hours: f64,
}

/// A quest as seen by one user.
#[derive(Debug, Clone, Serialize)]
pub struct QuestView {
    #[serde(flatten)]
    pub quest: Quest,
    pub joined: bool,
    pub progress_hours: f64,
    pub completed_at: Option<Timestamp>,
    pub state: QuestState,
}

/// Result of a successful claim.
#[derive(Debug, Clone, Serialize)]
pub struct RewardClaim {
    pub quest_id: DbId,
    pub xp_awarded: i64,
    pub xp_total: i64,
    pub rank: RankTier,
    pub rank_changed: bool,
    pub completed_at: Timestamp,
}

pub struct QuestRewardService {
    store: Arc<dyn LedgerStore>,
}

impl QuestRewardService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Create a quest with its reward fixed at `floor(target_hours * 100)`.
    pub async fn create_quest(&self, input: NewQuest) -> LedgerResult<Quest> {
        let title = strip_markup(&input.title);
        if title.is_empty() {
            return Err(LedgerError::Validation("Quest title is required".to_string()));
        }
        validate_target_hours(input.target_hours)?;

        let description = input
            .description
            .as_deref()
            .map(strip_markup)
            .filter(|d| !d.is_empty())
            .unwrap_or_else(|| title.clone());

        let mut tx = self.store.begin().await?;

        let quest = tx
            .insert_quest(&CreateQuest {
                title,
                description,
                target_hours: input.target_hours,
                xp_reward: xp_reward_for_target(input.target_hours),
                created_by: Some(input.created_by),
            })
            .await?;

        tx.append_activity(&CreateActivityLog {
            user_id: input.created_by,
            activity_type: ActivityType::Quest,
            text: quest_created(&quest.title),
            image_url: None,
        })
        .await?;

        tx.commit().await?;

        tracing::info!(
            quest_id = quest.id,
            user_id = input.created_by,
            xp_reward = quest.xp_reward,
            "Quest created",
        );
        Ok(quest)
    }

    /// Join a quest at zero hours. A second join of the same pair fails with
    /// `AlreadyJoined` from the uniqueness constraint.
    pub async fn join_quest(&self, user_id: DbId, quest_id: DbId) -> LedgerResult<QuestProgress> {
        let quest = self
            .store
            .find_quest(quest_id)
            .await?
            .ok_or(LedgerError::QuestNotFound(quest_id))?;

        let mut tx = self.store.begin().await?;
        lock_account(tx.as_mut(), user_id).await?;

        let progress = tx.insert_progress(user_id, quest_id).await?;

        tx.append_activity(&CreateActivityLog {
            user_id,
            activity_type: ActivityType::Quest,
            text: quest_joined(&quest.title),
            image_url: None,
        })
        .await?;

        tx.commit().await?;

        tracing::info!(user_id, quest_id, "Quest joined");
        Ok(progress)
    }

    /// Claim a completed quest's reward exactly once.
    ///
    /// Errors, in order: `QuestNotFound`, `NotJoined`, `AlreadyClaimed`,
    /// `QuestNotComplete`. A claim that loses a race to a concurrent one also
    /// reports `AlreadyClaimed` and leaves XP untouched.
    pub async fn claim_reward(&self, user_id: DbId, quest_id: DbId) -> LedgerResult<RewardClaim> {
        let quest = self
            .store
            .find_quest(quest_id)
            .await?
            .ok_or(LedgerError::QuestNotFound(quest_id))?;

        let progress = self
            .store
            .find_progress(user_id, quest_id)
            .await?
            .ok_or(LedgerError::NotJoined(quest_id))?;

        if progress.is_claimed() {
            return Err(LedgerError::AlreadyClaimed(quest_id));
        }
        if progress.progress_hours < quest.target_hours {
            return Err(LedgerError::QuestNotComplete {
                quest_id,
                progress_hours: progress.progress_hours,
                target_hours: quest.target_hours,
            });
        }

        let completed_at = Utc::now();
        let mut tx = self.store.begin().await?;
        // The user row is locked before the progress row, matching session
        // settlement, so the two never wait on each other in a cycle.
        lock_account(tx.as_mut(), user_id).await?;

        if !tx.mark_progress_completed(progress.id, completed_at).await? {
            tracing::debug!(user_id, quest_id, "Claim lost compare-and-set");
            return Err(LedgerError::AlreadyClaimed(quest_id));
        }

        let grant = grant_xp(tx.as_mut(), user_id, quest.xp_reward).await?;

        tx.append_activity(&CreateActivityLog {
            user_id,
            activity_type: ActivityType::Quest,
            text: quest_completed(&quest.title, quest.xp_reward),
            image_url: None,
        })
        .await?;

        tx.commit().await?;

        tracing::info!(
            user_id,
            quest_id,
            xp_awarded = quest.xp_reward,
            xp_total = grant.xp_total,
            "Quest reward claimed",
        );

        Ok(RewardClaim {
            quest_id,
            xp_awarded: quest.xp_reward,
            xp_total: grant.xp_total,
            rank: grant.rank,
            rank_changed: grant.rank_changed,
            completed_at,
        })
    }

    /// Every quest, newest first, annotated with the user's progress.
    pub async fn list_quests(&self, user_id: DbId) -> LedgerResult<Vec<QuestView>> {
        let quests = self.store.list_quests().await?;
        let progress: HashMap<DbId, QuestProgress> = self
            .store
            .list_progress(user_id)
            .await?
            .into_iter()
            .map(|p| (p.quest_id, p))
            .collect();

        Ok(quests
            .into_iter()
            .map(|quest| {
                let row = progress.get(&quest.id);
                let state = QuestState::derive(
                    row.map(|p| (p.progress_hours, p.is_claimed())),
                    quest.target_hours,
                );
                QuestView {
                    joined: row.is_some(),
                    progress_hours: row.map_or(0.0, |p| p.progress_hours),
                    completed_at: row.and_then(|p| p.completed_at),
                    state,
                    quest,
                }
            })
            .collect())
    }
}
