//! Session settlement: converts a finished study timer into persisted state.

use std::sync::Arc;

use chrono::{TimeDelta, Utc};
use serde::Serialize;
use studyquest_core::activity::{study_summary, ActivityType};
use studyquest_core::rank::RankTier;
use studyquest_core::sanitize::sanitize_or;
use studyquest_core::study::{
    hours_for_duration, validate_duration, xp_for_duration, DEFAULT_INTENT, DEFAULT_SUBJECT,
};
use studyquest_core::types::DbId;
use studyquest_db::models::activity_log::CreateActivityLog;
use studyquest_db::models::study_session::{CreateStudySession, StudySession};

use crate::error::{LedgerError, LedgerResult};
use crate::store::LedgerStore;
use crate::xp::{grant_xp, lock_account};

/// A finished timer run as reported by the client.
#[derive(Debug, Clone)]
pub struct EndSession {
    pub user_id: DbId,
    pub subject: Option<String>,
    pub intent: Option<String>,
    pub duration_seconds: i64,
    pub time_window: Option<String>,
}

/// Everything a settled session changed.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSettlement {
    pub session: StudySession,
    pub xp_earned: i64,
    pub hours_earned: f64,
    pub xp_total: i64,
    pub rank: RankTier,
    pub rank_changed: bool,
    /// Open quest-progress rows credited with `hours_earned`.
    pub quests_advanced: u64,
}

pub struct SessionSettlementService {
    store: Arc<dyn LedgerStore>,
}

impl SessionSettlementService {
    pub fn new(store: Arc<dyn LedgerStore>) -> Self {
        Self { store }
    }

    /// Settle a study session in one transaction: record it, grant XP,
    /// resync rank, advance every open quest and append a STUDY feed entry.
    ///
    /// A non-positive duration is rejected before anything is touched.
    pub async fn end_session(&self, input: EndSession) -> LedgerResult<SessionSettlement> {
        validate_duration(input.duration_seconds)
            .map_err(|_| LedgerError::InvalidDuration(input.duration_seconds))?;

        let subject = sanitize_or(input.subject.as_deref(), DEFAULT_SUBJECT);
        let intent = sanitize_or(input.intent.as_deref(), DEFAULT_INTENT);
        let time_window = input
            .time_window
            .as_deref()
            .map(|w| sanitize_or(Some(w), ""))
            .filter(|w| !w.is_empty());

        let now = Utc::now();
        let started_at = TimeDelta::try_seconds(input.duration_seconds)
            .and_then(|elapsed| now.checked_sub_signed(elapsed))
            .unwrap_or(now);

        let xp_earned = xp_for_duration(input.duration_seconds);
        let hours_earned = hours_for_duration(input.duration_seconds);

        let mut tx = self.store.begin().await?;
        lock_account(tx.as_mut(), input.user_id).await?;

        let session = tx
            .insert_session(&CreateStudySession {
                user_id: input.user_id,
                subject,
                intent: intent.clone(),
                duration_seconds: input.duration_seconds,
                time_window,
                started_at,
            })
            .await?;

        let grant = grant_xp(tx.as_mut(), input.user_id, xp_earned).await?;

        let quests_advanced = tx
            .add_open_progress_hours(input.user_id, hours_earned)
            .await?;

        tx.append_activity(&CreateActivityLog {
            user_id: input.user_id,
            activity_type: ActivityType::Study,
            text: study_summary(input.duration_seconds, &intent),
            image_url: None,
        })
        .await?;

        tx.commit().await?;

        tracing::info!(
            user_id = input.user_id,
            session_id = session.id,
            duration_seconds = input.duration_seconds,
            xp_earned,
            xp_total = grant.xp_total,
            quests_advanced,
            "Study session settled",
        );

        Ok(SessionSettlement {
            session,
            xp_earned,
            hours_earned,
            xp_total: grant.xp_total,
            rank: grant.rank,
            rank_changed: grant.rank_changed,
            quests_advanced,
        })
    }
}
