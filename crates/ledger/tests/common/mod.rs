#![allow(dead_code)]

use std::sync::Arc;

use studyquest_db::models::quest::Quest;
use studyquest_db::models::user::{CreateUser, User};
use studyquest_ledger::feed::FeedService;
use studyquest_ledger::query::QueryService;
use studyquest_ledger::quest::{NewQuest, QuestRewardService};
use studyquest_ledger::session::{EndSession, SessionSettlement, SessionSettlementService};
use studyquest_ledger::store::{LedgerStore, MemoryLedgerStore};

/// Every service wired to one shared in-memory store.
pub struct Harness {
    pub store: MemoryLedgerStore,
    pub sessions: SessionSettlementService,
    pub quests: QuestRewardService,
    pub feed: FeedService,
    pub queries: QueryService,
}

impl Harness {
    pub fn new() -> Self {
        let store = MemoryLedgerStore::new();
        let shared: Arc<dyn LedgerStore> = Arc::new(store.clone());
        Self {
            sessions: SessionSettlementService::new(Arc::clone(&shared)),
            quests: QuestRewardService::new(Arc::clone(&shared)),
            feed: FeedService::new(Arc::clone(&shared)),
            queries: QueryService::new(shared),
            store,
        }
    }

    pub async fn user(&self, username: &str) -> User {
        self.store
            .create_user(&CreateUser {
                username: username.to_string(),
                passphrase_hash: "$argon2id$placeholder".to_string(),
            })
            .await
            .unwrap()
    }

    pub async fn quest(&self, creator: i64, title: &str, target_hours: f64) -> Quest {
        self.quests
            .create_quest(NewQuest {
                created_by: creator,
                title: title.to_string(),
                description: None,
                target_hours,
            })
            .await
            .unwrap()
    }

    pub async fn study(&self, user_id: i64, duration_seconds: i64) -> SessionSettlement {
        self.sessions
            .end_session(session(user_id, duration_seconds))
            .await
            .unwrap()
    }

    pub async fn xp(&self, user_id: i64) -> i64 {
        self.store.find_user(user_id).await.unwrap().unwrap().xp
    }

    pub async fn progress_hours(&self, user_id: i64, quest_id: i64) -> f64 {
        self.store
            .find_progress(user_id, quest_id)
            .await
            .unwrap()
            .unwrap()
            .progress_hours
    }
}

pub fn session(user_id: i64, duration_seconds: i64) -> EndSession {
    EndSession {
        user_id,
        subject: None,
        intent: None,
        duration_seconds,
        time_window: None,
    }
}
