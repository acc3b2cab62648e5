use std::sync::Arc;

use studyquest_db::DbPool;
use studyquest_ledger::feed::FeedService;
use studyquest_ledger::query::QueryService;
use studyquest_ledger::quest::QuestRewardService;
use studyquest_ledger::session::SessionSettlementService;
use studyquest_ledger::store::{LedgerStore, PgLedgerStore};

use crate::config::ServerConfig;

/// Shared application state available to all handlers via `State<AppState>`.
///
/// Cheaply cloneable; every field is behind an `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Server configuration (JWT settings are read by the auth extractor).
    pub config: Arc<ServerConfig>,
    /// The ledger every service writes through.
    pub store: Arc<dyn LedgerStore>,
    pub sessions: Arc<SessionSettlementService>,
    pub quests: Arc<QuestRewardService>,
    pub feed: Arc<FeedService>,
    pub queries: Arc<QueryService>,
}

impl AppState {
    /// Wire the services to a PostgreSQL-backed ledger.
    pub fn new(pool: DbPool, config: ServerConfig) -> Self {
        Self::with_store(Arc::new(PgLedgerStore::new(pool)), config)
    }

    /// Wire the services to any ledger implementation.
    pub fn with_store(store: Arc<dyn LedgerStore>, config: ServerConfig) -> Self {
        let queries = QueryService::with_limits(Arc::clone(&store), config.list_limits);
        Self {
            config: Arc::new(config),
            sessions: Arc::new(SessionSettlementService::new(Arc::clone(&store))),
            quests: Arc::new(QuestRewardService::new(Arc::clone(&store))),
            feed: Arc::new(FeedService::new(Arc::clone(&store))),
            queries: Arc::new(queries),
            store,
        }
    }
}
