//! Settlement pipeline for study sessions and quest rewards.
//!
//! Services receive an injected [`store::LedgerStore`] and express every
//! mutation as one scoped transaction obtained from [`store::LedgerStore::begin`]:
//! commit on success, roll back when the transaction is dropped.
//!
//! - [`session::SessionSettlementService`] -- study session → XP, rank, quest progress, feed.
//! - [`quest::QuestRewardService`] -- quest creation, join, exactly-once reward claim.
//! - [`feed::FeedService`] -- proof posts and comments.
//! - [`query::QueryService`] -- activity feed, leaderboard and profile reads.

pub mod error;
pub mod feed;
pub mod query;
pub mod quest;
pub mod session;
pub mod store;

mod xp;

pub use error::{ErrorClass, LedgerError, LedgerResult};
