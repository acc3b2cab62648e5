//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async methods. Reads take
//! `&PgPool`; writes that belong to a settlement take `&mut PgConnection` so
//! the caller can run them inside its own transaction (`&mut *tx`).

pub mod activity_log_repo;
pub mod quest_progress_repo;
pub mod quest_repo;
pub mod study_session_repo;
pub mod user_repo;

pub use activity_log_repo::ActivityLogRepo;
pub use quest_progress_repo::QuestProgressRepo;
pub use quest_repo::QuestRepo;
pub use study_session_repo::StudySessionRepo;
pub use user_repo::UserRepo;
