//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` entity struct matching the database row
//! - A create DTO for inserts
//! - Read-side projections where a query joins other tables

pub mod activity_log;
pub mod quest;
pub mod quest_progress;
pub mod study_session;
pub mod user;
