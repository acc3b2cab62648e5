//! Pure domain logic for the study-quest backend.
//!
//! Nothing in this crate touches the database or the network; every function
//! here is deterministic and can be called from any transaction boundary.

pub mod activity;
pub mod error;
pub mod quest;
pub mod rank;
pub mod sanitize;
pub mod study;
pub mod types;
