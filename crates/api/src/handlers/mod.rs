pub mod activity;
pub mod auth;
pub mod leaderboard;
pub mod profile;
pub mod quests;
pub mod sessions;
