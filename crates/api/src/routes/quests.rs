//! Route definitions for the `/quests` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::quests;
use crate::state::AppState;

/// Routes mounted at `/quests`.
///
/// ```text
/// GET  /            -> list_quests
/// POST /            -> create_quest
/// POST /{id}/join   -> join_quest
/// POST /{id}/claim  -> claim_reward
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(quests::list_quests).post(quests::create_quest))
        .route("/{id}/join", post(quests::join_quest))
        .route("/{id}/claim", post(quests::claim_reward))
}
