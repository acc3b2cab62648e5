pub mod activity;
pub mod auth;
pub mod health;
pub mod quests;

use axum::routing::{get, post};
use axum::Router;

use crate::handlers;
use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/register                    register (public)
/// /auth/login                       login (public)
///
/// /me                               profile (auth)
/// /sessions/end                     settle a study session (POST, auth)
///
/// /quests                           list, create (auth)
/// /quests/{id}/join                 join (POST, auth)
/// /quests/{id}/claim                claim reward (POST, auth)
///
/// /activity                         feed (public, ?limit=)
/// /activity/proof                   post proof (POST, auth)
/// /activity/{id}/comments           comment (POST, auth)
///
/// /leaderboard                      ranking (auth, ?limit=)
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .route("/me", get(handlers::profile::get_me))
        .route("/sessions/end", post(handlers::sessions::end_session))
        .nest("/quests", quests::router())
        .nest("/activity", activity::router())
        .route("/leaderboard", get(handlers::leaderboard::list_leaderboard))
}
