//! Route definitions for the `/activity` feed.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::activity;
use crate::state::AppState;

/// Routes mounted at `/activity`.
///
/// ```text
/// GET  /                -> list_activity
/// POST /proof           -> post_proof
/// POST /{id}/comments   -> add_comment
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(activity::list_activity))
        .route("/proof", post(activity::post_proof))
        .route("/{id}/comments", post(activity::add_comment))
}
