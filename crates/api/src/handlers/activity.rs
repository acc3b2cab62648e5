//! Handlers for the `/activity` feed.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use studyquest_core::types::DbId;
use studyquest_db::models::activity_log::{ActivityLog, CommentWithAuthor};
use studyquest_ledger::query::ActivityEntry;
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request types
// ---------------------------------------------------------------------------

/// Request body for `POST /activity/proof`. The image is referenced by URL.
#[derive(Debug, Deserialize, Validate)]
pub struct ProofRequest {
    #[validate(length(min = 1, max = 500, message = "text must be 1-500 characters"))]
    pub text: String,
    #[validate(url)]
    pub image_url: Option<String>,
}

/// Request body for `POST /activity/{id}/comments`.
///
/// Length rules are applied after trimming by the feed service.
#[derive(Debug, Deserialize)]
pub struct CommentRequest {
    pub text: String,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

/// GET /api/v1/activity?limit=
///
/// Public feed, newest first, with comments attached.
pub async fn list_activity(
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<ActivityEntry>>>> {
    let entries = state.queries.list_activity(params.limit).await?;
    Ok(Json(DataResponse { data: entries }))
}

/// POST /api/v1/activity/proof
pub async fn post_proof(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<ProofRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<ActivityLog>>)> {
    input.validate()?;

    let entry = state
        .feed
        .post_proof(user.user_id, &input.text, input.image_url)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: entry })))
}

/// POST /api/v1/activity/{id}/comments
pub async fn add_comment(
    user: AuthUser,
    State(state): State<AppState>,
    Path(activity_id): Path<DbId>,
    Json(input): Json<CommentRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<CommentWithAuthor>>)> {
    let comment = state
        .feed
        .add_comment(user.user_id, activity_id, &input.text)
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: comment })))
}
