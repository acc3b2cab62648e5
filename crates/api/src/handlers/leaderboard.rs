use axum::extract::{Query, State};
use axum::Json;
use studyquest_ledger::query::LeaderboardEntry;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::query::LimitParams;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/leaderboard?limit=
///
/// Top users by XP; the caller's own row is flagged with `is_current_user`.
pub async fn list_leaderboard(
    user: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<LimitParams>,
) -> AppResult<Json<DataResponse<Vec<LeaderboardEntry>>>> {
    let board = state
        .queries
        .list_leaderboard(user.user_id, params.limit)
        .await?;
    Ok(Json(DataResponse { data: board }))
}
