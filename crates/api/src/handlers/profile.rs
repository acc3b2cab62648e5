use axum::extract::State;
use axum::Json;
use studyquest_ledger::query::Profile;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// GET /api/v1/me
///
/// The caller's XP, rank, streak and study totals.
pub async fn get_me(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Profile>>> {
    let profile = state.queries.get_profile(user.user_id).await?;
    Ok(Json(DataResponse { data: profile }))
}
