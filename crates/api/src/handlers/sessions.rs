//! Handlers for the `/sessions` resource.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use studyquest_ledger::session::{EndSession, SessionSettlement};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /sessions/end`.
///
/// `duration` is the elapsed timer in seconds as measured by the client.
#[derive(Debug, Deserialize, Validate)]
pub struct EndSessionRequest {
    #[validate(length(max = 120))]
    pub subject: Option<String>,
    #[validate(length(max = 200))]
    pub intent: Option<String>,
    pub duration: i64,
    #[serde(alias = "timeWindow")]
    #[validate(length(max = 40))]
    pub time_window: Option<String>,
}

/// POST /api/v1/sessions/end
///
/// Settle a finished study session. Non-positive durations are rejected
/// with 400 and change nothing.
pub async fn end_session(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<EndSessionRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<SessionSettlement>>)> {
    input.validate()?;

    let settlement = state
        .sessions
        .end_session(EndSession {
            user_id: user.user_id,
            subject: input.subject,
            intent: input.intent,
            duration_seconds: input.duration,
            time_window: input.time_window,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: settlement })))
}
