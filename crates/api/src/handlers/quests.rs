//! Handlers for the `/quests` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use studyquest_core::types::DbId;
use studyquest_db::models::quest::Quest;
use studyquest_db::models::quest_progress::QuestProgress;
use studyquest_ledger::quest::{NewQuest, QuestView, RewardClaim};
use validator::Validate;

use crate::error::AppResult;
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

/// Request body for `POST /quests`.
#[derive(Debug, Deserialize, Validate)]
pub struct CreateQuestRequest {
    #[validate(length(min = 1, max = 120, message = "title must be 1-120 characters"))]
    pub title: String,
    #[validate(length(max = 500))]
    pub description: Option<String>,
    pub target_hours: f64,
}

/// GET /api/v1/quests
///
/// Every quest, newest first, with the caller's progress and state.
pub async fn list_quests(
    user: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<DataResponse<Vec<QuestView>>>> {
    let quests = state.quests.list_quests(user.user_id).await?;
    Ok(Json(DataResponse { data: quests }))
}

/// POST /api/v1/quests
pub async fn create_quest(
    user: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateQuestRequest>,
) -> AppResult<(StatusCode, Json<DataResponse<Quest>>)> {
    input.validate()?;

    let quest = state
        .quests
        .create_quest(NewQuest {
            created_by: user.user_id,
            title: input.title,
            description: input.description,
            target_hours: input.target_hours,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DataResponse { data: quest })))
}

/// POST /api/v1/quests/{id}/join
pub async fn join_quest(
    user: AuthUser,
    State(state): State<AppState>,
    Path(quest_id): Path<DbId>,
) -> AppResult<(StatusCode, Json<DataResponse<QuestProgress>>)> {
    let progress = state.quests.join_quest(user.user_id, quest_id).await?;
    Ok((StatusCode::CREATED, Json(DataResponse { data: progress })))
}

/// POST /api/v1/quests/{id}/claim
///
/// Pays the quest's reward exactly once. Repeat or concurrent claims get 409.
pub async fn claim_reward(
    user: AuthUser,
    State(state): State<AppState>,
    Path(quest_id): Path<DbId>,
) -> AppResult<Json<DataResponse<RewardClaim>>> {
    let claim = state.quests.claim_reward(user.user_id, quest_id).await?;
    Ok(Json(DataResponse { data: claim }))
}
