//! Progress update endpoint - entry point of the rewards cascade

use axum::{extract::State, Json};
use fablier_common::db::models::ProgressStatus;
use serde::Deserialize;

use crate::api::{ok, Envelope};
use crate::services::progression::{self, ProgressOutcome};
use crate::{ApiError, ApiResult, AppState};

/// Progress report body; the three ids are required
#[derive(Debug, Deserialize)]
pub struct ProgressUpdateRequest {
    pub utilisateur_id: Option<i64>,
    pub histoire_id: Option<i64>,
    pub chapitre_lu: Option<i64>,
    pub statut: Option<ProgressStatus>,
}

/// POST /api/progression
///
/// Applies the progress report, then runs the rewards cascade (chapter
/// grants, milestone grants, completion grant, wiki unlock gate). Reward
/// failures are logged and omitted from the response; only validation and
/// the progression write itself can fail the request.
pub async fn update_progress(
    State(state): State<AppState>,
    Json(payload): Json<ProgressUpdateRequest>,
) -> ApiResult<Json<Envelope<ProgressOutcome>>> {
    let (Some(user_id), Some(story_id), Some(chapter_read)) = (
        payload.utilisateur_id,
        payload.histoire_id,
        payload.chapitre_lu,
    ) else {
        return Err(ApiError::BadRequest(
            "utilisateur_id, histoire_id et chapitre_lu sont requis".to_string(),
        ));
    };
    if chapter_read < 0 {
        return Err(ApiError::BadRequest("chapitre_lu doit être positif".to_string()));
    }

    let outcome =
        progression::update_progress(&state.db, user_id, story_id, chapter_read, payload.statut)
            .await?;
    Ok(ok(outcome))
}
