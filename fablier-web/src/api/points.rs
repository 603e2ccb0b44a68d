//! Points grant and query endpoints

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;

use crate::api::{ok, Envelope};
use crate::services::rewards::{self, GrantOutcome, PointsSummary};
use crate::{ApiError, ApiResult, AppState};

/// Grant request body
#[derive(Debug, Deserialize)]
pub struct GrantRequest {
    pub utilisateur_id: Option<i64>,
    pub action_nom: Option<String>,
    pub histoire_id: Option<i64>,
    pub chapitre_id: Option<i64>,
    pub details: Option<String>,
}

/// POST /api/points
///
/// Grants the named action's points. 404 for an unknown action, 400 when a
/// one-time action was already granted for this (user[, story]).
pub async fn grant_points(
    State(state): State<AppState>,
    Json(payload): Json<GrantRequest>,
) -> ApiResult<Json<Envelope<GrantOutcome>>> {
    let (Some(user_id), Some(action_name)) = (payload.utilisateur_id, payload.action_nom.as_deref())
    else {
        return Err(ApiError::BadRequest(
            "utilisateur_id et action_nom sont requis".to_string(),
        ));
    };

    let outcome = rewards::grant(
        &state.db,
        user_id,
        action_name,
        payload.histoire_id,
        payload.chapitre_id,
        payload.details.as_deref(),
    )
    .await?;
    Ok(ok(outcome))
}

/// Points query parameters
#[derive(Debug, Deserialize)]
pub struct PointsQuery {
    pub utilisateur_id: Option<i64>,
}

/// GET /api/points?utilisateur_id=
///
/// Returns the account (created lazily), the 10 most recent history
/// entries, the distance to the next level, and the unlocked title.
pub async fn query_points(
    State(state): State<AppState>,
    Query(query): Query<PointsQuery>,
) -> ApiResult<Json<Envelope<PointsSummary>>> {
    let Some(user_id) = query.utilisateur_id else {
        return Err(ApiError::BadRequest("utilisateur_id est requis".to_string()));
    };

    let summary = rewards::query(&state.db, user_id).await?;
    Ok(ok(summary))
}
