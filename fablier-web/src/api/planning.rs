//! Publication-planning endpoints (store-backed)

use axum::extract::State;
use axum::Json;
use fablier_common::db::models::PlanningEntry;
use serde::Deserialize;

use crate::api::{ok, Envelope};
use crate::db::planning;
use crate::{ApiError, ApiResult, AppState};

/// GET /api/planning
pub async fn list_planning(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<PlanningEntry>>>> {
    let entries = planning::list_entries(&state.db).await?;
    Ok(ok(entries))
}

/// Planning slot body
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    pub jour: Option<String>,
    pub heure: Option<String>,
    pub titre: Option<String>,
    pub description: Option<String>,
}

/// POST /api/planning
pub async fn create_entry(
    State(state): State<AppState>,
    Json(payload): Json<CreateEntryRequest>,
) -> ApiResult<Json<Envelope<PlanningEntry>>> {
    let (Some(day), Some(time_slot), Some(title)) = (
        payload.jour.as_deref(),
        payload.heure.as_deref(),
        payload.titre.as_deref(),
    ) else {
        return Err(ApiError::BadRequest(
            "jour, heure et titre sont requis".to_string(),
        ));
    };

    let entry = planning::insert_entry(
        &state.db,
        day,
        time_slot,
        title,
        payload.description.as_deref(),
    )
    .await?;
    Ok(ok(entry))
}
