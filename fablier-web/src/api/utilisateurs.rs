//! Reader endpoints

use axum::extract::{Path, State};
use axum::Json;
use fablier_common::db::models::User;
use serde::Deserialize;

use crate::api::{ok, Envelope};
use crate::db::users;
use crate::{ApiError, ApiResult, AppState};

/// Reader creation body
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub nom: Option<String>,
}

/// POST /api/utilisateurs
pub async fn create_user(
    State(state): State<AppState>,
    Json(payload): Json<CreateUserRequest>,
) -> ApiResult<Json<Envelope<User>>> {
    let Some(name) = payload.nom.filter(|n| !n.trim().is_empty()) else {
        return Err(ApiError::BadRequest("nom est requis".to_string()));
    };
    let user = users::create_user(&state.db, &name).await?;
    Ok(ok(user))
}

/// GET /api/utilisateurs/:id
pub async fn get_user(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<User>>> {
    let user = users::get_user(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("utilisateur {id}")))?;
    Ok(ok(user))
}
