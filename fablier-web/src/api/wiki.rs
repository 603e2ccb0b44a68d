//! Wiki unlock endpoint and lore listing

use axum::extract::{Path, Query, State};
use axum::Json;
use fablier_common::db::models::{WikiItem, WikiKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::collections::HashSet;

use crate::api::{ok, Envelope};
use crate::db::wiki as wiki_db;
use crate::services::wiki::{self, UnlockOutcome};
use crate::{ApiError, ApiResult, AppState};

/// Unlock request body
#[derive(Debug, Deserialize)]
pub struct UnlockRequest {
    pub utilisateur_id: Option<i64>,
    pub histoire_id: Option<i64>,
}

/// POST /api/wiki/debloquer
///
/// Runs the unlock gate for the pair. 404 when the user has no progression
/// for the story (the gate only operates once reading has begun).
pub async fn unlock_wiki(
    State(state): State<AppState>,
    Json(payload): Json<UnlockRequest>,
) -> ApiResult<Json<Envelope<UnlockOutcome>>> {
    let (Some(user_id), Some(story_id)) = (payload.utilisateur_id, payload.histoire_id) else {
        return Err(ApiError::BadRequest(
            "utilisateur_id et histoire_id sont requis".to_string(),
        ));
    };

    let outcome = wiki::unlock(&state.db, user_id, story_id).await?;
    Ok(ok(outcome))
}

/// Listing query parameters
#[derive(Debug, Deserialize)]
pub struct WikiListQuery {
    pub utilisateur_id: Option<i64>,
}

/// One item in the listing; `debloque` is present only when a user was given
#[derive(Debug, Serialize)]
pub struct WikiItemView {
    #[serde(flatten)]
    pub item: WikiItem,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub debloque: Option<bool>,
}

/// Lore listing, grouped by kind tag
#[derive(Debug, Serialize)]
pub struct WikiListing {
    pub histoire_id: i64,
    pub elements: BTreeMap<&'static str, Vec<WikiItemView>>,
}

/// GET /api/wiki/:histoire_id?utilisateur_id=
///
/// Active lore items of the story grouped by kind; with a user id each item
/// carries its unlocked flag for that user.
pub async fn list_wiki_content(
    State(state): State<AppState>,
    Path(story_id): Path<i64>,
    Query(query): Query<WikiListQuery>,
) -> ApiResult<Json<Envelope<WikiListing>>> {
    let items = wiki_db::list_active_items(&state.db, story_id).await?;

    let unlocked: Option<HashSet<(WikiKind, i64)>> = match query.utilisateur_id {
        Some(user_id) => Some(
            wiki_db::unlocked_keys(&state.db, user_id, story_id)
                .await?
                .into_iter()
                .collect(),
        ),
        None => None,
    };

    let mut elements: BTreeMap<&'static str, Vec<WikiItemView>> = BTreeMap::new();
    for kind in WikiKind::ALL {
        elements.insert(kind.as_str(), Vec::new());
    }
    for item in items {
        let debloque = unlocked
            .as_ref()
            .map(|keys| keys.contains(&(item.kind, item.id)));
        elements
            .entry(item.kind.as_str())
            .or_default()
            .push(WikiItemView { item, debloque });
    }

    Ok(ok(WikiListing {
        histoire_id: story_id,
        elements,
    }))
}
