//! Story and chapter CRUD endpoints

use axum::extract::{Path, State};
use axum::Json;
use fablier_common::db::models::{Chapter, Story};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

use crate::api::{ok, Envelope};
use crate::db::{chapters, stories};
use crate::{ApiError, ApiResult, AppState};

/// GET /api/histoires
pub async fn list_stories(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<Story>>>> {
    let stories = stories::list_stories(&state.db).await?;
    Ok(ok(stories))
}

/// Story detail: the story row plus its chapters
#[derive(Debug, Serialize)]
pub struct StoryDetail {
    #[serde(flatten)]
    pub story: Story,
    pub chapitres: Vec<Chapter>,
}

/// GET /api/histoires/:id
pub async fn get_story(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<StoryDetail>>> {
    let story = stories::get_story(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("histoire {id}")))?;
    let chapitres = chapters::list_for_story(&state.db, id).await?;
    Ok(ok(StoryDetail { story, chapitres }))
}

/// Story creation body; only the title is required
#[derive(Debug, Deserialize)]
pub struct CreateStoryRequest {
    pub titre: Option<String>,
    pub auteur: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    pub description: Option<String>,
    pub wiki_active: Option<bool>,
}

/// POST /api/histoires
pub async fn create_story(
    State(state): State<AppState>,
    Json(payload): Json<CreateStoryRequest>,
) -> ApiResult<Json<Envelope<Story>>> {
    let Some(title) = payload.titre.filter(|t| !t.trim().is_empty()) else {
        return Err(ApiError::BadRequest("titre est requis".to_string()));
    };

    let story = stories::create_story(
        &state.db,
        &stories::NewStory {
            title,
            author: payload.auteur,
            source: payload.source,
            source_url: payload.source_url,
            description: payload.description,
            wiki_enabled: payload.wiki_active.unwrap_or(false),
        },
    )
    .await?;
    Ok(ok(story))
}

/// Partial update body; absent fields keep their stored values
#[derive(Debug, Deserialize)]
pub struct UpdateStoryRequest {
    pub titre: Option<String>,
    pub auteur: Option<String>,
    pub source: Option<String>,
    pub source_url: Option<String>,
    pub description: Option<String>,
    pub wiki_active: Option<bool>,
}

/// PUT /api/histoires/:id
pub async fn update_story(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<UpdateStoryRequest>,
) -> ApiResult<Json<Envelope<Story>>> {
    let story = stories::update_story(
        &state.db,
        id,
        &stories::StoryPatch {
            title: payload.titre,
            author: payload.auteur,
            source: payload.source,
            source_url: payload.source_url,
            description: payload.description,
            wiki_enabled: payload.wiki_active,
        },
    )
    .await?
    .ok_or_else(|| ApiError::NotFound(format!("histoire {id}")))?;
    Ok(ok(story))
}

/// DELETE /api/histoires/:id
pub async fn delete_story(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<Value>>> {
    let deleted = stories::delete_story(&state.db, id).await?;
    if !deleted {
        return Err(ApiError::NotFound(format!("histoire {id}")));
    }
    Ok(ok(json!({ "supprime": true })))
}

/// GET /api/histoires/:id/chapitres
pub async fn list_chapters(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<Vec<Chapter>>>> {
    // 404 for an unknown story rather than an empty list
    stories::get_story(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("histoire {id}")))?;
    let chapitres = chapters::list_for_story(&state.db, id).await?;
    Ok(ok(chapitres))
}

/// Chapter creation body; numbering is auto-assigned when absent
#[derive(Debug, Deserialize)]
pub struct CreateChapterRequest {
    pub titre: Option<String>,
    pub numero: Option<i64>,
    pub contenu: Option<String>,
}

/// POST /api/histoires/:id/chapitres
pub async fn create_chapter(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<CreateChapterRequest>,
) -> ApiResult<Json<Envelope<Chapter>>> {
    stories::get_story(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("histoire {id}")))?;
    let Some(title) = payload.titre.filter(|t| !t.trim().is_empty()) else {
        return Err(ApiError::BadRequest("titre est requis".to_string()));
    };

    let chapter = chapters::create_chapter(
        &state.db,
        id,
        payload.numero,
        &title,
        payload.contenu.as_deref(),
    )
    .await?;
    Ok(ok(chapter))
}
