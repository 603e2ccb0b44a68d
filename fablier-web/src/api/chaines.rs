//! Channel listing and sync endpoints

use axum::extract::{Path, State};
use axum::Json;
use fablier_common::db::models::{Channel, ChannelVideo, Platform};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{ok, Envelope};
use crate::db::channels;
use crate::{ApiError, ApiResult, AppState};

/// How many recent videos each sync stores per channel
const RECENT_VIDEO_LIMIT: usize = 10;

/// GET /api/chaines
pub async fn list_channels(
    State(state): State<AppState>,
) -> ApiResult<Json<Envelope<Vec<Channel>>>> {
    let channels = channels::list_channels(&state.db).await?;
    Ok(ok(channels))
}

/// GET /api/chaines/:id/videos
///
/// Stored videos of one channel, newest first; 404 on an unknown channel.
pub async fn list_channel_videos(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> ApiResult<Json<Envelope<Vec<ChannelVideo>>>> {
    channels::get_channel(&state.db, id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("chaîne {id}")))?;
    let videos = channels::list_videos(&state.db, id).await?;
    Ok(ok(videos))
}

/// One channel to sync
#[derive(Debug, Clone, Deserialize)]
pub struct SyncTarget {
    pub plateforme: Platform,
    pub chaine_id: String,
}

/// Sync request body; without targets, every stored channel is re-synced
#[derive(Debug, Deserialize, Default)]
pub struct SyncRequest {
    pub chaines: Option<Vec<SyncTarget>>,
}

/// Per-channel sync outcome
#[derive(Debug, Serialize)]
pub struct SyncResult {
    pub plateforme: Platform,
    pub chaine_id: String,
    pub statut: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chaine: Option<Channel>,
}

/// POST /api/chaines/sync
///
/// Fetches metadata and recent videos through the platform clients and
/// upserts them. A client failure degrades that channel to its stored row
/// (statut "echec") without failing the whole sync.
pub async fn sync_channels(
    State(state): State<AppState>,
    payload: Option<Json<SyncRequest>>,
) -> ApiResult<Json<Envelope<Vec<SyncResult>>>> {
    let request = payload.map(|Json(r)| r).unwrap_or_default();

    let targets: Vec<SyncTarget> = match request.chaines {
        Some(targets) if !targets.is_empty() => targets,
        _ => channels::list_channels(&state.db)
            .await?
            .into_iter()
            .map(|c| SyncTarget {
                plateforme: c.platform,
                chaine_id: c.external_id,
            })
            .collect(),
    };
    if targets.is_empty() {
        return Err(ApiError::BadRequest(
            "aucune chaîne à synchroniser".to_string(),
        ));
    }

    let mut results = Vec::with_capacity(targets.len());
    for target in targets {
        let client = state.platforms.for_platform(target.plateforme);
        match client.fetch_channel(&target.chaine_id).await {
            Ok(meta) => {
                let channel = channels::upsert_channel(&state.db, target.plateforme, &meta).await?;
                match client
                    .fetch_recent_videos(&target.chaine_id, RECENT_VIDEO_LIMIT)
                    .await
                {
                    Ok(videos) => {
                        for video in &videos {
                            channels::upsert_video(&state.db, channel.id, video).await?;
                        }
                    }
                    Err(e) => warn!(
                        "Video sync failed for {:?}/{}: {}",
                        target.plateforme, target.chaine_id, e
                    ),
                }
                results.push(SyncResult {
                    plateforme: target.plateforme,
                    chaine_id: target.chaine_id,
                    statut: "synchronisee",
                    chaine: Some(channel),
                });
            }
            Err(e) => {
                warn!(
                    "Channel sync failed for {:?}/{}: {}",
                    target.plateforme, target.chaine_id, e
                );
                let stored =
                    channels::find_channel(&state.db, target.plateforme, &target.chaine_id).await?;
                results.push(SyncResult {
                    plateforme: target.plateforme,
                    chaine_id: target.chaine_id,
                    statut: "echec",
                    chaine: stored,
                });
            }
        }
    }

    Ok(ok(results))
}
