//! Poll endpoints (store-backed)

use axum::extract::{Query, State};
use axum::Json;
use fablier_common::db::models::Vote;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::api::{ok, Envelope};
use crate::db::votes;
use crate::services::rewards::{self, RewardNote};
use crate::{ApiError, ApiResult, AppState};

/// Vote body; poll and choice are required
#[derive(Debug, Deserialize)]
pub struct CastVoteRequest {
    pub sondage: Option<String>,
    pub choix: Option<String>,
    pub utilisateur_id: Option<i64>,
}

/// Cast-vote response: the stored vote, plus the first-vote achievement
/// when it applies
#[derive(Debug, Serialize)]
pub struct CastVoteResponse {
    pub vote: Vote,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recompense: Option<RewardNote>,
}

/// POST /api/votes
pub async fn cast_vote(
    State(state): State<AppState>,
    Json(payload): Json<CastVoteRequest>,
) -> ApiResult<Json<Envelope<CastVoteResponse>>> {
    let (Some(poll), Some(choice)) = (payload.sondage.as_deref(), payload.choix.as_deref()) else {
        return Err(ApiError::BadRequest(
            "sondage et choix sont requis".to_string(),
        ));
    };
    if poll.trim().is_empty() || choice.trim().is_empty() {
        return Err(ApiError::BadRequest(
            "sondage et choix sont requis".to_string(),
        ));
    }

    let vote = votes::insert_vote(&state.db, poll, choice, payload.utilisateur_id).await?;

    // First vote per user earns the one-time achievement; a duplicate grant
    // is expected and silent, anything else is logged and skipped
    let mut recompense = None;
    if let Some(user_id) = payload.utilisateur_id {
        match rewards::grant(&state.db, user_id, "Premier Vote", None, None, None).await {
            Ok(outcome) => recompense = Some(outcome.into()),
            Err(fablier_common::Error::AlreadyGranted(_)) => {}
            Err(e) => warn!("First-vote reward skipped (user {}): {}", user_id, e),
        }
    }

    Ok(ok(CastVoteResponse { vote, recompense }))
}

/// Poll query parameters
#[derive(Debug, Deserialize)]
pub struct PollQuery {
    pub sondage: Option<String>,
}

/// Tallied poll results
#[derive(Debug, Serialize)]
pub struct PollResults {
    pub sondage: String,
    pub total: i64,
    pub resultats: Vec<votes::TallyRow>,
}

/// GET /api/votes?sondage=
pub async fn poll_results(
    State(state): State<AppState>,
    Query(query): Query<PollQuery>,
) -> ApiResult<Json<Envelope<PollResults>>> {
    let Some(poll) = query.sondage.filter(|p| !p.trim().is_empty()) else {
        return Err(ApiError::BadRequest("sondage est requis".to_string()));
    };

    let resultats = votes::tally(&state.db, &poll).await?;
    let total = resultats.iter().map(|r| r.count).sum();
    Ok(ok(PollResults {
        sondage: poll,
        total,
        resultats,
    }))
}
