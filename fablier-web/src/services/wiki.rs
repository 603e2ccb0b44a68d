//! Wiki unlock gate
//!
//! Given a user's chapters-read count for a story, records every active
//! lore item whose threshold is met and not yet unlocked, then credits a
//! flat per-item reward in one direct ledger mutation. Re-invoking at an
//! unchanged threshold unlocks nothing and grants nothing.

use fablier_common::db::models::WikiKind;
use fablier_common::db::seed::{self, WIKI_UNLOCK_ACTION, WIKI_UNLOCK_POINTS};
use fablier_common::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::{points, progressions, wiki};

/// One newly unlocked lore item, as returned to the caller
#[derive(Debug, Clone, Serialize)]
pub struct UnlockedItem {
    #[serde(rename = "type")]
    pub kind: WikiKind,
    pub id: i64,
    #[serde(rename = "titre")]
    pub title: String,
    #[serde(rename = "image")]
    pub image_url: Option<String>,
    #[serde(rename = "niveau_requis")]
    pub required_level: i64,
}

/// Outcome of one unlock-gate pass
#[derive(Debug, Clone, Serialize)]
pub struct UnlockOutcome {
    #[serde(rename = "nouveaux_debloquages")]
    pub newly_unlocked: Vec<UnlockedItem>,
    #[serde(rename = "points_gagnes")]
    pub points_gained: i64,
    #[serde(rename = "chapitres_lus")]
    pub chapters_read: i64,
}

/// Run the unlock gate for a (user, story) pair
///
/// Fails with NotFound when no progression exists: the gate only operates
/// once reading has begun.
pub async fn unlock(pool: &SqlitePool, user_id: i64, story_id: i64) -> Result<UnlockOutcome> {
    let progression = progressions::find(pool, user_id, story_id)
        .await?
        .ok_or_else(|| {
            Error::NotFound(format!(
                "no progression for user {user_id} on story {story_id}"
            ))
        })?;
    let chapters_read = progression.chapters_read;

    let mut newly_unlocked = Vec::new();
    for kind in WikiKind::ALL {
        let eligible = wiki::eligible_items(pool, user_id, story_id, kind, chapters_read).await?;
        for item in eligible {
            wiki::insert_unlock(pool, user_id, story_id, kind, item.id).await?;
            newly_unlocked.push(UnlockedItem {
                kind,
                id: item.id,
                title: item.name,
                image_url: item.image_url,
                required_level: item.unlock_level,
            });
        }
    }

    let mut points_gained = 0;
    if !newly_unlocked.is_empty() {
        points_gained = WIKI_UNLOCK_POINTS * newly_unlocked.len() as i64;

        let action = match points::find_action_by_name(pool, WIKI_UNLOCK_ACTION).await? {
            Some(action) => action,
            None => {
                // Catalog not seeded yet; seed and retry once
                seed::seed_reward_actions(pool).await?;
                points::find_action_by_name(pool, WIKI_UNLOCK_ACTION)
                    .await?
                    .ok_or_else(|| {
                        Error::Internal("wiki unlock action missing after seeding".into())
                    })?
            }
        };

        let mut kinds: Vec<&str> = newly_unlocked.iter().map(|u| u.kind.as_str()).collect();
        kinds.sort();
        kinds.dedup();
        let details = format!(
            "{} élément(s) débloqué(s): {}",
            newly_unlocked.len(),
            kinds.join(", ")
        );

        points::get_or_create_account(pool, user_id).await?;
        points::add_points(pool, user_id, points_gained).await?;
        points::insert_history(
            pool,
            user_id,
            action.id,
            points_gained,
            Some(story_id),
            None,
            Some(&details),
        )
        .await?;
    }

    Ok(UnlockOutcome {
        newly_unlocked,
        points_gained,
        chapters_read,
    })
}
