//! Reward ledger: point grants, level math, and the points summary
//!
//! Grants for completion/achievement actions are one-time per
//! (user, action[, story]); the check is read-then-write, with the ledger's
//! UNIQUE constraints as the storage backstop. Lecture and progression
//! grants repeat by design, so concurrent duplicate requests for the same
//! chapter can double-credit (see module docs in services/progression.rs).

use fablier_common::db::models::{PointsAccount, PointsHistoryEntry};
use fablier_common::db::seed::{self, POINTS_PER_LEVEL};
use fablier_common::{Error, Result};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::db::points::{self, HistoryRecord};

/// Outcome of one successful grant
#[derive(Debug, Clone, Serialize)]
pub struct GrantOutcome {
    #[serde(rename = "points_mis_a_jour")]
    pub account: PointsAccount,
    #[serde(rename = "historique_entry")]
    pub entry: PointsHistoryEntry,
    #[serde(rename = "points_gagnes")]
    pub points_gained: i64,
    #[serde(rename = "niveau_up")]
    pub level_up: bool,
    #[serde(rename = "nouveau_niveau")]
    pub new_level: i64,
}

/// Grant the named action's points to a user
///
/// Seeds the catalog when it is empty, rejects unknown/inactive actions,
/// and rejects duplicate one-time grants.
pub async fn grant(
    pool: &SqlitePool,
    user_id: i64,
    action_name: &str,
    story_id: Option<i64>,
    chapter_id: Option<i64>,
    details: Option<&str>,
) -> Result<GrantOutcome> {
    if points::count_actions(pool).await? == 0 {
        seed::seed_reward_actions(pool).await?;
    }

    let action = points::find_action_by_name(pool, action_name)
        .await?
        .ok_or_else(|| Error::NotFound(format!("unknown reward action: {action_name}")))?;

    if action.category.is_one_time()
        && points::has_history_entry(pool, user_id, action.id, story_id).await?
    {
        return Err(Error::AlreadyGranted(format!(
            "action '{action_name}' already granted to user {user_id}"
        )));
    }

    let account = points::get_or_create_account(pool, user_id).await?;
    let old_level = points::level_for_total(account.total_points);

    let account = points::add_points(pool, user_id, action.points).await?;
    let new_level = account.level;

    let entry = points::insert_history(
        pool,
        user_id,
        action.id,
        action.points,
        story_id,
        chapter_id,
        details,
    )
    .await?;

    Ok(GrantOutcome {
        points_gained: action.points,
        level_up: new_level > old_level,
        new_level,
        account,
        entry,
    })
}

/// Compact grant summary for endpoints that piggyback a reward on another
/// operation
#[derive(Debug, Clone, Serialize)]
pub struct RewardNote {
    #[serde(rename = "points_gagnes")]
    pub points_gained: i64,
    #[serde(rename = "niveau_up")]
    pub level_up: bool,
    #[serde(rename = "nouveau_niveau")]
    pub new_level: i64,
}

impl From<GrantOutcome> for RewardNote {
    fn from(outcome: GrantOutcome) -> Self {
        RewardNote {
            points_gained: outcome.points_gained,
            level_up: outcome.level_up,
            new_level: outcome.new_level,
        }
    }
}

/// Points summary returned by the query endpoint
#[derive(Debug, Clone, Serialize)]
pub struct PointsSummary {
    pub points: PointsAccount,
    #[serde(rename = "niveau_calcule")]
    pub computed_level: i64,
    #[serde(rename = "points_pour_prochain_niveau")]
    pub points_to_next_level: i64,
    #[serde(rename = "titre_niveau")]
    pub level_title: &'static str,
    #[serde(rename = "historique_recent")]
    pub recent_history: Vec<HistoryRecord>,
}

/// Account, recent history, next-level distance, and unlocked title
pub async fn query(pool: &SqlitePool, user_id: i64) -> Result<PointsSummary> {
    let account = points::get_or_create_account(pool, user_id).await?;
    let computed_level = points::level_for_total(account.total_points);
    let points_to_next_level = computed_level * POINTS_PER_LEVEL - account.total_points;
    let level_title = seed::title_for_level(computed_level);
    let recent_history = points::recent_history(pool, user_id, 10).await?;

    Ok(PointsSummary {
        points: account,
        computed_level,
        points_to_next_level,
        level_title,
        recent_history,
    })
}
