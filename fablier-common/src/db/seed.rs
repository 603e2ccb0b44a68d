//! Reward-action catalog and level titles
//!
//! The catalog ships with exactly ten actions. Seeding is an upsert keyed
//! by name and is safe to repeat on every startup; re-seeding never
//! duplicates rows and refreshes description/points/category in place.

use crate::db::models::ActionCategory;
use crate::Result;
use sqlx::SqlitePool;
use tracing::debug;

/// Points granted per newly-read chapter ("Lecture Chapitre")
pub const CHAPTER_POINTS: i64 = 10;

/// Points granted per wiki item unlocked in one gate pass
pub const WIKI_UNLOCK_POINTS: i64 = 5;

/// Lifetime points per level; level = floor(total / 1000) + 1
pub const POINTS_PER_LEVEL: i64 = 1000;

/// Progression milestones, in percent, each granted once when first crossed
pub const MILESTONES: [i64; 3] = [25, 50, 75];

/// Name of the action recorded for a wiki unlock batch
pub const WIKI_UNLOCK_ACTION: &str = "Débloquage Wiki";

/// The fixed ten-entry action catalog
pub const ACTION_CATALOG: [(&str, &str, i64, ActionCategory); 10] = [
    (
        "Lecture Chapitre",
        "Un chapitre lu",
        CHAPTER_POINTS,
        ActionCategory::Lecture,
    ),
    ("Progression 25%", "25% d'une histoire lue", 25, ActionCategory::Progression),
    ("Progression 50%", "50% d'une histoire lue", 50, ActionCategory::Progression),
    ("Progression 75%", "75% d'une histoire lue", 75, ActionCategory::Progression),
    (
        "Histoire Terminée",
        "Une histoire lue en entier",
        100,
        ActionCategory::Completion,
    ),
    (
        WIKI_UNLOCK_ACTION,
        "Contenu wiki débloqué",
        WIKI_UNLOCK_POINTS,
        ActionCategory::Achievement,
    ),
    (
        "Première Histoire",
        "Première histoire commencée",
        50,
        ActionCategory::Achievement,
    ),
    ("Premier Vote", "Premier vote à un sondage", 20, ActionCategory::Achievement),
    (
        "Série de Lecture",
        "Sept jours de lecture consécutifs",
        30,
        ActionCategory::Achievement,
    ),
    ("Profil Complété", "Profil lecteur complété", 25, ActionCategory::Achievement),
];

/// Level titles, ordered by descending requirement; the first title whose
/// requirement is ≤ the current level wins
pub const LEVEL_TITLES: [(i64, &str); 4] = [
    (20, "Maître des Récits"),
    (10, "Bibliophile"),
    (5, "Lecteur Assidu"),
    (1, "Nouveau Lecteur"),
];

/// Title for a computed level
pub fn title_for_level(level: i64) -> &'static str {
    LEVEL_TITLES
        .iter()
        .find(|(required, _)| *required <= level)
        .map(|(_, title)| *title)
        .unwrap_or("Nouveau Lecteur")
}

/// Seed the reward-action catalog (upsert by name, idempotent)
pub async fn seed_reward_actions(pool: &SqlitePool) -> Result<()> {
    for (name, description, points, category) in ACTION_CATALOG {
        sqlx::query(
            r#"
            INSERT INTO reward_actions (name, description, points, category, active)
            VALUES (?, ?, ?, ?, 1)
            ON CONFLICT(name) DO UPDATE SET
                description = excluded.description,
                points = excluded.points,
                category = excluded.category
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(points)
        .bind(category)
        .execute(pool)
        .await?;
    }
    debug!("Reward-action catalog seeded ({} actions)", ACTION_CATALOG.len());
    Ok(())
}
