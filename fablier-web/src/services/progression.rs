//! Progress tracker and the rewards cascade
//!
//! Updating a reader's position runs the full cascade: compute newly-read
//! chapters and milestone crossings, grant the matching reward actions,
//! then run the wiki unlock gate once. Every downstream step is caught and
//! logged on failure; only the progression read/write itself can fail the
//! request. Nothing here is transactional: each grant commits on its own,
//! and two concurrent updates for the same pair can both observe the same
//! baseline and double-credit lecture/progression grants.

use fablier_common::db::models::{ProgressStatus, Progression};
use fablier_common::db::seed::MILESTONES;
use fablier_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;
use tracing::warn;

use crate::db::{chapters, progressions};
use crate::services::rewards;
use crate::services::wiki::{self, UnlockedItem};

/// Reward granted during a cascade, as reported to the caller
#[derive(Debug, Clone, Serialize)]
pub struct RewardSummary {
    pub action: String,
    #[serde(rename = "points_gagnes")]
    pub points_gained: i64,
    #[serde(rename = "niveau_up")]
    pub level_up: bool,
    #[serde(rename = "nouveau_niveau")]
    pub new_level: i64,
}

/// Outcome of one progress update
#[derive(Debug, Clone, Serialize)]
pub struct ProgressOutcome {
    pub progression: Progression,
    #[serde(rename = "pourcentage_progression")]
    pub percentage: i64,
    #[serde(rename = "total_chapitres")]
    pub total_chapters: i64,
    #[serde(rename = "recompenses")]
    pub rewards: Vec<RewardSummary>,
    #[serde(rename = "nouveaux_debloquages")]
    pub newly_unlocked: Vec<UnlockedItem>,
    #[serde(rename = "nouvelle_progression")]
    pub advanced: bool,
}

/// Completion percentage, 0 when the story has no chapters
fn percentage(chapters_read: i64, total_chapters: i64) -> i64 {
    if total_chapters <= 0 {
        return 0;
    }
    (chapters_read as f64 / total_chapters as f64 * 100.0).round() as i64
}

/// Apply a progress report and run the rewards cascade
///
/// chapters_read is monotonic: a report at or below the stored value is
/// accepted silently, mutates nothing, and produces no new rewards (the
/// baseline stays the stored value, so the delta is zero).
pub async fn update_progress(
    pool: &SqlitePool,
    user_id: i64,
    story_id: i64,
    chapter_read: i64,
    status: Option<ProgressStatus>,
) -> Result<ProgressOutcome> {
    let existing = progressions::find(pool, user_id, story_id).await?;
    let previous = existing.as_ref().map(|p| p.chapters_read).unwrap_or(0);
    let previous_status = existing.as_ref().map(|p| p.status);

    let (progression, advanced) = match existing {
        None => {
            let created = progressions::create(
                pool,
                user_id,
                story_id,
                chapter_read,
                status.unwrap_or(ProgressStatus::InProgress),
            )
            .await?;
            (created, true)
        }
        Some(p) if chapter_read > p.chapters_read => {
            let updated = progressions::advance(pool, p.id, chapter_read, status).await?;
            (updated, true)
        }
        Some(p) => (p, false),
    };

    let total_chapters = chapters::count_for_story(pool, story_id).await?;
    let new_pct = percentage(chapter_read, total_chapters);
    let prev_pct = percentage(previous, total_chapters);

    let mut results = Vec::new();

    // One grant per newly-read chapter
    for n in (previous + 1)..=chapter_read {
        let details = format!("Chapitre {n}");
        match rewards::grant(pool, user_id, "Lecture Chapitre", Some(story_id), None, Some(&details))
            .await
        {
            Ok(outcome) => results.push(RewardSummary {
                action: "Lecture Chapitre".to_string(),
                points_gained: outcome.points_gained,
                level_up: outcome.level_up,
                new_level: outcome.new_level,
            }),
            Err(e) => warn!(
                "Chapter reward skipped (user {}, story {}, chapter {}): {}",
                user_id, story_id, n, e
            ),
        }
    }

    // One grant per milestone newly crossed
    for milestone in MILESTONES {
        if prev_pct < milestone && milestone <= new_pct {
            let action = format!("Progression {milestone}%");
            match rewards::grant(pool, user_id, &action, Some(story_id), None, None).await {
                Ok(outcome) => results.push(RewardSummary {
                    action: action.clone(),
                    points_gained: outcome.points_gained,
                    level_up: outcome.level_up,
                    new_level: outcome.new_level,
                }),
                Err(e) => warn!(
                    "Milestone reward skipped (user {}, story {}, {}%): {}",
                    user_id, story_id, milestone, e
                ),
            }
        }
    }

    // Completion grant on transition into 'completed'
    if progression.status == ProgressStatus::Completed
        && previous_status != Some(ProgressStatus::Completed)
    {
        match rewards::grant(pool, user_id, "Histoire Terminée", Some(story_id), None, None).await {
            Ok(outcome) => results.push(RewardSummary {
                action: "Histoire Terminée".to_string(),
                points_gained: outcome.points_gained,
                level_up: outcome.level_up,
                new_level: outcome.new_level,
            }),
            Err(e) => warn!(
                "Completion reward skipped (user {}, story {}): {}",
                user_id, story_id, e
            ),
        }
    }

    // Unlock gate runs once, unconditionally
    let newly_unlocked = match wiki::unlock(pool, user_id, story_id).await {
        Ok(outcome) => outcome.newly_unlocked,
        Err(e) => {
            warn!(
                "Wiki unlock skipped (user {}, story {}): {}",
                user_id, story_id, e
            );
            Vec::new()
        }
    };

    Ok(ProgressOutcome {
        progression,
        percentage: new_pct,
        total_chapters,
        rewards: results,
        newly_unlocked,
        advanced,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlx::sqlite::SqlitePoolOptions;

    async fn test_pool() -> SqlitePool {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .expect("in-memory database");
        fablier_common::db::create_schema(&pool).await.unwrap();
        fablier_common::db::seed::seed_reward_actions(&pool).await.unwrap();
        sqlx::query("INSERT INTO users (id, name) VALUES (1, 'Lecteur')")
            .execute(&pool)
            .await
            .unwrap();
        pool
    }

    async fn seed_story_with_chapters(pool: &SqlitePool, count: i64) -> i64 {
        let story = crate::db::stories::create_story(
            pool,
            &crate::db::stories::NewStory {
                title: "Les Fils Oubliés".to_string(),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        for n in 1..=count {
            crate::db::chapters::create_chapter(pool, story.id, Some(n), &format!("Chapitre {n}"), None)
                .await
                .unwrap();
        }
        story.id
    }

    #[test]
    fn percentage_guards_zero_chapters() {
        assert_eq!(percentage(5, 0), 0);
        assert_eq!(percentage(3, 20), 15);
        assert_eq!(percentage(12, 20), 60);
    }

    #[tokio::test]
    async fn first_report_creates_progression() {
        let pool = test_pool().await;
        let story = seed_story_with_chapters(&pool, 10).await;

        let outcome = update_progress(&pool, 1, story, 2, None).await.unwrap();
        assert!(outcome.advanced);
        assert_eq!(outcome.progression.chapters_read, 2);
        assert_eq!(outcome.progression.status, ProgressStatus::InProgress);
        assert_eq!(outcome.percentage, 20);
        assert_eq!(outcome.total_chapters, 10);
        // Two chapter grants, no milestone crossed at 20%
        assert_eq!(outcome.rewards.len(), 2);
    }

    #[tokio::test]
    async fn three_to_twelve_of_twenty_grants_nine_chapters_and_two_milestones() {
        let pool = test_pool().await;
        let story = seed_story_with_chapters(&pool, 20).await;

        update_progress(&pool, 1, story, 3, None).await.unwrap();
        let outcome = update_progress(&pool, 1, story, 12, None).await.unwrap();

        assert_eq!(outcome.percentage, 60);
        let chapter_grants = outcome
            .rewards
            .iter()
            .filter(|r| r.action == "Lecture Chapitre")
            .count();
        let milestone_grants: Vec<&str> = outcome
            .rewards
            .iter()
            .filter(|r| r.action.starts_with("Progression"))
            .map(|r| r.action.as_str())
            .collect();
        assert_eq!(chapter_grants, 9);
        assert_eq!(milestone_grants, vec!["Progression 25%", "Progression 50%"]);
    }

    #[tokio::test]
    async fn non_advancing_report_mutates_nothing_and_grants_nothing() {
        let pool = test_pool().await;
        let story = seed_story_with_chapters(&pool, 10).await;

        update_progress(&pool, 1, story, 5, None).await.unwrap();
        let outcome = update_progress(&pool, 1, story, 3, None).await.unwrap();

        assert!(!outcome.advanced);
        assert_eq!(outcome.progression.chapters_read, 5);
        assert!(outcome.rewards.is_empty());

        // Repeated identical report is also a no-op
        let outcome = update_progress(&pool, 1, story, 5, None).await.unwrap();
        assert!(!outcome.advanced);
        assert!(outcome.rewards.is_empty());
    }

    #[tokio::test]
    async fn chapters_read_is_monotonic_across_any_sequence() {
        let pool = test_pool().await;
        let story = seed_story_with_chapters(&pool, 10).await;

        for report in [4, 2, 7, 7, 1, 6] {
            update_progress(&pool, 1, story, report, None).await.unwrap();
        }
        let p = progressions::find(&pool, 1, story).await.unwrap().unwrap();
        assert_eq!(p.chapters_read, 7);
    }

    #[tokio::test]
    async fn zero_chapter_story_reports_zero_percent() {
        let pool = test_pool().await;
        let story = seed_story_with_chapters(&pool, 0).await;

        let outcome = update_progress(&pool, 1, story, 4, None).await.unwrap();
        assert_eq!(outcome.percentage, 0);
        assert_eq!(outcome.total_chapters, 0);
    }

    #[tokio::test]
    async fn completion_transition_grants_once() {
        let pool = test_pool().await;
        let story = seed_story_with_chapters(&pool, 4).await;

        update_progress(&pool, 1, story, 3, None).await.unwrap();
        let outcome =
            update_progress(&pool, 1, story, 4, Some(ProgressStatus::Completed)).await.unwrap();
        assert!(outcome.rewards.iter().any(|r| r.action == "Histoire Terminée"));

        // Already completed: a later report does not re-grant; the duplicate
        // attempt is swallowed by the cascade's local recovery
        let p = progressions::find(&pool, 1, story).await.unwrap().unwrap();
        assert_eq!(p.status, ProgressStatus::Completed);
        let completion_entries: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM points_history h \
             JOIN reward_actions a ON a.id = h.action_id \
             WHERE h.user_id = 1 AND a.name = 'Histoire Terminée'",
        )
        .fetch_one(&pool)
        .await
        .unwrap();
        assert_eq!(completion_entries, 1);
    }

    #[tokio::test]
    async fn cascade_includes_wiki_unlocks() {
        let pool = test_pool().await;
        let story = seed_story_with_chapters(&pool, 10).await;
        crate::db::wiki::create_item(
            &pool,
            &crate::db::wiki::NewWikiItem {
                story_id: story,
                kind: fablier_common::db::models::WikiKind::Character,
                name: "Narrateur".to_string(),
                description: None,
                image_url: None,
                extra: None,
                unlock_level: 2,
            },
        )
        .await
        .unwrap();

        let outcome = update_progress(&pool, 1, story, 2, None).await.unwrap();
        assert_eq!(outcome.newly_unlocked.len(), 1);
        assert_eq!(outcome.newly_unlocked[0].title, "Narrateur");

        // Same threshold on a non-advancing call: nothing new
        let outcome = update_progress(&pool, 1, story, 2, None).await.unwrap();
        assert!(outcome.newly_unlocked.is_empty());
    }
}
