//! Points accounts, reward-action catalog lookups, and the history ledger

use chrono::{DateTime, Utc};
use fablier_common::db::models::{PointsAccount, PointsHistoryEntry, RewardAction};
use fablier_common::db::seed::POINTS_PER_LEVEL;
use fablier_common::Result;
use serde::Serialize;
use sqlx::SqlitePool;

/// Level derived from a lifetime point total
pub fn level_for_total(total_points: i64) -> i64 {
    total_points / POINTS_PER_LEVEL + 1
}

/// Load the account for a user, creating a zeroed one when absent
pub async fn get_or_create_account(pool: &SqlitePool, user_id: i64) -> Result<PointsAccount> {
    sqlx::query(
        "INSERT INTO points_accounts (user_id, total_points, current_points, level) \
         VALUES (?, 0, 0, 1) ON CONFLICT(user_id) DO NOTHING",
    )
    .bind(user_id)
    .execute(pool)
    .await?;

    let account = sqlx::query_as::<_, PointsAccount>(
        "SELECT user_id, total_points, current_points, level \
         FROM points_accounts WHERE user_id = ?",
    )
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(account)
}

/// Add points to both totals and recompute the level; returns the updated row
pub async fn add_points(pool: &SqlitePool, user_id: i64, points: i64) -> Result<PointsAccount> {
    let account = sqlx::query_as::<_, PointsAccount>(
        r#"
        UPDATE points_accounts SET
            total_points = total_points + ?,
            current_points = current_points + ?,
            level = (total_points + ?) / ? + 1
        WHERE user_id = ?
        RETURNING user_id, total_points, current_points, level
        "#,
    )
    .bind(points)
    .bind(points)
    .bind(points)
    .bind(POINTS_PER_LEVEL)
    .bind(user_id)
    .fetch_one(pool)
    .await?;
    Ok(account)
}

/// Number of actions in the catalog (zero means it needs seeding)
pub async fn count_actions(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reward_actions")
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Look up an active action by name
pub async fn find_action_by_name(pool: &SqlitePool, name: &str) -> Result<Option<RewardAction>> {
    let action = sqlx::query_as::<_, RewardAction>(
        "SELECT id, name, description, points, category, active \
         FROM reward_actions WHERE name = ? AND active = 1",
    )
    .bind(name)
    .fetch_optional(pool)
    .await?;
    Ok(action)
}

/// True when a history entry already exists for (user, action[, story])
///
/// story_id is part of the dedup key only when provided; without it an
/// achievement is once-per-user-ever.
pub async fn has_history_entry(
    pool: &SqlitePool,
    user_id: i64,
    action_id: i64,
    story_id: Option<i64>,
) -> Result<bool> {
    let existing: Option<i64> = match story_id {
        Some(story_id) => {
            sqlx::query_scalar(
                "SELECT id FROM points_history \
                 WHERE user_id = ? AND action_id = ? AND story_id = ? LIMIT 1",
            )
            .bind(user_id)
            .bind(action_id)
            .bind(story_id)
            .fetch_optional(pool)
            .await?
        }
        None => {
            sqlx::query_scalar(
                "SELECT id FROM points_history WHERE user_id = ? AND action_id = ? LIMIT 1",
            )
            .bind(user_id)
            .bind(action_id)
            .fetch_optional(pool)
            .await?
        }
    };
    Ok(existing.is_some())
}

/// Append one immutable ledger entry
pub async fn insert_history(
    pool: &SqlitePool,
    user_id: i64,
    action_id: i64,
    points: i64,
    story_id: Option<i64>,
    chapter_id: Option<i64>,
    details: Option<&str>,
) -> Result<PointsHistoryEntry> {
    let entry = sqlx::query_as::<_, PointsHistoryEntry>(
        r#"
        INSERT INTO points_history (user_id, action_id, points, story_id, chapter_id, details, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id, user_id, action_id, points, story_id, chapter_id, details, created_at
        "#,
    )
    .bind(user_id)
    .bind(action_id)
    .bind(points)
    .bind(story_id)
    .bind(chapter_id)
    .bind(details)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(entry)
}

/// History entry joined with its action, as exposed by the points query
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HistoryRecord {
    pub id: i64,
    #[serde(rename = "points_gagnes")]
    pub points: i64,
    #[serde(rename = "histoire_id")]
    pub story_id: Option<i64>,
    #[serde(rename = "chapitre_id")]
    pub chapter_id: Option<i64>,
    pub details: Option<String>,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "action_nom")]
    pub action_name: String,
    #[serde(rename = "action_description")]
    pub action_description: String,
}

/// Most recent history entries for a user, newest first
pub async fn recent_history(
    pool: &SqlitePool,
    user_id: i64,
    limit: i64,
) -> Result<Vec<HistoryRecord>> {
    let records = sqlx::query_as::<_, HistoryRecord>(
        r#"
        SELECT h.id, h.points, h.story_id, h.chapter_id, h.details, h.created_at,
               a.name AS action_name, a.description AS action_description
        FROM points_history h
        JOIN reward_actions a ON a.id = h.action_id
        WHERE h.user_id = ?
        ORDER BY h.created_at DESC, h.id DESC
        LIMIT ?
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(records)
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
        // Readers the ledger's foreign keys point at
        for id in [1_i64, 7] {
            sqlx::query("INSERT INTO users (id, name) VALUES (?, 'Lecteur')")
                .bind(id)
                .execute(&pool)
                .await
                .unwrap();
        }
        pool
    }

    #[test]
    fn level_is_floor_of_total_over_thousand_plus_one() {
        assert_eq!(level_for_total(0), 1);
        assert_eq!(level_for_total(999), 1);
        assert_eq!(level_for_total(1000), 2);
        assert_eq!(level_for_total(4999), 5);
    }

    #[tokio::test]
    async fn account_created_lazily_and_zeroed() {
        let pool = test_pool().await;
        let account = get_or_create_account(&pool, 7).await.unwrap();
        assert_eq!(account.total_points, 0);
        assert_eq!(account.current_points, 0);
        assert_eq!(account.level, 1);

        // Second call returns the same row, not a reset one
        add_points(&pool, 7, 150).await.unwrap();
        let account = get_or_create_account(&pool, 7).await.unwrap();
        assert_eq!(account.total_points, 150);
    }

    #[tokio::test]
    async fn add_points_recomputes_level() {
        let pool = test_pool().await;
        get_or_create_account(&pool, 1).await.unwrap();

        let account = add_points(&pool, 1, 999).await.unwrap();
        assert_eq!(account.level, 1);
        let account = add_points(&pool, 1, 1).await.unwrap();
        assert_eq!(account.total_points, 1000);
        assert_eq!(account.level, 2);
    }

    #[tokio::test]
    async fn account_requires_an_existing_reader() {
        let pool = test_pool().await;
        // Foreign keys are enforced on every connection; an account for an
        // unknown reader must be rejected at the storage layer
        let err = get_or_create_account(&pool, 1234).await.unwrap_err();
        assert!(matches!(err, fablier_common::Error::Database(_)));
    }

    #[tokio::test]
    async fn history_dedup_respects_optional_story_scope() {
        let pool = test_pool().await;
        let action = find_action_by_name(&pool, "Histoire Terminée")
            .await
            .unwrap()
            .unwrap();

        insert_history(&pool, 1, action.id, action.points, Some(42), None, None)
            .await
            .unwrap();

        assert!(has_history_entry(&pool, 1, action.id, Some(42)).await.unwrap());
        assert!(!has_history_entry(&pool, 1, action.id, Some(43)).await.unwrap());
        // Without story scope, any entry for the action matches
        assert!(has_history_entry(&pool, 1, action.id, None).await.unwrap());
    }
}
