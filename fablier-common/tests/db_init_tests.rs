//! Integration tests for database initialization and catalog seeding

use fablier_common::db::{create_schema, init_database, seed};
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

async fn memory_pool() -> SqlitePool {
    // One connection: pooled in-memory SQLite databases are per-connection
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("in-memory database");
    create_schema(&pool).await.expect("schema creation");
    pool
}

#[tokio::test]
async fn schema_creation_is_idempotent() {
    let pool = memory_pool().await;
    // Second pass must not fail or alter anything
    create_schema(&pool).await.expect("second schema pass");

    let tables: Vec<String> = sqlx::query_scalar(
        "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE 'sqlite_%'",
    )
    .fetch_all(&pool)
    .await
    .unwrap();

    for expected in [
        "users",
        "stories",
        "chapters",
        "progressions",
        "points_accounts",
        "reward_actions",
        "points_history",
        "wiki_items",
        "wiki_unlocks",
        "channels",
        "channel_videos",
        "votes",
        "planning_entries",
    ] {
        assert!(tables.iter().any(|t| t == expected), "missing table {expected}");
    }
}

#[tokio::test]
async fn seeding_twice_leaves_exactly_ten_actions() {
    let pool = memory_pool().await;

    seed::seed_reward_actions(&pool).await.unwrap();
    seed::seed_reward_actions(&pool).await.unwrap();

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reward_actions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 10);

    let lecture_points: i64 =
        sqlx::query_scalar("SELECT points FROM reward_actions WHERE name = 'Lecture Chapitre'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(lecture_points, seed::CHAPTER_POINTS);
}

#[tokio::test]
async fn reseeding_refreshes_catalog_values_in_place() {
    let pool = memory_pool().await;
    seed::seed_reward_actions(&pool).await.unwrap();

    // Simulate a stale catalog row
    sqlx::query("UPDATE reward_actions SET points = 1 WHERE name = 'Histoire Terminée'")
        .execute(&pool)
        .await
        .unwrap();

    seed::seed_reward_actions(&pool).await.unwrap();

    let points: i64 =
        sqlx::query_scalar("SELECT points FROM reward_actions WHERE name = 'Histoire Terminée'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(points, 100);
}

#[tokio::test]
async fn init_database_creates_file_and_seeds() {
    let dir = tempfile::tempdir().unwrap();
    let db_path = dir.path().join("fablier.db");

    let pool = init_database(&db_path).await.expect("init");
    assert!(db_path.exists());

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reward_actions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 10);

    pool.close().await;

    // Re-opening an existing database must also succeed
    let pool = init_database(&db_path).await.expect("re-init");
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM reward_actions")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 10);
    pool.close().await;
}
