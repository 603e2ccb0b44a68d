//! Progression persistence
//!
//! One row per (user, story); chapters_read never decreases. The UNIQUE
//! constraint on (user_id, story_id) is the storage backstop for the
//! read-then-write flow in the progress tracker.

use chrono::Utc;
use fablier_common::db::models::{ProgressStatus, Progression};
use fablier_common::Result;
use sqlx::SqlitePool;

const PROGRESSION_COLUMNS: &str =
    "id, user_id, story_id, chapters_read, status, last_read_at";

/// Find the progression for a (user, story) pair
pub async fn find(pool: &SqlitePool, user_id: i64, story_id: i64) -> Result<Option<Progression>> {
    let progression = sqlx::query_as::<_, Progression>(&format!(
        "SELECT {PROGRESSION_COLUMNS} FROM progressions WHERE user_id = ? AND story_id = ?"
    ))
    .bind(user_id)
    .bind(story_id)
    .fetch_optional(pool)
    .await?;
    Ok(progression)
}

/// Create the first progression row for a pair
pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    story_id: i64,
    chapters_read: i64,
    status: ProgressStatus,
) -> Result<Progression> {
    let progression = sqlx::query_as::<_, Progression>(&format!(
        r#"
        INSERT INTO progressions (user_id, story_id, chapters_read, status, last_read_at)
        VALUES (?, ?, ?, ?, ?)
        RETURNING {PROGRESSION_COLUMNS}
        "#
    ))
    .bind(user_id)
    .bind(story_id)
    .bind(chapters_read)
    .bind(status)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(progression)
}

/// Advance an existing progression (chapters_read strictly increased by the
/// caller; status only changes when supplied)
pub async fn advance(
    pool: &SqlitePool,
    id: i64,
    chapters_read: i64,
    status: Option<ProgressStatus>,
) -> Result<Progression> {
    let progression = sqlx::query_as::<_, Progression>(&format!(
        r#"
        UPDATE progressions SET
            chapters_read = ?,
            status = COALESCE(?, status),
            last_read_at = ?
        WHERE id = ?
        RETURNING {PROGRESSION_COLUMNS}
        "#
    ))
    .bind(chapters_read)
    .bind(status)
    .bind(Utc::now())
    .bind(id)
    .fetch_one(pool)
    .await?;
    Ok(progression)
}
