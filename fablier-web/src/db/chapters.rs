//! Chapter persistence
//!
//! Chapter numbers are 1-based and dense per story; numbering is the unit
//! progress is measured in and is immutable once established.

use fablier_common::db::models::Chapter;
use fablier_common::{Error, Result};
use sqlx::SqlitePool;

/// List a story's chapters in reading order
pub async fn list_for_story(pool: &SqlitePool, story_id: i64) -> Result<Vec<Chapter>> {
    let chapters = sqlx::query_as::<_, Chapter>(
        "SELECT id, story_id, number, title, content FROM chapters \
         WHERE story_id = ? ORDER BY number",
    )
    .bind(story_id)
    .fetch_all(pool)
    .await?;
    Ok(chapters)
}

/// Count a story's chapters (the denominator of progress percentage)
pub async fn count_for_story(pool: &SqlitePool, story_id: i64) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chapters WHERE story_id = ?")
        .bind(story_id)
        .fetch_one(pool)
        .await?;
    Ok(count)
}

/// Insert a chapter; when `number` is None the next dense number is assigned
pub async fn create_chapter(
    pool: &SqlitePool,
    story_id: i64,
    number: Option<i64>,
    title: &str,
    content: Option<&str>,
) -> Result<Chapter> {
    let number = match number {
        Some(n) => {
            let taken: Option<i64> =
                sqlx::query_scalar("SELECT id FROM chapters WHERE story_id = ? AND number = ?")
                    .bind(story_id)
                    .bind(n)
                    .fetch_optional(pool)
                    .await?;
            if taken.is_some() {
                return Err(Error::InvalidInput(format!(
                    "chapter number {n} already exists for story {story_id}"
                )));
            }
            n
        }
        None => {
            let max: Option<i64> =
                sqlx::query_scalar("SELECT MAX(number) FROM chapters WHERE story_id = ?")
                    .bind(story_id)
                    .fetch_one(pool)
                    .await?;
            max.unwrap_or(0) + 1
        }
    };

    let chapter = sqlx::query_as::<_, Chapter>(
        r#"
        INSERT INTO chapters (story_id, number, title, content)
        VALUES (?, ?, ?, ?)
        RETURNING id, story_id, number, title, content
        "#,
    )
    .bind(story_id)
    .bind(number)
    .bind(title)
    .bind(content)
    .fetch_one(pool)
    .await?;
    Ok(chapter)
}
