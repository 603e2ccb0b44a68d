//! Wiki item and unlock persistence
//!
//! One `kind`-tagged table holds all five lore variants; unlock records are
//! append-only and existence means unlocked.

use fablier_common::db::models::{WikiItem, WikiKind};
use fablier_common::Result;
use sqlx::SqlitePool;

const ITEM_COLUMNS: &str =
    "id, story_id, kind, name, description, image_url, extra, unlock_level, active";

/// Fields accepted when creating a wiki item
#[derive(Debug, Clone)]
pub struct NewWikiItem {
    pub story_id: i64,
    pub kind: WikiKind,
    pub name: String,
    pub description: Option<String>,
    pub image_url: Option<String>,
    pub extra: Option<String>,
    pub unlock_level: i64,
}

/// Insert a lore item (active by default)
pub async fn create_item(pool: &SqlitePool, item: &NewWikiItem) -> Result<WikiItem> {
    let row = sqlx::query_as::<_, WikiItem>(&format!(
        r#"
        INSERT INTO wiki_items (story_id, kind, name, description, image_url, extra, unlock_level, active)
        VALUES (?, ?, ?, ?, ?, ?, ?, 1)
        RETURNING {ITEM_COLUMNS}
        "#
    ))
    .bind(item.story_id)
    .bind(item.kind)
    .bind(&item.name)
    .bind(&item.description)
    .bind(&item.image_url)
    .bind(&item.extra)
    .bind(item.unlock_level)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

/// Active items of a story, by ascending unlock level
pub async fn list_active_items(pool: &SqlitePool, story_id: i64) -> Result<Vec<WikiItem>> {
    let items = sqlx::query_as::<_, WikiItem>(&format!(
        "SELECT {ITEM_COLUMNS} FROM wiki_items \
         WHERE story_id = ? AND active = 1 ORDER BY unlock_level, id"
    ))
    .bind(story_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Items of one kind whose threshold is met and which the user has not yet
/// unlocked for this story
pub async fn eligible_items(
    pool: &SqlitePool,
    user_id: i64,
    story_id: i64,
    kind: WikiKind,
    chapters_read: i64,
) -> Result<Vec<WikiItem>> {
    let items = sqlx::query_as::<_, WikiItem>(&format!(
        r#"
        SELECT {ITEM_COLUMNS} FROM wiki_items i
        WHERE i.story_id = ? AND i.kind = ? AND i.active = 1 AND i.unlock_level <= ?
          AND NOT EXISTS (
              SELECT 1 FROM wiki_unlocks u
              WHERE u.user_id = ? AND u.story_id = i.story_id
                AND u.kind = i.kind AND u.item_id = i.id
          )
        ORDER BY i.unlock_level, i.id
        "#
    ))
    .bind(story_id)
    .bind(kind)
    .bind(chapters_read)
    .bind(user_id)
    .fetch_all(pool)
    .await?;
    Ok(items)
}

/// Record one unlock; the UNIQUE constraint rejects duplicates
pub async fn insert_unlock(
    pool: &SqlitePool,
    user_id: i64,
    story_id: i64,
    kind: WikiKind,
    item_id: i64,
) -> Result<()> {
    sqlx::query(
        "INSERT INTO wiki_unlocks (user_id, story_id, kind, item_id) VALUES (?, ?, ?, ?)",
    )
    .bind(user_id)
    .bind(story_id)
    .bind(kind)
    .bind(item_id)
    .execute(pool)
    .await?;
    Ok(())
}

/// (kind, item_id) pairs the user has unlocked for a story
pub async fn unlocked_keys(
    pool: &SqlitePool,
    user_id: i64,
    story_id: i64,
) -> Result<Vec<(WikiKind, i64)>> {
    let keys = sqlx::query_as::<_, (WikiKind, i64)>(
        "SELECT kind, item_id FROM wiki_unlocks WHERE user_id = ? AND story_id = ?",
    )
    .bind(user_id)
    .bind(story_id)
    .fetch_all(pool)
    .await?;
    Ok(keys)
}
