//! Channel and video persistence for platform sync

use chrono::Utc;
use fablier_common::db::models::{Channel, ChannelVideo, Platform};
use fablier_common::Result;
use sqlx::SqlitePool;

use crate::platform::{ChannelMetadata, VideoMetadata};

const CHANNEL_COLUMNS: &str = "id, platform, external_id, name, description, url, \
                               subscriber_count, video_count, is_live, last_synced_at";

/// All stored channels
pub async fn list_channels(pool: &SqlitePool) -> Result<Vec<Channel>> {
    let channels = sqlx::query_as::<_, Channel>(&format!(
        "SELECT {CHANNEL_COLUMNS} FROM channels ORDER BY platform, name"
    ))
    .fetch_all(pool)
    .await?;
    Ok(channels)
}

/// Load one channel by database id
pub async fn get_channel(pool: &SqlitePool, id: i64) -> Result<Option<Channel>> {
    let channel = sqlx::query_as::<_, Channel>(&format!(
        "SELECT {CHANNEL_COLUMNS} FROM channels WHERE id = ?"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await?;
    Ok(channel)
}

/// Load one channel by (platform, external id)
pub async fn find_channel(
    pool: &SqlitePool,
    platform: Platform,
    external_id: &str,
) -> Result<Option<Channel>> {
    let channel = sqlx::query_as::<_, Channel>(&format!(
        "SELECT {CHANNEL_COLUMNS} FROM channels WHERE platform = ? AND external_id = ?"
    ))
    .bind(platform)
    .bind(external_id)
    .fetch_optional(pool)
    .await?;
    Ok(channel)
}

/// Upsert channel metadata fetched from a platform; keyed by
/// (platform, external_id), stamping last_synced_at
pub async fn upsert_channel(
    pool: &SqlitePool,
    platform: Platform,
    meta: &ChannelMetadata,
) -> Result<Channel> {
    let channel = sqlx::query_as::<_, Channel>(&format!(
        r#"
        INSERT INTO channels
            (platform, external_id, name, description, url,
             subscriber_count, video_count, is_live, last_synced_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(platform, external_id) DO UPDATE SET
            name = excluded.name,
            description = excluded.description,
            url = excluded.url,
            subscriber_count = excluded.subscriber_count,
            video_count = excluded.video_count,
            is_live = excluded.is_live,
            last_synced_at = excluded.last_synced_at
        RETURNING {CHANNEL_COLUMNS}
        "#
    ))
    .bind(platform)
    .bind(&meta.external_id)
    .bind(&meta.name)
    .bind(&meta.description)
    .bind(&meta.url)
    .bind(meta.subscriber_count)
    .bind(meta.video_count)
    .bind(meta.is_live)
    .bind(Utc::now())
    .fetch_one(pool)
    .await?;
    Ok(channel)
}

/// Upsert one video of a channel, keyed by its platform-side id
pub async fn upsert_video(
    pool: &SqlitePool,
    channel_id: i64,
    video: &VideoMetadata,
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO channel_videos
            (channel_id, external_id, title, url, published_at, thumbnail_url)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(external_id) DO UPDATE SET
            title = excluded.title,
            url = excluded.url,
            published_at = excluded.published_at,
            thumbnail_url = excluded.thumbnail_url
        "#,
    )
    .bind(channel_id)
    .bind(&video.external_id)
    .bind(&video.title)
    .bind(&video.url)
    .bind(video.published_at)
    .bind(&video.thumbnail_url)
    .execute(pool)
    .await?;
    Ok(())
}

/// Videos of a channel, newest first
pub async fn list_videos(pool: &SqlitePool, channel_id: i64) -> Result<Vec<ChannelVideo>> {
    let videos = sqlx::query_as::<_, ChannelVideo>(
        "SELECT id, channel_id, external_id, title, url, published_at, thumbnail_url \
         FROM channel_videos WHERE channel_id = ? ORDER BY published_at DESC, id DESC",
    )
    .bind(channel_id)
    .fetch_all(pool)
    .await?;
    Ok(videos)
}
