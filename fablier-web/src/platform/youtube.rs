//! YouTube Data API v3 client (channels.list + search.list)

use fablier_common::{Error, Result};
use serde::Deserialize;

use super::{ChannelMetadata, VideoMetadata};

const YOUTUBE_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";

/// Thin adapter over the YouTube Data API
pub struct YouTubeClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

#[derive(Debug, Deserialize)]
struct ChannelListResponse {
    #[serde(default)]
    items: Vec<ChannelItem>,
}

#[derive(Debug, Deserialize)]
struct ChannelItem {
    id: String,
    snippet: ChannelSnippet,
    statistics: Option<ChannelStatistics>,
}

#[derive(Debug, Deserialize)]
struct ChannelSnippet {
    title: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChannelStatistics {
    #[serde(rename = "subscriberCount")]
    subscriber_count: Option<String>,
    #[serde(rename = "videoCount")]
    video_count: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchListResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
    snippet: SearchSnippet,
}

#[derive(Debug, Deserialize)]
struct SearchItemId {
    #[serde(rename = "videoId")]
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchSnippet {
    title: String,
    #[serde(rename = "publishedAt")]
    published_at: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(rename = "liveBroadcastContent")]
    live_broadcast_content: Option<String>,
    thumbnails: Option<Thumbnails>,
}

#[derive(Debug, Deserialize)]
struct Thumbnails {
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl YouTubeClient {
    pub fn new(api_key: String) -> Self {
        Self::with_base_url(api_key, YOUTUBE_BASE_URL.to_string())
    }

    /// Base-url override for tests
    pub fn with_base_url(api_key: String, base_url: String) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key,
            base_url,
        }
    }

    pub async fn fetch_channel(&self, external_id: &str) -> Result<ChannelMetadata> {
        let url = format!("{}/channels", self.base_url);
        let response: ChannelListResponse = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet,statistics"),
                ("id", external_id),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| Error::Internal(format!("YouTube request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Internal(format!("YouTube API error: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Internal(format!("YouTube response parse failed: {e}")))?;

        let item = response
            .items
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("YouTube channel {external_id}")))?;

        let stats = item.statistics.unwrap_or(ChannelStatistics {
            subscriber_count: None,
            video_count: None,
        });
        let parse_count = |s: Option<String>| s.and_then(|v| v.parse().ok()).unwrap_or(0);

        // Live status comes from a search for active live broadcasts
        let is_live = self.has_live_broadcast(external_id).await.unwrap_or(false);

        Ok(ChannelMetadata {
            url: Some(format!("https://www.youtube.com/channel/{}", item.id)),
            external_id: item.id,
            name: item.snippet.title,
            description: item.snippet.description,
            subscriber_count: parse_count(stats.subscriber_count),
            video_count: parse_count(stats.video_count),
            is_live,
        })
    }

    async fn has_live_broadcast(&self, external_id: &str) -> Result<bool> {
        let url = format!("{}/search", self.base_url);
        let response: SearchListResponse = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("channelId", external_id),
                ("eventType", "live"),
                ("type", "video"),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| Error::Internal(format!("YouTube request failed: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Internal(format!("YouTube response parse failed: {e}")))?;
        Ok(response.items.iter().any(|i| {
            i.snippet.live_broadcast_content.as_deref() == Some("live")
        }))
    }

    pub async fn fetch_recent_videos(
        &self,
        external_id: &str,
        limit: usize,
    ) -> Result<Vec<VideoMetadata>> {
        let url = format!("{}/search", self.base_url);
        let max_results = limit.to_string();
        let response: SearchListResponse = self
            .http
            .get(&url)
            .query(&[
                ("part", "snippet"),
                ("channelId", external_id),
                ("order", "date"),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("key", &self.api_key),
            ])
            .send()
            .await
            .map_err(|e| Error::Internal(format!("YouTube request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Internal(format!("YouTube API error: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Internal(format!("YouTube response parse failed: {e}")))?;

        Ok(response
            .items
            .into_iter()
            .filter_map(|item| {
                let video_id = item.id.video_id?;
                Some(VideoMetadata {
                    url: Some(format!("https://www.youtube.com/watch?v={video_id}")),
                    external_id: video_id,
                    title: item.snippet.title,
                    published_at: item.snippet.published_at,
                    thumbnail_url: item.snippet.thumbnails.and_then(|t| t.default).map(|t| t.url),
                })
            })
            .collect())
    }
}
