//! Video-platform clients for channel sync
//!
//! The external APIs are collaborators, not part of this codebase: each
//! client is a thin adapter fetching channel metadata, recent videos, and
//! live status. When no credentials are configured the mock client serves
//! deterministic data, mirroring the mock-data fallback of the historical
//! implementation.

mod mock;
mod twitch;
mod youtube;

pub use mock::MockPlatform;
pub use twitch::TwitchClient;
pub use youtube::YouTubeClient;

use chrono::{DateTime, Utc};
use fablier_common::config::TomlConfig;
use fablier_common::db::models::Platform;
use fablier_common::Result;
use serde::Serialize;

/// Channel metadata as reported by a platform
#[derive(Debug, Clone, Serialize)]
pub struct ChannelMetadata {
    pub external_id: String,
    pub name: String,
    pub description: Option<String>,
    pub url: Option<String>,
    pub subscriber_count: i64,
    pub video_count: i64,
    pub is_live: bool,
}

/// Video metadata as reported by a platform
#[derive(Debug, Clone, Serialize)]
pub struct VideoMetadata {
    pub external_id: String,
    pub title: String,
    pub url: Option<String>,
    pub published_at: Option<DateTime<Utc>>,
    pub thumbnail_url: Option<String>,
}

/// A concrete platform client
pub enum PlatformClient {
    Youtube(YouTubeClient),
    Twitch(TwitchClient),
    Mock(MockPlatform),
}

impl PlatformClient {
    /// Fetch channel metadata (including live status) by platform-side id
    pub async fn fetch_channel(&self, external_id: &str) -> Result<ChannelMetadata> {
        match self {
            PlatformClient::Youtube(c) => c.fetch_channel(external_id).await,
            PlatformClient::Twitch(c) => c.fetch_channel(external_id).await,
            PlatformClient::Mock(c) => Ok(c.fetch_channel(external_id)),
        }
    }

    /// Fetch a channel's most recent videos, newest first
    pub async fn fetch_recent_videos(
        &self,
        external_id: &str,
        limit: usize,
    ) -> Result<Vec<VideoMetadata>> {
        match self {
            PlatformClient::Youtube(c) => c.fetch_recent_videos(external_id, limit).await,
            PlatformClient::Twitch(c) => c.fetch_recent_videos(external_id, limit).await,
            PlatformClient::Mock(c) => Ok(c.fetch_recent_videos(external_id, limit)),
        }
    }
}

/// One client per supported platform
pub struct PlatformClients {
    youtube: PlatformClient,
    twitch: PlatformClient,
}

impl PlatformClients {
    /// Build clients from configuration; platforms without credentials get
    /// the mock client
    pub fn from_config(config: &TomlConfig) -> Self {
        let youtube = match &config.youtube_api_key {
            Some(key) if !key.is_empty() => {
                PlatformClient::Youtube(YouTubeClient::new(key.clone()))
            }
            _ => {
                tracing::info!("No YouTube API key configured; using mock platform data");
                PlatformClient::Mock(MockPlatform::new(Platform::Youtube))
            }
        };
        let twitch = match (&config.twitch_client_id, &config.twitch_client_secret) {
            (Some(id), Some(secret)) if !id.is_empty() && !secret.is_empty() => {
                PlatformClient::Twitch(TwitchClient::new(id.clone(), secret.clone()))
            }
            _ => {
                tracing::info!("No Twitch credentials configured; using mock platform data");
                PlatformClient::Mock(MockPlatform::new(Platform::Twitch))
            }
        };
        Self { youtube, twitch }
    }

    /// All-mock clients (tests, offline development)
    pub fn mock() -> Self {
        Self {
            youtube: PlatformClient::Mock(MockPlatform::new(Platform::Youtube)),
            twitch: PlatformClient::Mock(MockPlatform::new(Platform::Twitch)),
        }
    }

    /// The client serving a given platform
    pub fn for_platform(&self, platform: Platform) -> &PlatformClient {
        match platform {
            Platform::Youtube => &self.youtube,
            Platform::Twitch => &self.twitch,
        }
    }
}
