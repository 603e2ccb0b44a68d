//! Deterministic mock platform data
//!
//! Serves stable, id-derived channel and video metadata so the sync
//! endpoints work without credentials and tests get repeatable values.

use fablier_common::db::models::Platform;

use super::{ChannelMetadata, VideoMetadata};

/// Mock client for one platform
pub struct MockPlatform {
    platform: Platform,
}

impl MockPlatform {
    pub fn new(platform: Platform) -> Self {
        Self { platform }
    }

    fn base_url(&self) -> &'static str {
        match self.platform {
            Platform::Youtube => "https://www.youtube.com",
            Platform::Twitch => "https://www.twitch.tv",
        }
    }

    /// Stable per-id pseudo-count so mock channels look distinct
    fn seed(external_id: &str) -> i64 {
        external_id.bytes().map(|b| b as i64).sum::<i64>()
    }

    pub fn fetch_channel(&self, external_id: &str) -> ChannelMetadata {
        let seed = Self::seed(external_id);
        ChannelMetadata {
            external_id: external_id.to_string(),
            name: format!("Chaîne {external_id}"),
            description: Some("Données de démonstration (mode hors ligne)".to_string()),
            url: Some(format!("{}/{external_id}", self.base_url())),
            subscriber_count: 1000 + seed * 7,
            video_count: 10 + seed % 40,
            is_live: false,
        }
    }

    pub fn fetch_recent_videos(&self, external_id: &str, limit: usize) -> Vec<VideoMetadata> {
        (1..=limit.min(3))
            .map(|n| VideoMetadata {
                external_id: format!("{external_id}-video-{n}"),
                title: format!("Épisode {n}"),
                url: Some(format!("{}/watch/{external_id}-video-{n}", self.base_url())),
                published_at: None,
                thumbnail_url: None,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_data_is_deterministic() {
        let mock = MockPlatform::new(Platform::Youtube);
        let a = mock.fetch_channel("lecteurs");
        let b = mock.fetch_channel("lecteurs");
        assert_eq!(a.subscriber_count, b.subscriber_count);
        assert_eq!(a.name, "Chaîne lecteurs");
        assert_eq!(mock.fetch_recent_videos("lecteurs", 5).len(), 3);
    }
}
