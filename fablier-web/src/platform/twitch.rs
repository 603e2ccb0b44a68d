//! Twitch Helix API client (users, streams, videos)
//!
//! Uses the app-access-token client-credentials flow; the token is fetched
//! per call and not cached, which is fine at sync frequency.

use fablier_common::{Error, Result};
use serde::Deserialize;

use super::{ChannelMetadata, VideoMetadata};

const TWITCH_API_URL: &str = "https://api.twitch.tv/helix";
const TWITCH_AUTH_URL: &str = "https://id.twitch.tv/oauth2/token";

/// Thin adapter over the Twitch Helix API
pub struct TwitchClient {
    http: reqwest::Client,
    client_id: String,
    client_secret: String,
    api_url: String,
    auth_url: String,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

#[derive(Debug, Deserialize)]
struct UsersResponse {
    #[serde(default)]
    data: Vec<TwitchUser>,
}

#[derive(Debug, Deserialize)]
struct TwitchUser {
    id: String,
    login: String,
    display_name: String,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct StreamsResponse {
    #[serde(default)]
    data: Vec<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    data: Vec<TwitchVideo>,
}

#[derive(Debug, Deserialize)]
struct TwitchVideo {
    id: String,
    title: String,
    url: Option<String>,
    published_at: Option<chrono::DateTime<chrono::Utc>>,
    thumbnail_url: Option<String>,
}

impl TwitchClient {
    pub fn new(client_id: String, client_secret: String) -> Self {
        Self::with_urls(
            client_id,
            client_secret,
            TWITCH_API_URL.to_string(),
            TWITCH_AUTH_URL.to_string(),
        )
    }

    /// URL overrides for tests
    pub fn with_urls(
        client_id: String,
        client_secret: String,
        api_url: String,
        auth_url: String,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            client_id,
            client_secret,
            api_url,
            auth_url,
        }
    }

    async fn app_token(&self) -> Result<String> {
        let response: TokenResponse = self
            .http
            .post(&self.auth_url)
            .form(&[
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
                ("grant_type", "client_credentials"),
            ])
            .send()
            .await
            .map_err(|e| Error::Internal(format!("Twitch auth request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Internal(format!("Twitch auth error: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Twitch auth parse failed: {e}")))?;
        Ok(response.access_token)
    }

    pub async fn fetch_channel(&self, external_id: &str) -> Result<ChannelMetadata> {
        let token = self.app_token().await?;

        let users: UsersResponse = self
            .http
            .get(format!("{}/users", self.api_url))
            .query(&[("login", external_id)])
            .bearer_auth(&token)
            .header("Client-Id", &self.client_id)
            .send()
            .await
            .map_err(|e| Error::Internal(format!("Twitch request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Internal(format!("Twitch API error: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Twitch response parse failed: {e}")))?;

        let user = users
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("Twitch channel {external_id}")))?;

        let streams: StreamsResponse = self
            .http
            .get(format!("{}/streams", self.api_url))
            .query(&[("user_login", user.login.as_str())])
            .bearer_auth(&token)
            .header("Client-Id", &self.client_id)
            .send()
            .await
            .map_err(|e| Error::Internal(format!("Twitch request failed: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Twitch response parse failed: {e}")))?;

        Ok(ChannelMetadata {
            // The login is the stable id callers address channels by
            external_id: user.login.clone(),
            name: user.display_name,
            description: user.description,
            url: Some(format!("https://www.twitch.tv/{}", user.login)),
            // Helix exposes follower counts behind a separate scoped
            // endpoint; the sync stores zero rather than a partial value
            subscriber_count: 0,
            video_count: 0,
            is_live: !streams.data.is_empty(),
        })
    }

    pub async fn fetch_recent_videos(
        &self,
        external_id: &str,
        limit: usize,
    ) -> Result<Vec<VideoMetadata>> {
        let token = self.app_token().await?;
        let first = limit.to_string();

        // Videos are addressed by numeric user id, so resolve the login first
        let users: UsersResponse = self
            .http
            .get(format!("{}/users", self.api_url))
            .query(&[("login", external_id)])
            .bearer_auth(&token)
            .header("Client-Id", &self.client_id)
            .send()
            .await
            .map_err(|e| Error::Internal(format!("Twitch request failed: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Twitch response parse failed: {e}")))?;
        let user = users
            .data
            .into_iter()
            .next()
            .ok_or_else(|| Error::NotFound(format!("Twitch channel {external_id}")))?;

        let videos: VideosResponse = self
            .http
            .get(format!("{}/videos", self.api_url))
            .query(&[("user_id", user.id.as_str()), ("first", first.as_str())])
            .bearer_auth(&token)
            .header("Client-Id", &self.client_id)
            .send()
            .await
            .map_err(|e| Error::Internal(format!("Twitch request failed: {e}")))?
            .error_for_status()
            .map_err(|e| Error::Internal(format!("Twitch API error: {e}")))?
            .json()
            .await
            .map_err(|e| Error::Internal(format!("Twitch response parse failed: {e}")))?;

        Ok(videos
            .data
            .into_iter()
            .map(|v| VideoMetadata {
                external_id: v.id,
                title: v.title,
                url: v.url,
                published_at: v.published_at,
                thumbnail_url: v.thumbnail_url,
            })
            .collect())
    }
}
