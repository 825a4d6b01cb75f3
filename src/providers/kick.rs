//! Kick emotes adapter
//!
//! Kick has no official global-emotes endpoint, so global fetches are
//! always empty. Channel lookup wants the channel's slug; a numeric legacy
//! id still resolves because Kick accepts it in the slug position.

use crate::emote::{Emote, EmoteUrls, Platform, ProviderKind};
use crate::error::Result;
use crate::providers::{EmoteProvider, absorb_channel_failure, fetch_json};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const API_BASE: &str = "https://kick.com";
const FILES_BASE: &str = "https://files.kick.com/emotes";

#[derive(Debug, Deserialize)]
struct KickEmotePack {
    #[serde(default)]
    emotes: Vec<KickEmote>,
}

#[derive(Debug, Deserialize)]
struct KickEmote {
    id: u64,
    name: String,
}

/// Legacy v1 channel payload; only the emote list matters here
#[derive(Debug, Deserialize)]
struct KickLegacyChannel {
    #[serde(default)]
    emotes: Vec<KickEmote>,
}

pub struct KickProvider {
    client: Client,
    base_url: String,
}

impl KickProvider {
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            base_url: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
        }
    }

    fn normalize(&self, raw: KickEmote, channel_id: &str) -> Emote {
        // Kick's CDN serves a single fullsize asset for every density
        let url = format!("{FILES_BASE}/{}/fullsize", raw.id);
        Emote {
            id: raw.id.to_string(),
            name: raw.name,
            provider: ProviderKind::Kick,
            is_global: false,
            is_animated: false,
            is_zero_width: false,
            channel_id: Some(channel_id.to_string()),
            urls: EmoteUrls {
                x1: url.clone(),
                x2: url.clone(),
                x4: Some(url),
            },
            owner: None,
        }
    }

    async fn fetch_channel_inner(&self, channel_id: &str, slug: &str) -> Result<Vec<Emote>> {
        let url = format!("{}/emotes/{}", self.base_url, slug);
        let request = self.client.get(&url);
        let packs: Vec<KickEmotePack> =
            fetch_json(ProviderKind::Kick, "channel emote packs", request).await?;

        let emotes: Vec<Emote> = packs
            .into_iter()
            .flat_map(|pack| pack.emotes)
            .map(|raw| self.normalize(raw, channel_id))
            .collect();

        if !emotes.is_empty() {
            return Ok(emotes);
        }

        // Primary endpoint came back empty; some older channels only
        // expose emotes through the legacy channel payload
        tracing::debug!(slug = %slug, "Primary Kick endpoint empty, trying legacy channel API");
        let legacy_url = format!("{}/api/v1/channels/{}", self.base_url, slug);
        let request = self.client.get(&legacy_url);
        let channel: KickLegacyChannel =
            fetch_json(ProviderKind::Kick, "legacy channel", request).await?;

        Ok(channel
            .emotes
            .into_iter()
            .map(|raw| self.normalize(raw, channel_id))
            .collect())
    }
}

impl Default for KickProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmoteProvider for KickProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Kick
    }

    async fn fetch_global_emotes(&self) -> Result<Vec<Emote>> {
        // No official global emotes endpoint exists
        Ok(Vec::new())
    }

    async fn fetch_channel_emotes(
        &self,
        channel_id: &str,
        channel_name: Option<&str>,
        platform: Platform,
    ) -> Vec<Emote> {
        if platform != Platform::Kick {
            return Vec::new();
        }

        // Prefer the slug; fall back to the numeric legacy id in slug position
        let slug = channel_name.unwrap_or(channel_id);
        let result = self.fetch_channel_inner(channel_id, slug).await;
        absorb_channel_failure(ProviderKind::Kick, channel_id, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PACKS_BODY: &str = r#"[
        {
            "id": 1,
            "emotes": [
                {"id": 39261, "name": "kickHeart"},
                {"id": 39262, "name": "kickFire"}
            ]
        },
        {
            "id": 2,
            "emotes": [
                {"id": 40001, "name": "subOnly"}
            ]
        }
    ]"#;

    #[tokio::test]
    async fn test_global_always_empty() {
        let provider = KickProvider::new();
        assert!(provider.fetch_global_emotes().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_channel_emotes_flatten_packs() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/emotes/xqc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(PACKS_BODY)
            .create_async()
            .await;

        let provider = KickProvider::with_base_url(server.url());
        let emotes = provider
            .fetch_channel_emotes("668", Some("xqc"), Platform::Kick)
            .await;

        assert_eq!(emotes.len(), 3);
        assert_eq!(emotes[0].name, "kickHeart");
        assert_eq!(emotes[0].channel_id.as_deref(), Some("668"));
        assert_eq!(
            emotes[0].urls.x1,
            "https://files.kick.com/emotes/39261/fullsize"
        );
    }

    #[tokio::test]
    async fn test_legacy_fallback_on_empty_primary() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/emotes/oldchannel")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;
        let legacy = server
            .mock("GET", "/api/v1/channels/oldchannel")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"id": 12, "emotes": [{"id": 7, "name": "legacyPog"}]}"#)
            .create_async()
            .await;

        let provider = KickProvider::with_base_url(server.url());
        let emotes = provider
            .fetch_channel_emotes("12", Some("oldchannel"), Platform::Kick)
            .await;

        legacy.assert_async().await;
        assert_eq!(emotes.len(), 1);
        assert_eq!(emotes[0].name, "legacyPog");
    }

    #[tokio::test]
    async fn test_numeric_id_used_as_slug_fallback() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/emotes/12345")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"[{"id": 1, "emotes": [{"id": 9, "name": "numeric"}]}]"#)
            .create_async()
            .await;

        let provider = KickProvider::with_base_url(server.url());
        let emotes = provider
            .fetch_channel_emotes("12345", None, Platform::Kick)
            .await;

        mock.assert_async().await;
        assert_eq!(emotes.len(), 1);
    }

    #[tokio::test]
    async fn test_channel_404_yields_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/emotes/ghost")
            .with_status(404)
            .create_async()
            .await;

        let provider = KickProvider::with_base_url(server.url());
        let emotes = provider
            .fetch_channel_emotes("1", Some("ghost"), Platform::Kick)
            .await;
        assert!(emotes.is_empty());
    }

    #[tokio::test]
    async fn test_wrong_platform_yields_empty() {
        let provider = KickProvider::new();
        let emotes = provider
            .fetch_channel_emotes("141981764", None, Platform::Twitch)
            .await;
        assert!(emotes.is_empty());
    }
}
