//! Twitch Helix chat emotes adapter
//!
//! Helix is credential-gated: without a client id and bearer token both
//! fetch methods short-circuit to empty results. That is a configuration
//! state, not an error, and is logged at info.

use crate::config::TwitchConfig;
use crate::emote::{Emote, EmoteUrls, Platform, ProviderKind};
use crate::error::Result;
use crate::providers::{EmoteProvider, absorb_channel_failure, fetch_json};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const API_BASE: &str = "https://api.twitch.tv/helix";

#[derive(Debug, Deserialize)]
struct HelixEmoteList {
    data: Vec<HelixEmote>,
}

#[derive(Debug, Deserialize)]
struct HelixEmote {
    id: String,
    name: String,
    images: HelixImages,
    #[serde(default)]
    format: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct HelixImages {
    url_1x: String,
    url_2x: String,
    url_4x: Option<String>,
}

pub struct TwitchProvider {
    client: Client,
    config: TwitchConfig,
    base_url: String,
}

impl TwitchProvider {
    pub fn new(config: TwitchConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            base_url: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(config: TwitchConfig, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            config,
            base_url: base_url.into(),
        }
    }

    fn credentials(&self) -> Option<(&str, &str)> {
        if !self.config.is_configured() {
            return None;
        }
        self.config
            .client_id
            .as_deref()
            .zip(self.config.access_token.as_deref())
    }

    fn normalize(&self, raw: HelixEmote, channel_id: Option<&str>) -> Emote {
        let is_animated = raw.format.iter().any(|f| f == "animated");
        Emote {
            id: raw.id,
            name: raw.name,
            provider: ProviderKind::Twitch,
            is_global: channel_id.is_none(),
            is_animated,
            is_zero_width: false,
            channel_id: channel_id.map(|c| c.to_string()),
            urls: EmoteUrls {
                x1: raw.images.url_1x,
                x2: raw.images.url_2x,
                x4: raw.images.url_4x,
            },
            owner: None,
        }
    }

    async fn fetch_channel_inner(
        &self,
        client_id: &str,
        token: &str,
        channel_id: &str,
    ) -> Result<Vec<Emote>> {
        let url = format!("{}/chat/emotes", self.base_url);
        let request = self
            .client
            .get(&url)
            .query(&[("broadcaster_id", channel_id)])
            .header("Client-Id", client_id)
            .bearer_auth(token);

        let list: HelixEmoteList =
            fetch_json(ProviderKind::Twitch, "channel emotes", request).await?;

        Ok(list
            .data
            .into_iter()
            .map(|raw| self.normalize(raw, Some(channel_id)))
            .collect())
    }
}

#[async_trait]
impl EmoteProvider for TwitchProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Twitch
    }

    async fn fetch_global_emotes(&self) -> Result<Vec<Emote>> {
        let Some((client_id, token)) = self.credentials() else {
            tracing::info!("Twitch credentials not configured, skipping global emotes");
            return Ok(Vec::new());
        };

        let url = format!("{}/chat/emotes/global", self.base_url);
        let request = self
            .client
            .get(&url)
            .header("Client-Id", client_id)
            .bearer_auth(token);

        let list: HelixEmoteList =
            fetch_json(ProviderKind::Twitch, "global emotes", request).await?;

        tracing::debug!(count = list.data.len(), "Fetched Twitch global emotes");
        Ok(list
            .data
            .into_iter()
            .map(|raw| self.normalize(raw, None))
            .collect())
    }

    async fn fetch_channel_emotes(
        &self,
        channel_id: &str,
        _channel_name: Option<&str>,
        platform: Platform,
    ) -> Vec<Emote> {
        if platform != Platform::Twitch {
            return Vec::new();
        }
        let Some((client_id, token)) = self.credentials() else {
            tracing::info!("Twitch credentials not configured, skipping channel emotes");
            return Vec::new();
        };

        let result = self.fetch_channel_inner(client_id, token, channel_id).await;
        absorb_channel_failure(ProviderKind::Twitch, channel_id, result)
    }
}
