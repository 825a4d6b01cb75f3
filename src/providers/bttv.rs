//! BetterTTV adapter (Twitch only)
//!
//! BTTV keys channels by the numeric Twitch broadcaster id, so non-numeric
//! identifiers are rejected before any network call. A channel's result is
//! the union of its own emotes and emotes shared into it.

use crate::emote::{Emote, EmoteOwner, EmoteUrls, Platform, ProviderKind};
use crate::error::Result;
use crate::providers::{EmoteProvider, absorb_channel_failure, fetch_json};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const API_BASE: &str = "https://api.betterttv.net/3";
const CDN_BASE: &str = "https://cdn.betterttv.net/emote";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BttvEmote {
    id: String,
    code: String,
    #[serde(default)]
    animated: bool,
    #[serde(default)]
    image_type: String,
    user: Option<BttvUser>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BttvUser {
    id: String,
    name: String,
    display_name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BttvChannelResponse {
    #[serde(default)]
    channel_emotes: Vec<BttvEmote>,
    #[serde(default)]
    shared_emotes: Vec<BttvEmote>,
}

pub struct BttvProvider {
    client: Client,
    base_url: String,
}

impl BttvProvider {
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

    fn normalize(&self, raw: BttvEmote, channel_id: Option<&str>) -> Emote {
        let is_animated = raw.animated || raw.image_type == "gif";
        let owner = raw.user.map(|u| EmoteOwner {
            id: u.id,
            username: u.name,
            display_name: u.display_name,
        });
        Emote {
            name: raw.code,
            provider: ProviderKind::Bttv,
            is_global: channel_id.is_none(),
            is_animated,
            is_zero_width: false,
            channel_id: channel_id.map(|c| c.to_string()),
            urls: EmoteUrls {
                x1: format!("{CDN_BASE}/{}/1x", raw.id),
                x2: format!("{CDN_BASE}/{}/2x", raw.id),
                // BTTV tops out at 3x; it serves the 4x slot
                x4: Some(format!("{CDN_BASE}/{}/3x", raw.id)),
            },
            owner,
            id: raw.id,
        }
    }

    async fn fetch_channel_inner(&self, channel_id: &str) -> Result<Vec<Emote>> {
        let url = format!("{}/cached/users/twitch/{}", self.base_url, channel_id);
        let request = self.client.get(&url);
        let response: BttvChannelResponse =
            fetch_json(ProviderKind::Bttv, "channel user", request).await?;

        Ok(response
            .channel_emotes
            .into_iter()
            .chain(response.shared_emotes)
            .map(|raw| self.normalize(raw, Some(channel_id)))
            .collect())
    }
}

impl Default for BttvProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmoteProvider for BttvProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Bttv
    }

    async fn fetch_global_emotes(&self) -> Result<Vec<Emote>> {
        let url = format!("{}/cached/emotes/global", self.base_url);
        let request = self.client.get(&url);
        let emotes: Vec<BttvEmote> =
            fetch_json(ProviderKind::Bttv, "global emotes", request).await?;

        tracing::debug!(count = emotes.len(), "Fetched BTTV global emotes");
        Ok(emotes
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
        // BTTV wants the numeric Twitch id; anything else is invalid input
        if channel_id.is_empty() || !channel_id.chars().all(|c| c.is_ascii_digit()) {
            tracing::debug!(
                channel_id = %channel_id,
                "Skipping BTTV lookup for non-numeric channel id"
            );
            return Vec::new();
        }

        let result = self.fetch_channel_inner(channel_id).await;
        absorb_channel_failure(ProviderKind::Bttv, channel_id, result)
    }
}
