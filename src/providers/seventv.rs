//! 7TV adapter (Twitch and Kick)
//!
//! Channel resolution goes through platform connections: look the user up
//! by (platform, connection id), then read the connection's active emote
//! set. Twitch connections key on the numeric broadcaster id, Kick
//! connections on the channel slug — a numeric-only Kick identity cannot
//! be resolved and yields empty without a call.

use crate::config::{ImageFormat, SevenTvConfig};
use crate::emote::{Emote, EmoteOwner, EmoteUrls, Platform, ProviderKind};
use crate::error::Result;
use crate::providers::{EmoteProvider, absorb_channel_failure, fetch_json};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

const API_BASE: &str = "https://7tv.io/v3";

/// Bit 0 of an active emote's flags marks it zero-width
const FLAG_ZERO_WIDTH: u32 = 1 << 0;

#[derive(Debug, Deserialize)]
struct SevenTvUserResponse {
    emote_set: Option<SevenTvEmoteSet>,
}

#[derive(Debug, Deserialize)]
struct SevenTvEmoteSet {
    #[serde(default)]
    emotes: Vec<SevenTvActiveEmote>,
}

#[derive(Debug, Deserialize)]
struct SevenTvActiveEmote {
    id: String,
    name: String,
    #[serde(default)]
    flags: u32,
    data: Option<SevenTvEmoteData>,
}

#[derive(Debug, Deserialize)]
struct SevenTvEmoteData {
    #[serde(default)]
    animated: bool,
    host: SevenTvHost,
    owner: Option<SevenTvOwner>,
}

#[derive(Debug, Deserialize)]
struct SevenTvHost {
    url: String,
    #[serde(default)]
    files: Vec<SevenTvFile>,
}

#[derive(Debug, Deserialize)]
struct SevenTvFile {
    format: String,
}

#[derive(Debug, Deserialize)]
struct SevenTvOwner {
    id: String,
    username: String,
    display_name: String,
}

pub struct SevenTvProvider {
    client: Client,
    config: SevenTvConfig,
    base_url: String,
}

impl SevenTvProvider {
    pub fn new(config: SevenTvConfig) -> Self {
        Self {
            client: Client::new(),
            config,
            base_url: API_BASE.to_string(),
        }
    }

    #[cfg(test)]
    pub fn with_base_url(config: SevenTvConfig, base_url: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            config,
            base_url: base_url.into(),
        }
    }

    /// Pick the configured format when the host advertises it, otherwise
    /// fall back to WEBP which every 7TV emote carries
    fn pick_format(&self, files: &[SevenTvFile]) -> ImageFormat {
        let preferred = self.config.image_format;
        if files.is_empty()
            || files
                .iter()
                .any(|f| f.format.eq_ignore_ascii_case(preferred.extension()))
        {
            preferred
        } else {
            ImageFormat::Webp
        }
    }

    fn normalize(&self, raw: SevenTvActiveEmote, channel_id: Option<&str>) -> Option<Emote> {
        let data = raw.data?;
        let ext = self.pick_format(&data.host.files).extension();
        // host.url is protocol-relative, e.g. //cdn.7tv.app/emote/{id}
        let base = format!("https:{}", data.host.url);

        let owner = data.owner.map(|o| EmoteOwner {
            id: o.id,
            username: o.username,
            display_name: o.display_name,
        });

        Some(Emote {
            id: raw.id,
            name: raw.name,
            provider: ProviderKind::SevenTv,
            is_global: channel_id.is_none(),
            is_animated: data.animated,
            is_zero_width: raw.flags & FLAG_ZERO_WIDTH != 0,
            channel_id: channel_id.map(|c| c.to_string()),
            urls: EmoteUrls {
                x1: format!("{base}/1x.{ext}"),
                x2: format!("{base}/2x.{ext}"),
                x4: Some(format!("{base}/4x.{ext}")),
            },
            owner,
        })
    }

    /// Resolve the connection id 7TV keys the platform user on, or None
    /// when the available identifiers cannot address a connection
    fn connection_id<'a>(
        channel_id: &'a str,
        channel_name: Option<&'a str>,
        platform: Platform,
    ) -> Option<String> {
        match platform {
            Platform::Twitch => {
                if !channel_id.is_empty() && channel_id.chars().all(|c| c.is_ascii_digit()) {
                    Some(channel_id.to_string())
                } else {
                    None
                }
            }
            // Kick connections key on the slug, never the chatroom id
            Platform::Kick => channel_name.map(|name| name.to_lowercase()),
        }
    }

    async fn fetch_channel_inner(
        &self,
        channel_id: &str,
        connection: &str,
        platform: Platform,
    ) -> Result<Vec<Emote>> {
        let platform_path = match platform {
            Platform::Twitch => "twitch",
            Platform::Kick => "kick",
        };
        let url = format!("{}/users/{}/{}", self.base_url, platform_path, connection);
        let request = self.client.get(&url);
        let response: SevenTvUserResponse =
            fetch_json(ProviderKind::SevenTv, "platform user", request).await?;

        let Some(set) = response.emote_set else {
            tracing::debug!(
                channel_id = %channel_id,
                "7TV user has no active emote set"
            );
            return Ok(Vec::new());
        };

        Ok(set
            .emotes
            .into_iter()
            .filter_map(|raw| self.normalize(raw, Some(channel_id)))
            .collect())
    }
}

#[async_trait]
impl EmoteProvider for SevenTvProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::SevenTv
    }

    async fn fetch_global_emotes(&self) -> Result<Vec<Emote>> {
        let url = format!("{}/emote-sets/global", self.base_url);
        let request = self.client.get(&url);
        let set: SevenTvEmoteSet =
            fetch_json(ProviderKind::SevenTv, "global emote set", request).await?;

        tracing::debug!(count = set.emotes.len(), "Fetched 7TV global emotes");
        Ok(set
            .emotes
            .into_iter()
            .filter_map(|raw| self.normalize(raw, None))
            .collect())
    }

    async fn fetch_channel_emotes(
        &self,
        channel_id: &str,
        channel_name: Option<&str>,
        platform: Platform,
    ) -> Vec<Emote> {
        let Some(connection) = Self::connection_id(channel_id, channel_name, platform) else {
            tracing::debug!(
                channel_id = %channel_id,
                platform = ?platform,
                "No usable 7TV connection id, skipping"
            );
            return Vec::new();
        };

        let result = self
            .fetch_channel_inner(channel_id, &connection, platform)
            .await;
        absorb_channel_failure(ProviderKind::SevenTv, channel_id, result)
    }
}
