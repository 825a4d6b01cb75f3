//! FrankerFaceZ adapter (Twitch only)
//!
//! Rooms resolve by channel name (preferred, case-insensitive) or numeric
//! Twitch id. When an emoticon carries animated image variants those are
//! preferred over the static ones for every size.

use crate::emote::{Emote, EmoteOwner, EmoteUrls, Platform, ProviderKind};
use crate::error::Result;
use crate::providers::{EmoteProvider, absorb_channel_failure, fetch_json};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::collections::HashMap;

const API_BASE: &str = "https://api.frankerfacez.com/v1";

#[derive(Debug, Deserialize)]
struct FfzGlobalResponse {
    #[serde(default)]
    default_sets: Vec<u64>,
    #[serde(default)]
    sets: HashMap<String, FfzSet>,
}

#[derive(Debug, Deserialize)]
struct FfzRoomResponse {
    #[serde(default)]
    sets: HashMap<String, FfzSet>,
}

#[derive(Debug, Deserialize)]
struct FfzSet {
    #[serde(default)]
    emoticons: Vec<FfzEmoticon>,
}

#[derive(Debug, Deserialize)]
struct FfzEmoticon {
    id: u64,
    name: String,
    #[serde(default)]
    urls: HashMap<String, String>,
    /// Animated image variants, present only for animated emotes
    #[serde(default)]
    animated: Option<HashMap<String, String>>,
    #[serde(default)]
    modifier: bool,
    owner: Option<FfzOwner>,
}

#[derive(Debug, Deserialize)]
struct FfzOwner {
    #[serde(rename = "_id")]
    id: u64,
    name: String,
    display_name: Option<String>,
}

pub struct FfzProvider {
    client: Client,
    base_url: String,
}

impl FfzProvider {
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

    fn normalize(&self, raw: FfzEmoticon, channel_id: Option<&str>) -> Option<Emote> {
        let is_animated = raw.animated.is_some();
        // Animated variants win for all three sizes when present
        let urls = raw.animated.unwrap_or(raw.urls);
        let x1 = urls.get("1").cloned()?;
        let x2 = urls.get("2").cloned().unwrap_or_else(|| x1.clone());
        let x4 = urls.get("4").cloned();

        let owner = raw.owner.map(|o| EmoteOwner {
            id: o.id.to_string(),
            display_name: o.display_name.unwrap_or_else(|| o.name.clone()),
            username: o.name,
        });

        Some(Emote {
            id: raw.id.to_string(),
            name: raw.name,
            provider: ProviderKind::Ffz,
            is_global: channel_id.is_none(),
            is_animated,
            is_zero_width: raw.modifier,
            channel_id: channel_id.map(|c| c.to_string()),
            urls: EmoteUrls { x1, x2, x4 },
            owner,
        })
    }

    fn collect_sets(
        &self,
        sets: HashMap<String, FfzSet>,
        channel_id: Option<&str>,
    ) -> Vec<Emote> {
        sets.into_values()
            .flat_map(|set| set.emoticons)
            .filter_map(|raw| self.normalize(raw, channel_id))
            .collect()
    }

    async fn fetch_channel_inner(
        &self,
        channel_id: &str,
        channel_name: Option<&str>,
    ) -> Result<Vec<Emote>> {
        // Name lookup is preferred; fall back to the numeric room-id route
        let url = if let Some(name) = channel_name {
            format!("{}/room/{}", self.base_url, name.to_lowercase())
        } else if channel_id.chars().all(|c| c.is_ascii_digit()) && !channel_id.is_empty() {
            format!("{}/room/id/{}", self.base_url, channel_id)
        } else {
            tracing::debug!(
                channel_id = %channel_id,
                "No usable FFZ room identifier, skipping"
            );
            return Ok(Vec::new());
        };

        let request = self.client.get(&url);
        let response: FfzRoomResponse = fetch_json(ProviderKind::Ffz, "room", request).await?;
        Ok(self.collect_sets(response.sets, Some(channel_id)))
    }
}

impl Default for FfzProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EmoteProvider for FfzProvider {
    fn kind(&self) -> ProviderKind {
        ProviderKind::Ffz
    }

    async fn fetch_global_emotes(&self) -> Result<Vec<Emote>> {
        let url = format!("{}/set/global", self.base_url);
        let request = self.client.get(&url);
        let mut response: FfzGlobalResponse =
            fetch_json(ProviderKind::Ffz, "global set", request).await?;

        // Only the advertised default sets are globally visible
        let mut emotes = Vec::new();
        for set_id in &response.default_sets {
            if let Some(set) = response.sets.remove(&set_id.to_string()) {
                emotes.extend(
                    set.emoticons
                        .into_iter()
                        .filter_map(|raw| self.normalize(raw, None)),
                );
            }
        }

        tracing::debug!(count = emotes.len(), "Fetched FFZ global emotes");
        Ok(emotes)
    }

    async fn fetch_channel_emotes(
        &self,
        channel_id: &str,
        channel_name: Option<&str>,
        platform: Platform,
    ) -> Vec<Emote> {
        if platform != Platform::Twitch {
            return Vec::new();
        }

        let result = self.fetch_channel_inner(channel_id, channel_name).await;
        absorb_channel_failure(ProviderKind::Ffz, channel_id, result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ROOM_BODY: &str = r#"{
        "room": {"_id": 7601, "twitch_id": 22484632, "set": 7601},
        "sets": {
            "7601": {
                "emoticons": [
                    {
                        "id": 128054,
                        "name": "ForsenE",
                        "urls": {
                            "1": "https://cdn.frankerfacez.com/emote/128054/1",
                            "2": "https://cdn.frankerfacez.com/emote/128054/2",
                            "4": "https://cdn.frankerfacez.com/emote/128054/4"
                        },
                        "owner": {"_id": 4863, "name": "forsen", "display_name": "Forsen"}
                    },
                    {
                        "id": 720507,
                        "name": "HyperClap",
                        "urls": {
                            "1": "https://cdn.frankerfacez.com/emote/720507/1",
                            "2": "https://cdn.frankerfacez.com/emote/720507/2"
                        },
                        "animated": {
                            "1": "https://cdn.frankerfacez.com/emote/720507/animated/1",
                            "2": "https://cdn.frankerfacez.com/emote/720507/animated/2",
                            "4": "https://cdn.frankerfacez.com/emote/720507/animated/4"
                        },
                        "owner": {"_id": 9999, "name": "someone", "display_name": null}
                    }
                ]
            }
        }
    }"#;

    #[tokio::test]
    async fn test_global_reads_default_sets_only() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/set/global")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(
                r#"{
                    "default_sets": [3],
                    "sets": {
                        "3": {"emoticons": [{"id": 27081, "name": "ZreknarF", "urls": {"1": "https://cdn.frankerfacez.com/emote/27081/1", "2": "https://cdn.frankerfacez.com/emote/27081/2"}}]},
                        "4330": {"emoticons": [{"id": 1, "name": "HiddenSet", "urls": {"1": "u1"}}]}
                    }
                }"#,
            )
            .create_async()
            .await;

        let provider = FfzProvider::with_base_url(server.url());
        let emotes = provider.fetch_global_emotes().await.unwrap();

        assert_eq!(emotes.len(), 1);
        assert_eq!(emotes[0].name, "ZreknarF");
        assert!(emotes[0].is_global);
        assert!(emotes[0].urls.x4.is_none());
    }

    #[tokio::test]
    async fn test_channel_lookup_by_name_lowercased() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/room/forsen")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(ROOM_BODY)
            .create_async()
            .await;

        let provider = FfzProvider::with_base_url(server.url());
        let emotes = provider
            .fetch_channel_emotes("22484632", Some("Forsen"), Platform::Twitch)
            .await;

        mock.assert_async().await;
        assert_eq!(emotes.len(), 2);
        assert_eq!(emotes[0].channel_id.as_deref(), Some("22484632"));
    }

    #[tokio::test]
    async fn test_animated_variant_preferred() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/room/forsen")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(ROOM_BODY)
            .create_async()
            .await;

        let provider = FfzProvider::with_base_url(server.url());
        let emotes = provider
            .fetch_channel_emotes("22484632", Some("forsen"), Platform::Twitch)
            .await;

        let hyper = emotes.iter().find(|e| e.name == "HyperClap").unwrap();
        assert!(hyper.is_animated);
        assert_eq!(
            hyper.urls.x1,
            "https://cdn.frankerfacez.com/emote/720507/animated/1"
        );
        assert_eq!(
            hyper.urls.x4.as_deref(),
            Some("https://cdn.frankerfacez.com/emote/720507/animated/4")
        );

        let forsene = emotes.iter().find(|e| e.name == "ForsenE").unwrap();
        assert!(!forsene.is_animated);
        assert_eq!(forsene.owner.as_ref().unwrap().display_name, "Forsen");
    }

    #[tokio::test]
    async fn test_channel_lookup_by_numeric_id() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/room/id/22484632")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(ROOM_BODY)
            .create_async()
            .await;

        let provider = FfzProvider::with_base_url(server.url());
        let emotes = provider
            .fetch_channel_emotes("22484632", None, Platform::Twitch)
            .await;

        mock.assert_async().await;
        assert_eq!(emotes.len(), 2);
    }

    #[tokio::test]
    async fn test_channel_404_yields_empty() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("GET", "/room/nobody")
            .with_status(404)
            .with_body(r#"{"error": "Not Found"}"#)
            .create_async()
            .await;

        let provider = FfzProvider::with_base_url(server.url());
        let emotes = provider
            .fetch_channel_emotes("1", Some("nobody"), Platform::Twitch)
            .await;
        assert!(emotes.is_empty());
    }

    #[tokio::test]
    async fn test_kick_platform_rejected() {
        let provider = FfzProvider::new();
        let emotes = provider
            .fetch_channel_emotes("668", Some("xqc"), Platform::Kick)
            .await;
        assert!(emotes.is_empty());
    }
}
