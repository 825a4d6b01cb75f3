//! Provider adapters: one per emote service, all normalizing into the
//! shared [`Emote`] model
//!
//! The contract is deliberately asymmetric. Global fetches are foundational
//! data and may fail; channel fetches are best-effort enrichment — most
//! channels legitimately have no presence on most services — so every
//! internal failure is absorbed and mapped to an empty list.

mod bttv;
mod ffz;
mod kick;
mod seventv;
mod twitch;

pub use bttv::BttvProvider;
pub use ffz::FfzProvider;
pub use kick::KickProvider;
pub use seventv::SevenTvProvider;
pub use twitch::TwitchProvider;

use crate::emote::{Emote, Platform, ProviderKind};
use crate::error::{EmoteError, Result};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Contract implemented identically by all five adapters
#[async_trait]
pub trait EmoteProvider: Send + Sync {
    /// Which service this adapter talks to
    fn kind(&self) -> ProviderKind;

    /// Fetch the service's global emotes. Fails the surrounding operation
    /// on network/parse errors; returns an empty list only when the service
    /// has no concept of global emotes.
    async fn fetch_global_emotes(&self) -> Result<Vec<Emote>>;

    /// Fetch one channel's emotes. Never fails: 404s, malformed shapes,
    /// wrong platforms and invalid identifiers all come back as an empty
    /// list.
    async fn fetch_channel_emotes(
        &self,
        channel_id: &str,
        channel_name: Option<&str>,
        platform: Platform,
    ) -> Vec<Emote>;
}

/// GET a JSON document, mapping failures onto the error taxonomy:
/// 404 becomes the benign `NotFound`, other non-2xx become `Network`,
/// undecodable bodies become `Shape`.
pub(crate) async fn fetch_json<T: DeserializeOwned>(
    provider: ProviderKind,
    resource: &str,
    request: reqwest::RequestBuilder,
) -> Result<T> {
    let response = request
        .send()
        .await
        .map_err(|source| EmoteError::Network { provider, source })?;

    if response.status() == StatusCode::NOT_FOUND {
        return Err(EmoteError::NotFound {
            provider,
            resource: resource.to_string(),
        });
    }

    let response = response
        .error_for_status()
        .map_err(|source| EmoteError::Network { provider, source })?;

    response.json::<T>().await.map_err(|source| EmoteError::Shape {
        provider,
        message: source.to_string(),
    })
}

/// Apply the channel-scope failure policy: log and convert to empty
pub(crate) fn absorb_channel_failure(
    provider: ProviderKind,
    channel_id: &str,
    result: Result<Vec<Emote>>,
) -> Vec<Emote> {
    match result {
        Ok(emotes) => {
            tracing::debug!(
                provider = %provider,
                channel_id = %channel_id,
                count = emotes.len(),
                "Fetched channel emotes"
            );
            emotes
        }
        Err(e) if e.is_not_found() => {
            tracing::debug!(
                provider = %provider,
                channel_id = %channel_id,
                "Channel has no presence on provider"
            );
            Vec::new()
        }
        Err(e) => {
            tracing::warn!(
                provider = %provider,
                channel_id = %channel_id,
                error = %e,
                "Channel emote fetch failed, treating as empty"
            );
            Vec::new()
        }
    }
}
