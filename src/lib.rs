//! # Emote Hub
//!
//! Multi-provider emote resolution and caching for chat applications.
//!
//! The crate aggregates emote catalogs from Twitch, Kick, BetterTTV,
//! FrankerFaceZ and 7TV into one normalized model, caches them per scope
//! with TTL expiry and an LRU bound on resident channels, and serves
//! exact lookup, fuzzy search and message tokenization on top.
//!
//! ## Usage
//!
//! ```no_run
//! use emote_hub::{EmoteManager, Platform, load_settings};
//! use std::sync::Arc;
//!
//! # async fn run() -> emote_hub::Result<()> {
//! let settings = Arc::new(load_settings()?);
//! let manager = EmoteManager::with_default_providers(settings).await;
//! manager.initialize().await;
//!
//! manager
//!     .load_channel_emotes("141981764", Some("twitchdev"), Platform::Twitch)
//!     .await;
//!
//! let tokens = manager.parse_emotes("hello Kappa", Some("141981764")).await;
//! # let _ = tokens;
//! # Ok(())
//! # }
//! ```

pub mod cache;
pub mod config;
pub mod emote;
pub mod error;
pub mod events;
pub mod logging;
pub mod manager;
pub mod providers;

pub use config::{EmoteSettings, ImageFormat, load_settings};
pub use emote::{Emote, EmoteSize, MessageToken, Platform, ProviderKind};
pub use error::{EmoteError, Result};
pub use events::EmoteEvent;
pub use manager::EmoteManager;
pub use providers::EmoteProvider;
