use crate::emote::ProviderKind;
use crate::error::{EmoteError, Result};
use std::time::Duration;

/// Default cache TTL: 30 minutes
const DEFAULT_CACHE_TTL_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct EmoteSettings {
    pub twitch: TwitchConfig,
    pub seventv: SevenTvConfig,
    pub cache: CacheConfig,
    /// Providers the manager will register and fetch from
    pub enabled_providers: Vec<ProviderKind>,
    /// Load global emotes as part of `initialize()`
    pub load_global_on_init: bool,
}

/// Twitch Helix credentials. Both fields are optional: an unconfigured
/// Twitch adapter short-circuits to empty results instead of erroring.
#[derive(Debug, Clone, Default)]
pub struct TwitchConfig {
    pub client_id: Option<String>,
    pub access_token: Option<String>,
}

impl TwitchConfig {
    pub fn is_configured(&self) -> bool {
        self.client_id.is_some() && self.access_token.is_some()
    }
}

#[derive(Debug, Clone, Default)]
pub struct SevenTvConfig {
    /// Still-image codec requested when building CDN URLs
    pub image_format: ImageFormat,
}

/// Image format for 7TV CDN URLs. WEBP (lossy, broadly supported) is the
/// default; AVIF trades decode cost for smaller files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ImageFormat {
    #[default]
    Webp,
    Avif,
    Gif,
}

impl ImageFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Webp => "webp",
            ImageFormat::Avif => "avif",
            ImageFormat::Gif => "gif",
        }
    }
}

impl std::str::FromStr for ImageFormat {
    type Err = EmoteError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "webp" => Ok(ImageFormat::Webp),
            "avif" => Ok(ImageFormat::Avif),
            "gif" => Ok(ImageFormat::Gif),
            other => Err(EmoteError::Config(format!(
                "unknown image format: {other}"
            ))),
        }
    }
}

#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// How long a cached emote list stays servable
    pub ttl: Duration,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(DEFAULT_CACHE_TTL_SECS),
        }
    }
}

impl Default for EmoteSettings {
    fn default() -> Self {
        Self {
            twitch: TwitchConfig::default(),
            seventv: SevenTvConfig::default(),
            cache: CacheConfig::default(),
            enabled_providers: ProviderKind::all().to_vec(),
            load_global_on_init: true,
        }
    }
}

pub fn load_settings() -> Result<EmoteSettings> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let twitch = TwitchConfig {
        client_id: std::env::var("TWITCH_CLIENT_ID").ok(),
        access_token: std::env::var("TWITCH_ACCESS_TOKEN").ok(),
    };

    let seventv = SevenTvConfig {
        image_format: std::env::var("SEVENTV_IMAGE_FORMAT")
            .unwrap_or_else(|_| "webp".to_string())
            .parse()?,
    };

    let cache = CacheConfig {
        ttl: Duration::from_secs(
            std::env::var("EMOTE_CACHE_TTL_SECS")
                .unwrap_or_else(|_| DEFAULT_CACHE_TTL_SECS.to_string())
                .parse()
                .map_err(|_| EmoteError::Config("Invalid EMOTE_CACHE_TTL_SECS".to_string()))?,
        ),
    };

    let enabled_providers = match std::env::var("EMOTE_ENABLED_PROVIDERS") {
        Ok(list) => parse_provider_list(&list)?,
        Err(_) => ProviderKind::all().to_vec(),
    };

    let load_global_on_init = std::env::var("EMOTE_LOAD_GLOBAL_ON_INIT")
        .unwrap_or_else(|_| "true".to_string())
        .parse()
        .map_err(|_| EmoteError::Config("Invalid EMOTE_LOAD_GLOBAL_ON_INIT".to_string()))?;

    Ok(EmoteSettings {
        twitch,
        seventv,
        cache,
        enabled_providers,
        load_global_on_init,
    })
}

fn parse_provider_list(list: &str) -> Result<Vec<ProviderKind>> {
    list.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|name| match name.to_lowercase().as_str() {
            "twitch" => Ok(ProviderKind::Twitch),
            "kick" => Ok(ProviderKind::Kick),
            "bttv" => Ok(ProviderKind::Bttv),
            "ffz" => Ok(ProviderKind::Ffz),
            "7tv" | "seventv" => Ok(ProviderKind::SevenTv),
            other => Err(EmoteError::Config(format!("unknown provider: {other}"))),
        })
        .collect()
}
