//! Core emote data model shared by every provider adapter

use serde::{Deserialize, Serialize};

/// The five emote-serving services we aggregate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    Twitch,
    Kick,
    Bttv,
    Ffz,
    SevenTv,
}

impl ProviderKind {
    /// Stable lowercase name, used in scope keys and logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderKind::Twitch => "twitch",
            ProviderKind::Kick => "kick",
            ProviderKind::Bttv => "bttv",
            ProviderKind::Ffz => "ffz",
            ProviderKind::SevenTv => "7tv",
        }
    }

    /// Whether this provider serves emotes for the given streaming platform.
    ///
    /// BTTV and FFZ are Twitch-only; the platform-native providers serve
    /// only their own platform; 7TV serves both.
    pub fn supports(&self, platform: Platform) -> bool {
        match self {
            ProviderKind::Twitch | ProviderKind::Bttv | ProviderKind::Ffz => {
                platform == Platform::Twitch
            }
            ProviderKind::Kick => platform == Platform::Kick,
            ProviderKind::SevenTv => true,
        }
    }

    /// All providers, in default registration order. This order is the
    /// lookup priority for name resolution.
    pub fn all() -> [ProviderKind; 5] {
        [
            ProviderKind::Twitch,
            ProviderKind::Kick,
            ProviderKind::Bttv,
            ProviderKind::Ffz,
            ProviderKind::SevenTv,
        ]
    }
}

impl std::fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Streaming platform a channel lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Twitch,
    Kick,
}

/// Requested emote image size
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EmoteSize {
    X1,
    X2,
    X4,
}

/// Image URLs for the three size variants. `x4` is optional and falls back
/// to `x2` on lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmoteUrls {
    pub x1: String,
    pub x2: String,
    pub x4: Option<String>,
}

/// Attribution for the account that uploaded the emote
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmoteOwner {
    pub id: String,
    pub username: String,
    pub display_name: String,
}

/// A single normalized emote.
///
/// Constructed exclusively inside a provider adapter's normalization step
/// and never mutated afterward. Names are unique only within one
/// (provider, scope) bucket; collisions across providers or scopes are
/// resolved by lookup priority, never merged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Emote {
    /// Provider-scoped identifier
    pub id: String,

    /// Chat trigger text (e.g. "Kappa")
    pub name: String,

    /// Which service the emote came from
    pub provider: ProviderKind,

    /// Available in every channel, not just one
    pub is_global: bool,

    /// Animated image (gif/webp/avif animation)
    pub is_animated: bool,

    /// Renders overlaid on the preceding emote, consuming no width
    pub is_zero_width: bool,

    /// Present iff the emote is channel-scoped
    pub channel_id: Option<String>,

    /// 1x/2x/4x image URLs
    pub urls: EmoteUrls,

    /// Uploader attribution, when the provider exposes it
    pub owner: Option<EmoteOwner>,
}

impl Emote {
    /// Map a requested size to the matching URL, falling back to 2x when
    /// the 4x variant is absent.
    pub fn url_for_size(&self, size: EmoteSize) -> &str {
        match size {
            EmoteSize::X1 => &self.urls.x1,
            EmoteSize::X2 => &self.urls.x2,
            EmoteSize::X4 => self.urls.x4.as_deref().unwrap_or(&self.urls.x2),
        }
    }

    /// Rough resident-memory estimate in bytes, used by usage introspection
    pub fn estimated_bytes(&self) -> usize {
        let base = std::mem::size_of::<Emote>();
        let strings = self.id.len()
            + self.name.len()
            + self.urls.x1.len()
            + self.urls.x2.len()
            + self.urls.x4.as_ref().map_or(0, |u| u.len())
            + self.channel_id.as_ref().map_or(0, |c| c.len())
            + self.owner.as_ref().map_or(0, |o| {
                o.id.len() + o.username.len() + o.display_name.len()
            });
        base + strings
    }
}

/// One segment of a parsed chat message
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MessageToken {
    /// Plain text, including whitespace runs as their own tokens
    Text(String),
    /// A resolved emote
    Emote(Emote),
}
