mod settings;

pub use settings::{
    CacheConfig, EmoteSettings, ImageFormat, SevenTvConfig, TwitchConfig, load_settings,
};
