//! Time-bounded emote cache and resident-channel tracking

mod lru;
mod store;

pub use lru::{ChannelTracker, MAX_RESIDENT_CHANNELS};
pub use store::{CacheStats, EmoteCacheStore, SWEEP_INTERVAL, channel_key, global_key};
