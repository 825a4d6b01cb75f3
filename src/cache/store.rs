//! Scope-keyed TTL cache for normalized emote lists
//!
//! Keys follow the `global:{provider}` / `channel:{provider}:{channel_id}`
//! scheme. Expiry is enforced twice: lazily on read (an expired entry is
//! deleted and reported as a miss) and proactively by the periodic sweep
//! the manager schedules.

use crate::emote::{Emote, ProviderKind};
use dashmap::DashMap;
use std::time::{Duration, Instant};
use tokio::sync::RwLock;

/// How often the background sweep runs
pub const SWEEP_INTERVAL: Duration = Duration::from_secs(5 * 60);

/// Cache statistics for monitoring
#[derive(Debug, Default, Clone)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub expired_reads: u64,
    pub swept_entries: u64,
}

#[derive(Debug, Clone)]
struct CacheEntry {
    emotes: Vec<Emote>,
    fetched_at: Instant,
    /// Present for channel-scoped entries, used by purge bookkeeping
    channel_id: Option<String>,
}

impl CacheEntry {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() > ttl
    }
}

/// Build the cache key for a provider's global emote list
pub fn global_key(provider: ProviderKind) -> String {
    format!("global:{provider}")
}

/// Build the cache key for a provider's emote list in one channel
pub fn channel_key(provider: ProviderKind, channel_id: &str) -> String {
    format!("channel:{provider}:{channel_id}")
}

pub struct EmoteCacheStore {
    entries: DashMap<String, CacheEntry>,
    ttl: Duration,
    stats: RwLock<CacheStats>,
}

impl EmoteCacheStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            ttl,
            stats: RwLock::new(CacheStats::default()),
        }
    }

    /// Look up a scope key. An entry past its TTL is deleted as a side
    /// effect of the read and reported as a miss.
    pub async fn get(&self, key: &str) -> Option<Vec<Emote>> {
        // The shard guard must drop before any await below
        let (hit, expired) = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(self.ttl) => (Some(entry.emotes.clone()), false),
            Some(_) => (None, true),
            None => (None, false),
        };

        if let Some(emotes) = hit {
            self.stats.write().await.hits += 1;
            tracing::trace!(key = %key, emotes = emotes.len(), "Cache hit");
            return Some(emotes);
        }

        if expired {
            self.entries.remove(key);
            self.stats.write().await.expired_reads += 1;
            tracing::debug!(key = %key, "Cache entry expired on read");
        }

        self.stats.write().await.misses += 1;
        None
    }

    /// Store a list unconditionally, stamping the current time
    pub async fn set(&self, key: &str, emotes: Vec<Emote>, channel_id: Option<String>) {
        tracing::trace!(key = %key, emotes = emotes.len(), "Cache set");
        self.entries.insert(
            key.to_string(),
            CacheEntry {
                emotes,
                fetched_at: Instant::now(),
                channel_id,
            },
        );
    }

    /// Proactively delete every expired entry, independent of reads.
    /// Returns the number of entries removed.
    pub async fn sweep(&self) -> usize {
        let ttl = self.ttl;
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(ttl));
        let removed = before - self.entries.len();

        if removed > 0 {
            self.stats.write().await.swept_entries += removed as u64;
            tracing::info!(
                removed = removed,
                remaining = self.entries.len(),
                "Swept expired cache entries"
            );
        }

        removed
    }

    /// Drop every entry bookkept for a channel (used on eviction and
    /// explicit clears). Returns the number of entries removed.
    pub fn purge_channel(&self, channel_id: &str) -> usize {
        let before = self.entries.len();
        self.entries
            .retain(|_, entry| entry.channel_id.as_deref() != Some(channel_id));
        let removed = before - self.entries.len();
        if removed > 0 {
            tracing::debug!(
                channel_id = %channel_id,
                removed = removed,
                "Purged channel cache entries"
            );
        }
        removed
    }

    /// Drop everything
    pub fn clear(&self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Get cache statistics
    pub async fn stats(&self) -> CacheStats {
        self.stats.read().await.clone()
    }
}
