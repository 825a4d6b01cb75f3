//! Emote manager: provider registry, fetch fan-out, cache population,
//! channel residency and the read-side lookup operations
//!
//! The manager owns all shared state. The cache store is internally
//! concurrent; the channel emote map and the LRU order live behind one
//! lock because they must always mutate together.

use crate::cache::{
    ChannelTracker, EmoteCacheStore, MAX_RESIDENT_CHANNELS, SWEEP_INTERVAL, channel_key,
    global_key,
};
use crate::config::EmoteSettings;
use crate::emote::{
    self, Emote, EmoteSize, MessageToken, Platform, ProviderKind,
};
use crate::events::{EmoteEvent, EventBus};
use crate::logging::Timer;
use crate::providers::{
    BttvProvider, EmoteProvider, FfzProvider, KickProvider, SevenTvProvider, TwitchProvider,
};
use futures::future::join_all;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::{RwLock, broadcast};
use tokio::task::JoinHandle;

const DEFAULT_SEARCH_LIMIT: usize = 25;

/// Channel emote map and LRU order, locked as one unit: a channel is in
/// `sets` iff it is in `lru`.
struct ChannelResidency {
    sets: HashMap<String, HashMap<ProviderKind, Vec<Emote>>>,
    lru: ChannelTracker,
}

/// Aggregated counters for introspection
#[derive(Debug, Default, Clone)]
pub struct ManagerStats {
    pub providers_registered: usize,
    pub providers_enabled: usize,
    pub global_emotes: usize,
    pub resident_channels: usize,
    pub channel_emotes: usize,
    pub cache_entries: usize,
    pub cache: crate::cache::CacheStats,
}

/// Estimated resident footprint of all normalized emotes
#[derive(Debug, Default, Clone)]
pub struct MemoryUsage {
    pub total_emotes: usize,
    pub estimated_bytes: usize,
}

pub struct EmoteManager {
    settings: Arc<EmoteSettings>,
    /// Registration order doubles as lookup priority
    providers: RwLock<Vec<Arc<dyn EmoteProvider>>>,
    enabled: RwLock<HashSet<ProviderKind>>,
    global: RwLock<HashMap<ProviderKind, Vec<Emote>>>,
    residency: RwLock<ChannelResidency>,
    cache: Arc<EmoteCacheStore>,
    events: EventBus,
    ready: AtomicBool,
    sweep_task: Mutex<Option<JoinHandle<()>>>,
}

impl EmoteManager {
    /// Create a manager with no providers registered
    pub fn new(settings: Arc<EmoteSettings>) -> Self {
        Self {
            cache: Arc::new(EmoteCacheStore::new(settings.cache.ttl)),
            providers: RwLock::new(Vec::new()),
            enabled: RwLock::new(HashSet::new()),
            global: RwLock::new(HashMap::new()),
            residency: RwLock::new(ChannelResidency {
                sets: HashMap::new(),
                lru: ChannelTracker::new(MAX_RESIDENT_CHANNELS),
            }),
            events: EventBus::new(),
            ready: AtomicBool::new(false),
            sweep_task: Mutex::new(None),
            settings,
        }
    }

    /// Create a manager with all five stock adapters registered in
    /// default priority order
    pub async fn with_default_providers(settings: Arc<EmoteSettings>) -> Self {
        let manager = Self::new(settings.clone());
        let stock: [Arc<dyn EmoteProvider>; 5] = [
            Arc::new(TwitchProvider::new(settings.twitch.clone())),
            Arc::new(KickProvider::new()),
            Arc::new(BttvProvider::new()),
            Arc::new(FfzProvider::new()),
            Arc::new(SevenTvProvider::new(settings.seventv.clone())),
        ];
        for provider in stock {
            manager.register_provider(provider).await;
        }
        manager
    }

    /// Register an adapter. Order of registration is the lookup priority
    /// for name resolution; re-registering a provider kind replaces the
    /// adapter but keeps its priority slot.
    pub async fn register_provider(&self, provider: Arc<dyn EmoteProvider>) {
        let kind = provider.kind();
        // Lock order is providers then enabled, never both held at once
        // across an await on the other
        {
            let mut providers = self.providers.write().await;
            if let Some(slot) = providers.iter_mut().find(|p| p.kind() == kind) {
                *slot = provider;
                tracing::debug!(provider = %kind, "Replaced registered provider");
            } else {
                providers.push(provider);
                tracing::info!(provider = %kind, priority = providers.len(), "Registered provider");
            }
        }

        if self.settings.enabled_providers.contains(&kind) {
            self.enabled.write().await.insert(kind);
        }
    }

    /// Start the periodic cache sweep and (unless configured off) perform
    /// the initial global load, then enter the ready state.
    pub async fn initialize(&self) {
        self.spawn_sweep_task();

        if self.settings.load_global_on_init {
            self.load_global_emotes().await;
        }

        self.ready.store(true, Ordering::SeqCst);
        self.events.emit(EmoteEvent::Ready);
        tracing::info!("Emote manager ready");
    }

    pub fn is_ready(&self) -> bool {
        self.ready.load(Ordering::SeqCst)
    }

    /// Subscribe to lifecycle events
    pub fn subscribe(&self) -> broadcast::Receiver<EmoteEvent> {
        self.events.subscribe()
    }

    fn spawn_sweep_task(&self) {
        let cache = self.cache.clone();
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(SWEEP_INTERVAL);
            // The first tick fires immediately; skip it
            interval.tick().await;
            loop {
                interval.tick().await;
                cache.sweep().await;
            }
        });

        if let Ok(mut slot) = self.sweep_task.lock() {
            if let Some(old) = slot.replace(handle) {
                old.abort();
            }
        }
    }

    /// Enabled providers, in registration order, optionally restricted to
    /// those valid for a platform
    async fn selected_providers(&self, platform: Option<Platform>) -> Vec<Arc<dyn EmoteProvider>> {
        // Same providers-then-enabled order as everywhere else
        let providers = self.providers.read().await;
        let enabled = self.enabled.read().await;
        providers
            .iter()
            .filter(|p| enabled.contains(&p.kind()))
            .filter(|p| platform.is_none_or(|plat| p.kind().supports(plat)))
            .cloned()
            .collect()
    }

    /// Registered provider kinds in priority order
    async fn provider_order(&self) -> Vec<ProviderKind> {
        self.providers.read().await.iter().map(|p| p.kind()).collect()
    }

    /// Fan out to every enabled provider and populate the global mapping
    /// and cache. Always completes: a failing provider is logged and
    /// reported through the `Error` event, it never blocks the others.
    pub async fn load_global_emotes(&self) {
        let _timer = Timer::new("load_global_emotes");
        let providers = self.selected_providers(None).await;
        tracing::info!(providers = providers.len(), "Loading global emotes");

        let fetches = providers.into_iter().map(|provider| async move {
            let kind = provider.kind();
            (kind, provider.fetch_global_emotes().await)
        });

        for (kind, result) in join_all(fetches).await {
            match result {
                Ok(emotes) => {
                    tracing::info!(provider = %kind, count = emotes.len(), "Global emotes loaded");
                    self.cache
                        .set(&global_key(kind), emotes.clone(), None)
                        .await;
                    self.global.write().await.insert(kind, emotes);
                    self.events.emit(EmoteEvent::EmotesFetched {
                        provider: kind,
                        is_global: true,
                        channel_id: None,
                    });
                }
                Err(e) => {
                    tracing::warn!(provider = %kind, error = %e, "Global emote fetch failed");
                    self.events.emit(EmoteEvent::Error {
                        provider: kind,
                        message: e.to_string(),
                    });
                }
            }
        }
    }

    /// Load a channel's emotes from every provider valid for its platform.
    ///
    /// Touches the LRU tracker first and evicts the oldest resident channel
    /// before fetching when over capacity. Per-provider results come from
    /// cache when fresh, otherwise from the network (populating the cache).
    /// Channel fetches cannot fail, so the join records a slot for every
    /// selected provider.
    pub async fn load_channel_emotes(
        &self,
        channel_id: &str,
        channel_name: Option<&str>,
        platform: Platform,
    ) {
        let _timer = Timer::new("load_channel_emotes");

        // Touch + evict under one lock so residency and LRU stay one unit
        {
            let mut residency = self.residency.write().await;
            residency.lru.touch(channel_id);
            residency.sets.entry(channel_id.to_string()).or_default();
            for evicted in residency.lru.evict_over_limit() {
                residency.sets.remove(&evicted);
                self.cache.purge_channel(&evicted);
                tracing::info!(channel_id = %evicted, "Evicted least-recently-used channel");
            }
        }

        let providers = self.selected_providers(Some(platform)).await;
        tracing::debug!(
            channel_id = %channel_id,
            providers = providers.len(),
            "Loading channel emotes"
        );

        let fetches = providers.into_iter().map(|provider| {
            let cache = self.cache.clone();
            let channel_id = channel_id.to_string();
            let channel_name = channel_name.map(|s| s.to_string());
            async move {
                let kind = provider.kind();
                let key = channel_key(kind, &channel_id);
                if let Some(cached) = cache.get(&key).await {
                    return (kind, cached, true);
                }
                let emotes = provider
                    .fetch_channel_emotes(&channel_id, channel_name.as_deref(), platform)
                    .await;
                cache
                    .set(&key, emotes.clone(), Some(channel_id.clone()))
                    .await;
                (kind, emotes, false)
            }
        });
        let results = join_all(fetches).await;

        let mut residency = self.residency.write().await;
        if !residency.lru.contains(channel_id) {
            // Evicted while the fetches were in flight; dropping the
            // results keeps the residency/LRU invariant intact
            tracing::debug!(
                channel_id = %channel_id,
                "Channel evicted during load, discarding results"
            );
            return;
        }
        let slots = residency.sets.entry(channel_id.to_string()).or_default();
        for (kind, emotes, from_cache) in results {
            slots.insert(kind, emotes);
            if !from_cache {
                self.events.emit(EmoteEvent::EmotesFetched {
                    provider: kind,
                    is_global: false,
                    channel_id: Some(channel_id.to_string()),
                });
            }
        }
    }

    /// Drop a channel's emotes, its LRU slot and its cache entries
    pub async fn clear_channel_emotes(&self, channel_id: &str) {
        let mut residency = self.residency.write().await;
        residency.sets.remove(channel_id);
        residency.lru.remove(channel_id);
        self.cache.purge_channel(channel_id);
        tracing::debug!(channel_id = %channel_id, "Cleared channel emotes");
    }

    /// Exact-name lookup. Channel-scoped matches take priority over global
    /// ones; within a scope, providers are searched in registration order.
    pub async fn get_emote(&self, name: &str, channel_id: Option<&str>) -> Option<Emote> {
        let order = self.provider_order().await;

        if let Some(cid) = channel_id {
            let residency = self.residency.read().await;
            if let Some(slots) = residency.sets.get(cid) {
                for kind in &order {
                    if let Some(found) = slots
                        .get(kind)
                        .and_then(|list| list.iter().find(|e| e.name == name))
                    {
                        return Some(found.clone());
                    }
                }
            }
        }

        let global = self.global.read().await;
        for kind in &order {
            if let Some(found) = global
                .get(kind)
                .and_then(|list| list.iter().find(|e| e.name == name))
            {
                return Some(found.clone());
            }
        }
        None
    }

    /// Every emote currently visible in the given scope: all global emotes
    /// plus, when a channel is given, that channel's emotes
    pub async fn get_all_emotes(&self, channel_id: Option<&str>) -> Vec<Emote> {
        let order = self.provider_order().await;
        let mut all = Vec::new();

        {
            let global = self.global.read().await;
            for kind in &order {
                if let Some(list) = global.get(kind) {
                    all.extend(list.iter().cloned());
                }
            }
        }

        if let Some(cid) = channel_id {
            let residency = self.residency.read().await;
            if let Some(slots) = residency.sets.get(cid) {
                for kind in &order {
                    if let Some(list) = slots.get(kind) {
                        all.extend(list.iter().cloned());
                    }
                }
            }
        }

        all
    }

    /// Visible emotes grouped per provider, in registration order. Each
    /// provider's list merges its global emotes with the channel's, when a
    /// channel is given and resident.
    pub async fn get_emotes_by_provider(
        &self,
        channel_id: Option<&str>,
    ) -> Vec<(ProviderKind, Vec<Emote>)> {
        let order = self.provider_order().await;
        let global = self.global.read().await;
        let residency = self.residency.read().await;
        let slots = channel_id.and_then(|cid| residency.sets.get(cid));

        order
            .into_iter()
            .map(|kind| {
                let mut list: Vec<Emote> =
                    global.get(&kind).map(|l| l.to_vec()).unwrap_or_default();
                if let Some(channel) = slots.and_then(|s| s.get(&kind)) {
                    list.extend(channel.iter().cloned());
                }
                (kind, list)
            })
            .collect()
    }

    /// Fuzzy search over the visible scope. Case-insensitive substring
    /// filter, scored exact > prefix > substring, alphabetical tie-break.
    pub async fn search_emotes(
        &self,
        query: &str,
        channel_id: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<Emote> {
        let candidates = self.get_all_emotes(channel_id).await;
        emote::search(candidates, query, limit.unwrap_or(DEFAULT_SEARCH_LIMIT))
    }

    /// Split a message into text and emote tokens. Whitespace runs are
    /// preserved as their own text tokens; emote resolution is
    /// exact-match-only.
    pub async fn parse_emotes(&self, text: &str, channel_id: Option<&str>) -> Vec<MessageToken> {
        let mut tokens = Vec::new();
        for segment in emote::split_preserving_whitespace(text) {
            if segment.chars().all(char::is_whitespace) {
                tokens.push(MessageToken::Text(segment.to_string()));
                continue;
            }
            match self.get_emote(segment.trim(), channel_id).await {
                Some(found) => tokens.push(MessageToken::Emote(found)),
                None => tokens.push(MessageToken::Text(segment.to_string())),
            }
        }
        tokens
    }

    /// Map an emote to the URL for a requested size (4x falls back to 2x)
    pub fn get_emote_url(&self, emote: &Emote, size: EmoteSize) -> String {
        emote.url_for_size(size).to_string()
    }

    pub async fn is_provider_enabled(&self, provider: ProviderKind) -> bool {
        self.enabled.read().await.contains(&provider)
    }

    /// Toggle a provider. Disabled providers are skipped by both load
    /// operations; already-loaded emotes stay visible until cleared.
    pub async fn set_provider_enabled(&self, provider: ProviderKind, enabled: bool) {
        let mut set = self.enabled.write().await;
        if enabled {
            set.insert(provider);
        } else {
            set.remove(&provider);
        }
        tracing::info!(provider = %provider, enabled = enabled, "Provider toggled");
    }

    /// Aggregated counters for monitoring
    pub async fn get_stats(&self) -> ManagerStats {
        let global = self.global.read().await;
        let residency = self.residency.read().await;
        ManagerStats {
            providers_registered: self.providers.read().await.len(),
            providers_enabled: self.enabled.read().await.len(),
            global_emotes: global.values().map(Vec::len).sum(),
            resident_channels: residency.sets.len(),
            channel_emotes: residency
                .sets
                .values()
                .flat_map(|slots| slots.values())
                .map(Vec::len)
                .sum(),
            cache_entries: self.cache.len(),
            cache: self.cache.stats().await,
        }
    }

    /// Estimate the resident footprint of all loaded emotes
    pub async fn get_memory_usage(&self) -> MemoryUsage {
        let global = self.global.read().await;
        let residency = self.residency.read().await;

        let mut usage = MemoryUsage::default();
        for emote in global
            .values()
            .flatten()
            .chain(residency.sets.values().flat_map(|slots| slots.values().flatten()))
        {
            usage.total_emotes += 1;
            usage.estimated_bytes += emote.estimated_bytes();
        }
        usage
    }

    /// Drop all emote data: global mapping, every resident channel and the
    /// whole cache. Registered providers and the ready state survive.
    pub async fn clear_all(&self) {
        self.global.write().await.clear();
        {
            let mut residency = self.residency.write().await;
            residency.sets.clear();
            residency.lru.clear();
        }
        self.cache.clear();
        tracing::info!("Cleared all emote state");
    }
}

impl Drop for EmoteManager {
    fn drop(&mut self) {
        if let Ok(mut slot) = self.sweep_task.lock() {
            if let Some(handle) = slot.take() {
                handle.abort();
            }
        }
    }
}
