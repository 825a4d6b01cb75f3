//! Least-recently-touched tracker bounding resident channels
//!
//! A plain (unsynchronized) structure: the manager locks it together with
//! the channel emote map so the two always mutate as one unit.

use std::collections::VecDeque;

/// Maximum number of channels whose emote data may be resident at once
pub const MAX_RESIDENT_CHANNELS: usize = 5;

#[derive(Debug)]
pub struct ChannelTracker {
    /// Channel ids, least-recently-touched at the front
    order: VecDeque<String>,
    capacity: usize,
}

impl ChannelTracker {
    pub fn new(capacity: usize) -> Self {
        Self {
            order: VecDeque::with_capacity(capacity + 1),
            capacity,
        }
    }

    /// Move (or insert) the channel at the most-recent end
    pub fn touch(&mut self, channel_id: &str) {
        if let Some(pos) = self.order.iter().position(|id| id == channel_id) {
            self.order.remove(pos);
        }
        self.order.push_back(channel_id.to_string());
    }

    /// Pop least-recently-touched channels until within capacity.
    /// Returns the evicted ids, oldest first.
    pub fn evict_over_limit(&mut self) -> Vec<String> {
        let mut evicted = Vec::new();
        while self.order.len() > self.capacity {
            if let Some(oldest) = self.order.pop_front() {
                evicted.push(oldest);
            }
        }
        evicted
    }

    /// Forget a channel without evicting others
    pub fn remove(&mut self, channel_id: &str) -> bool {
        if let Some(pos) = self.order.iter().position(|id| id == channel_id) {
            self.order.remove(pos);
            true
        } else {
            false
        }
    }

    pub fn contains(&self, channel_id: &str) -> bool {
        self.order.iter().any(|id| id == channel_id)
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    pub fn clear(&mut self) {
        self.order.clear();
    }

    /// Resident channel ids, least-recently-touched first
    pub fn channels(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }
}
