use std::num::NonZeroUsize;
use std::sync::Arc;
use std::time::{Duration, Instant};

use chrono::{DateTime, Utc};
use lru::LruCache;
use parking_lot::Mutex;
use tracing::debug;

use super::clock::{Clock, SystemClock};
use crate::models::SegmentDescriptor;

#[derive(Debug, Clone)]
struct CacheEntry {
    descriptor: SegmentDescriptor,
    expires_at: Instant,
}

/// Bounded LRU cache of segment descriptors keyed by capture time, with per-entry expiry
///
/// Two files whose names encode the same second share a key; the later `put` wins.
pub struct SegmentCache {
    entries: Mutex<LruCache<DateTime<Utc>, CacheEntry>>,
    clock: Arc<dyn Clock>,
}

impl SegmentCache {
    pub fn new(capacity: NonZeroUsize) -> Self {
        Self::with_clock(capacity, Arc::new(SystemClock))
    }

    pub fn with_clock(capacity: NonZeroUsize, clock: Arc<dyn Clock>) -> Self {
        Self { entries: Mutex::new(LruCache::new(capacity)), clock }
    }

    /// Look up a live entry, marking it most recently used
    ///
    /// Expired entries are removed on the way out and reported as misses.
    pub fn get(&self, capture_time: &DateTime<Utc>) -> Option<SegmentDescriptor> {
        let now = self.clock.now();
        let mut entries = self.entries.lock();

        let expired = match entries.get(capture_time) {
            Some(entry) if now < entry.expires_at => return Some(entry.descriptor.clone()),
            Some(_) => true,
            None => false,
        };

        if expired {
            entries.pop(capture_time);
            debug!("Cache entry for {} expired", capture_time);
        }
        None
    }

    /// Insert or replace an entry; it expires `ttl` from now regardless of later reads
    pub fn put(&self, capture_time: DateTime<Utc>, descriptor: SegmentDescriptor, ttl: Duration) {
        let expires_at = self.clock.now() + ttl;
        let mut entries = self.entries.lock();

        match entries.push(capture_time, CacheEntry { descriptor, expires_at }) {
            Some((evicted, _)) if evicted != capture_time => {
                debug!("Evicted least recently used cache entry for {}", evicted);
            }
            _ => {}
        }
    }

    /// Number of stored entries, including expired ones not yet observed by `get`
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.entries.lock().cap().get()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}
