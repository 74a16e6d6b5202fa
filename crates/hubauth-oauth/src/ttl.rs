//! Per-entry TTL map used for the access-token cache.
//!
//! Uses [`tokio::time::Instant`] so that expiry follows the runtime clock and
//! can be driven with `tokio::time::pause`/`advance` in tests.

use std::collections::HashMap;
use std::time::Duration;

use tokio::time::Instant;

#[derive(Debug, Clone)]
struct Entry<V> {
    value: V,
    expires_at: Option<Instant>,
}

impl<V> Entry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        matches!(self.expires_at, Some(at) if now >= at)
    }
}

/// Map whose entries disappear once their TTL has elapsed.
///
/// Expired entries are invisible to every read and are physically removed
/// either on the next mutable access or by [`ExpiringCache::purge_expired`].
#[derive(Debug)]
pub struct ExpiringCache<V> {
    entries: HashMap<String, Entry<V>>,
}

impl<V> Default for ExpiringCache<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> ExpiringCache<V> {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Insert or overwrite an entry. `None` means the entry never expires.
    ///
    /// A TTL too large to represent as a deadline is treated as no expiry.
    pub fn set(&mut self, key: &str, value: V, ttl: Option<Duration>) {
        let expires_at = ttl.and_then(|ttl| Instant::now().checked_add(ttl));
        self.entries
            .insert(key.to_string(), Entry { value, expires_at });
    }

    /// Read a live entry without evicting anything.
    pub fn peek(&self, key: &str) -> Option<&V> {
        let now = Instant::now();
        self.entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| &entry.value)
    }

    /// Whether a live entry exists for `key`.
    pub fn contains(&self, key: &str) -> bool {
        self.peek(key).is_some()
    }

    /// Time left before the entry for `key` expires.
    ///
    /// Returns `None` for missing/expired entries and entries without a TTL.
    pub fn remaining(&self, key: &str) -> Option<Duration> {
        let now = Instant::now();
        let entry = self.entries.get(key)?;
        if entry.is_expired(now) {
            return None;
        }
        entry.expires_at.map(|at| at.saturating_duration_since(now))
    }

    /// Remove an entry regardless of its TTL.
    pub fn remove(&mut self, key: &str) -> Option<V> {
        self.entries.remove(key).map(|entry| entry.value)
    }

    /// Remove all expired entries and return their keys.
    pub fn purge_expired(&mut self) -> Vec<String> {
        let now = Instant::now();
        let expired: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired(now))
            .map(|(key, _)| key.clone())
            .collect();
        for key in &expired {
            self.entries.remove(key);
        }
        expired
    }

    /// Number of live entries.
    pub fn len(&self) -> usize {
        let now = Instant::now();
        self.entries
            .values()
            .filter(|entry| !entry.is_expired(now))
            .count()
    }

    /// Whether there are no live entries.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<V: Clone> ExpiringCache<V> {
    /// Get a live entry, evicting it if it has expired.
    pub fn get(&mut self, key: &str) -> Option<V> {
        let now = Instant::now();
        match self.entries.get(key) {
            Some(entry) if entry.is_expired(now) => {
                self.entries.remove(key);
                None
            }
            Some(entry) => Some(entry.value.clone()),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_no_ttl_never_expires() {
        let mut cache = ExpiringCache::new();
        cache.set("session-1", "a", None);

        tokio::time::advance(Duration::from_secs(365 * 24 * 3600)).await;

        assert_eq!(cache.get("session-1"), Some("a"));
        assert_eq!(cache.remaining("session-1"), None);
        assert!(cache.purge_expired().is_empty());
    }

    #[test]
    fn test_default_is_empty() {
        let cache: ExpiringCache<String> = ExpiringCache::default();
        assert!(cache.is_empty());
        assert_eq!(cache.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unrepresentable_ttl_never_expires() {
        let mut cache = ExpiringCache::new();
        cache.set("session-1", "a", Some(Duration::MAX));
        cache.set("session-2", "b", Some(Duration::from_secs(u64::MAX)));

        tokio::time::advance(Duration::from_secs(365 * 24 * 3600)).await;

        assert_eq!(cache.get("session-1"), Some("a"));
        assert_eq!(cache.get("session-2"), Some("b"));
        assert_eq!(cache.remaining("session-1"), None);
        assert!(cache.purge_expired().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiration() {
        let mut cache = ExpiringCache::new();
        cache.set("session-1", "a", Some(Duration::from_secs(10)));

        tokio::time::advance(Duration::from_secs(9)).await;
        assert_eq!(cache.peek("session-1"), Some(&"a"));
        assert_eq!(cache.remaining("session-1"), Some(Duration::from_secs(1)));

        tokio::time::advance(Duration::from_secs(1)).await;
        assert!(!cache.contains("session-1"));
        assert_eq!(cache.get("session-1"), None);
        // The expired entry was evicted by `get`.
        assert!(cache.purge_expired().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_overwrite_resets_ttl() {
        let mut cache = ExpiringCache::new();
        cache.set("session-1", "a", Some(Duration::from_secs(10)));

        tokio::time::advance(Duration::from_secs(8)).await;
        cache.set("session-1", "b", Some(Duration::from_secs(10)));

        tokio::time::advance(Duration::from_secs(8)).await;
        assert_eq!(cache.get("session-1"), Some("b"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let mut cache = ExpiringCache::new();
        cache.set("short", 1, Some(Duration::from_secs(5)));
        cache.set("long", 2, Some(Duration::from_secs(50)));

        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.purge_expired(), vec!["short".to_string()]);
        assert_eq!(cache.get("long"), Some(2));
    }

    #[tokio::test(start_paused = true)]
    async fn test_remove() {
        let mut cache = ExpiringCache::new();
        cache.set("session-1", "a", Some(Duration::from_secs(60)));
        cache.set("session-2", "b", Some(Duration::from_secs(60)));

        assert_eq!(cache.remove("session-1"), Some("a"));
        assert_eq!(cache.len(), 1);
        assert!(!cache.contains("session-1"));
        assert!(!cache.is_empty());
    }
}
