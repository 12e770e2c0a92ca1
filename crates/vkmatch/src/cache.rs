//! TTL-based caching for fetched backend data.
//!
//! Module details and the signed-in profile are cached per page load so
//! navigating back and forth does not re-issue identical requests. The
//! backend remains the source of truth; entries expire on their own.

use std::hash::Hash;
use std::time::{Duration, Instant};

use dashmap::DashMap;
use sha2::{Digest, Sha256};

/// A cache/logging key derived from the bearer token.
///
/// The token is hashed so it is never stored or logged in the clear.
#[derive(Debug, Clone, Hash, Eq, PartialEq)]
pub struct SessionKey(String);

impl SessionKey {
    /// Creates a session key from the raw bearer token.
    pub fn from_token(token: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(token.as_bytes());
        let result = hasher.finalize();
        // First 16 bytes as hex is plenty for keying and logging
        let hash = hex::encode(&result[..16]);
        Self(hash)
    }

    /// Returns the internal hash string.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SessionKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Only show a prefix in logs
        write!(f, "{}...", &self.0[..8.min(self.0.len())])
    }
}

/// A cached value with its expiry metadata.
#[derive(Clone)]
struct CachedEntry<V> {
    value: V,
    cached_at: Instant,
    ttl: Duration,
}

/// Thread-safe TTL cache.
///
/// Uses DashMap for concurrent access without external locking.
pub struct TtlCache<K, V> {
    entries: DashMap<K, CachedEntry<V>>,
    default_ttl: Duration,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a new cache with the specified default TTL.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: DashMap::new(),
            default_ttl,
        }
    }

    /// Creates a cache with a 5-minute default TTL.
    pub fn with_default_ttl() -> Self {
        Self::new(Duration::from_secs(5 * 60))
    }

    /// Gets a cached value if it exists and hasn't expired.
    pub fn get(&self, key: &K) -> Option<V> {
        self.entries.get(key).and_then(|entry| {
            if entry.cached_at.elapsed() < entry.ttl {
                Some(entry.value.clone())
            } else {
                drop(entry);
                self.entries.remove(key);
                None
            }
        })
    }

    /// Inserts a value with the default TTL.
    pub fn insert(&self, key: K, value: V) {
        self.insert_with_ttl(key, value, self.default_ttl);
    }

    /// Inserts a value with a custom TTL.
    pub fn insert_with_ttl(&self, key: K, value: V, ttl: Duration) {
        self.entries.insert(
            key,
            CachedEntry {
                value,
                cached_at: Instant::now(),
                ttl,
            },
        );
    }

    /// Invalidates (removes) a cached entry.
    pub fn invalidate(&self, key: &K) {
        self.entries.remove(key);
    }

    /// Clears all entries.
    pub fn clear(&self) {
        self.entries.clear();
    }

    /// Returns the number of entries (including expired ones).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Removes expired entries. Call periodically for proactive cleanup.
    pub fn cleanup_expired(&self) {
        self.entries
            .retain(|_, entry| entry.cached_at.elapsed() < entry.ttl);
    }

    /// Gets cache statistics.
    pub fn stats(&self) -> CacheStats {
        let mut total = 0;
        let mut expired = 0;

        for entry in self.entries.iter() {
            total += 1;
            if entry.cached_at.elapsed() >= entry.ttl {
                expired += 1;
            }
        }

        CacheStats {
            total_entries: total,
            expired_entries: expired,
            active_entries: total - expired,
        }
    }
}

impl<K, V> Default for TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    fn default() -> Self {
        Self::with_default_ttl()
    }
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone)]
pub struct CacheStats {
    pub total_entries: usize,
    pub expired_entries: usize,
    pub active_entries: usize,
}

/// Helper module for hex encoding (avoiding an extra dependency).
mod hex {
    pub fn encode(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn session_key_hashing_is_stable() {
        let key1 = SessionKey::from_token("token123");
        let key2 = SessionKey::from_token("token123");
        let key3 = SessionKey::from_token("token456");

        assert_eq!(key1, key2);
        assert_ne!(key1, key3);
        // Display never shows the full hash, let alone the token
        assert!(!format!("{key1}").contains("token123"));
    }

    #[test]
    fn expired_entries_are_dropped_on_get() {
        let cache: TtlCache<String, u32> = TtlCache::new(Duration::from_millis(10));
        cache.insert("a".to_string(), 1);
        assert_eq!(cache.get(&"a".to_string()), Some(1));

        std::thread::sleep(Duration::from_millis(20));
        assert_eq!(cache.get(&"a".to_string()), None);
        assert!(cache.is_empty());
    }

    #[test]
    fn stats_count_active_and_expired() {
        let cache: TtlCache<u32, u32> = TtlCache::with_default_ttl();
        cache.insert(1, 10);
        cache.insert_with_ttl(2, 20, Duration::from_millis(0));

        std::thread::sleep(Duration::from_millis(5));
        let stats = cache.stats();
        assert_eq!(stats.total_entries, 2);
        assert_eq!(stats.active_entries, 1);
        assert_eq!(stats.expired_entries, 1);

        cache.cleanup_expired();
        assert_eq!(cache.len(), 1);
    }
}
