//! Time-based memoization of expensive pipeline artifacts
//!
//! Replaces implicit memoization decorators with an explicit mapping from
//! a request key to a value and its expiry. Entries live for a fixed TTL
//! (an hour by default); `clear` exists for tests and manual invalidation.
//!
//! Concurrency: each key owns its own slot mutex, so two threads asking
//! for the same key serialize and the second one sees the first's result
//! (single-flight). Distinct keys never block each other beyond the brief
//! map lock, and a failed computation leaves its slot empty rather than
//! caching the error.

use std::collections::HashMap;
use std::hash::Hash;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};
use tracing::debug;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(3600);

struct Slot<V> {
    value: Option<(V, Instant)>,
}

impl<V> Default for Slot<V> {
    fn default() -> Self {
        Self { value: None }
    }
}

/// A TTL cache with per-key single-flight computation.
pub struct TtlCache<K, V> {
    ttl: Duration,
    slots: Mutex<HashMap<K, Arc<Mutex<Slot<V>>>>>,
}

impl<K: Eq + Hash + Clone, V: Clone> TtlCache<K, V> {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            slots: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_default_ttl() -> Self {
        Self::new(DEFAULT_TTL)
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Return the cached value for `key`, or compute it with `f`.
    ///
    /// The computation runs under the key's slot lock, so concurrent
    /// requests for one key serialize instead of duplicating work.
    /// Errors are propagated and not cached.
    pub fn get_or_try_insert_with<E>(
        &self,
        key: K,
        f: impl FnOnce() -> std::result::Result<V, E>,
    ) -> std::result::Result<V, E> {
        let slot = {
            let mut slots = lock_unpoisoned(&self.slots);
            slots.entry(key).or_default().clone()
        };

        let mut guard = lock_unpoisoned(&slot);
        if let Some((value, stored_at)) = &guard.value {
            if stored_at.elapsed() < self.ttl {
                debug!("cache hit");
                return Ok(value.clone());
            }
            debug!("cache entry expired");
        }

        let value = f()?;
        guard.value = Some((value.clone(), Instant::now()));
        Ok(value)
    }

    /// Peek without computing; expired entries read as absent.
    pub fn get(&self, key: &K) -> Option<V> {
        let slot = lock_unpoisoned(&self.slots).get(key).cloned()?;
        let guard = lock_unpoisoned(&slot);
        match &guard.value {
            Some((value, stored_at)) if stored_at.elapsed() < self.ttl => Some(value.clone()),
            _ => None,
        }
    }

    /// Drop every entry.
    pub fn clear(&self) {
        lock_unpoisoned(&self.slots).clear();
    }

    /// Drop entries past their TTL; live ones stay.
    pub fn purge_expired(&self) {
        let mut slots = lock_unpoisoned(&self.slots);
        slots.retain(|_, slot| {
            let guard = lock_unpoisoned(slot);
            matches!(&guard.value, Some((_, at)) if at.elapsed() < self.ttl)
        });
    }

    /// Number of keys currently held, live or expired.
    pub fn len(&self) -> usize {
        lock_unpoisoned(&self.slots).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A panic while holding a slot lock poisons only that slot; recover the
/// guard so one bad request cannot wedge the cache for everyone else.
fn lock_unpoisoned<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn second_lookup_reuses_first_computation() {
        let cache: TtlCache<String, u64> = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        let compute = || -> Result<u64, std::convert::Infallible> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(42)
        };

        assert_eq!(cache.get_or_try_insert_with("k".to_string(), compute).unwrap(), 42);
        let compute_again = || -> Result<u64, std::convert::Infallible> {
            calls.fetch_add(1, Ordering::SeqCst);
            Ok(99)
        };
        assert_eq!(
            cache
                .get_or_try_insert_with("k".to_string(), compute_again)
                .unwrap(),
            42
        );
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn concurrent_requests_for_one_key_serialize() {
        use std::convert::Infallible;
        use std::sync::atomic::AtomicBool;

        let cache: TtlCache<&str, u64> = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);
        let in_flight = AtomicBool::new(false);

        std::thread::scope(|s| {
            let first = s.spawn(|| {
                cache.get_or_try_insert_with("k", || -> Result<u64, Infallible> {
                    calls.fetch_add(1, Ordering::SeqCst);
                    in_flight.store(true, Ordering::SeqCst);
                    std::thread::sleep(Duration::from_millis(50));
                    Ok(1)
                })
            });

            // Wait until the first computation holds the slot lock, then
            // ask for the same key; this call must block and come back
            // with the first caller's value.
            while !in_flight.load(Ordering::SeqCst) {
                std::thread::yield_now();
            }
            let second = cache.get_or_try_insert_with("k", || -> Result<u64, Infallible> {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok(2)
            });

            assert_eq!(first.join().unwrap().unwrap(), 1);
            assert_eq!(second.unwrap(), 1);
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn errors_are_not_cached() {
        let cache: TtlCache<&str, u64> = TtlCache::new(Duration::from_secs(60));

        let failed: Result<u64, String> =
            cache.get_or_try_insert_with("k", || Err("boom".to_string()));
        assert!(failed.is_err());

        let ok: Result<u64, String> = cache.get_or_try_insert_with("k", || Ok(7));
        assert_eq!(ok.unwrap(), 7);
    }

    #[test]
    fn expired_entries_are_recomputed() {
        let cache: TtlCache<&str, u64> = TtlCache::new(Duration::from_millis(0));

        let _: Result<u64, std::convert::Infallible> =
            cache.get_or_try_insert_with("k", || Ok(1));
        let second: Result<u64, std::convert::Infallible> =
            cache.get_or_try_insert_with("k", || Ok(2));
        assert_eq!(second.unwrap(), 2);
    }

    #[test]
    fn clear_empties_the_cache() {
        let cache: TtlCache<&str, u64> = TtlCache::new(Duration::from_secs(60));
        let _: Result<u64, std::convert::Infallible> =
            cache.get_or_try_insert_with("a", || Ok(1));
        let _: Result<u64, std::convert::Infallible> =
            cache.get_or_try_insert_with("b", || Ok(2));

        assert_eq!(cache.len(), 2);
        cache.clear();
        assert!(cache.is_empty());
        assert_eq!(cache.get(&"a"), None);
    }

    #[test]
    fn purge_drops_only_expired() {
        let cache: TtlCache<&str, u64> = TtlCache::new(Duration::from_secs(60));
        let _: Result<u64, std::convert::Infallible> =
            cache.get_or_try_insert_with("live", || Ok(1));
        cache.purge_expired();
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn distinct_keys_do_not_collide() {
        let cache: TtlCache<String, String> = TtlCache::new(Duration::from_secs(60));
        let a: Result<String, std::convert::Infallible> =
            cache.get_or_try_insert_with("a".into(), || Ok("va".into()));
        let b: Result<String, std::convert::Infallible> =
            cache.get_or_try_insert_with("b".into(), || Ok("vb".into()));
        assert_eq!(a.unwrap(), "va");
        assert_eq!(b.unwrap(), "vb");
    }
}
