/*!
 * Wait Map
 *
 * Concurrent write-once map whose reads block until the key is written.
 *
 * # Locking
 *
 * Two levels:
 * - **Map lock**: a single mutex over the key -> entry table, held only
 *   for lookup/insert and never across a wait
 * - **Entry lock**: a mutex/condvar pair per key, so readers parked on
 *   one key never contend with writers of another
 *
 * Entries are built completely before they are inserted, so no thread can
 * observe a half-constructed entry through the table.
 *
 * # Write Paths
 *
 * The first `set` of a brand-new key inserts the entry already set under the
 * map lock. A `set` that finds an existing entry drops the map lock and races
 * for the entry's atomic claim; the single winner publishes and broadcasts.
 */

use super::entry::Entry;
use super::stats::{AtomicWaitMapStats, WaitMapStats};
use crate::core::errors::{WaitError, WaitResult};
use crate::core::sync::{SpinWait, WaitMapConfig};
use ahash::RandomState;
use parking_lot::Mutex;
use std::borrow::Borrow;
use std::collections::hash_map::{self, HashMap};
use std::fmt;
use std::hash::Hash;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Concurrent map with blocking reads and write-once values
///
/// # Examples
///
/// ```
/// use waitmap::WaitMap;
/// use std::sync::Arc;
/// use std::thread;
///
/// let map = Arc::new(WaitMap::<&str, u32>::new());
///
/// let reader = {
///     let map = map.clone();
///     thread::spawn(move || *map.get("answer"))
/// };
///
/// assert!(map.set("answer", 42));
/// assert!(!map.set("answer", 0));
/// assert_eq!(reader.join().unwrap(), 42);
/// ```
pub struct WaitMap<K, V> {
    entries: Mutex<HashMap<K, Arc<Entry<V>>, RandomState>>,
    config: WaitMapConfig,
    stats: AtomicWaitMapStats,
}

impl<K, V> WaitMap<K, V>
where
    K: Eq + Hash,
{
    /// Create an empty map with the default configuration
    pub fn new() -> Self {
        Self::with_config(WaitMapConfig::default())
    }

    /// Create an empty map with room for `capacity` keys
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(WaitMapConfig::with_capacity(capacity))
    }

    pub fn with_config(config: WaitMapConfig) -> Self {
        let entries =
            HashMap::with_capacity_and_hasher(config.initial_capacity, RandomState::new());
        Self {
            entries: Mutex::new(entries),
            config,
            stats: AtomicWaitMapStats::default(),
        }
    }

    /// Get the value for `key`, blocking until some thread sets it
    ///
    /// Creates an unset entry if the key has never been seen. Never fails and
    /// never times out.
    pub fn get(&self, key: K) -> Arc<V> {
        let entry = self.entry_for(key);

        if let Some(value) = entry.value() {
            self.stats.inc_fast_gets();
            return value;
        }

        self.stats.inc_waited_gets();
        if let Some(value) = self.spin(&entry) {
            return value;
        }

        trace!("parking reader on unset entry");
        entry.wait()
    }

    /// Like [`get`](Self::get), but give up once `timeout` has elapsed
    ///
    /// The key is registered even when the wait times out.
    pub fn get_timeout(&self, key: K, timeout: Duration) -> WaitResult<Arc<V>> {
        let Some(deadline) = Instant::now().checked_add(timeout) else {
            return Ok(self.get(key));
        };

        let entry = self.entry_for(key);

        if let Some(value) = entry.value() {
            self.stats.inc_fast_gets();
            return Ok(value);
        }

        self.stats.inc_waited_gets();
        if let Some(value) = self.spin(&entry) {
            return Ok(value);
        }

        trace!(?timeout, "parking reader on unset entry with deadline");
        entry.wait_until(deadline).ok_or_else(|| {
            self.stats.inc_timeouts();
            debug!(?timeout, "wait for key timed out");
            WaitError::Timeout(timeout)
        })
    }

    /// Get the value for `key` if it is already set, without blocking
    ///
    /// Never creates an entry.
    pub fn try_get<Q>(&self, key: &Q) -> Option<Arc<V>>
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let entry = self.entries.lock().get(key).cloned()?;
        entry.value()
    }

    /// Set `key` to `value` if it has never been set
    ///
    /// Returns `true` if this call stored its value and woke the readers of
    /// `key`. Returns `false`, dropping `value`, if the key was already
    /// written. Exactly one call per key ever returns `true`.
    pub fn set(&self, key: K, value: V) -> bool {
        let entry = {
            let mut entries = self.entries.lock();
            match entries.entry(key) {
                hash_map::Entry::Vacant(slot) => {
                    slot.insert(Arc::new(Entry::ready(Arc::new(value))));
                    self.stats.inc_entries_created();
                    self.stats.inc_sets_won();
                    return true;
                }
                hash_map::Entry::Occupied(slot) => Arc::clone(slot.get()),
            }
        };

        if !entry.claim() {
            self.stats.inc_sets_rejected();
            debug!("rejected write to key that is already set");
            return false;
        }

        let woken = entry.publish(Arc::new(value));
        self.stats.inc_sets_won();
        trace!(woken, "published value to waiting readers");
        true
    }

    /// Whether `key` currently holds a value
    ///
    /// Never creates an entry and never blocks. The answer may be stale as
    /// soon as it is returned.
    pub fn check<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.entries
            .lock()
            .get(key)
            .is_some_and(|entry| entry.is_set())
    }

    /// Number of keys known to the map, set or still awaited
    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn config(&self) -> &WaitMapConfig {
        &self.config
    }

    /// Snapshot of the operation counters
    pub fn stats(&self) -> WaitMapStats {
        self.stats.snapshot()
    }

    /// Look up or lazily create the entry for `key`
    ///
    /// Only the table lookup happens under the map lock; the returned handle
    /// outlives it.
    fn entry_for(&self, key: K) -> Arc<Entry<V>> {
        let mut entries = self.entries.lock();
        match entries.entry(key) {
            hash_map::Entry::Occupied(slot) => Arc::clone(slot.get()),
            hash_map::Entry::Vacant(slot) => {
                self.stats.inc_entries_created();
                trace!("created unset entry");
                Arc::clone(slot.insert(Arc::new(Entry::unset())))
            }
        }
    }

    /// Spin on the entry if the configuration asks for it
    fn spin(&self, entry: &Entry<V>) -> Option<Arc<V>> {
        if !self.config.spins() {
            return None;
        }
        let spinner = SpinWait::new(self.config.spin_duration, self.config.max_spins);
        if spinner.spin_until(|| entry.is_set()) {
            entry.value()
        } else {
            None
        }
    }
}

impl<K, V> Default for WaitMap<K, V>
where
    K: Eq + Hash,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> fmt::Debug for WaitMap<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WaitMap")
            .field("entries", &self.entries.lock().len())
            .field("strategy", &self.config.strategy)
            .finish()
    }
}
