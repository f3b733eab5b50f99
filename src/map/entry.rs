/*!
 * Write-Once Entry
 *
 * Per-key record: an atomic state cell, a value slot and a
 * mutex/condvar pair for parked readers.
 *
 * # State Machine
 *
 * `UNSET -> CLAIMED -> SET`, or born `SET` when the first writer creates it.
 * CLAIMED is held only between a winning claim and the publish, and reads
 * as "not set" to everyone.
 *
 * # Publication
 *
 * The value slot is written before the Release store of SET. Readers
 * Acquire-load SET before touching the slot. The store and the broadcast
 * happen under the entry mutex, so a reader that saw UNSET under that
 * mutex is already parked when the broadcast fires.
 */

use parking_lot::{Condvar, Mutex};
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::{Arc, OnceLock};
use std::time::Instant;

const UNSET: u8 = 0;
const CLAIMED: u8 = 1;
const SET: u8 = 2;

/// A single key's write-once cell with its wait/wake mechanism
pub(crate) struct Entry<V> {
    state: AtomicU8,
    value: OnceLock<Arc<V>>,
    lock: Mutex<()>,
    ready: Condvar,
}

impl<V> Entry<V> {
    /// Entry created by a reader that arrived before any writer
    pub(crate) fn unset() -> Self {
        Self {
            state: AtomicU8::new(UNSET),
            value: OnceLock::new(),
            lock: Mutex::new(()),
            ready: Condvar::new(),
        }
    }

    /// Entry created directly by the first writer
    pub(crate) fn ready(value: Arc<V>) -> Self {
        Self {
            state: AtomicU8::new(SET),
            value: OnceLock::from(value),
            lock: Mutex::new(()),
            ready: Condvar::new(),
        }
    }

    #[inline]
    pub(crate) fn is_set(&self) -> bool {
        self.state.load(Ordering::Acquire) == SET
    }

    /// The stored value, if published
    #[inline]
    pub(crate) fn value(&self) -> Option<Arc<V>> {
        if self.is_set() {
            self.value.get().cloned()
        } else {
            None
        }
    }

    /// Try to become the sole writer of this entry
    ///
    /// Succeeds for exactly one caller over the entry's lifetime, and never
    /// for an entry born set.
    #[inline]
    pub(crate) fn claim(&self) -> bool {
        self.state
            .compare_exchange(UNSET, CLAIMED, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Store the value and wake every parked reader
    ///
    /// Must only be called by the caller whose `claim` succeeded.
    /// Returns the number of readers woken.
    pub(crate) fn publish(&self, value: Arc<V>) -> usize {
        debug_assert_eq!(self.state.load(Ordering::Relaxed), CLAIMED);
        let stored = self.value.set(value).is_ok();
        debug_assert!(stored, "entry value written twice");

        let _guard = self.lock.lock();
        self.state.store(SET, Ordering::Release);
        self.ready.notify_all()
    }

    /// Block until the entry is set
    pub(crate) fn wait(&self) -> Arc<V> {
        let mut guard = self.lock.lock();
        loop {
            if let Some(value) = self.value() {
                return value;
            }
            self.ready.wait(&mut guard);
        }
    }

    /// Block until the entry is set or `deadline` passes
    pub(crate) fn wait_until(&self, deadline: Instant) -> Option<Arc<V>> {
        let mut guard = self.lock.lock();
        loop {
            if let Some(value) = self.value() {
                return Some(value);
            }
            if self.ready.wait_until(&mut guard, deadline).timed_out() {
                return self.value();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::thread;
    use std::time::Duration;

    #[test]
    fn test_unset_entry_has_no_value() {
        let entry = Entry::<u32>::unset();
        assert!(!entry.is_set());
        assert!(entry.value().is_none());
    }

    #[test]
    fn test_ready_entry_cannot_be_claimed() {
        let entry = Entry::ready(Arc::new(7u32));
        assert!(entry.is_set());
        assert!(!entry.claim());
        assert_eq!(*entry.value().unwrap(), 7);
    }

    #[test]
    fn test_claim_succeeds_once() {
        let entry = Entry::<u32>::unset();
        assert!(entry.claim());
        assert!(!entry.claim());
    }

    #[test]
    fn test_claimed_entry_reads_as_unset() {
        let entry = Entry::<u32>::unset();
        assert!(entry.claim());
        assert!(!entry.is_set());
        assert!(entry.value().is_none());

        entry.publish(Arc::new(3));
        assert!(entry.is_set());
        assert_eq!(*entry.value().unwrap(), 3);
    }

    #[test]
    fn test_publish_wakes_parked_readers() {
        let entry = Arc::new(Entry::<String>::unset());

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let entry = entry.clone();
                thread::spawn(move || entry.wait())
            })
            .collect();

        // Give readers time to park
        thread::sleep(Duration::from_millis(50));

        assert!(entry.claim());
        entry.publish(Arc::new("done".to_string()));

        for handle in handles {
            assert_eq!(handle.join().unwrap().as_str(), "done");
        }
    }

    #[test]
    fn test_wait_returns_immediately_when_set() {
        let entry = Entry::ready(Arc::new(1u8));
        assert_eq!(*entry.wait(), 1);
    }

    #[test]
    fn test_wait_until_times_out() {
        let entry = Entry::<u8>::unset();
        let start = Instant::now();
        let result = entry.wait_until(start + Duration::from_millis(30));

        assert!(result.is_none());
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_wait_until_sees_publish() {
        let entry = Arc::new(Entry::<u8>::unset());
        let entry_clone = entry.clone();

        let handle = thread::spawn(move || {
            entry_clone.wait_until(Instant::now() + Duration::from_secs(5))
        });

        thread::sleep(Duration::from_millis(20));
        assert!(entry.claim());
        entry.publish(Arc::new(9));

        assert_eq!(handle.join().unwrap().as_deref(), Some(&9));
    }
}
