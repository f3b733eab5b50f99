/*!
 * Wait Map Statistics
 * Lock-free counters updated on the operation paths
 */

use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicU64, Ordering};

/// Point-in-time view of a map's counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WaitMapStats {
    /// Entries inserted into the map (set or unset)
    pub entries_created: u64,
    /// `set` calls that stored their value
    pub sets_won: u64,
    /// `set` calls rejected because the key was already written
    pub sets_rejected: u64,
    /// Reads that found the value already published
    pub fast_gets: u64,
    /// Reads that had to spin or park before the value arrived
    pub waited_gets: u64,
    /// Timed reads that gave up
    pub timeouts: u64,
}

/// Atomic counters backing [`WaitMapStats`]
///
/// # Performance
/// - Cache-line aligned to keep counter traffic off the map lock's line
/// - Relaxed increments, the counters order nothing
#[repr(C, align(64))]
#[derive(Debug, Default)]
pub(crate) struct AtomicWaitMapStats {
    entries_created: AtomicU64,
    sets_won: AtomicU64,
    sets_rejected: AtomicU64,
    fast_gets: AtomicU64,
    waited_gets: AtomicU64,
    timeouts: AtomicU64,
}

impl AtomicWaitMapStats {
    #[inline(always)]
    pub(crate) fn inc_entries_created(&self) {
        self.entries_created.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_sets_won(&self) {
        self.sets_won.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_sets_rejected(&self) {
        self.sets_rejected.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_fast_gets(&self) {
        self.fast_gets.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_waited_gets(&self) {
        self.waited_gets.fetch_add(1, Ordering::Relaxed);
    }

    #[inline(always)]
    pub(crate) fn inc_timeouts(&self) {
        self.timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Get snapshot of current stats
    ///
    /// # Note
    /// Counters are read independently and may be mutually inconsistent
    /// while operations are in flight.
    pub(crate) fn snapshot(&self) -> WaitMapStats {
        WaitMapStats {
            entries_created: self.entries_created.load(Ordering::Relaxed),
            sets_won: self.sets_won.load(Ordering::Relaxed),
            sets_rejected: self.sets_rejected.load(Ordering::Relaxed),
            fast_gets: self.fast_gets.load(Ordering::Relaxed),
            waited_gets: self.waited_gets.load(Ordering::Relaxed),
            timeouts: self.timeouts.load(Ordering::Relaxed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_increments() {
        let stats = AtomicWaitMapStats::default();
        stats.inc_entries_created();
        stats.inc_entries_created();
        stats.inc_sets_won();
        stats.inc_sets_rejected();
        stats.inc_fast_gets();
        stats.inc_waited_gets();
        stats.inc_timeouts();

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.entries_created, 2);
        assert_eq!(snapshot.sets_won, 1);
        assert_eq!(snapshot.sets_rejected, 1);
        assert_eq!(snapshot.fast_gets, 1);
        assert_eq!(snapshot.waited_gets, 1);
        assert_eq!(snapshot.timeouts, 1);
    }

    #[test]
    fn test_fresh_stats_are_zero() {
        let stats = AtomicWaitMapStats::default();
        assert_eq!(stats.snapshot(), WaitMapStats::default());
    }
}
