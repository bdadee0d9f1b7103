//! Access statistics tracking.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::common::NodeId;

use super::block_access::BlockAccess;

/// Counters for node read and write notifications.
///
/// All fields are atomic for lock-free, thread-safe updates.
/// Multiple threads can increment counters without locks.
///
/// # Memory Ordering
/// We use `Ordering::Relaxed` for all operations because:
/// - We only need atomicity (no partial updates)
/// - We don't need synchronization between different counters
/// - Statistics are "eventually consistent" - exact ordering doesn't matter
///
/// # Example
/// ```
/// use blocktree::AccessStats;
/// use std::sync::atomic::Ordering;
///
/// let stats = AccessStats::new();
/// stats.reads.fetch_add(1, Ordering::Relaxed);
/// assert_eq!(stats.reads.load(Ordering::Relaxed), 1);
/// ```
#[derive(Debug)]
pub struct AccessStats {
    /// Number of node read notifications.
    pub reads: AtomicU64,

    /// Number of node write notifications.
    pub writes: AtomicU64,
}

impl AccessStats {
    /// Create a new stats tracker with all counters at zero.
    pub fn new() -> Self {
        Self {
            reads: AtomicU64::new(0),
            writes: AtomicU64::new(0),
        }
    }

    /// Fraction of all accesses that were reads (0.0 to 1.0).
    pub fn read_ratio(&self) -> f64 {
        let reads = self.reads.load(Ordering::Relaxed);
        let writes = self.writes.load(Ordering::Relaxed);
        let total = reads + writes;

        if total == 0 {
            0.0
        } else {
            reads as f64 / total as f64
        }
    }

    /// Get a snapshot of current statistics.
    ///
    /// This returns a non-atomic copy for display/logging.
    pub fn snapshot(&self) -> StatsSnapshot {
        StatsSnapshot {
            reads: self.reads.load(Ordering::Relaxed),
            writes: self.writes.load(Ordering::Relaxed),
        }
    }

    /// Reset all counters to zero.
    pub fn reset(&self) {
        self.reads.store(0, Ordering::Relaxed);
        self.writes.store(0, Ordering::Relaxed);
    }
}

impl Default for AccessStats {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of access statistics.
///
/// Unlike `AccessStats`, this is not atomic and can be safely
/// printed, serialized, compared, etc.
///
/// # Example
/// ```
/// use blocktree::AccessStats;
///
/// let stats = AccessStats::new();
/// // ... update stats ...
/// let snapshot = stats.snapshot();
/// println!("{}", snapshot);  // Can print safely
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatsSnapshot {
    pub reads: u64,
    pub writes: u64,
}

impl StatsSnapshot {
    /// Fraction of all accesses that were reads (0.0 to 1.0).
    pub fn read_ratio(&self) -> f64 {
        let total = self.reads + self.writes;
        if total == 0 {
            0.0
        } else {
            self.reads as f64 / total as f64
        }
    }
}

impl fmt::Display for StatsSnapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Stats {{ reads: {}, writes: {}, read_ratio: {:.2}% }}",
            self.reads,
            self.writes,
            self.read_ratio() * 100.0
        )
    }
}

/// Collaborator that counts read and write notifications.
///
/// # Example
/// ```
/// use blocktree::{BTree, CountingAccess};
///
/// let mut tree: BTree<i32, CountingAccess> =
///     BTree::with_access(2, CountingAccess::new());
/// tree.insert(7);
/// assert!(tree.access().stats().snapshot().writes >= 1);
/// ```
#[derive(Debug, Default)]
pub struct CountingAccess {
    stats: AccessStats,
}

impl CountingAccess {
    /// Create a counter with all totals at zero.
    pub fn new() -> Self {
        Self {
            stats: AccessStats::new(),
        }
    }

    /// The underlying counters.
    pub fn stats(&self) -> &AccessStats {
        &self.stats
    }
}

impl BlockAccess for CountingAccess {
    fn on_read(&self, _node: NodeId) {
        self.stats.reads.fetch_add(1, Ordering::Relaxed);
    }

    fn on_write(&self, _node: NodeId) {
        self.stats.writes.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stats_new() {
        let stats = AccessStats::new();
        assert_eq!(stats.reads.load(Ordering::Relaxed), 0);
        assert_eq!(stats.writes.load(Ordering::Relaxed), 0);
        assert_eq!(stats.read_ratio(), 0.0);
    }

    #[test]
    fn test_stats_increment() {
        let stats = AccessStats::new();

        stats.reads.fetch_add(7, Ordering::Relaxed);
        stats.writes.fetch_add(3, Ordering::Relaxed);

        assert_eq!(stats.read_ratio(), 0.7);
    }

    #[test]
    fn test_stats_snapshot() {
        let stats = AccessStats::new();
        stats.reads.fetch_add(7, Ordering::Relaxed);
        stats.writes.fetch_add(3, Ordering::Relaxed);

        let snapshot = stats.snapshot();
        assert_eq!(snapshot.reads, 7);
        assert_eq!(snapshot.writes, 3);
        assert_eq!(snapshot.read_ratio(), 0.7);
    }

    #[test]
    fn test_stats_reset() {
        let stats = AccessStats::new();
        stats.reads.fetch_add(100, Ordering::Relaxed);

        stats.reset();

        assert_eq!(stats.reads.load(Ordering::Relaxed), 0);
        assert_eq!(stats.read_ratio(), 0.0);
    }

    #[test]
    fn test_stats_display() {
        let stats = AccessStats::new();
        stats.reads.fetch_add(80, Ordering::Relaxed);
        stats.writes.fetch_add(20, Ordering::Relaxed);

        let snapshot = stats.snapshot();
        let display = format!("{}", snapshot);

        assert!(display.contains("reads: 80"));
        assert!(display.contains("writes: 20"));
        assert!(display.contains("80.00%"));
    }

    #[test]
    fn test_counting_access() {
        let access = CountingAccess::new();

        access.on_read(NodeId::new(0));
        access.on_read(NodeId::new(1));
        access.on_write(NodeId::new(0));

        let snapshot = access.stats().snapshot();
        assert_eq!(snapshot.reads, 2);
        assert_eq!(snapshot.writes, 1);
    }
}
