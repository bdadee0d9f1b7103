//! Ordered event recording for tests and diagnostics.

use parking_lot::Mutex;

use crate::common::NodeId;

use super::block_access::BlockAccess;

/// A single notification received from the tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessEvent {
    /// The tree read the node.
    Read(NodeId),
    /// The tree wrote the node.
    Write(NodeId),
}

/// Collaborator that records every notification in arrival order.
///
/// Unlike [`CountingAccess`](super::stats::CountingAccess), which only
/// keeps totals, the recorder preserves the full event sequence. That
/// makes it the right tool for asserting the exact notification
/// protocol of an operation, at the cost of growing memory.
///
/// # Example
/// ```
/// use blocktree::{AccessEvent, BTree, NodeId, RecordingAccess};
///
/// let mut tree: BTree<i32, RecordingAccess> =
///     BTree::with_access(2, RecordingAccess::new());
/// tree.insert(7);
/// assert_eq!(
///     tree.access().events(),
///     vec![AccessEvent::Write(NodeId::new(0))],
/// );
/// ```
#[derive(Debug, Default)]
pub struct RecordingAccess {
    events: Mutex<Vec<AccessEvent>>,
}

impl RecordingAccess {
    /// Create a recorder with an empty log.
    pub fn new() -> Self {
        Self {
            events: Mutex::new(Vec::new()),
        }
    }

    /// Copy of the recorded events, oldest first.
    pub fn events(&self) -> Vec<AccessEvent> {
        self.events.lock().clone()
    }

    /// Number of recorded events.
    pub fn len(&self) -> usize {
        self.events.lock().len()
    }

    /// Whether nothing has been recorded yet.
    pub fn is_empty(&self) -> bool {
        self.events.lock().is_empty()
    }

    /// Discard all recorded events.
    pub fn clear(&self) {
        self.events.lock().clear();
    }
}

impl BlockAccess for RecordingAccess {
    fn on_read(&self, node: NodeId) {
        self.events.lock().push(AccessEvent::Read(node));
    }

    fn on_write(&self, node: NodeId) {
        self.events.lock().push(AccessEvent::Write(node));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_records_in_arrival_order() {
        let access = RecordingAccess::new();

        access.on_write(NodeId::new(0));
        access.on_read(NodeId::new(1));
        access.on_write(NodeId::new(1));

        assert_eq!(
            access.events(),
            vec![
                AccessEvent::Write(NodeId::new(0)),
                AccessEvent::Read(NodeId::new(1)),
                AccessEvent::Write(NodeId::new(1)),
            ]
        );
    }

    #[test]
    fn test_len_and_clear() {
        let access = RecordingAccess::new();
        assert!(access.is_empty());

        access.on_read(NodeId::new(5));
        access.on_read(NodeId::new(6));
        assert_eq!(access.len(), 2);

        access.clear();
        assert!(access.is_empty());
    }
}
