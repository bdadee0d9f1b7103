//! Arena storage for tree nodes.

use crate::common::NodeId;

use super::node::Node;

/// Owns every node of a tree and hands out stable [`NodeId`] handles.
///
/// Nodes live in a slot vector. Freeing a node leaves a hole that the
/// next allocation reuses, so handles stay valid for the whole life of
/// the node they name and the vector never shifts existing slots.
///
/// Freed slots are reused in LIFO order for cache locality.
///
/// # Panics
/// Accessing a handle whose slot has been freed is a bug in the caller
/// and panics.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena<K> {
    slots: Vec<Option<Node<K>>>,
    free: Vec<NodeId>,
}

impl<K> NodeArena<K> {
    /// Create an empty arena.
    pub(crate) fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store `node` and return its handle.
    ///
    /// Reuses the most recently freed slot when one exists, otherwise
    /// grows the slot vector.
    pub(crate) fn alloc(&mut self, node: Node<K>) -> NodeId {
        match self.free.pop() {
            Some(id) => {
                debug_assert!(self.slots[id.index()].is_none());
                self.slots[id.index()] = Some(node);
                id
            }
            None => {
                let id = NodeId::new(self.slots.len() as u32);
                self.slots.push(Some(node));
                id
            }
        }
    }

    /// Release the node behind `id` and recycle its slot.
    pub(crate) fn free(&mut self, id: NodeId) -> Node<K> {
        let node = self.slots[id.index()]
            .take()
            .unwrap_or_else(|| panic!("freed {id} twice"));
        self.free.push(id);
        node
    }

    /// Borrow the node behind `id`.
    pub(crate) fn get(&self, id: NodeId) -> &Node<K> {
        self.slots[id.index()]
            .as_ref()
            .unwrap_or_else(|| panic!("accessed freed {id}"))
    }

    /// Mutably borrow the node behind `id`.
    pub(crate) fn get_mut(&mut self, id: NodeId) -> &mut Node<K> {
        self.slots[id.index()]
            .as_mut()
            .unwrap_or_else(|| panic!("accessed freed {id}"))
    }

    /// Number of live nodes.
    pub(crate) fn live_count(&self) -> usize {
        self.slots.len() - self.free.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alloc_returns_sequential_ids() {
        let mut arena: NodeArena<i32> = NodeArena::new();
        let a = arena.alloc(Node::new(true));
        let b = arena.alloc(Node::new(true));

        assert_eq!(a, NodeId::new(0));
        assert_eq!(b, NodeId::new(1));
        assert_eq!(arena.live_count(), 2);
    }

    #[test]
    fn test_free_slot_is_reused_lifo() {
        let mut arena: NodeArena<i32> = NodeArena::new();
        let a = arena.alloc(Node::new(true));
        let b = arena.alloc(Node::new(true));
        arena.alloc(Node::new(true));

        arena.free(b);
        arena.free(a);
        assert_eq!(arena.live_count(), 1);

        // Most recently freed slot comes back first.
        assert_eq!(arena.alloc(Node::new(true)), a);
        assert_eq!(arena.alloc(Node::new(true)), b);
        assert_eq!(arena.alloc(Node::new(true)), NodeId::new(3));
    }

    #[test]
    fn test_get_and_get_mut() {
        let mut arena: NodeArena<i32> = NodeArena::new();
        let id = arena.alloc(Node::new(true));

        arena.get_mut(id).keys.push(42);
        assert_eq!(arena.get(id).keys(), &[42]);
    }

    #[test]
    #[should_panic(expected = "accessed freed")]
    fn test_stale_handle_panics() {
        let mut arena: NodeArena<i32> = NodeArena::new();
        let id = arena.alloc(Node::new(true));
        arena.free(id);
        let _ = arena.get(id);
    }

    #[test]
    #[should_panic(expected = "freed")]
    fn test_double_free_panics() {
        let mut arena: NodeArena<i32> = NodeArena::new();
        let id = arena.alloc(Node::new(true));
        arena.free(id);
        arena.free(id);
    }
}
