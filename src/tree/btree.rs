//! B-tree controller - the core balanced index.
//!
//! The [`BTree`] provides:
//! - O(log n) search, insert, and delete
//! - Configurable minimum degree `t`
//! - Proactive splitting on the way down during insertion
//! - Borrow/merge rebalancing on the way down during deletion
//! - Read/write notifications to a pluggable block-access collaborator

use std::cmp::Ordering;

use crate::access::{BlockAccess, NoopAccess};
use crate::common::config::{max_keys, min_keys, MIN_DEGREE_FLOOR};
use crate::common::{Error, NodeId, Result};

use super::arena::NodeArena;
use super::node::Node;
use super::traverse::{Traversal, TraversalOrder};

/// A balanced multiway search tree with minimum degree `t`.
///
/// # Architecture
/// ```text
/// ┌───────────────────────────────────────────────────────────┐
/// │                       BTree<K, A>                         │
/// │  ┌──────────┐  ┌───────────────────────────────────────┐  │
/// │  │   root   │  │     arena: slots + LIFO free list     │  │
/// │  │  NodeId  │─▶│  [Node0] [Node1] [Node2] [····] ...   │  │
/// │  └──────────┘  └───────────────────────────────────────┘  │
/// │  ┌──────────────────────┐  ┌───────────────────────────┐  │
/// │  │  access: A           │  │  t (fixed), len           │  │
/// │  │  on_read / on_write  │  │                           │  │
/// │  └──────────────────────┘  └───────────────────────────┘  │
/// └───────────────────────────────────────────────────────────┘
/// ```
///
/// Every node lives in the arena and is addressed by a stable
/// [`NodeId`]. The tree notifies its collaborator `A` before reading a
/// node during a descent and after mutating one; the default
/// [`NoopAccess`] ignores both.
///
/// Mutations restore the shape invariants on the way down, so no
/// operation ever needs to walk back up: insertion splits full nodes
/// before entering them, and deletion tops up under-full children
/// before descending.
///
/// # Example
/// ```
/// use blocktree::BTree;
///
/// let mut tree: BTree<i32> = BTree::new(2);
/// tree.insert(7);
/// tree.insert(3);
/// tree.insert(11);
///
/// assert!(tree.contains(&7));
/// assert_eq!(tree.minimum().unwrap(), &3);
///
/// tree.delete(&7).unwrap();
/// assert_eq!(tree.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct BTree<K, A: BlockAccess = NoopAccess> {
    /// Minimum degree. Fixed at construction.
    t: usize,

    /// Handle of the root node. Changes on root split and root collapse.
    pub(crate) root: NodeId,

    /// Owns every node of the tree.
    pub(crate) arena: NodeArena<K>,

    /// Block-access collaborator receiving read/write notifications.
    access: A,

    /// Number of keys currently stored.
    len: usize,
}

impl<K: Ord + Clone> BTree<K> {
    /// Create an empty tree that ignores access notifications.
    ///
    /// # Panics
    /// Panics if `t < 2`.
    pub fn new(t: usize) -> Self {
        Self::with_access(t, NoopAccess)
    }
}

impl<K: Ord + Clone, A: BlockAccess> BTree<K, A> {
    /// Create an empty tree that notifies `access` on every node
    /// read and write.
    ///
    /// # Panics
    /// Panics if `t < 2`.
    pub fn with_access(t: usize, access: A) -> Self {
        assert!(
            t >= MIN_DEGREE_FLOOR,
            "minimum degree must be at least {MIN_DEGREE_FLOOR}"
        );

        let mut arena = NodeArena::new();
        let root = arena.alloc(Node::new(true));

        Self {
            t,
            root,
            arena,
            access,
            len: 0,
        }
    }

    // ========================================================================
    // Public API: Queries
    // ========================================================================

    /// Find `key`, returning the node that holds it and the key's index
    /// within that node.
    ///
    /// Descends from the root, notifying `on_read` for each child
    /// entered. Returns `None` if the key is absent.
    pub fn search(&self, key: &K) -> Option<(NodeId, usize)> {
        let mut id = self.root;

        loop {
            let node = self.arena.get(id);
            match node.keys().binary_search(key) {
                Ok(idx) => return Some((id, idx)),
                Err(idx) => {
                    if node.is_leaf() {
                        return None;
                    }
                    let child = node.children()[idx];
                    self.access.on_read(child);
                    id = child;
                }
            }
        }
    }

    /// Whether `key` is present.
    pub fn contains(&self, key: &K) -> bool {
        self.search(key).is_some()
    }

    /// The smallest key.
    ///
    /// # Errors
    /// `Error::EmptyTree` if the tree holds no keys.
    pub fn minimum(&self) -> Result<&K> {
        if self.is_empty() {
            return Err(Error::EmptyTree);
        }
        Ok(self.min_key_in(self.root))
    }

    /// The largest key.
    ///
    /// # Errors
    /// `Error::EmptyTree` if the tree holds no keys.
    pub fn maximum(&self) -> Result<&K> {
        if self.is_empty() {
            return Err(Error::EmptyTree);
        }
        Ok(self.max_key_in(self.root))
    }

    /// Lazily yield keys in the given order.
    ///
    /// Each call builds a fresh iterator, so traversals can be
    /// restarted at any time.
    pub fn traverse(&self, order: TraversalOrder) -> Traversal<'_, K, A> {
        Traversal::new(self, order)
    }

    /// Keys in ascending order. Shorthand for an in-order traversal.
    pub fn iter(&self) -> Traversal<'_, K, A> {
        self.traverse(TraversalOrder::Inorder)
    }

    // ========================================================================
    // Public API: Mutations
    // ========================================================================

    /// Insert `key`, keeping the tree balanced.
    ///
    /// Returns `true` if the key was inserted and `false` if it was
    /// already present. A full node split performed before a duplicate
    /// is discovered is kept; the tree stays valid either way.
    pub fn insert(&mut self, key: K) -> bool {
        if self.arena.get(self.root).is_full(self.t) {
            self.split_root();
        }

        let inserted = self.insert_not_full(self.root, key);
        if inserted {
            self.len += 1;
        }
        inserted
    }

    /// Remove `key`, keeping the tree balanced.
    ///
    /// # Errors
    /// `Error::KeyNotFound` if the key is absent. Absence is only
    /// detected at a leaf, so rebalancing performed on the way down is
    /// kept even when the deletion ultimately fails.
    pub fn delete(&mut self, key: &K) -> Result<()> {
        self.delete_from(self.root, key)?;
        self.len -= 1;
        Ok(())
    }

    // ========================================================================
    // Public API: Inspection
    // ========================================================================

    /// The minimum degree this tree was built with.
    pub fn min_degree(&self) -> usize {
        self.t
    }

    /// Number of keys stored.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the tree holds no keys.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of levels from the root to the leaves.
    ///
    /// An empty tree still has its root leaf, so the height is never 0.
    pub fn height(&self) -> usize {
        let mut height = 1;
        let mut id = self.root;

        while !self.arena.get(id).is_leaf() {
            id = self.arena.get(id).children()[0];
            height += 1;
        }
        height
    }

    /// Number of live nodes.
    pub fn node_count(&self) -> usize {
        self.arena.live_count()
    }

    /// Borrow the node behind `id`, e.g. one returned by [`search`].
    ///
    /// # Panics
    /// Panics if `id` names a node that has been freed.
    ///
    /// [`search`]: BTree::search
    pub fn node(&self, id: NodeId) -> &Node<K> {
        self.arena.get(id)
    }

    /// The block-access collaborator.
    pub fn access(&self) -> &A {
        &self.access
    }

    /// Check every structural invariant of the tree.
    ///
    /// Walks the whole tree verifying occupancy bounds, key ordering
    /// within and across nodes, child counts, uniform leaf depth, and
    /// that the stored key total matches [`len`](BTree::len).
    ///
    /// # Panics
    /// Panics on the first violation found. A violation means a bug in
    /// the tree itself, never bad caller input.
    pub fn verify_invariants(&self) {
        let mut total = 0;
        let mut leaf_depth = None;
        self.verify_node(self.root, 1, None, None, &mut total, &mut leaf_depth);
        assert_eq!(total, self.len, "stored key count disagrees with len");
    }

    // ========================================================================
    // Internal: Insertion
    // ========================================================================

    /// Grow the tree by one level: the old root becomes the sole child
    /// of a fresh root, then splits.
    fn split_root(&mut self) {
        let old_root = self.root;

        let mut new_root = Node::new(false);
        new_root.children.push(old_root);
        self.root = self.arena.alloc(new_root);

        self.split_child(self.root, 0);
    }

    /// Split the full child at `parent.children[i]` around its median
    /// key, which moves up into the parent at index `i`.
    fn split_child(&mut self, parent_id: NodeId, i: usize) {
        let t = self.t;
        let child_id = self.arena.get(parent_id).children()[i];

        let (median, sibling) = {
            let child = self.arena.get_mut(child_id);
            assert!(child.is_full(t), "split of a non-full node");

            let mut sibling = Node::new(child.is_leaf());
            sibling.keys = child.keys.split_off(t);
            if !child.is_leaf() {
                sibling.children = child.children.split_off(t);
            }
            let median = child.keys.pop().expect("full node has a median key");
            (median, sibling)
        };

        let sibling_id = self.arena.alloc(sibling);
        let parent = self.arena.get_mut(parent_id);
        parent.keys.insert(i, median);
        parent.children.insert(i + 1, sibling_id);

        self.access.on_write(child_id);
        self.access.on_write(sibling_id);
        self.access.on_write(parent_id);
    }

    /// Insert into the subtree rooted at `id`, which is not full.
    ///
    /// Full children are split before the descent enters them, so
    /// every recursive call meets its precondition.
    fn insert_not_full(&mut self, id: NodeId, key: K) -> bool {
        let (position, is_leaf) = {
            let node = self.arena.get(id);
            (node.keys().binary_search(&key), node.is_leaf())
        };

        let mut i = match position {
            Ok(_) => return false,
            Err(i) => i,
        };

        if is_leaf {
            self.arena.get_mut(id).keys.insert(i, key);
            self.access.on_write(id);
            return true;
        }

        let child = self.arena.get(id).children()[i];
        self.access.on_read(child);

        if self.arena.get(child).is_full(self.t) {
            self.split_child(id, i);

            // The promoted median sits at keys[i] now. Larger keys go
            // to the new right sibling; an equal key is a duplicate.
            match key.cmp(&self.arena.get(id).keys()[i]) {
                Ordering::Less => {}
                Ordering::Equal => return false,
                Ordering::Greater => i += 1,
            }
        }

        let next = self.arena.get(id).children()[i];
        self.insert_not_full(next, key)
    }

    // ========================================================================
    // Internal: Deletion
    // ========================================================================

    /// Delete `key` from the subtree rooted at `id`.
    ///
    /// Precondition: `id` is the root, or holds at least `t` keys.
    /// Callers restore this with [`rebalance_child`](Self::rebalance_child)
    /// before descending.
    fn delete_from(&mut self, id: NodeId, key: &K) -> Result<()> {
        assert!(
            id == self.root || self.arena.get(id).keys().len() >= self.t,
            "deletion entered a node below minimum occupancy"
        );

        let (position, is_leaf) = {
            let node = self.arena.get(id);
            (node.keys().binary_search(key), node.is_leaf())
        };

        match position {
            // Case 1: the key sits in a leaf.
            Ok(i) if is_leaf => {
                self.arena.get_mut(id).keys.remove(i);
                self.access.on_write(id);
                Ok(())
            }
            // Case 2: the key sits in an internal node.
            Ok(i) => self.delete_from_internal(id, i),
            // Absence is only provable at a leaf.
            Err(_) if is_leaf => Err(Error::KeyNotFound),
            // Case 3: descend, topping up the child first.
            Err(i) => {
                let child = self.rebalance_child(id, i);
                self.access.on_read(child);
                self.delete_from(child, key)
            }
        }
    }

    /// Delete the key at `keys[i]` of the internal node `id`.
    fn delete_from_internal(&mut self, id: NodeId, i: usize) -> Result<()> {
        let (left, right) = {
            let node = self.arena.get(id);
            (node.children()[i], node.children()[i + 1])
        };

        if self.arena.get(left).keys().len() >= self.t {
            // Case 2a: lift the predecessor out of the left subtree.
            let pred = self.max_key_in(left).clone();
            self.access.on_read(left);
            self.delete_from(left, &pred)?;

            self.arena.get_mut(id).keys[i] = pred;
            self.access.on_write(id);
            Ok(())
        } else if self.arena.get(right).keys().len() >= self.t {
            // Case 2b: lift the successor out of the right subtree.
            let succ = self.min_key_in(right).clone();
            self.access.on_read(right);
            self.delete_from(right, &succ)?;

            self.arena.get_mut(id).keys[i] = succ;
            self.access.on_write(id);
            Ok(())
        } else {
            // Case 2c: both neighbors are minimal. Merge them around
            // the key, then delete it from the merged node.
            let key = self.arena.get(id).keys()[i].clone();
            self.merge_children(id, i);

            let merged = self.arena.get(id).children()[i];
            let merged = self.collapse_root(id, merged);

            self.access.on_read(merged);
            self.delete_from(merged, &key)
        }
    }

    /// Ensure `children[i]` holds at least `t` keys before a deletion
    /// descends into it, borrowing from a sibling or merging when it
    /// does not. Returns the handle of the node to descend into, which
    /// differs from `children[i]` after a merge into the left sibling.
    fn rebalance_child(&mut self, id: NodeId, i: usize) -> NodeId {
        let child = self.arena.get(id).children()[i];
        if self.arena.get(child).keys().len() >= self.t {
            return child;
        }

        // Prefer the left sibling when both can spare a key.
        if i > 0 {
            let left = self.arena.get(id).children()[i - 1];
            if self.arena.get(left).keys().len() >= self.t {
                self.borrow_from_left(id, i);
                return child;
            }
        }

        let child_count = self.arena.get(id).children().len();
        if i + 1 < child_count {
            let right = self.arena.get(id).children()[i + 1];
            if self.arena.get(right).keys().len() >= self.t {
                self.borrow_from_right(id, i);
                return child;
            }
        }

        // No sibling can spare a key. Merge, preferring the left
        // sibling so the separator indices shift predictably.
        let i = if i > 0 {
            self.merge_children(id, i - 1);
            i - 1
        } else {
            self.merge_children(id, i);
            i
        };

        let merged = self.arena.get(id).children()[i];
        self.collapse_root(id, merged)
    }

    /// Move the largest key of the left sibling up to the parent and
    /// the separator down into `children[i]`.
    fn borrow_from_left(&mut self, parent_id: NodeId, i: usize) {
        let (child_id, sibling_id) = {
            let parent = self.arena.get(parent_id);
            (parent.children()[i], parent.children()[i - 1])
        };

        let (moved_key, moved_child) = {
            let sibling = self.arena.get_mut(sibling_id);
            let key = sibling.keys.pop().expect("borrow source has a spare key");
            let child = if sibling.is_leaf() {
                None
            } else {
                sibling.children.pop()
            };
            (key, child)
        };

        let separator =
            std::mem::replace(&mut self.arena.get_mut(parent_id).keys[i - 1], moved_key);

        let child = self.arena.get_mut(child_id);
        child.keys.insert(0, separator);
        if let Some(grandchild) = moved_child {
            child.children.insert(0, grandchild);
        }

        self.access.on_write(child_id);
        self.access.on_write(sibling_id);
        self.access.on_write(parent_id);
    }

    /// Move the smallest key of the right sibling up to the parent and
    /// the separator down into `children[i]`.
    fn borrow_from_right(&mut self, parent_id: NodeId, i: usize) {
        let (child_id, sibling_id) = {
            let parent = self.arena.get(parent_id);
            (parent.children()[i], parent.children()[i + 1])
        };

        let (moved_key, moved_child) = {
            let sibling = self.arena.get_mut(sibling_id);
            let key = sibling.keys.remove(0);
            let child = if sibling.is_leaf() {
                None
            } else {
                Some(sibling.children.remove(0))
            };
            (key, child)
        };

        let separator = std::mem::replace(&mut self.arena.get_mut(parent_id).keys[i], moved_key);

        let child = self.arena.get_mut(child_id);
        child.keys.push(separator);
        if let Some(grandchild) = moved_child {
            child.children.push(grandchild);
        }

        self.access.on_write(child_id);
        self.access.on_write(sibling_id);
        self.access.on_write(parent_id);
    }

    /// Fold `children[i+1]` and the separator `keys[i]` into
    /// `children[i]`, freeing the right node's slot.
    ///
    /// Both children hold `t - 1` keys when this is called, so the
    /// merged node holds exactly `2t - 1`.
    fn merge_children(&mut self, parent_id: NodeId, i: usize) {
        let (left_id, right_id, separator) = {
            let parent = self.arena.get_mut(parent_id);
            let left = parent.children[i];
            let right = parent.children.remove(i + 1);
            let separator = parent.keys.remove(i);
            (left, right, separator)
        };

        let right = self.arena.free(right_id);
        let left = self.arena.get_mut(left_id);
        left.keys.push(separator);
        left.keys.extend(right.keys);
        left.children.extend(right.children);

        self.access.on_write(left_id);
        self.access.on_write(parent_id);
    }

    /// Shrink the tree by one level when a merge empties the root.
    /// Returns `merged`, which becomes the new root on collapse.
    fn collapse_root(&mut self, id: NodeId, merged: NodeId) -> NodeId {
        if id == self.root && self.arena.get(id).keys().is_empty() {
            self.arena.free(id);
            self.root = merged;
        }
        merged
    }

    // ========================================================================
    // Internal: Helpers
    // ========================================================================

    /// Smallest key in the subtree rooted at `id`.
    fn min_key_in(&self, mut id: NodeId) -> &K {
        loop {
            let node = self.arena.get(id);
            if node.is_leaf() {
                return node.keys().first().expect("subtree holds at least one key");
            }
            id = node.children()[0];
        }
    }

    /// Largest key in the subtree rooted at `id`.
    fn max_key_in(&self, mut id: NodeId) -> &K {
        loop {
            let node = self.arena.get(id);
            if node.is_leaf() {
                return node.keys().last().expect("subtree holds at least one key");
            }
            id = *node.children().last().expect("internal node has children");
        }
    }

    fn verify_node(
        &self,
        id: NodeId,
        depth: usize,
        lower: Option<&K>,
        upper: Option<&K>,
        total: &mut usize,
        leaf_depth: &mut Option<usize>,
    ) {
        let node = self.arena.get(id);
        let keys = node.keys();

        if id != self.root {
            assert!(
                keys.len() >= min_keys(self.t),
                "non-root node below minimum occupancy"
            );
        }
        assert!(keys.len() <= max_keys(self.t), "node above maximum occupancy");
        assert_eq!(
            node.children().is_empty(),
            node.is_leaf(),
            "leaf flag disagrees with child list"
        );

        for pair in keys.windows(2) {
            assert!(pair[0] < pair[1], "keys not strictly ascending");
        }
        if let (Some(bound), Some(first)) = (lower, keys.first()) {
            assert!(bound < first, "key at or below the subtree lower bound");
        }
        if let (Some(bound), Some(last)) = (upper, keys.last()) {
            assert!(last < bound, "key at or above the subtree upper bound");
        }

        *total += keys.len();

        if node.is_leaf() {
            match *leaf_depth {
                Some(expected) => assert_eq!(expected, depth, "leaves at differing depths"),
                None => *leaf_depth = Some(depth),
            }
            return;
        }

        assert_eq!(
            node.children().len(),
            keys.len() + 1,
            "child count must exceed key count by one"
        );

        for (slot, &child) in node.children().iter().enumerate() {
            let lower = if slot == 0 { lower } else { Some(&keys[slot - 1]) };
            let upper = if slot == keys.len() {
                upper
            } else {
                Some(&keys[slot])
            };
            self.verify_node(child, depth + 1, lower, upper, total, leaf_depth);
        }
    }
}
