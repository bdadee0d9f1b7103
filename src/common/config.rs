//! Configuration constants for blocktree.

/// Smallest legal minimum degree.
///
/// With `t = 2` every node holds between 1 and 3 keys (a 2-3-4 tree),
/// the smallest shape that still exercises splitting and merging.
/// `t = 1` would permit zero-key non-root nodes, which breaks the
/// occupancy invariant.
pub const MIN_DEGREE_FLOOR: usize = 2;

/// Maximum number of keys a node may hold: `2t - 1`.
///
/// A node at this capacity is "full" and must be split before an
/// insertion may descend into it.
#[inline]
pub const fn max_keys(t: usize) -> usize {
    2 * t - 1
}

/// Minimum number of keys a non-root node must hold: `t - 1`.
///
/// The root is exempt: it may hold as few as zero keys (empty tree).
#[inline]
pub const fn min_keys(t: usize) -> usize {
    t - 1
}

/// Maximum number of children an internal node may hold: `2t`.
#[inline]
pub const fn max_children(t: usize) -> usize {
    2 * t
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounds_at_floor_degree() {
        assert_eq!(min_keys(MIN_DEGREE_FLOOR), 1);
        assert_eq!(max_keys(MIN_DEGREE_FLOOR), 3);
        assert_eq!(max_children(MIN_DEGREE_FLOOR), 4);
    }

    #[test]
    fn test_children_exceed_keys_by_one() {
        for t in 2..10 {
            assert_eq!(max_children(t), max_keys(t) + 1);
        }
    }
}
