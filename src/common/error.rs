//! Error types for blocktree.

use thiserror::Error;

/// Errors that tree operations can return to the caller.
///
/// These are recoverable conditions. Internal invariant violations
/// (occupancy bounds, stale arena handles) indicate a bug in the tree
/// itself and panic instead of surfacing here.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The key to delete is not present in the tree.
    #[error("key not found in tree")]
    KeyNotFound,

    /// The operation requires at least one key but the tree is empty.
    #[error("tree is empty")]
    EmptyTree,
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(Error::KeyNotFound.to_string(), "key not found in tree");
        assert_eq!(Error::EmptyTree.to_string(), "tree is empty");
    }

    #[test]
    fn test_error_is_std_error() {
        fn assert_std_error<E: std::error::Error>() {}
        assert_std_error::<Error>();
    }

    #[test]
    fn test_result_alias() {
        let ok: Result<u32> = Ok(7);
        let err: Result<u32> = Err(Error::EmptyTree);
        assert_eq!(ok.unwrap(), 7);
        assert_eq!(err.unwrap_err(), Error::EmptyTree);
    }
}
