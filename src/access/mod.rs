//! Block-access collaborators.
//!
//! The tree never performs I/O itself. Instead it notifies a pluggable
//! collaborator whenever it reads or writes a node, and the collaborator
//! decides what those events mean.
//!
//! # Components
//! - [`BlockAccess`] - The notification trait
//! - [`NoopAccess`] - Ignores every event (the default)
//! - [`CountingAccess`] / [`AccessStats`] - Lock-free counters
//! - [`RecordingAccess`] / [`AccessEvent`] - Ordered event log

mod block_access;
mod recorder;
mod stats;

pub use block_access::{BlockAccess, NoopAccess};
pub use recorder::{AccessEvent, RecordingAccess};
pub use stats::{AccessStats, CountingAccess, StatsSnapshot};
