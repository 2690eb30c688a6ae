//! Bulk cleanup of direct messages, groups and channels
//!
//! - [`dm`] erases one direct-message history
//! - [`group`] leaves one group or channel
//! - [`batch`] runs both in bounded concurrent batches
//! - [`summary`] renders the final totals

pub mod batch;
pub mod dm;
pub mod group;
pub mod summary;

pub use batch::{partition, run, BatchSettings, CleanupTotals};
pub use dm::erase;
pub use group::leave;
pub use summary::render_summary;
