//! Command implementations
//!
//! Each module corresponds to an entry point of the CLI.

pub mod cleanup;

pub use cleanup::{run as cleanup_run, CleanupArgs};
