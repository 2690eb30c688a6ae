//! Telegram account cleanup library
//!
//! This library provides tools to:
//! - Delete every direct-message history for both sides
//! - Leave every basic group, supergroup and channel
//! - Run both in rate-limit friendly batches and report totals

pub mod cleanup;
pub mod client;
pub mod config;
pub mod credentials;
pub mod entity;
pub mod error;
pub mod session;

// Re-export common types
pub use cleanup::{BatchSettings, CleanupTotals};
pub use client::SessionClient;
pub use config::Config;
pub use credentials::Credentials;
pub use entity::{Dialog, EntityKind, LeaveKind};
pub use error::{Error, Result};
pub use session::{SessionLock, TelegramClient};

// Commands module uses re-exported types, so it must be declared after the re-exports
pub mod commands;
