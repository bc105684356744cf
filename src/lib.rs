//! SMSSync result sync.
//!
//! Reports message send and delivery results from a phone's local message
//! store to SMSSync web services, and ships a reference web service to sync
//! against.

pub mod config;
pub mod db;
pub mod models;
pub mod server;
pub mod sync;

pub use config::{Config, ConfigError};
pub use models::{MessageResult, QueuedMessageBatch, SyncEndpoint, UuidListResponse};
pub use sync::{ResultSyncClient, SyncResult};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
