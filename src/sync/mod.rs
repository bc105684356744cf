//! Message result sync with SMSSync web services.
//!
//! [`ResultSyncClient`] is generic over its three collaborators:
//!
//! - [`HttpTransport`]: sends requests ([`ReqwestTransport`] in production)
//! - [`MessageStore`]: looks up local messages by UUID
//!   ([`SqliteMessageStore`](crate::db::SqliteMessageStore) in production)
//! - [`LogSink`]: human-readable status log ([`FileLogSink`] in production)
//!
//! # Usage
//!
//! ```no_run
//! # async fn example(store: smssync::db::SqliteMessageStore) -> Result<(), Box<dyn std::error::Error>> {
//! use smssync::models::SyncEndpoint;
//! use smssync::sync::{FileLogSink, ReqwestTransport, ResultSyncClient};
//! use std::time::Duration;
//!
//! let client = ResultSyncClient::new(
//!     ReqwestTransport::new(Duration::from_secs(30))?,
//!     store,
//!     FileLogSink::new("smssync.log".into()),
//! );
//! let endpoints = vec![SyncEndpoint::new("https://example.com/smssync").with_secret("s3cret")];
//! for result in client.sync(&endpoints).await {
//!     println!("{}: {} result(s) posted", result.endpoint, result.results_posted);
//! }
//! # Ok(())
//! # }
//! ```

mod client;
mod error;
mod log_sink;
mod store;
mod transport;
mod url;

#[cfg(test)]
pub(crate) mod testing;

pub use client::{ResultSyncClient, SyncResult};
pub use error::{StoreError, SyncError, TransportError};
pub use log_sink::{FileLogSink, LogSink};
pub use store::MessageStore;
pub use transport::{HttpMethod, HttpRequest, HttpResponse, HttpTransport, ReqwestTransport};
pub use url::{endpoint_url, Task};
