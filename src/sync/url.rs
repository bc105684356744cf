//! Endpoint URL construction.
//!
//! All three web service calls address the endpoint the same way:
//! `<base>?task=<task>[&secret=<percent-encoded secret>]`.

use reqwest::Url;
use std::fmt;

use super::error::SyncError;
use crate::models::SyncEndpoint;

/// The `task` query parameter selecting a web service operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Task {
    /// Fetch or report message results
    Result,
    /// Report queued (sent, unacknowledged) messages
    Sent,
}

impl Task {
    pub fn as_str(&self) -> &'static str {
        match self {
            Task::Result => "result",
            Task::Sent => "sent",
        }
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Builds the URL for `task` on `endpoint`.
///
/// A query already present on the base URL is kept; `task` and `secret` are
/// appended after it.
pub fn endpoint_url(endpoint: &SyncEndpoint, task: Task) -> Result<Url, SyncError> {
    let mut url = Url::parse(endpoint.url.trim()).map_err(|e| SyncError::InvalidUrl {
        url: endpoint.url.clone(),
        reason: e.to_string(),
    })?;

    let mut query = match url.query() {
        Some(existing) if !existing.is_empty() => format!("{}&", existing),
        _ => String::new(),
    };
    query.push_str("task=");
    query.push_str(task.as_str());
    if let Some(secret) = endpoint.secret() {
        query.push_str("&secret=");
        query.push_str(&urlencoding::encode(secret));
    }
    url.set_query(Some(&query));

    Ok(url)
}
