use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Whether a sync endpoint takes part in sync passes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndpointStatus {
    #[default]
    Enabled,
    Disabled,
}

impl fmt::Display for EndpointStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EndpointStatus::Enabled => write!(f, "enabled"),
            EndpointStatus::Disabled => write!(f, "disabled"),
        }
    }
}

impl FromStr for EndpointStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "enabled" => Ok(EndpointStatus::Enabled),
            "disabled" => Ok(EndpointStatus::Disabled),
            _ => Err(format!(
                "Invalid endpoint status '{}'. Valid options: enabled, disabled",
                s
            )),
        }
    }
}

/// A remote web service that message results are synced with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyncEndpoint {
    /// Display name, purely informational
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Base URL of the web service
    pub url: String,
    /// Shared secret sent as the `secret` query parameter
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret: Option<String>,
    #[serde(default)]
    pub status: EndpointStatus,
}

impl SyncEndpoint {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            title: None,
            url: url.into(),
            secret: None,
            status: EndpointStatus::Enabled,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_secret(mut self, secret: impl Into<String>) -> Self {
        self.secret = Some(secret.into());
        self
    }

    pub fn with_status(mut self, status: EndpointStatus) -> Self {
        self.status = status;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.status == EndpointStatus::Enabled
    }

    /// The configured secret, treating an empty string as no secret.
    pub fn secret(&self) -> Option<&str> {
        self.secret.as_deref().filter(|s| !s.is_empty())
    }

    /// Secret with everything but the first two characters hidden.
    pub fn masked_secret(&self) -> Option<String> {
        self.secret().map(|s| {
            let visible: String = s.chars().take(2).collect();
            format!("{}{}", visible, "*".repeat(s.chars().count().saturating_sub(2)))
        })
    }
}

impl fmt::Display for SyncEndpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.title {
            Some(title) => write!(f, "{} ({})", title, self.url),
            None => write!(f, "{}", self.url),
        }
    }
}
