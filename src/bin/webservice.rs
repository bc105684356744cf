//! SMSSync reference web service
//!
//! Serves the result sync protocol for local testing of the `smssync` client.
//!
//! # Configuration
//!
//! Environment variables:
//! - `SMSSYNC_WEBSERVICE_PORT`: Port to listen on (default: 8080)
//! - `SMSSYNC_WEBSERVICE_SECRET`: Secret clients must send (default: none)
//! - `SMSSYNC_WEBSERVICE_UUIDS`: Comma-separated UUIDs to request results for
//!   at startup (default: none)
//!
//! # Endpoints
//!
//! - `GET /?task=result`: UUIDs awaiting results
//! - `POST /?task=result`: Receive message results
//! - `POST /?task=sent`: Receive queued message UUIDs

use smssync::server::WebService;
use std::net::SocketAddr;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone)]
struct Config {
    port: u16,
    secret: Option<String>,
    uuids: Vec<String>,
}

impl Config {
    /// Load configuration from environment variables
    fn from_env() -> Self {
        let port = std::env::var("SMSSYNC_WEBSERVICE_PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(8080);

        let secret = non_empty(std::env::var("SMSSYNC_WEBSERVICE_SECRET").ok());

        let uuids = std::env::var("SMSSYNC_WEBSERVICE_UUIDS")
            .map(|list| {
                list.split(',')
                    .map(str::trim)
                    .filter(|uuid| !uuid.is_empty())
                    .map(String::from)
                    .collect()
            })
            .unwrap_or_default();

        Self {
            port,
            secret,
            uuids,
        }
    }
}

/// An empty secret means no secret.
fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "smssync=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env();

    let service = WebService::new(config.secret.clone());
    if !config.uuids.is_empty() {
        tracing::info!("Awaiting results for {} message(s)", config.uuids.len());
        service.await_uuids(config.uuids);
    }
    if config.secret.is_none() {
        tracing::warn!("No secret configured - accepting all requests");
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {}: {}", addr, e);
            std::process::exit(1);
        }
    };

    tracing::info!("Starting web service on {}", addr);
    if let Err(e) = axum::serve(listener, service.router()).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}
