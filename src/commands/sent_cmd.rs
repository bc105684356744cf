//! Report queued messages to the configured web services.

use clap::Args;

use super::{open_client, CommandError};
use smssync::config::Config;
use smssync::models::QueuedMessageBatch;

/// Report pending messages to the web services (task=sent)
#[derive(Debug, Args)]
pub struct SentCommand {}

impl SentCommand {
    pub async fn run(&self, config: &Config) -> Result<(), CommandError> {
        if config.enabled_endpoints().next().is_none() {
            return Err(CommandError::NoEndpoints);
        }

        let client = open_client(config).await?;
        let batch = QueuedMessageBatch::new(client.store().pending_uuids().await?);

        if batch.is_empty() {
            println!("No pending messages to report.");
            return Ok(());
        }

        println!("Reporting {} pending message(s)...", batch.len());
        println!();

        for endpoint in config.enabled_endpoints() {
            match client.post_queued_messages(endpoint, &batch).await {
                Some(response) if response.success => {
                    println!(
                        "  ✓ {}: {} acknowledged",
                        endpoint,
                        response.uuids.len()
                    );
                }
                Some(response) => {
                    println!(
                        "  ✗ {}: request failed (status {})",
                        endpoint, response.status_code
                    );
                }
                None => {}
            }
        }

        Ok(())
    }
}
