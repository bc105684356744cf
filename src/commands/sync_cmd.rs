//! Sync message results with the configured web services.

use clap::Args;

use super::{open_client, CommandError};
use smssync::config::Config;
use smssync::sync::SyncResult;

/// Report message results requested by the web services
#[derive(Debug, Args)]
pub struct SyncCommand {}

impl SyncCommand {
    pub async fn run(&self, config: &Config) -> Result<(), CommandError> {
        let enabled = config.enabled_endpoints().count();
        if enabled == 0 {
            return Err(CommandError::NoEndpoints);
        }

        let client = open_client(config).await?;

        println!("Syncing message results with {} endpoint(s)...", enabled);
        println!();

        let results = client.sync(&config.endpoints).await;
        for result in &results {
            println!("  {}", describe(result));
        }

        let posted: usize = results.iter().map(|r| r.results_posted).sum();
        println!();
        println!(
            "Sync complete. {} result(s) sent. See {} for details.",
            posted,
            config.log_path.value.display()
        );

        Ok(())
    }
}

fn describe(result: &SyncResult) -> String {
    if !result.fetch_succeeded() {
        return format!(
            "✗ {}: request failed (status {})",
            result.endpoint, result.status_code
        );
    }
    if result.uuids_requested == 0 {
        return format!("✓ {}: nothing requested", result.endpoint);
    }
    format!(
        "✓ {}: {} requested, {} result{} sent",
        result.endpoint,
        result.uuids_requested,
        result.results_posted,
        if result.results_posted == 1 { "" } else { "s" }
    )
}
