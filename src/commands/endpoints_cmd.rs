use clap::Args;

use smssync::config::Config;
use smssync::models::SyncEndpoint;

/// List configured web service endpoints
#[derive(Debug, Args)]
pub struct EndpointsCommand {}

impl EndpointsCommand {
    pub fn run(&self, config: &Config) {
        if config.endpoints.is_empty() {
            println!("No endpoints configured.");
            println!();
            println!("Add endpoints to your config file:");
            println!();
            println!("  endpoints:");
            println!("    - title: \"Office\"");
            println!("      url: \"https://example.com/smssync\"");
            println!("      secret: \"your-secret\"");
            println!("      status: enabled");
            return;
        }

        for endpoint in &config.endpoints {
            println!("{}", format_endpoint(endpoint));
        }
    }
}

fn format_endpoint(endpoint: &SyncEndpoint) -> String {
    let secret = endpoint
        .masked_secret()
        .unwrap_or_else(|| "(none)".to_string());
    format!("[{}] {}  secret: {}", endpoint.status, endpoint, secret)
}
