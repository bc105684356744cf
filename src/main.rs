use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

use commands::{ConfigCommand, EndpointsCommand, SentCommand, SyncCommand};
use smssync::config::Config;

#[derive(Parser)]
#[command(name = "smssync")]
#[command(version)]
#[command(about = "Report SMS delivery results to SMSSync web services", long_about = None)]
struct Cli {
    /// Path to config file
    #[arg(long, short, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Report message results requested by the web services
    Sync(SyncCommand),

    /// Report pending messages to the web services
    Sent(SentCommand),

    /// List configured endpoints
    Endpoints(EndpointsCommand),

    /// Manage configuration
    Config(ConfigCommand),
}

/// Filter used when `RUST_LOG` is unset
const DEFAULT_LOG_FILTER: &str = "smssync=info";

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(cli.config)?;

    match cli.command {
        Some(Commands::Sync(cmd)) => {
            cmd.run(&config).await?;
        }
        Some(Commands::Sent(cmd)) => {
            cmd.run(&config).await?;
        }
        Some(Commands::Endpoints(cmd)) => {
            cmd.run(&config);
        }
        Some(Commands::Config(cmd)) => {
            cmd.run(&config)?;
        }
        None => {
            println!("Use --help to see available commands");
        }
    }

    Ok(())
}
