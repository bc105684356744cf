use clap::{Args, Subcommand, ValueEnum};

use smssync::config::Config;

#[derive(Debug, Clone, ValueEnum, Default)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Manage configuration
#[derive(Debug, Args)]
pub struct ConfigCommand {
    #[command(subcommand)]
    pub command: ConfigSubcommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigSubcommand {
    /// Show current configuration values
    Show {
        /// Output format
        #[arg(long, short, value_enum, default_value = "text")]
        format: OutputFormat,
    },
}

impl ConfigCommand {
    pub fn run(&self, config: &Config) -> Result<(), Box<dyn std::error::Error>> {
        match &self.command {
            ConfigSubcommand::Show { format } => {
                let config = config.redacted();
                match format {
                    OutputFormat::Json => {
                        println!("{}", serde_json::to_string_pretty(&config)?);
                    }
                    OutputFormat::Text => {
                        println!("Configuration");
                        println!("=============\n");

                        if let Some(path) = &config.config_file {
                            println!("Config file: {}", path.display());
                        } else {
                            println!(
                                "Config file: {} (not found)",
                                Config::default_config_path().display()
                            );
                        }
                        println!();

                        println!("database_path: {}", config.database_path.value.display());
                        println!("  source: {}", config.database_path.source);
                        println!();

                        println!("log_path: {}", config.log_path.value.display());
                        println!("  source: {}", config.log_path.source);
                        println!();

                        println!("http_timeout_secs: {}", config.http_timeout_secs.value);
                        println!("  source: {}", config.http_timeout_secs.source);
                        println!();

                        println!("endpoints: {}", config.endpoints.len());
                        for endpoint in &config.endpoints {
                            println!("  - {} [{}]", endpoint, endpoint.status);
                        }
                    }
                }
                Ok(())
            }
        }
    }
}
