use clap::{Parser, Subcommand};
use std::path::PathBuf;

use api_gateway::config::load_config;
use api_gateway::lifecycle::startup;
use api_gateway::observability::logging::init_logging;

#[derive(Parser)]
#[command(name = "api-gateway")]
#[command(about = "Prefix-routing reverse proxy with runtime upstream management", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the gateway
    Start {
        /// Path to the TOML configuration file
        config: PathBuf,
    },
    /// Validate a configuration file
    Check {
        /// Path to the TOML configuration file
        config: PathBuf,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Start { config } => {
            let config = load_config(&config)?;
            init_logging(&config.observability.log_level)?;

            tracing::info!(
                version = env!("CARGO_PKG_VERSION"),
                bind_address = %config.listener.bind_address,
                delay_ms = config.listener.delay_ms,
                check_before_admit = config.admission.check_before_admit,
                "api-gateway starting"
            );

            startup::run(config).await?;
        }
        Commands::Check { config: path } => match load_config(&path) {
            Ok(config) => {
                println!(
                    "{} - Ok ({} backends declared)",
                    path.display(),
                    config.declared_backends()
                );
            }
            Err(e) => {
                eprintln!("{} - {}", path.display(), e);
                std::process::exit(1);
            }
        },
    }

    Ok(())
}
