pub mod commands;
pub mod config;

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use tracing::info;

use crate::status::OutputFormat;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Configuration file to use instead of the default one
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Follow a crawl job until it finishes
    Watch {
        #[command(flatten)]
        target: TargetArgs,

        /// Delay between polls in milliseconds
        #[arg(short, long)]
        interval_ms: Option<u64>,

        /// Failed polls tolerated in a row before giving up
        #[arg(short, long)]
        max_failures: Option<u32>,
    },

    /// Fetch and show the current status of a crawl job once
    Status {
        #[command(flatten)]
        target: TargetArgs,
    },

    /// Show the effective configuration
    Config {
        /// Write the default configuration file
        #[arg(long)]
        init: bool,
    },
}

/// Identifies the job and where its status lives
#[derive(Args)]
pub struct TargetArgs {
    /// Job page URL carrying the job in its `id` query parameter
    #[arg(required = true)]
    pub page_url: String,

    /// Status resource path, resolved against the page URL
    #[arg(short, long)]
    pub base_path: Option<String>,

    /// Output format for status updates
    #[arg(short, long, value_enum, default_value = "text")]
    pub format: OutputFormat,
}

/// Parse command line arguments
pub fn parse_args() -> Cli {
    Cli::parse()
}

/// Process the command
pub async fn process_command(cli: Cli) -> Result<()> {
    let config = commands::load_config(cli.config.as_deref())?;

    match cli.command {
        Commands::Watch { target, interval_ms, max_failures } => {
            info!("Watching job page {}", target.page_url);
            commands::watch(config, target, interval_ms, max_failures).await
        },
        Commands::Status { target } => {
            info!("Checking status for job page {}", target.page_url);
            commands::status(config, target).await
        },
        Commands::Config { init } => {
            if init {
                info!("Writing default configuration");
                commands::init_config()
            } else {
                commands::show_config(&config)
            }
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verify_cli() {
        use clap::CommandFactory;
        Cli::command().debug_assert()
    }

    #[test]
    fn test_parse_watch() {
        let cli = Cli::try_parse_from([
            "crawl-status",
            "watch",
            "http://host/jobinfo?id=42",
            "--interval-ms",
            "250",
            "--format",
            "json",
            "-v",
        ])
        .unwrap();

        assert!(cli.verbose);
        match cli.command {
            Commands::Watch { target, interval_ms, max_failures } => {
                assert_eq!(target.page_url, "http://host/jobinfo?id=42");
                assert_eq!(target.format, OutputFormat::Json);
                assert_eq!(target.base_path, None);
                assert_eq!(interval_ms, Some(250));
                assert_eq!(max_failures, None);
            }
            _ => panic!("expected watch command"),
        }
    }

    #[test]
    fn test_status_needs_page_url() {
        assert!(Cli::try_parse_from(["crawl-status", "status"]).is_err());
    }
}
