use anyhow::{Result, Context};
use std::path::Path;
use tracing::{debug, info};

use crate::cli::config::PollerConfig;
use crate::cli::TargetArgs;
use crate::status::{HttpStatusClient, JobState, StatusPoller};

/// Load the configuration from `path`, or the default location
pub fn load_config(path: Option<&Path>) -> Result<PollerConfig> {
    match path {
        Some(path) => PollerConfig::load_from_file(path),
        None => PollerConfig::load_default(),
    }
}

/// Apply command line overrides on top of the loaded configuration
fn with_overrides(
    mut config: PollerConfig,
    base_path: Option<String>,
    interval_ms: Option<u64>,
    max_failures: Option<u32>,
) -> PollerConfig {
    if let Some(base_path) = base_path {
        config.endpoint.base_path = base_path;
    }
    if let Some(interval_ms) = interval_ms {
        config.polling.interval_ms = interval_ms;
    }
    if let Some(max_failures) = max_failures {
        config.polling.max_consecutive_failures = max_failures;
    }
    config
}

/// Follow a job until it finishes
pub async fn watch(
    config: PollerConfig,
    target: TargetArgs,
    interval_ms: Option<u64>,
    max_failures: Option<u32>,
) -> Result<()> {
    let config = with_overrides(config, target.base_path, interval_ms, max_failures);

    let client = HttpStatusClient::new(&config.endpoint)?;
    let mut poller = StatusPoller::initialize(&target.page_url, &config, client, target.format.renderer())
        .context(format!("Cannot follow job page {}", target.page_url))?;

    let summary = poller.run().await
        .context("Job status is no longer being updated")?;

    info!("Job {} is {} ({} polls)", summary.job_id, summary.state, summary.polls);
    debug!("Final page: {:?}", summary.page);

    Ok(())
}

/// Show the status of a job once
pub async fn status(config: PollerConfig, target: TargetArgs) -> Result<()> {
    let config = with_overrides(config, target.base_path, None, None);

    let client = HttpStatusClient::new(&config.endpoint)?;
    let mut poller = StatusPoller::initialize(&target.page_url, &config, client, target.format.renderer())
        .context(format!("Cannot follow job page {}", target.page_url))?;

    let state = poller.poll_once().await
        .context(format!("Failed to fetch status from {}", poller.status_url()))?;

    if state == JobState::Polling {
        info!("Job is still running, use `crawl-status watch` to follow it");
    }

    Ok(())
}

/// Write the default configuration file
pub fn init_config() -> Result<()> {
    let path = PollerConfig::default().save_as_default()?;
    println!("Default configuration written to {}", path.display());

    Ok(())
}

/// Show the current configuration
pub fn show_config(config: &PollerConfig) -> Result<()> {
    println!("Configuration file: {}", PollerConfig::default_path().display());
    print!("{}", serde_yaml::to_string(config).context("Failed to serialize configuration")?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overrides_replace_configured_values() {
        let config = with_overrides(PollerConfig::default(), Some("/api/".to_string()), Some(50), Some(4));
        assert_eq!(config.endpoint.base_path, "/api/");
        assert_eq!(config.polling.interval_ms, 50);
        assert_eq!(config.polling.max_consecutive_failures, 4);
    }

    #[test]
    fn test_no_overrides_keep_config() {
        let config = with_overrides(PollerConfig::default(), None, None, None);
        assert_eq!(config, PollerConfig::default());
    }
}
