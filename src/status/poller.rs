use std::time::Duration;
use tracing::{debug, error, info, warn};
use url::Url;

use crate::cli::config::PollerConfig;
use crate::status::client::StatusSource;
use crate::status::error::StatusError;
use crate::status::job::{extract_job_id, resolve_status_url};
use crate::status::page::PageElements;
use crate::status::render::Renderer;
use crate::status::response::JobState;

/// Everything a poller needs to know about the job it follows
#[derive(Debug, Clone, PartialEq)]
pub struct PollerSettings {
    pub base_path: String,
    pub job_id: String,
    pub poll_interval: Duration,
    pub max_consecutive_failures: u32,
}

impl PollerSettings {
    pub fn from_config(job_id: String, config: &PollerConfig) -> Self {
        Self {
            base_path: config.endpoint.base_path.clone(),
            job_id,
            poll_interval: Duration::from_millis(config.polling.interval_ms),
            max_consecutive_failures: config.polling.max_consecutive_failures,
        }
    }
}

/// Outcome of following a job to the end
#[derive(Debug, Clone)]
pub struct PollSummary {
    pub job_id: String,
    pub polls: u32,
    pub state: JobState,
    pub page: PageElements,
}

/// Follows one job's status resource until it reports a finished state.
///
/// Polls are strictly sequential: the next request is only issued after the
/// previous response has been applied and rendered, then the configured
/// interval has elapsed.
pub struct StatusPoller<S, R> {
    settings: PollerSettings,
    status_url: Url,
    source: S,
    renderer: R,
    page: PageElements,
    state: JobState,
    polls: u32,
}

impl<S: StatusSource, R: Renderer> StatusPoller<S, R> {
    /// Set up a poller for the job named by the page URL's `id` parameter
    pub fn initialize(page_url: &str, config: &PollerConfig, source: S, renderer: R) -> Result<Self, StatusError> {
        let job_id = extract_job_id(page_url)?;
        let status_url = resolve_status_url(page_url, &config.endpoint.base_path, &job_id)?;
        let settings = PollerSettings::from_config(job_id, config);

        debug!("Status path {} resolved against {}", settings.base_path, page_url);
        info!("Following job {} at {}", settings.job_id, status_url);

        Ok(Self::new(settings, status_url, source, renderer))
    }

    pub fn new(settings: PollerSettings, status_url: Url, source: S, renderer: R) -> Self {
        Self {
            settings,
            status_url,
            source,
            renderer,
            page: PageElements::new(),
            state: JobState::Polling,
            polls: 0,
        }
    }

    pub fn status_url(&self) -> &Url {
        &self.status_url
    }

    pub fn state(&self) -> JobState {
        self.state
    }

    pub fn page(&self) -> &PageElements {
        &self.page
    }

    /// Fetch the status once and reflect it. A finished job is not fetched again.
    pub async fn poll_once(&mut self) -> Result<JobState, StatusError> {
        if self.state.is_terminal() {
            return Ok(self.state);
        }

        self.polls += 1;
        let response = self.source.fetch(&self.status_url).await?;

        self.state = self.page.apply(&response);
        self.renderer.render(&self.page, self.state);

        debug!(
            "Poll {} of job {}: '{}' ({})",
            self.polls, self.settings.job_id, response.status, self.state
        );

        Ok(self.state)
    }

    /// Poll until the job finishes, waiting the poll interval after every
    /// non-final update.
    pub async fn run(&mut self) -> Result<PollSummary, StatusError> {
        let mut failures = 0;

        loop {
            match self.poll_once().await {
                Ok(JobState::Finished) => break,
                Ok(JobState::Polling) => failures = 0,
                Err(e) if e.is_remote() && failures < self.settings.max_consecutive_failures => {
                    failures += 1;
                    warn!(
                        "Status poll failed ({}/{}): {}",
                        failures, self.settings.max_consecutive_failures, e
                    );
                }
                Err(e) => {
                    error!("Giving up on job {}: {}", self.settings.job_id, e);
                    return Err(e);
                }
            }

            tokio::time::sleep(self.settings.poll_interval).await;
        }

        info!("Job {} finished after {} polls", self.settings.job_id, self.polls);

        Ok(PollSummary {
            job_id: self.settings.job_id.clone(),
            polls: self.polls,
            state: self.state,
            page: self.page.clone(),
        })
    }
}
