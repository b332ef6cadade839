use serde::{Deserialize, Serialize};
use std::fmt;

/// Status prefix the endpoint uses for a job that will not change anymore
pub const TERMINAL_PREFIX: &str = "Finished";

/// Payload returned by the job status endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusResponse {
    /// Free-form job state, e.g. "Running" or "Finished OK"
    pub status: String,

    /// Pages crawled so far, absent while unknown
    pub number_of_crawled_urls: Option<u64>,

    /// URL being crawled
    pub url: Option<String>,

    /// Location of the crawl report, meaningful once finished
    pub report_url: Option<String>,

    /// Job identifier as the endpoint knows it
    pub id: Option<String>,

    /// When the crawl started, preformatted by the endpoint
    pub start_time: Option<String>,

    /// When the crawl finished, empty while running
    pub finish_time: Option<String>,
}

impl StatusResponse {
    pub fn state(&self) -> JobState {
        JobState::of(&self.status)
    }
}

/// Where a followed job stands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Polling,
    Finished,
}

impl JobState {
    /// Classify a raw status string. Case-sensitive prefix match.
    pub fn of(status: &str) -> Self {
        if status.starts_with(TERMINAL_PREFIX) {
            JobState::Finished
        } else {
            JobState::Polling
        }
    }

    pub fn is_terminal(self) -> bool {
        self == JobState::Finished
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Polling => write!(f, "polling"),
            JobState::Finished => write!(f, "finished"),
        }
    }
}
