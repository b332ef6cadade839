use serde::Serialize;
use tracing::warn;
use v_htmlescape::escape;

use crate::status::response::{JobState, StatusResponse};

/// Content of the elements a status page shows for a job.
///
/// Every poll overwrites these from the latest response; nothing is read back.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageElements {
    /// `#status`
    pub status: String,

    /// `#crawl_url`
    pub crawl_url: String,

    /// `#number_of_crawled_urls`, untouched while the count is unknown
    pub number_of_crawled_urls: String,

    /// `#report_link`, an anchor once the job finished
    pub report_link: String,

    /// Start and finish times when the endpoint reports them
    pub timing: String,
}

impl PageElements {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write a status response into the elements and report the resulting state
    pub fn apply(&mut self, response: &StatusResponse) -> JobState {
        self.status = format!("Job is {}", response.status);
        self.crawl_url = format!("Crawling url {}", response.url.as_deref().unwrap_or_default());

        // A missing count leaves the previous text in place
        if let Some(count) = response.number_of_crawled_urls {
            self.number_of_crawled_urls = format!("{} urls crawled.", count);
        }

        self.timing = match (&response.start_time, &response.finish_time) {
            (Some(start), Some(finish)) if !finish.is_empty() => {
                format!("Started {}, finished {}", start, finish)
            }
            (Some(start), _) => format!("Started {}", start),
            _ => String::new(),
        };

        let state = response.state();
        self.report_link = match (state, &response.report_url) {
            (JobState::Finished, Some(report_url)) => anchor(report_url),
            (JobState::Finished, None) => {
                warn!("Job finished with status '{}' but no report URL", response.status);
                String::new()
            }
            (JobState::Polling, _) => String::new(),
        };

        state
    }
}

/// HTML link whose text and target are both `href`
pub fn anchor(href: &str) -> String {
    format!("<a href=\"{0}\">{0}</a>", escape(href))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn running(count: Option<u64>) -> StatusResponse {
        StatusResponse {
            status: "Running".to_string(),
            number_of_crawled_urls: count,
            url: Some("http://x".to_string()),
            report_url: None,
            id: None,
            start_time: None,
            finish_time: None,
        }
    }

    #[test]
    fn test_apply_running() {
        let mut page = PageElements::new();
        let state = page.apply(&running(Some(5)));

        assert_eq!(state, JobState::Polling);
        assert_eq!(page.status, "Job is Running");
        assert_eq!(page.crawl_url, "Crawling url http://x");
        assert_eq!(page.number_of_crawled_urls, "5 urls crawled.");
        assert_eq!(page.report_link, "");
    }

    #[test]
    fn test_missing_count_keeps_previous_text() {
        let mut page = PageElements::new();
        page.apply(&running(Some(5)));
        page.apply(&running(None));
        assert_eq!(page.number_of_crawled_urls, "5 urls crawled.");

        page.apply(&running(Some(9)));
        assert_eq!(page.number_of_crawled_urls, "9 urls crawled.");

        let mut fresh = PageElements::new();
        fresh.apply(&running(None));
        assert_eq!(fresh.number_of_crawled_urls, "");
    }

    #[test]
    fn test_apply_finished_renders_report_link() {
        let mut page = PageElements::new();
        let response = StatusResponse {
            status: "Finished OK".to_string(),
            report_url: Some("http://x/report.html".to_string()),
            ..running(None)
        };

        assert_eq!(page.apply(&response), JobState::Finished);
        assert_eq!(page.status, "Job is Finished OK");
        assert_eq!(page.report_link, anchor("http://x/report.html"));
        assert!(page.report_link.starts_with("<a href=\"http:"));
    }

    #[test]
    fn test_finished_without_report_url() {
        let mut page = PageElements::new();
        let response = StatusResponse {
            status: "Finished".to_string(),
            ..running(None)
        };

        assert_eq!(page.apply(&response), JobState::Finished);
        assert_eq!(page.report_link, "");
    }

    #[test]
    fn test_polling_clears_report_link() {
        let mut page = PageElements::new();
        page.report_link = anchor("http://old/report.html");
        page.apply(&running(None));
        assert_eq!(page.report_link, "");
    }

    #[test]
    fn test_missing_url_renders_empty() {
        let mut page = PageElements::new();
        page.apply(&StatusResponse { url: None, ..running(None) });
        assert_eq!(page.crawl_url, "Crawling url ");
    }

    #[test]
    fn test_timing_line() {
        let mut page = PageElements::new();
        page.apply(&StatusResponse {
            start_time: Some("01 Mar 2017 10:00:00 GMT".to_string()),
            finish_time: Some(String::new()),
            ..running(None)
        });
        assert_eq!(page.timing, "Started 01 Mar 2017 10:00:00 GMT");

        page.apply(&StatusResponse {
            start_time: Some("10:00".to_string()),
            finish_time: Some("11:30".to_string()),
            ..running(None)
        });
        assert_eq!(page.timing, "Started 10:00, finished 11:30");
    }

    #[test]
    fn test_anchor_escapes_markup() {
        assert_eq!(
            anchor("report?a=1&b=\"2\"<x>"),
            "<a href=\"report?a=1&amp;b=&quot;2&quot;&lt;x&gt;\">report?a=1&amp;b=&quot;2&quot;&lt;x&gt;</a>"
        );
    }
}
