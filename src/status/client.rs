use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::cli::config::EndpointSettings;
use crate::status::error::StatusError;
use crate::status::response::StatusResponse;

/// Anything that can answer a status query for a resolved status URL
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatusSource: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<StatusResponse, StatusError>;
}

/// Status source backed by the crawl service's HTTP endpoint
pub struct HttpStatusClient {
    client: Client,
}

impl HttpStatusClient {
    pub fn new(settings: &EndpointSettings) -> Result<Self, StatusError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .user_agent(settings.user_agent.as_str())
            .build()
            .map_err(StatusError::ClientSetup)?;

        Ok(Self { client })
    }
}

#[async_trait]
impl StatusSource for HttpStatusClient {
    async fn fetch(&self, url: &Url) -> Result<StatusResponse, StatusError> {
        debug!("Requesting job status from {}", url);

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|source| StatusError::Transport {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StatusError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        let body = response.text().await.map_err(|source| StatusError::Transport {
            url: url.to_string(),
            source,
        })?;

        serde_json::from_str(&body).map_err(|e| StatusError::Decode {
            url: url.to_string(),
            reason: e.to_string(),
        })
    }
}
