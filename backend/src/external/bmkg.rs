//! BMKG public forecast API client
//!
//! Fetches `prakiraan-cuaca` forecasts for a single ADM4 village code

use reqwest::{header, Client};
use std::time::Duration;

use shared::models::BmkgPayload;

use crate::config::BmkgConfig;
use crate::error::{AppError, AppResult};

/// Deadline for the connectivity check
pub const CONNECTION_TEST_TIMEOUT: Duration = Duration::from_secs(5);

/// BMKG API client
#[derive(Clone)]
pub struct BmkgClient {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl BmkgClient {
    /// Create a new BmkgClient from configuration
    pub fn new(config: &BmkgConfig) -> AppResult<Self> {
        let client = Client::builder()
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| AppError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.clone(),
            timeout: config.timeout(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Fetch the raw forecast for an ADM4 code.
    ///
    /// The code is sent as-is; callers validate its format first. No retries.
    pub async fn fetch_forecast(&self, adm4: &str) -> AppResult<BmkgPayload> {
        tracing::info!(adm4, "Fetching BMKG forecast");

        let response = self
            .client
            .get(&self.base_url)
            .query(&[("adm4", adm4)])
            .header(header::ACCEPT, "application/json")
            .timeout(self.timeout)
            .send()
            .await
            .map_err(classify_error)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(adm4, %status, "BMKG returned an error status");
            return Err(AppError::UpstreamError {
                status: Some(status.as_u16()),
                message: truncate(&body, 200),
            });
        }

        let payload: BmkgPayload = response.json().await.map_err(|e| {
            if e.is_timeout() {
                AppError::UpstreamTimeout
            } else {
                AppError::UpstreamError {
                    status: None,
                    message: format!("Failed to parse BMKG response: {}", e),
                }
            }
        })?;

        tracing::debug!(adm4, days = payload.days().len(), "BMKG forecast received");
        Ok(payload)
    }

    /// Whether the BMKG endpoint answers with a success status within 5 seconds
    pub async fn test_connection(&self) -> bool {
        match self
            .client
            .get(&self.base_url)
            .timeout(CONNECTION_TEST_TIMEOUT)
            .send()
            .await
        {
            Ok(response) => response.status().is_success(),
            Err(e) => {
                tracing::warn!("BMKG connection test failed: {}", e);
                false
            }
        }
    }
}

/// Map a transport error onto the upstream error taxonomy
fn classify_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::UpstreamTimeout
    } else if err.is_connect() {
        AppError::UpstreamUnavailable(err.to_string())
    } else {
        AppError::UpstreamError {
            status: err.status().map(|s| s.as_u16()),
            message: err.to_string(),
        }
    }
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
