//! HTTP client for the sealbox API.
//!
//! Owns the retry loop: 429 and 5xx responses and transport failures are
//! retried with `Retry-After`/backoff delays from `sealbox_core::retry`,
//! up to the configured attempt cap. Every response updates the last-seen
//! rate-limit snapshot.

use std::time::Duration;

use parking_lot::Mutex;
use reqwest::header::RETRY_AFTER;
use reqwest::{Response, StatusCode};
use thiserror::Error;
use tracing::{debug, warn};

use sealbox_core::model::{CreateSecretRequest, SecretMetadata, SecretReceipt};
use sealbox_core::retry::{
    parse_retry_after, RateLimitInfo, RetryState, HEADER_LIMIT, HEADER_REMAINING, HEADER_RESET,
};

use crate::config::Settings;

/// Errors surfaced by [`ApiClient`] calls.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid server URL {url:?}")]
    InvalidUrl { url: String },

    #[error("secret not found")]
    NotFound,

    #[error("server returned {status}: {message}")]
    Api { status: StatusCode, message: String },

    #[error("gave up after {attempts} attempts, last status {status}")]
    RetriesExhausted { attempts: u32, status: StatusCode },

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Client for the sealbox secret endpoints.
#[derive(Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    max_retries: u32,
    last_rate_limit: Mutex<Option<RateLimitInfo>>,
}

impl ApiClient {
    /// Build a client from settings. Rejects a server URL that is not
    /// http(s) up front instead of failing on the first request.
    pub fn new(settings: &Settings) -> Result<Self, ClientError> {
        let base = reqwest::Url::parse(&settings.server_url)
            .ok()
            .filter(|url| matches!(url.scheme(), "http" | "https"))
            .ok_or_else(|| ClientError::InvalidUrl {
                url: settings.server_url.clone(),
            })?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: base.as_str().trim_end_matches('/').to_string(),
            max_retries: settings.max_retries,
            last_rate_limit: Mutex::new(None),
        })
    }

    /// `POST /api/secrets`
    pub async fn create_secret(
        &self,
        request: &CreateSecretRequest,
    ) -> Result<SecretReceipt, ClientError> {
        let url = format!("{}/api/secrets", self.base_url);
        let response = self
            .send_with_retry(|| self.http.post(&url).json(request))
            .await?;
        Ok(response.json().await?)
    }

    /// `GET /api/secrets/{id}`
    pub async fn secret_metadata(&self, id: &str) -> Result<SecretMetadata, ClientError> {
        let url = format!("{}/api/secrets/{}", self.base_url, id);
        let response = self.send_with_retry(|| self.http.get(&url)).await?;
        Ok(response.json().await?)
    }

    /// `DELETE /api/secrets/{id}`
    pub async fn delete_secret(&self, id: &str) -> Result<(), ClientError> {
        let url = format!("{}/api/secrets/{}", self.base_url, id);
        self.send_with_retry(|| self.http.delete(&url)).await?;
        Ok(())
    }

    /// Rate-limit snapshot from the most recent response that carried the
    /// full header triple.
    pub fn last_rate_limit(&self) -> Option<RateLimitInfo> {
        *self.last_rate_limit.lock()
    }

    async fn send_with_retry<F>(&self, build: F) -> Result<Response, ClientError>
    where
        F: Fn() -> reqwest::RequestBuilder,
    {
        let mut attempt: u32 = 0;
        loop {
            match build().send().await {
                Ok(response) => {
                    self.record_rate_limit(&response);
                    let status = response.status();
                    if status.is_success() {
                        return Ok(response);
                    }
                    if status == StatusCode::NOT_FOUND {
                        return Err(ClientError::NotFound);
                    }
                    if !(status == StatusCode::TOO_MANY_REQUESTS || status.is_server_error()) {
                        let message = response.text().await.unwrap_or_default();
                        return Err(ClientError::Api { status, message });
                    }
                    if attempt >= self.max_retries {
                        return Err(ClientError::RetriesExhausted {
                            attempts: attempt + 1,
                            status,
                        });
                    }
                    let retry_after_seconds = parse_retry_after(
                        response
                            .headers()
                            .get(RETRY_AFTER)
                            .and_then(|v| v.to_str().ok()),
                    );
                    let delay = RetryState {
                        attempt,
                        retry_after_seconds,
                    }
                    .delay();
                    debug!(
                        attempt,
                        status = %status,
                        delay_ms = delay.as_millis() as u64,
                        "retrying request"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                Err(err) => {
                    if attempt >= self.max_retries {
                        return Err(ClientError::Transport(err));
                    }
                    let delay = RetryState {
                        attempt,
                        retry_after_seconds: None,
                    }
                    .delay();
                    debug!(
                        attempt,
                        error = %err,
                        delay_ms = delay.as_millis() as u64,
                        "retrying after transport error"
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
            }
        }
    }

    fn record_rate_limit(&self, response: &Response) {
        let headers = response.headers();
        let value = |name: &str| headers.get(name).and_then(|v| v.to_str().ok());
        if let Some(info) = RateLimitInfo::from_header_values(
            value(HEADER_LIMIT),
            value(HEADER_REMAINING),
            value(HEADER_RESET),
        ) {
            if info.is_near_limit() {
                warn!(
                    percent_used = info.percent_used,
                    remaining = info.remaining,
                    "rate limit nearly exhausted"
                );
            }
            *self.last_rate_limit.lock() = Some(info);
        }
    }
}
