//! One GraphQL call, retried.
//!
//! [`PageFetcher`] owns the HTTP session, the credential, and the retry
//! budget for the whole run. Callers hand it a query document plus variables
//! and get back one typed page; cursor continuation stays with the caller.
//!
//! Transient failures (network faults, HTTP 5xx, rate-limit responses,
//! malformed pages) are retried with exponential back-off through an
//! injectable [`Delay`], so tests run with zero real waiting. Exhausting the
//! budget surfaces a [`report::ApiError`] carrying the query context; whether
//! that skips a branch, a repository, or an organization is the caller's
//! decision.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{ACCEPT, RETRY_AFTER};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;
use tracing::warn;

use report::{ApiError, Delay, RetryPolicy};

/// Accept header value for the GraphQL v4 API.
const ACCEPT_V4: &str = "application/vnd.github.v4+json";

// ---------------------------------------------------------------------------
// Retry configuration
// ---------------------------------------------------------------------------

/// Bounds for the transient-failure retry loop.
#[derive(Debug, Clone, Copy)]
pub struct RetryConfig {
    /// Maximum attempts per call, including the first.
    pub max_attempts: u32,
    /// Back-off before the second attempt; doubles per further attempt.
    pub base_delay: Duration,
    /// Upper bound on any single back-off, including server-suggested ones.
    pub max_delay: Duration,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay: Duration::from_millis(500),
            max_delay: Duration::from_secs(60),
        }
    }
}

// ---------------------------------------------------------------------------

/// [`Delay`] implementation backed by the Tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioDelay;

#[async_trait]
impl Delay for TokioDelay {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

// ---------------------------------------------------------------------------
// Wire envelope
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

// ---------------------------------------------------------------------------
// Failure classification
// ---------------------------------------------------------------------------

/// One attempt's failure, before retry classification.
#[derive(Debug, Error)]
enum FetchError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("unexpected HTTP status {status}")]
    Status {
        status: StatusCode,
        retry_after: Option<Duration>,
    },

    #[error("query returned errors: {message}")]
    GraphQl { message: String, rate_limited: bool },

    #[error("malformed response: {0}")]
    Malformed(String),
}

impl FetchError {
    fn retry_policy(&self) -> RetryPolicy {
        match self {
            // Network faults and partial pages tend to heal on re-request.
            Self::Transport(_) | Self::Malformed(_) => RetryPolicy::Retryable { after: None },
            Self::Status {
                status,
                retry_after,
            } if status.is_server_error() || *status == StatusCode::TOO_MANY_REQUESTS => {
                RetryPolicy::Retryable {
                    after: *retry_after,
                }
            }
            // Auth failures, unknown organizations, schema errors.
            Self::Status { .. } => RetryPolicy::NonRetryable,
            Self::GraphQl { rate_limited, .. } => {
                if *rate_limited {
                    RetryPolicy::Retryable { after: None }
                } else {
                    RetryPolicy::NonRetryable
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// The fetcher
// ---------------------------------------------------------------------------

/// Issues GraphQL queries with bounded retry.
///
/// One fetcher is constructed per run and shared by every query; it carries
/// the HTTP session and the rate-limit-relevant state so nothing leaks
/// across runs.
pub struct PageFetcher {
    http: reqwest::Client,
    endpoint: String,
    token: String,
    retry: RetryConfig,
    delay: Arc<dyn Delay>,
}

impl PageFetcher {
    /// Creates a fetcher over an existing HTTP session.
    pub fn new(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        token: impl Into<String>,
        retry: RetryConfig,
        delay: Arc<dyn Delay>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            token: token.into(),
            retry,
            delay,
        }
    }

    /// Runs `query` with `variables`, retrying transient failures, and
    /// deserialises the response's `data` into `T`.
    ///
    /// `context` names what is being fetched (e.g. `"branches of
    /// acme/widgets"`) and travels with any resulting [`ApiError`].
    pub async fn run<T: DeserializeOwned>(
        &self,
        context: &str,
        query: &str,
        variables: Value,
    ) -> Result<T, ApiError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let failure = match self.issue::<T>(query, &variables).await {
                Ok(data) => return Ok(data),
                Err(failure) => failure,
            };

            let exhausted = attempt >= self.retry.max_attempts;
            match failure.retry_policy() {
                RetryPolicy::Retryable { after } if !exhausted => {
                    let wait = after
                        .unwrap_or_else(|| self.backoff(attempt))
                        .min(self.retry.max_delay);
                    warn!(
                        context,
                        attempt,
                        wait_ms = wait.as_millis() as u64,
                        error = %failure,
                        "transient query failure, backing off"
                    );
                    self.delay.sleep(wait).await;
                }
                _ => {
                    return Err(ApiError {
                        query: context.to_string(),
                        attempts: attempt,
                        message: failure.to_string(),
                    });
                }
            }
        }
    }

    fn backoff(&self, attempt: u32) -> Duration {
        self.retry.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    async fn issue<T: DeserializeOwned>(
        &self,
        query: &str,
        variables: &Value,
    ) -> Result<T, FetchError> {
        let response = self
            .http
            .post(&self.endpoint)
            .bearer_auth(&self.token)
            .header(ACCEPT, ACCEPT_V4)
            .json(&serde_json::json!({ "query": query, "variables": variables }))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .map(Duration::from_secs);
            return Err(FetchError::Status {
                status,
                retry_after,
            });
        }

        let body = response.text().await?;
        let envelope: Envelope<T> =
            serde_json::from_str(&body).map_err(|e| FetchError::Malformed(e.to_string()))?;

        if !envelope.errors.is_empty() {
            let rate_limited = envelope
                .errors
                .iter()
                .any(|e| e.kind.as_deref() == Some("RATE_LIMITED"));
            let message = envelope
                .errors
                .iter()
                .map(|e| e.message.as_str())
                .collect::<Vec<_>>()
                .join("; ");
            return Err(FetchError::GraphQl {
                message,
                rate_limited,
            });
        }

        envelope
            .data
            .ok_or_else(|| FetchError::Malformed("response carries neither data nor errors".into()))
    }
}

impl std::fmt::Debug for PageFetcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageFetcher")
            .field("endpoint", &self.endpoint)
            .field("token", &"<redacted>")
            .field("retry", &self.retry)
            .finish()
    }
}
