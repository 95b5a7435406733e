use futures::stream::StreamExt;
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;

use crate::config::Config;

/// Errors that can occur while retrieving a feed document.
#[derive(Debug, Error)]
pub enum FetchError {
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Request exceeded the configured timeout
    #[error("Request timed out")]
    Timeout,
    /// Server returned 429 Too Many Requests after max retries
    #[error("Rate limited after {0} retries")]
    RateLimited(u32),
    /// Response body exceeded the size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Response was incomplete (received fewer bytes than Content-Length)
    #[error("Incomplete response: expected {expected} bytes, received {received}")]
    IncompleteResponse { expected: u64, received: usize },
}

/// Retrieval limits for a single feed request.
#[derive(Debug, Clone)]
pub struct FetchOptions {
    /// Per-attempt request timeout.
    pub timeout: Duration,
    /// Retries allowed for 429, 5xx and truncated bodies.
    pub max_retries: u32,
    /// Maximum accepted body size in bytes.
    pub max_size: usize,
    /// First backoff delay; doubles on every retry.
    pub backoff_base: Duration,
}

impl Default for FetchOptions {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(30),
            max_retries: 3,
            max_size: 10 * 1024 * 1024, // 10MB
            backoff_base: Duration::from_secs(1),
        }
    }
}

impl From<&Config> for FetchOptions {
    fn from(config: &Config) -> Self {
        Self {
            timeout: Duration::from_secs(config.timeout_secs),
            max_retries: config.max_retries,
            max_size: config.max_feed_size,
            ..Self::default()
        }
    }
}

/// Builds the HTTP client used for feed requests.
pub fn build_client(user_agent: Option<&str>) -> Result<reqwest::Client, FetchError> {
    let mut builder = reqwest::Client::builder();
    if let Some(agent) = user_agent {
        builder = builder.user_agent(agent);
    }
    Ok(builder.build()?)
}

/// Fetches a feed document and returns its body as text.
///
/// # Behavior
///
/// - Each attempt, headers and body together, is bounded by `options.timeout`
/// - HTTP 429 and 5xx responses are retried with exponential backoff
///   (`backoff_base`, doubled per attempt) up to `options.max_retries` times
/// - Other non-2xx responses fail immediately
/// - Bodies larger than `options.max_size` are rejected
/// - Bodies shorter than their Content-Length are retried, then reported
///
/// Invalid UTF-8 in the body is replaced rather than rejected.
///
/// # Errors
///
/// - [`FetchError::Network`] - Connection or TLS errors
/// - [`FetchError::Timeout`] - An attempt exceeded the timeout
/// - [`FetchError::HttpStatus`] - Non-2xx HTTP response
/// - [`FetchError::RateLimited`] - 429 response after max retries
/// - [`FetchError::ResponseTooLarge`] - Body exceeded the size limit
/// - [`FetchError::IncompleteResponse`] - Truncated body after max retries
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
    options: &FetchOptions,
) -> Result<String, FetchError> {
    let mut retry_count = 0;

    let bytes = loop {
        // One deadline covers both the response headers and the body
        let deadline = Instant::now() + options.timeout;
        let response = tokio::time::timeout_at(deadline, client.get(url).send())
            .await
            .map_err(|_| FetchError::Timeout)?
            .map_err(FetchError::Network)?;

        let status = response.status();
        let retryable = status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error();

        if retryable {
            if retry_count >= options.max_retries {
                return Err(if status == reqwest::StatusCode::TOO_MANY_REQUESTS {
                    FetchError::RateLimited(options.max_retries)
                } else {
                    FetchError::HttpStatus(status.as_u16())
                });
            }

            let delay = backoff(options, retry_count);
            tracing::warn!(
                feed = %url,
                status = %status,
                retry = retry_count,
                delay_ms = delay.as_millis() as u64,
                "Retryable response, backing off"
            );

            tokio::time::sleep(delay).await;
            retry_count += 1;
            continue;
        }

        // 4xx and other non-success statuses fail immediately
        if !status.is_success() {
            return Err(FetchError::HttpStatus(status.as_u16()));
        }

        let body = tokio::time::timeout_at(deadline, read_limited_bytes(response, options.max_size))
            .await
            .map_err(|_| FetchError::Timeout)?;

        match body {
            Ok(bytes) => break bytes,
            Err(FetchError::IncompleteResponse { expected, received }) => {
                if retry_count >= options.max_retries {
                    return Err(FetchError::IncompleteResponse { expected, received });
                }

                let delay = backoff(options, retry_count);
                tracing::debug!(
                    feed = %url,
                    expected = expected,
                    received = received,
                    attempt = retry_count + 1,
                    delay_ms = delay.as_millis() as u64,
                    "Retrying incomplete download"
                );

                tokio::time::sleep(delay).await;
                retry_count += 1;
                continue;
            }
            Err(e) => return Err(e),
        }
    };

    tracing::debug!(feed = %url, bytes = bytes.len(), "Fetched feed");

    match String::from_utf8(bytes) {
        Ok(text) => Ok(text),
        Err(e) => {
            tracing::warn!(feed = %url, error = %e, "Feed body is not valid UTF-8, replacing invalid bytes");
            Ok(String::from_utf8_lossy(e.as_bytes()).into_owned())
        }
    }
}

fn backoff(options: &FetchOptions, retry_count: u32) -> Duration {
    options.backoff_base.saturating_mul(2u32.saturating_pow(retry_count))
}

async fn read_limited_bytes(
    response: reqwest::Response,
    limit: usize,
) -> Result<Vec<u8>, FetchError> {
    let expected_length = response.content_length();

    // Fast path: check Content-Length header
    if let Some(len) = expected_length {
        if len > limit as u64 {
            return Err(FetchError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(FetchError::Network)?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FetchError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    if let Some(expected) = expected_length {
        if (bytes.len() as u64) < expected {
            return Err(FetchError::IncompleteResponse {
                expected,
                received: bytes.len(),
            });
        }
    }

    Ok(bytes)
}
