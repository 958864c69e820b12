// Shared HTTP plumbing for the hosted providers (embeddings, vector index, LLM).
// All three speak JSON over HTTPS, so the retry policy lives here once.


use std::time::Duration;

use thiserror::Error;
use tracing::{debug, warn};
use url::Url;

const DEFAULT_TIMEOUT_SECONDS: u64 = 30;
const DEFAULT_RETRY_ATTEMPTS: u32 = 3;
const EXPONENTIAL_BACKOFF_BASE: u64 = 2;

#[derive(Debug, Error)]
pub enum HttpError {
    #[error("HTTP status {status} from {url}")]
    Status { status: u16, url: String },

    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },
}

impl HttpError {
    /// Status code of the response, if the server answered at all.
    #[inline]
    pub fn status(&self) -> Option<u16> {
        match self {
            HttpError::Status { status, .. } => Some(*status),
            HttpError::Transport { .. } => None,
        }
    }
}

/// JSON-over-HTTP agent with bounded retries and exponential backoff.
///
/// Server errors (5xx) and transport failures are retried; client errors
/// (4xx) are returned immediately so callers can react to them (e.g. a 409
/// on index creation means the index already exists).
#[derive(Debug, Clone)]
pub struct RetryingAgent {
    agent: ureq::Agent,
    retry_attempts: u32,
}

impl Default for RetryingAgent {
    fn default() -> Self {
        Self::new(Duration::from_secs(DEFAULT_TIMEOUT_SECONDS))
    }
}

impl RetryingAgent {
    #[inline]
    pub fn new(timeout: Duration) -> Self {
        let agent = ureq::Agent::config_builder()
            .timeout_global(Some(timeout))
            .build()
            .into();

        Self {
            agent,
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
        }
    }

    #[inline]
    pub fn with_retry_attempts(mut self, attempts: u32) -> Self {
        self.retry_attempts = attempts.max(1);
        self
    }

    /// GET a JSON document, returning the raw response body.
    #[inline]
    pub fn get_json(&self, url: &Url, headers: &[(&str, &str)]) -> Result<String, HttpError> {
        self.request_with_retry(url, || {
            let mut request = self.agent.get(url.as_str());
            for (name, value) in headers {
                request = request.header(*name, *value);
            }
            request
                .call()
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })
    }

    /// POST a JSON body, returning the raw response body.
    #[inline]
    pub fn post_json(
        &self,
        url: &Url,
        headers: &[(&str, &str)],
        body: &str,
    ) -> Result<String, HttpError> {
        self.request_with_retry(url, || {
            let mut request = self
                .agent
                .post(url.as_str())
                .header("Content-Type", "application/json");
            for (name, value) in headers {
                request = request.header(*name, *value);
            }
            request
                .send(body)
                .and_then(|mut resp| resp.body_mut().read_to_string())
        })
    }

    fn request_with_retry<F>(&self, url: &Url, mut request_fn: F) -> Result<String, HttpError>
    where
        F: FnMut() -> Result<String, ureq::Error>,
    {
        let mut last_error = None;

        for attempt in 1..=self.retry_attempts {
            debug!(
                "HTTP request to {} attempt {}/{}",
                url, attempt, self.retry_attempts
            );

            match request_fn() {
                Ok(response_text) => {
                    debug!("Request succeeded on attempt {}", attempt);
                    return Ok(response_text);
                }
                Err(error) => {
                    let retryable = match &error {
                        ureq::Error::StatusCode(status) => {
                            if *status >= 500 {
                                warn!(
                                    "Server error (status {}), attempt {}/{}",
                                    status, attempt, self.retry_attempts
                                );
                                true
                            } else {
                                debug!("Client error (status {}), not retrying", status);
                                return Err(HttpError::Status {
                                    status: *status,
                                    url: url.to_string(),
                                });
                            }
                        }
                        ureq::Error::ConnectionFailed
                        | ureq::Error::HostNotFound
                        | ureq::Error::Timeout(_)
                        | ureq::Error::Io(_) => {
                            warn!(
                                "Transport error: {}, attempt {}/{}",
                                error, attempt, self.retry_attempts
                            );
                            true
                        }
                        _ => false,
                    };

                    if !retryable {
                        return Err(HttpError::Transport {
                            url: url.to_string(),
                            message: error.to_string(),
                        });
                    }

                    last_error = Some(match &error {
                        ureq::Error::StatusCode(status) => HttpError::Status {
                            status: *status,
                            url: url.to_string(),
                        },
                        other => HttpError::Transport {
                            url: url.to_string(),
                            message: other.to_string(),
                        },
                    });

                    if attempt < self.retry_attempts {
                        let delay_ms = EXPONENTIAL_BACKOFF_BASE.pow(attempt - 1) * 1000;
                        let delay = Duration::from_millis(delay_ms);
                        debug!("Waiting {:?} before retry", delay);
                        std::thread::sleep(delay);
                    }
                }
            }
        }

        Err(last_error.unwrap_or_else(|| HttpError::Transport {
            url: url.to_string(),
            message: "request failed after retries".to_string(),
        }))
    }
}
