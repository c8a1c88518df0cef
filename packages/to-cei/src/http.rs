//! Blocking fetches of remote text resources.
//!
//! [`Fetcher`] retries transient failures (connection errors, timeouts and
//! 5xx responses) with exponential backoff. Client errors and bodies that
//! are not UTF-8 fail on the first attempt.

use std::thread;
use std::time::Duration;

use reqwest::blocking::{Client, Response};

use crate::config::HTTP_TIMEOUT_SECS;
use crate::error::{CeiError, Result};

const USER_AGENT: &str = concat!("to-cei/", env!("CARGO_PKG_VERSION"));

const MAX_ATTEMPTS: u32 = 3;

const BASE_DELAY: Duration = Duration::from_millis(500);

/// Result of a single request that did not fail permanently.
enum Attempt {
    Done(String),
    Transient(String),
}

/// Text downloader with retry.
pub struct Fetcher {
    client: Client,
    max_attempts: u32,
    base_delay: Duration,
}

impl Fetcher {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            client,
            max_attempts: MAX_ATTEMPTS,
            base_delay: BASE_DELAY,
        })
    }

    /// Override the number of attempts (at least one) and the first backoff delay.
    pub fn with_retry(mut self, max_attempts: u32, base_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.base_delay = base_delay;
        self
    }

    /// Delay before attempt `attempt + 1`, doubling from the base delay.
    fn backoff(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt.saturating_sub(1))
    }

    /// Fetch `url` as UTF-8 text.
    pub fn fetch_text(&self, url: &str) -> Result<String> {
        let mut last_reason = String::from("no attempt made");

        for attempt in 1..=self.max_attempts {
            match self.attempt(url)? {
                Attempt::Done(text) => {
                    tracing::debug!(%url, attempt, bytes = text.len(), "Downloaded");
                    return Ok(text);
                }
                Attempt::Transient(reason) => {
                    tracing::warn!(
                        %url,
                        attempt,
                        max_attempts = self.max_attempts,
                        %reason,
                        "Transient failure"
                    );
                    last_reason = reason;
                }
            }

            if attempt < self.max_attempts {
                let delay = self.backoff(attempt);
                tracing::debug!(delay_ms = delay.as_millis() as u64, "Waiting before retry");
                thread::sleep(delay);
            }
        }

        Err(CeiError::RetriesExhausted {
            attempts: self.max_attempts,
            message: last_reason,
        })
    }

    fn attempt(&self, url: &str) -> Result<Attempt> {
        let response = match self.client.get(url).send() {
            Ok(response) => response,
            Err(e) if e.is_connect() || e.is_timeout() => {
                return Ok(Attempt::Transient(e.to_string()));
            }
            Err(e) => return Err(CeiError::Http(e)),
        };

        let status = response.status();
        if status.is_server_error() {
            return Ok(Attempt::Transient(format!("server error: {status}")));
        }
        decode(url, response.error_for_status()?)
    }
}

fn decode(url: &str, response: Response) -> Result<Attempt> {
    let bytes = match response.bytes() {
        Ok(bytes) => bytes,
        Err(e) if e.is_timeout() => return Ok(Attempt::Transient(e.to_string())),
        Err(e) => return Err(CeiError::Http(e)),
    };
    let text = String::from_utf8(bytes.to_vec())
        .map_err(|e| CeiError::SchemaLoad(format!("{url} is not valid UTF-8: {e}")))?;
    Ok(Attempt::Done(text))
}
