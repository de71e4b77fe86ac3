//! Contact-message delivery to a hosted form endpoint.
//!
//! [`FormRelay`] posts the message as JSON to a form-collection service.
//! Failed attempts are retried with exponential backoff (1 s, 2 s) before
//! the failure is reported to the visitor.

use std::time::Duration;

use async_trait::async_trait;
use folio_core::contact::{ContactMessage, MessageRelay};
use folio_core::error::CoreError;

/// Retry delays in seconds.
const RETRY_DELAYS_SECS: [u64; 2] = [1, 2];

/// HTTP request timeout for a single delivery attempt.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

// ---------------------------------------------------------------------------
// Error
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum FormRelayError {
    /// The underlying HTTP request failed (network, DNS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The form service returned a non-2xx status code.
    #[error("Form endpoint returned HTTP {0}")]
    HttpStatus(u16),
}

// ---------------------------------------------------------------------------
// FormRelay
// ---------------------------------------------------------------------------

pub struct FormRelay {
    client: reqwest::Client,
    endpoint: String,
    retry_delays: Vec<Duration>,
}

impl FormRelay {
    /// Build a relay posting to `endpoint`.
    pub fn new(endpoint: impl Into<String>) -> Result<Self, FormRelayError> {
        let client = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            client,
            endpoint: endpoint.into(),
            retry_delays: RETRY_DELAYS_SECS
                .iter()
                .map(|s| Duration::from_secs(*s))
                .collect(),
        })
    }

    /// Replace the backoff schedule. An empty schedule means a single attempt.
    pub fn with_retry_delays(mut self, delays: Vec<Duration>) -> Self {
        self.retry_delays = delays;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Post with retry. Returns on the first successful attempt.
    pub async fn deliver(&self, message: &ContactMessage) -> Result<(), FormRelayError> {
        for (attempt, delay) in self.retry_delays.iter().enumerate() {
            match self.try_send(message).await {
                Ok(()) => return Ok(()),
                // The service rejected the payload itself; a retry won't help.
                Err(FormRelayError::HttpStatus(code)) if (400..500).contains(&code) => {
                    return Err(FormRelayError::HttpStatus(code));
                }
                Err(e) => {
                    tracing::warn!(
                        attempt = attempt + 1,
                        endpoint = %self.endpoint,
                        error = %e,
                        "Contact form delivery attempt failed, retrying"
                    );
                    tokio::time::sleep(*delay).await;
                }
            }
        }

        // Final attempt after the last backoff.
        self.try_send(message).await
    }

    async fn try_send(&self, message: &ContactMessage) -> Result<(), FormRelayError> {
        let response = self
            .client
            .post(&self.endpoint)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(message)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(FormRelayError::HttpStatus(response.status().as_u16()));
        }
        Ok(())
    }
}

#[async_trait]
impl MessageRelay for FormRelay {
    async fn send(&self, message: &ContactMessage) -> Result<(), CoreError> {
        match self.deliver(message).await {
            Ok(()) => {
                tracing::info!(subject = %message.subject, "Contact form relayed");
                Ok(())
            }
            Err(e) => {
                tracing::error!(endpoint = %self.endpoint, error = %e, "Contact form relay failed");
                Err(CoreError::RelayFailed(e.to_string()))
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
