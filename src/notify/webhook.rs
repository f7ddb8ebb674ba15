use anyhow::{Context, Result};
use async_trait::async_trait;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, warn};

use super::payload::NotificationPayload;

/// Delivery to the sink failed. Non-fatal for the run: the listing's
/// notification is lost and processing continues.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("webhook request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("webhook returned status {status}")]
    Status { status: reqwest::StatusCode },
}

/// External delivery transport for notification payloads.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    async fn send(&self, payload: &NotificationPayload) -> Result<(), TransportError>;
}

/// Posts payloads as JSON to a webhook URL.
pub struct WebhookSink {
    url: String,
    http: reqwest::Client,
}

impl WebhookSink {
    pub fn new(url: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .context("Failed to create HTTP client for webhook")?;
        Ok(Self {
            url: url.to_string(),
            http,
        })
    }
}

#[async_trait]
impl NotificationSink for WebhookSink {
    async fn send(&self, payload: &NotificationPayload) -> Result<(), TransportError> {
        let response = self.http.post(&self.url).json(payload).send().await?;
        if !response.status().is_success() {
            return Err(TransportError::Status {
                status: response.status(),
            });
        }
        debug!("Webhook accepted the notification");
        Ok(())
    }
}

/// Bounded retry with doubling backoff around any sink.
///
/// Exhaustion surfaces the last error; the caller skips the listing, which
/// keeps skip-on-failure as the terminal fallback.
pub struct RetryingSink<S> {
    inner: S,
    attempts: u32,
    base_delay: Duration,
}

impl<S> RetryingSink<S> {
    pub fn new(inner: S, attempts: u32, base_delay: Duration) -> Self {
        Self {
            inner,
            attempts: attempts.max(1),
            base_delay,
        }
    }
}

#[async_trait]
impl<S: NotificationSink> NotificationSink for RetryingSink<S> {
    async fn send(&self, payload: &NotificationPayload) -> Result<(), TransportError> {
        let mut delay = self.base_delay;
        let mut attempt = 1;
        loop {
            match self.inner.send(payload).await {
                Ok(()) => return Ok(()),
                Err(err) if attempt < self.attempts => {
                    warn!(attempt, error = %err, "Webhook delivery failed, retrying");
                    tokio::time::sleep(delay).await;
                    delay *= 2;
                    attempt += 1;
                }
                Err(err) => return Err(err),
            }
        }
    }
}
