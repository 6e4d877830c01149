//! HTTP publish sink for alarm envelopes.

use crate::config::Config;
use crate::event::AlarmEvent;
use async_trait::async_trait;
use std::sync::atomic::{AtomicU64, Ordering};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("sink rejected event: {status} - {body}")]
    Rejected { status: u16, body: String },
}

/// Where envelopes go. The simulation loop depends only on this seam, so
/// tests substitute a scripted sink for the real endpoint.
#[async_trait]
pub trait PublishSink: Send + Sync {
    /// Submits a single envelope. Any non-2xx response or transport
    /// failure is an error for that event alone.
    async fn publish(&self, event: &AlarmEvent) -> Result<(), PublishError>;
}

/// Counters for publish outcomes across the whole run.
#[derive(Debug, Default)]
pub struct PublishStats {
    pub events_published: AtomicU64,
    pub events_failed: AtomicU64,
    pub ticks_completed: AtomicU64,
}

impl PublishStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_published(&self) {
        self.events_published.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failed(&self) {
        self.events_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_tick(&self) {
        self.ticks_completed.fetch_add(1, Ordering::Relaxed);
    }
}

/// Publisher that posts envelopes to an Event Grid style topic endpoint.
pub struct HttpPublisher {
    client: reqwest::Client,
    endpoint_url: String,
    sas_key: String,
}

impl HttpPublisher {
    pub fn new(config: &Config) -> Self {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            endpoint_url: config.endpoint_url.clone(),
            sas_key: config.sas_key.clone(),
        }
    }
}

#[async_trait]
impl PublishSink for HttpPublisher {
    async fn publish(&self, event: &AlarmEvent) -> Result<(), PublishError> {
        // The ingestion side expects a single-element array of envelopes.
        let response = self
            .client
            .post(&self.endpoint_url)
            .header("aeg-sas-key", &self.sas_key)
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&[event])
            .send()
            .await?;

        if response.status().is_success() {
            Ok(())
        } else {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            Err(PublishError::Rejected { status, body })
        }
    }
}
