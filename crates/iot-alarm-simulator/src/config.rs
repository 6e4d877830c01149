//! Startup configuration.
//!
//! Every knob is collected once at process start into an immutable
//! [`Config`] that is passed explicitly to the fleet and the loop; nothing
//! reads process-wide state afterwards.

use crate::geo::{BoundingBox, ParseDecimalError};
use std::time::Duration;
use thiserror::Error;

/// Milliseconds between publish ticks when not overridden.
pub const DEFAULT_PUBLISH_INTERVAL_MS: u64 = 5000;

/// Fleet size when not overridden.
pub const DEFAULT_DEVICE_COUNT: usize = 20;

/// Status skew when not overridden: one draw in ten comes up red.
pub const DEFAULT_STATUS_WEIGHT: u32 = 10;

/// Per-request publish timeout when not overridden.
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

// Default rectangle describing the bulk of England without hitting sea:
// Taunton / Mid Sussex along the bottom, Blackpool / Hull along the top.
pub const DEFAULT_MAX_LAT: &str = "53.810382";
pub const DEFAULT_MIN_LAT: &str = "51.010299";
pub const DEFAULT_MAX_LONG: &str = "-0.145569";
pub const DEFAULT_MIN_LONG: &str = "-3.048706";

/// Configuration errors are fatal: they surface before any event is sent.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid coordinate bound: {0}")]
    Coordinate(#[from] ParseDecimalError),

    #[error("{0} must not be empty")]
    EmptyValue(&'static str),

    #[error("device count must be at least 1")]
    NoDevices,

    #[error("status weight must be at least 2, got {0}")]
    StatusWeightTooSmall(u32),
}

/// Immutable runtime configuration, constructed once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// Ingestion endpoint the envelopes are posted to.
    pub endpoint_url: String,

    /// Resource path stamped into every envelope's topic field.
    pub topic_resource: String,

    /// Shared-secret key sent in the `aeg-sas-key` header.
    pub sas_key: String,

    /// Image reported for a genuine alarm.
    pub true_image_url: String,

    /// Image reported for a false alarm.
    pub false_image_url: String,

    /// Fixed pause between ticks, constant for the process lifetime.
    pub publish_interval: Duration,

    /// Number of simulated devices.
    pub device_count: usize,

    /// Rectangle the device locations are drawn from.
    pub bounding_box: BoundingBox,

    /// Status skew: one draw in `status_weight` comes up red.
    pub status_weight: u32,

    /// Upper bound on a single publish request.
    pub request_timeout: Duration,
}

impl Config {
    /// Checks the invariants the argument parser cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("endpoint URL", &self.endpoint_url),
            ("topic resource", &self.topic_resource),
            ("sas key", &self.sas_key),
            ("true image URL", &self.true_image_url),
            ("false image URL", &self.false_image_url),
        ] {
            if value.trim().is_empty() {
                return Err(ConfigError::EmptyValue(name));
            }
        }

        if self.device_count == 0 {
            return Err(ConfigError::NoDevices);
        }
        if self.status_weight < 2 {
            return Err(ConfigError::StatusWeightTooSmall(self.status_weight));
        }

        Ok(())
    }
}
