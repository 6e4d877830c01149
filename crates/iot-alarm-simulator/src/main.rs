//! CLI entry point for the alarm fleet simulator.

use anyhow::Result;
use clap::Parser;
use iot_alarm_simulator::config::{
    Config, DEFAULT_DEVICE_COUNT, DEFAULT_MAX_LAT, DEFAULT_MAX_LONG, DEFAULT_MIN_LAT,
    DEFAULT_MIN_LONG, DEFAULT_PUBLISH_INTERVAL_MS, DEFAULT_REQUEST_TIMEOUT_SECS,
    DEFAULT_STATUS_WEIGHT,
};
use iot_alarm_simulator::fleet::generate_fleet;
use iot_alarm_simulator::geo::{derive_ranges, BoundingBox, CoordinateSampler, DecimalDegrees};
use iot_alarm_simulator::publisher::{HttpPublisher, PublishStats};
use iot_alarm_simulator::readings::ReadingGenerator;
use iot_alarm_simulator::workload::run_simulation;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "iot-alarm-simulator")]
#[command(about = "Simulates a fleet of alarm devices publishing status events to an Event Grid style topic")]
#[command(version)]
struct Cli {
    /// Event topic endpoint URL the envelopes are posted to
    #[arg(long, env = "EVENT_TOPIC_ENDPOINT")]
    endpoint: String,

    /// Resource path stamped into each envelope's topic field
    #[arg(long, env = "EVENT_TOPIC_RESOURCE")]
    resource: String,

    /// Shared-secret key sent in the aeg-sas-key header
    #[arg(long, env = "EVENT_AEG_SAS_KEY")]
    sas_key: String,

    /// Image URL reported for a genuine alarm
    #[arg(long, env = "TRUE_ALARM_IMAGE_URL")]
    true_image: String,

    /// Image URL reported for a false alarm
    #[arg(long, env = "FALSE_ALARM_IMAGE_URL")]
    false_image: String,

    /// Milliseconds between publish ticks
    #[arg(long, env = "EVENT_INTERVAL_MS", default_value_t = DEFAULT_PUBLISH_INTERVAL_MS)]
    interval: u64,

    /// Number of devices in the fleet
    #[arg(long, env = "DEVICE_COUNT", default_value_t = DEFAULT_DEVICE_COUNT)]
    devices: usize,

    /// Northern latitude bound, decimal degrees
    #[arg(long, env = "MAX_LAT", default_value = DEFAULT_MAX_LAT)]
    max_lat: DecimalDegrees,

    /// Southern latitude bound, decimal degrees
    #[arg(long, env = "MIN_LAT", default_value = DEFAULT_MIN_LAT)]
    min_lat: DecimalDegrees,

    /// Eastern longitude bound, decimal degrees
    #[arg(long, env = "MAX_LONG", default_value = DEFAULT_MAX_LONG)]
    max_long: DecimalDegrees,

    /// Western longitude bound, decimal degrees
    #[arg(long, env = "MIN_LONG", default_value = DEFAULT_MIN_LONG)]
    min_long: DecimalDegrees,

    /// One status draw in this many comes up red
    #[arg(long, env = "STATUS_WEIGHT", default_value_t = DEFAULT_STATUS_WEIGHT)]
    status_weight: u32,

    /// Per-request timeout in seconds for publish calls
    #[arg(long, env = "REQUEST_TIMEOUT_SECS", default_value_t = DEFAULT_REQUEST_TIMEOUT_SECS)]
    request_timeout: u64,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            endpoint_url: self.endpoint,
            topic_resource: self.resource,
            sas_key: self.sas_key,
            true_image_url: self.true_image,
            false_image_url: self.false_image,
            publish_interval: Duration::from_millis(self.interval),
            device_count: self.devices,
            bounding_box: BoundingBox {
                max_lat: self.max_lat,
                min_lat: self.min_lat,
                max_long: self.max_long,
                min_long: self.min_long,
            },
            status_weight: self.status_weight,
            request_timeout: Duration::from_secs(self.request_timeout),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Cli::parse().into_config();
    config.validate()?;

    let ranges = derive_ranges(&config.bounding_box);
    let mut coords = CoordinateSampler::from_entropy();
    let mut readings = ReadingGenerator::from_entropy();
    let mut fleet = generate_fleet(&config, &ranges, &mut coords, &mut readings);
    info!(
        "Generated fleet of {} devices inside lat [{}, {}] long [{}, {}]",
        fleet.len(),
        config.bounding_box.min_lat,
        config.bounding_box.max_lat,
        config.bounding_box.min_long,
        config.bounding_box.max_long
    );

    let publisher = HttpPublisher::new(&config);
    let stats = PublishStats::new();

    let shutdown = CancellationToken::new();
    let signal_token = shutdown.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("Shutdown requested");
            signal_token.cancel();
        }
    });

    run_simulation(
        &config,
        &mut fleet,
        &mut readings,
        &publisher,
        &stats,
        shutdown,
    )
    .await;

    Ok(())
}
