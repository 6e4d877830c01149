//! Tick orchestration and the simulation loop.

use crate::config::Config;
use crate::event::build_event;
use crate::fleet::Device;
use crate::publisher::{PublishSink, PublishStats};
use crate::readings::ReadingGenerator;
use chrono::Utc;
use std::sync::atomic::Ordering;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Outcome of one device's publish attempt within a tick.
#[derive(Debug, Clone)]
pub struct DeviceOutcome {
    pub device_id: u32,
    pub delivered: bool,
}

/// Structured result of one tick over the whole fleet, in registry order.
#[derive(Debug, Clone, Default)]
pub struct TickReport {
    pub outcomes: Vec<DeviceOutcome>,
}

impl TickReport {
    pub fn attempted(&self) -> usize {
        self.outcomes.len()
    }

    pub fn delivered(&self) -> usize {
        self.outcomes.iter().filter(|o| o.delivered).count()
    }

    pub fn failed(&self) -> usize {
        self.attempted() - self.delivered()
    }
}

/// Runs one tick: every device in registry order gets fresh fields, one
/// envelope, and one publish attempt.
///
/// A failed publish is logged with the device context and recorded in the
/// report; the tick always proceeds to the next device. No retry, no
/// backoff: a load generator wants best-effort delivery, not guarantees.
pub async fn run_tick<S: PublishSink + ?Sized>(
    config: &Config,
    fleet: &mut [Device],
    readings: &mut ReadingGenerator,
    sink: &S,
) -> TickReport {
    let mut report = TickReport::default();

    for device in fleet.iter_mut() {
        readings.refresh(
            device,
            config.status_weight,
            &config.true_image_url,
            &config.false_image_url,
        );

        let event = build_event(&config.topic_resource, device, Utc::now());

        let delivered = match sink.publish(&event).await {
            Ok(()) => {
                info!(
                    "{} alarm sent. Longitude: {} latitude: {} image: {}",
                    device.status, device.longitude, device.latitude, device.image
                );
                true
            }
            Err(e) => {
                warn!(
                    "Error sending alarm for device {} ({}): {}",
                    device.device_id, device.status, e
                );
                debug!(
                    "Failed payload: {}",
                    serde_json::to_string(&event).unwrap_or_default()
                );
                false
            }
        };

        report.outcomes.push(DeviceOutcome {
            device_id: device.device_id,
            delivered,
        });
    }

    report
}

/// Drives the publish cadence until the token is cancelled.
///
/// The cycle is tick, fixed sleep, next tick; there is no terminal state
/// in normal operation and the interval never adapts to latency or
/// failures. Outside of tests only process shutdown cancels the token.
pub async fn run_simulation<S: PublishSink + ?Sized>(
    config: &Config,
    fleet: &mut [Device],
    readings: &mut ReadingGenerator,
    sink: &S,
    stats: &PublishStats,
    shutdown: CancellationToken,
) {
    info!(
        "Publishing {} alarms every {}ms",
        fleet.len(),
        config.publish_interval.as_millis()
    );

    loop {
        let report = run_tick(config, fleet, readings, sink).await;

        stats.record_tick();
        for outcome in &report.outcomes {
            if outcome.delivered {
                stats.record_published();
            } else {
                stats.record_failed();
            }
        }
        debug!(
            "Tick complete: {} delivered, {} failed",
            report.delivered(),
            report.failed()
        );

        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = tokio::time::sleep(config.publish_interval) => {}
        }
    }

    info!(
        "Simulation stopped after {} ticks: {} events published, {} failed",
        stats.ticks_completed.load(Ordering::Relaxed),
        stats.events_published.load(Ordering::Relaxed),
        stats.events_failed.load(Ordering::Relaxed)
    );
}
