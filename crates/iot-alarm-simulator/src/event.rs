//! Event envelope assembly.

use crate::fleet::Device;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Subject label stamped on every envelope.
pub const EVENT_SUBJECT: &str = "Alarm";

/// Event type the ingestion side routes on.
pub const EVENT_TYPE: &str = "recordInserted";

/// Publish envelope wrapping one device snapshot.
///
/// Built fresh for every device on every tick; never reused. The `data`
/// snapshot is copied by value, so mutations in later ticks cannot reach
/// an envelope that has already been built.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlarmEvent {
    pub topic: String,
    pub subject: String,
    pub id: String,
    pub event_type: String,
    pub event_time: String,
    pub data: Device,
}

/// Wraps the device's current reading into a publishable envelope with a
/// fresh unique id.
///
/// The caller supplies the wall-clock instant, so tests can pin the clock;
/// it is formatted ISO-8601 with six fractional digits and the UTC
/// designator. A non-empty topic resource is a configuration concern
/// caught upstream, not checked here.
pub fn build_event(topic_resource: &str, device: &Device, timestamp: DateTime<Utc>) -> AlarmEvent {
    AlarmEvent {
        topic: topic_resource.to_string(),
        subject: EVENT_SUBJECT.to_string(),
        id: Uuid::new_v4().to_string(),
        event_type: EVENT_TYPE.to_string(),
        event_time: timestamp.to_rfc3339_opts(SecondsFormat::Micros, true),
        data: device.clone(),
    }
}
