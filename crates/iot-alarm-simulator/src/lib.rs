//! Alarm fleet telemetry simulator.
//!
//! Simulates a fixed fleet of alarm devices with stable locations drawn
//! uniformly inside a decimal-degree bounding box, re-rolls each device's
//! status, image, and summary text every tick, and publishes one Event Grid
//! style envelope per device per tick to an HTTP ingestion endpoint.
//! Delivery is best-effort: one attempt per event, failures logged and
//! skipped, and the loop runs until the process is killed.
//!
//! # Usage
//! ```bash
//! iot-alarm-simulator \
//!     --endpoint https://alarms.uksouth-1.eventgrid.example.net/api/events \
//!     --resource "/subscriptions/xxx/resourceGroups/demo/providers/Microsoft.EventGrid/topics/alarms" \
//!     --sas-key "$EVENT_AEG_SAS_KEY" \
//!     --true-image https://images.example.net/intruder.jpg \
//!     --false-image https://images.example.net/cat.jpg
//! ```
//!
//! Interval, fleet size, bounding box, and status weighting all have
//! defaults; see `iot-alarm-simulator --help`.

pub mod config;
pub mod event;
pub mod fleet;
pub mod geo;
pub mod publisher;
pub mod readings;
pub mod workload;

pub use config::{Config, ConfigError};
pub use event::{build_event, AlarmEvent};
pub use fleet::{generate_fleet, Device};
pub use geo::{derive_ranges, BoundingBox, CoordinateSampler, DecimalDegrees, SampleRange};
pub use publisher::{HttpPublisher, PublishError, PublishSink, PublishStats};
pub use readings::{AlarmStatus, ReadingGenerator};
pub use workload::{run_simulation, run_tick, TickReport};
