//! Device fleet creation.

use crate::config::Config;
use crate::geo::{CoordinateSampler, SampleRange};
use crate::readings::{compose_text, AlarmStatus, ReadingGenerator};
use serde::{Deserialize, Serialize};

/// One simulated alarm unit.
///
/// Identity and location are fixed at creation and never resampled;
/// `status`, `image`, and `text` are re-rolled every tick. Serializes to
/// the wire names the ingestion side expects.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Device {
    pub device_id: u32,
    pub status: AlarmStatus,
    pub longitude: f64,
    pub latitude: f64,
    pub image: String,
    pub name: String,
    pub text: String,
}

/// Creates the fixed-size fleet with ids 0..count and one location sample
/// per device.
///
/// Creation order is publish order: downstream consumers key on the
/// per-tick event ordering staying stable. A zero count is rejected as a
/// configuration error before this is reached.
pub fn generate_fleet(
    config: &Config,
    ranges: &SampleRange,
    coords: &mut CoordinateSampler,
    readings: &mut ReadingGenerator,
) -> Vec<Device> {
    let mut devices = Vec::with_capacity(config.device_count);

    for id in 0..config.device_count as u32 {
        let (latitude, longitude) = coords.sample(ranges);
        let status = readings.sample_status(config.status_weight);
        let image = readings
            .sample_image(&config.true_image_url, &config.false_image_url)
            .to_string();
        let text = compose_text(status, &image);

        devices.push(Device {
            device_id: id,
            status,
            longitude,
            latitude,
            image,
            name: format!("Alarm {id}"),
            text,
        });
    }

    devices
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geo::{derive_ranges, BoundingBox};
    use std::time::Duration;

    fn test_config(device_count: usize) -> Config {
        Config {
            endpoint_url: "http://localhost:8080/api/events".to_string(),
            topic_resource: "/topics/alarms".to_string(),
            sas_key: "test-key".to_string(),
            true_image_url: "https://images.example.net/intruder.jpg".to_string(),
            false_image_url: "https://images.example.net/cat.jpg".to_string(),
            publish_interval: Duration::from_millis(5000),
            device_count,
            bounding_box: BoundingBox {
                max_lat: "54".parse().unwrap(),
                min_lat: "51".parse().unwrap(),
                max_long: "-0".parse().unwrap(),
                min_long: "-3".parse().unwrap(),
            },
            status_weight: 10,
            request_timeout: Duration::from_secs(30),
        }
    }

    #[test]
    fn test_generate_fleet() {
        let config = test_config(3);
        let ranges = derive_ranges(&config.bounding_box);
        let mut coords = CoordinateSampler::seeded(1, 2);
        let mut readings = ReadingGenerator::seeded(3, 4);

        let fleet = generate_fleet(&config, &ranges, &mut coords, &mut readings);

        assert_eq!(fleet.len(), 3);
        for (i, device) in fleet.iter().enumerate() {
            assert_eq!(device.device_id, i as u32);
            assert_eq!(device.name, format!("Alarm {i}"));
            assert!(
                (51.0..55.0).contains(&device.latitude),
                "latitude out of range: {}",
                device.latitude
            );
            assert!(
                (-3.0..1.0).contains(&device.longitude),
                "longitude out of range: {}",
                device.longitude
            );
            assert_eq!(device.text, compose_text(device.status, &device.image));
        }
    }

    #[test]
    fn test_device_wire_names() {
        let config = test_config(1);
        let ranges = derive_ranges(&config.bounding_box);
        let mut coords = CoordinateSampler::seeded(5, 6);
        let mut readings = ReadingGenerator::seeded(7, 8);

        let fleet = generate_fleet(&config, &ranges, &mut coords, &mut readings);
        let json = serde_json::to_value(&fleet[0]).unwrap();

        for key in ["deviceId", "status", "longitude", "latitude", "image", "name", "text"] {
            assert!(json.get(key).is_some(), "missing wire field {key}");
        }
    }
}
