//! Per-tick random field generation for a device.

use crate::fleet::Device;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Status carried by every reading.
///
/// One draw in `[0, weight)` per tick comes up `Red`; everything else is
/// `Green`, so green dominates at a weight-to-one ratio.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlarmStatus {
    Red,
    Green,
}

impl AlarmStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlarmStatus::Red => "red",
            AlarmStatus::Green => "green",
        }
    }
}

impl fmt::Display for AlarmStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Generates the mutable per-tick fields, one RNG stream per field so the
/// status and image draws never correlate.
pub struct ReadingGenerator {
    status_rng: StdRng,
    image_rng: StdRng,
}

impl ReadingGenerator {
    /// Generator with entropy-seeded streams, for production use.
    pub fn from_entropy() -> Self {
        Self {
            status_rng: StdRng::from_entropy(),
            image_rng: StdRng::from_entropy(),
        }
    }

    /// Generator with fixed seeds, for reproducible output.
    pub fn seeded(status_seed: u64, image_seed: u64) -> Self {
        Self {
            status_rng: StdRng::seed_from_u64(status_seed),
            image_rng: StdRng::seed_from_u64(image_seed),
        }
    }

    /// Draws a status: a zero roll out of `weight` is the red case.
    ///
    /// `weight` is validated at configuration time (minimum 2).
    pub fn sample_status(&mut self, weight: u32) -> AlarmStatus {
        if self.status_rng.gen_range(0..weight) == 0 {
            AlarmStatus::Red
        } else {
            AlarmStatus::Green
        }
    }

    /// 50/50 pick between the genuine-alarm and false-alarm images.
    pub fn sample_image<'a>(&mut self, true_image: &'a str, false_image: &'a str) -> &'a str {
        if self.image_rng.gen_range(0..2) == 0 {
            true_image
        } else {
            false_image
        }
    }

    /// Re-rolls a device's status, image, and summary text in place.
    ///
    /// Id, name, and location are never touched after creation.
    pub fn refresh(&mut self, device: &mut Device, weight: u32, true_image: &str, false_image: &str) {
        let status = self.sample_status(weight);
        let image = self.sample_image(true_image, false_image).to_string();
        device.text = compose_text(status, &image);
        device.status = status;
        device.image = image;
    }
}

/// Summary line for one reading; deterministic, no randomness.
pub fn compose_text(status: AlarmStatus, image: &str) -> String {
    format!("{status} alert image: {image}")
}
