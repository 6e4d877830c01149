//! Bounding-box decomposition and uniform coordinate sampling.
//!
//! Device locations are drawn inside a decimal-degree rectangle. Each bound
//! is split into a truncated integral part and a scaled fractional integer,
//! so the draw itself is pure integer arithmetic; the coordinate is then
//! reconstructed as `integral + fractional / 1_000_000`.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Decimal parse errors
#[derive(Debug, Error)]
pub enum ParseDecimalError {
    #[error("not a decimal number: {0:?}")]
    NotDecimal(String),

    #[error("integral part out of range: {0:?}")]
    OutOfRange(String),
}

/// A decimal-degree value split into integer-safe parts.
///
/// The integral part truncates toward zero. The fractional remainder is
/// scaled into a whole integer by a multiplier picked from its decimal
/// digit count (1 digit -> x10, 2 -> x100, ... 6 or more -> x1_000_000,
/// extra digits truncated toward zero), which keeps up to six fractional
/// digits exact. The scaled value carries the sign of the source and lands
/// in [-999_999, 999_999].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecimalDegrees {
    raw: String,
    integral: i32,
    fractional: i32,
}

impl DecimalDegrees {
    /// Integral part, truncated toward zero.
    pub fn integral(&self) -> i32 {
        self.integral
    }

    /// Fractional part scaled by the digit-count multiplier.
    pub fn fractional(&self) -> i32 {
        self.fractional
    }
}

impl FromStr for DecimalDegrees {
    type Err = ParseDecimalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let not_decimal = || ParseDecimalError::NotDecimal(s.to_string());

        let (sign, body) = match trimmed.strip_prefix('-') {
            Some(rest) => (-1i32, rest),
            None => (1i32, trimmed.strip_prefix('+').unwrap_or(trimmed)),
        };

        let (int_part, frac_part) = match body.split_once('.') {
            Some((int_part, frac_part)) => (int_part, frac_part),
            None => (body, ""),
        };

        if int_part.is_empty() && frac_part.is_empty() {
            return Err(not_decimal());
        }
        if !int_part.bytes().all(|b| b.is_ascii_digit())
            || !frac_part.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(not_decimal());
        }

        let integral: i32 = if int_part.is_empty() {
            0
        } else {
            int_part
                .parse()
                .map_err(|_| ParseDecimalError::OutOfRange(s.to_string()))?
        };

        // Parsing the digit substring directly is the digit-count multiplier:
        // "5" -> 5 (x10), "25" -> 25 (x100), "010299" -> 10299 (x1_000_000).
        let digits = &frac_part[..frac_part.len().min(6)];
        let fractional: i32 = if digits.is_empty() {
            0
        } else {
            digits.parse().map_err(|_| not_decimal())?
        };

        Ok(Self {
            raw: trimmed.to_string(),
            integral: sign * integral,
            fractional: sign * fractional,
        })
    }
}

impl fmt::Display for DecimalDegrees {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

/// Geographic rectangle the device locations are drawn from.
///
/// No ordering between max and min is enforced; a malformed rectangle
/// degrades to a reordered or degenerate sampling range rather than an
/// error (see [`CoordinateSampler::sample`]).
#[derive(Debug, Clone)]
pub struct BoundingBox {
    pub max_lat: DecimalDegrees,
    pub min_lat: DecimalDegrees,
    pub max_long: DecimalDegrees,
    pub min_long: DecimalDegrees,
}

/// Inclusive integer sampling bounds for one axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisRange {
    pub integral_min: i32,
    pub integral_max: i32,
    pub fractional_min: i32,
    pub fractional_max: i32,
}

/// Integer sampling bounds for both axes, derived once at startup.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SampleRange {
    pub latitude: AxisRange,
    pub longitude: AxisRange,
}

/// Decomposes a bounding box into per-axis integer sampling ranges.
///
/// Deterministic: the same box always yields the same ranges.
pub fn derive_ranges(bounds: &BoundingBox) -> SampleRange {
    SampleRange {
        latitude: axis_range(&bounds.min_lat, &bounds.max_lat),
        longitude: axis_range(&bounds.min_long, &bounds.max_long),
    }
}

fn axis_range(min: &DecimalDegrees, max: &DecimalDegrees) -> AxisRange {
    let mut fractional_min = min.fractional();
    let mut fractional_max = max.fractional();

    // Two bounds on the negative side of zero invert the scaled ordering;
    // swap so the fractional draw has min <= max.
    if fractional_max < 0 && fractional_min < 0 {
        std::mem::swap(&mut fractional_min, &mut fractional_max);
    }

    AxisRange {
        integral_min: min.integral(),
        integral_max: max.integral(),
        fractional_min,
        fractional_max,
    }
}

/// Draws device coordinates, one RNG stream per axis so latitude and
/// longitude stay statistically independent within a single sample.
pub struct CoordinateSampler {
    lat_rng: StdRng,
    long_rng: StdRng,
}

impl CoordinateSampler {
    /// Sampler with entropy-seeded streams, for production use.
    pub fn from_entropy() -> Self {
        Self {
            lat_rng: StdRng::from_entropy(),
            long_rng: StdRng::from_entropy(),
        }
    }

    /// Sampler with fixed seeds, for reproducible output.
    pub fn seeded(lat_seed: u64, long_seed: u64) -> Self {
        Self {
            lat_rng: StdRng::seed_from_u64(lat_seed),
            long_rng: StdRng::seed_from_u64(long_seed),
        }
    }

    /// Samples one `(latitude, longitude)` pair from the derived ranges.
    ///
    /// Each axis takes two inclusive uniform integer draws (integral and
    /// fractional) and reconstructs `integral + fractional / 1_000_000`.
    /// Known limitation: an axis whose bounds arrive inverted is sampled
    /// over the reordered pair instead of failing, and a zero-width axis
    /// pins to its single value.
    pub fn sample(&mut self, ranges: &SampleRange) -> (f64, f64) {
        let latitude = axis_sample(&mut self.lat_rng, &ranges.latitude);
        let longitude = axis_sample(&mut self.long_rng, &ranges.longitude);
        (latitude, longitude)
    }
}

fn axis_sample(rng: &mut StdRng, range: &AxisRange) -> f64 {
    let integral = draw_inclusive(rng, range.integral_min, range.integral_max);
    let fractional = draw_inclusive(rng, range.fractional_min, range.fractional_max);
    f64::from(integral) + f64::from(fractional) / 1_000_000.0
}

fn draw_inclusive(rng: &mut StdRng, a: i32, b: i32) -> i32 {
    let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
    rng.gen_range(lo..=hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dd(s: &str) -> DecimalDegrees {
        s.parse().unwrap()
    }

    fn england_box() -> BoundingBox {
        BoundingBox {
            max_lat: dd("53.810382"),
            min_lat: dd("51.010299"),
            max_long: dd("-0.145569"),
            min_long: dd("-3.048706"),
        }
    }

    #[test]
    fn test_decompose_england_bounds() {
        let bounds = england_box();

        assert_eq!(bounds.max_lat.integral(), 53);
        assert_eq!(bounds.max_lat.fractional(), 810382);
        assert_eq!(bounds.min_lat.integral(), 51);
        assert_eq!(bounds.min_lat.fractional(), 10299);
        assert_eq!(bounds.max_long.integral(), 0);
        assert_eq!(bounds.max_long.fractional(), -145569);
        assert_eq!(bounds.min_long.integral(), -3);
        assert_eq!(bounds.min_long.fractional(), -48706);
    }

    #[test]
    fn test_digit_count_multiplier() {
        // d fractional digits scale by 10^d, up to six.
        assert_eq!(dd("12.5").fractional(), 5);
        assert_eq!(dd("12.25").fractional(), 25);
        assert_eq!(dd("0.123").fractional(), 123);
        assert_eq!(dd("7.0004").fractional(), 4);
        assert_eq!(dd("-0.00005").fractional(), -5);
        assert_eq!(dd("1.000001").fractional(), 1);

        // Seven or more digits truncate toward zero at six.
        assert_eq!(dd("3.1234567").fractional(), 123456);
        assert_eq!(dd("-3.9999999").fractional(), -999999);
    }

    #[test]
    fn test_whole_numbers_have_zero_fraction() {
        assert_eq!(dd("54").integral(), 54);
        assert_eq!(dd("54").fractional(), 0);
        assert_eq!(dd("-3").integral(), -3);
        assert_eq!(dd("-0").integral(), 0);
        assert_eq!(dd("-0").fractional(), 0);
    }

    #[test]
    fn test_rejects_non_decimal_input() {
        assert!("abc".parse::<DecimalDegrees>().is_err());
        assert!("".parse::<DecimalDegrees>().is_err());
        assert!("5.5.5".parse::<DecimalDegrees>().is_err());
        assert!("12a.3".parse::<DecimalDegrees>().is_err());
        assert!("1.2e3".parse::<DecimalDegrees>().is_err());
        assert!(".".parse::<DecimalDegrees>().is_err());
    }

    #[test]
    fn test_derive_ranges_is_deterministic() {
        let first = derive_ranges(&england_box());
        let second = derive_ranges(&england_box());
        assert_eq!(first, second);
    }

    #[test]
    fn test_both_negative_fractionals_swap() {
        // Both longitude fractions negative: the scaled ordering inverts,
        // so the derived range must come back out with min <= max.
        let ranges = derive_ranges(&england_box());
        assert_eq!(ranges.longitude.fractional_min, -145569);
        assert_eq!(ranges.longitude.fractional_max, -48706);
        assert!(ranges.longitude.fractional_min <= ranges.longitude.fractional_max);

        // Latitude fractions are positive here and must not swap.
        assert_eq!(ranges.latitude.fractional_min, 10299);
        assert_eq!(ranges.latitude.fractional_max, 810382);
    }

    #[test]
    fn test_swap_applies_per_axis() {
        let bounds = BoundingBox {
            max_lat: dd("-10.9"),
            min_lat: dd("-12.2"),
            max_long: dd("20.5"),
            min_long: dd("10.1"),
        };
        let ranges = derive_ranges(&bounds);

        assert_eq!(ranges.latitude.fractional_min, -9);
        assert_eq!(ranges.latitude.fractional_max, -2);
        assert_eq!(ranges.longitude.fractional_min, 1);
        assert_eq!(ranges.longitude.fractional_max, 5);
    }

    #[test]
    fn test_samples_stay_inside_integral_bounds() {
        let bounds = BoundingBox {
            max_lat: dd("54.899999"),
            min_lat: dd("51.100001"),
            max_long: dd("1.900001"),
            min_long: dd("0.100001"),
        };
        let ranges = derive_ranges(&bounds);
        let mut sampler = CoordinateSampler::seeded(7, 11);

        for _ in 0..10_000 {
            let (latitude, longitude) = sampler.sample(&ranges);
            assert!(
                (51.0..55.0).contains(&latitude),
                "latitude out of range: {latitude}"
            );
            assert!(
                (0.0..2.0).contains(&longitude),
                "longitude out of range: {longitude}"
            );
        }
    }

    #[test]
    fn test_england_box_sampling_envelope() {
        // Negative fractional bounds pull the longitude floor below the
        // integral minimum: the reachable envelope pairs the lowest
        // integral with the lowest post-swap fractional.
        let ranges = derive_ranges(&england_box());
        let mut sampler = CoordinateSampler::seeded(23, 29);

        for _ in 0..10_000 {
            let (latitude, longitude) = sampler.sample(&ranges);
            assert!(
                (51.010298..=53.810383).contains(&latitude),
                "latitude out of envelope: {latitude}"
            );
            assert!(
                (-3.145570..=-0.048705).contains(&longitude),
                "longitude out of envelope: {longitude}"
            );
        }
    }

    #[test]
    fn test_inverted_axis_samples_without_panicking() {
        // min and max traded places; sampling reorders instead of failing.
        let bounds = BoundingBox {
            max_lat: dd("51"),
            min_lat: dd("54"),
            max_long: dd("-3"),
            min_long: dd("0"),
        };
        let ranges = derive_ranges(&bounds);
        let mut sampler = CoordinateSampler::seeded(1, 2);

        for _ in 0..1_000 {
            let (latitude, longitude) = sampler.sample(&ranges);
            assert!((51.0..55.0).contains(&latitude));
            assert!((-3.0..1.0).contains(&longitude));
        }
    }

    #[test]
    fn test_degenerate_axis_pins_to_single_value() {
        let bounds = BoundingBox {
            max_lat: dd("52"),
            min_lat: dd("52"),
            max_long: dd("1"),
            min_long: dd("1"),
        };
        let ranges = derive_ranges(&bounds);
        let mut sampler = CoordinateSampler::seeded(3, 4);

        for _ in 0..100 {
            assert_eq!(sampler.sample(&ranges), (52.0, 1.0));
        }
    }

    #[test]
    fn test_seeded_sampler_is_reproducible() {
        let ranges = derive_ranges(&england_box());
        let mut first = CoordinateSampler::seeded(42, 43);
        let mut second = CoordinateSampler::seeded(42, 43);

        for _ in 0..100 {
            assert_eq!(first.sample(&ranges), second.sample(&ranges));
        }
    }
}
