// Feature records sent to the prediction endpoint
//
// Decision: Ranges follow the observed bounds of the penguins dataset
// Decision: The RNG is owned by a generator built once at startup, not a global

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive bounds for a single feature
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureRange {
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub const fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    /// Check whether a value falls inside the range (inclusive)
    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }

    /// Sample uniformly and round to one decimal place
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        round_one_decimal(rng.gen_range(self.min..=self.max))
    }
}

pub const BILL_LENGTH_MM: FeatureRange = FeatureRange::new(32.0, 60.0);
pub const BILL_DEPTH_MM: FeatureRange = FeatureRange::new(13.0, 21.0);
pub const FLIPPER_LENGTH_MM: FeatureRange = FeatureRange::new(170.0, 230.0);
pub const BODY_MASS_G: FeatureRange = FeatureRange::new(2700.0, 6300.0);

/// One synthetic penguin observation
///
/// Serializes to the request schema expected by `POST /predict`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FeatureRecord {
    pub bill_length_mm: f64,
    pub bill_depth_mm: f64,
    pub flipper_length_mm: f64,
    pub body_mass_g: f64,
}

impl FeatureRecord {
    /// Check every field against its documented range
    pub fn is_valid(&self) -> bool {
        BILL_LENGTH_MM.contains(self.bill_length_mm)
            && BILL_DEPTH_MM.contains(self.bill_depth_mm)
            && FLIPPER_LENGTH_MM.contains(self.flipper_length_mm)
            && BODY_MASS_G.contains(self.body_mass_g)
    }
}

impl fmt::Display for FeatureRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Same rendering as the request body
        let json = serde_json::to_string(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}

/// Generate a single record from the given randomness source
///
/// Fields are sampled independently, each uniform within its bounds.
pub fn generate_record<R: Rng + ?Sized>(rng: &mut R) -> FeatureRecord {
    FeatureRecord {
        bill_length_mm: BILL_LENGTH_MM.sample(rng),
        bill_depth_mm: BILL_DEPTH_MM.sample(rng),
        flipper_length_mm: FLIPPER_LENGTH_MM.sample(rng),
        body_mass_g: BODY_MASS_G.sample(rng),
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Infinite source of feature records
#[derive(Debug)]
pub struct RecordGenerator {
    rng: StdRng,
}

impl RecordGenerator {
    /// Create a generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a reproducible generator
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    pub fn next_record(&mut self) -> FeatureRecord {
        generate_record(&mut self.rng)
    }
}

impl Default for RecordGenerator {
    fn default() -> Self {
        Self::new()
    }
}

impl Iterator for RecordGenerator {
    type Item = FeatureRecord;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_record())
    }
}
