//! Spawn policy: weighted variant selection
//!
//! Weights are sorted once at construction (descending weight, ties by
//! variant order) and laid out as contiguous half-open ranges over [0, 1).
//! A uniform draw lands in exactly one range.

use std::collections::BTreeMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::bubble::Variant;

/// Allowed distance between the weight sum and 1.0
pub const WEIGHT_SUM_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SpawnWeightsError {
    #[error("spawn weights are empty")]
    Empty,
    #[error("variant {0:?} listed more than once")]
    Duplicate(Variant),
    #[error("weight {weight} for {variant:?} is outside (0, 1]")]
    OutOfRange { variant: Variant, weight: f64 },
    #[error("spawn weights sum to {0}, expected 1.0")]
    BadSum(f64),
}

/// One variant's slice of the unit interval
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightRange {
    pub variant: Variant,
    pub start: f64,
    pub end: f64,
}

impl WeightRange {
    pub fn contains(&self, r: f64) -> bool {
        r >= self.start && r < self.end
    }
}

/// Validated variant distribution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "BTreeMap<Variant, f64>", into = "BTreeMap<Variant, f64>")]
pub struct SpawnWeights {
    ranges: Vec<WeightRange>,
}

impl SpawnWeights {
    pub fn new<I>(weights: I) -> Result<Self, SpawnWeightsError>
    where
        I: IntoIterator<Item = (Variant, f64)>,
    {
        let mut entries: Vec<(Variant, f64)> = Vec::new();
        for (variant, weight) in weights {
            if entries.iter().any(|(v, _)| *v == variant) {
                return Err(SpawnWeightsError::Duplicate(variant));
            }
            if !(weight > 0.0 && weight <= 1.0) {
                return Err(SpawnWeightsError::OutOfRange { variant, weight });
            }
            entries.push((variant, weight));
        }
        if entries.is_empty() {
            return Err(SpawnWeightsError::Empty);
        }

        let sum: f64 = entries.iter().map(|(_, w)| w).sum();
        if (sum - 1.0).abs() > WEIGHT_SUM_EPSILON {
            return Err(SpawnWeightsError::BadSum(sum));
        }

        entries.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let mut start = 0.0;
        let mut ranges: Vec<WeightRange> = entries
            .into_iter()
            .map(|(variant, weight)| {
                let range = WeightRange {
                    variant,
                    start,
                    end: start + weight,
                };
                start += weight;
                range
            })
            .collect();
        // Absorb rounding drift so every draw in [0, 1) is covered
        if let Some(last) = ranges.last_mut() {
            last.end = 1.0;
        }

        Ok(Self { ranges })
    }

    /// Ranges in draw order
    pub fn ranges(&self) -> &[WeightRange] {
        &self.ranges
    }

    /// Probability configured for a variant (0 when absent)
    pub fn weight(&self, variant: Variant) -> f64 {
        self.ranges
            .iter()
            .find(|r| r.variant == variant)
            .map(|r| r.end - r.start)
            .unwrap_or(0.0)
    }

    /// Variant owning the range that contains `r` (r in [0, 1))
    pub fn variant_for_draw(&self, r: f64) -> Variant {
        self.ranges
            .iter()
            .find(|range| r < range.end)
            .or(self.ranges.last())
            .map(|range| range.variant)
            .unwrap_or(Variant::Red)
    }
}

impl Default for SpawnWeights {
    fn default() -> Self {
        Self {
            ranges: vec![
                WeightRange { variant: Variant::Red, start: 0.0, end: 0.4 },
                WeightRange { variant: Variant::Pink, start: 0.4, end: 0.7 },
                WeightRange { variant: Variant::Green, start: 0.7, end: 0.85 },
                WeightRange { variant: Variant::Blue, start: 0.85, end: 0.95 },
                WeightRange { variant: Variant::Black, start: 0.95, end: 1.0 },
            ],
        }
    }
}

impl TryFrom<BTreeMap<Variant, f64>> for SpawnWeights {
    type Error = SpawnWeightsError;

    fn try_from(map: BTreeMap<Variant, f64>) -> Result<Self, Self::Error> {
        Self::new(map)
    }
}

impl From<SpawnWeights> for BTreeMap<Variant, f64> {
    fn from(weights: SpawnWeights) -> Self {
        weights
            .ranges
            .iter()
            .map(|r| (r.variant, r.end - r.start))
            .collect()
    }
}

/// Draw a variant according to the configured weights
pub fn choose_variant<R: Rng + ?Sized>(weights: &SpawnWeights, rng: &mut R) -> Variant {
    let r: f64 = rng.random();
    weights.variant_for_draw(r)
}
