//! House-count estimation for a single village
//!
//! This is a heuristic, not a layout simulation: a fixed base plus a random
//! bonus scaled by how well the biome suits large villages. The bonus draw
//! is seeded from the world seed and position, so a given village gets the
//! same estimate on every run of the same build. The sub-seed comes from
//! std's `DefaultHasher`, whose algorithm may change between Rust releases,
//! so estimates in exported results are not guaranteed to match across
//! toolchains.

use std::ops::Range;

use log::debug;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::oracle::PlacementOracle;
use crate::seeds::derive_position_seed;
use crate::types::{BiomeId, GameVersion, Position, Seed};

/// Houses every village has
pub const BASE_HOUSES: u32 = 8;
/// Range of the random additional houses, before the biome factor
pub const BONUS_HOUSES: Range<u32> = 40..120;
/// Used when the biome cannot be looked up
pub const FALLBACK_HOUSES: u32 = 10;
/// Largest biome factor in [`biome_multiplier`]
pub const MAX_MULTIPLIER: f64 = 1.3;

/// Exclusive upper bound of any estimate.
pub fn max_estimate() -> f64 {
    BASE_HOUSES as f64 + BONUS_HOUSES.end as f64 * MAX_MULTIPLIER
}

/// House density factor for a biome. Plains and meadows host the largest
/// villages; cold biomes the smallest.
pub fn biome_multiplier(biome: &BiomeId) -> f64 {
    match biome.path() {
        "plains" => 1.2,
        "meadow" => 1.3,
        "desert" => 1.0,
        "savanna" => 0.9,
        "taiga" | "snowy_plains" => 0.8,
        _ => 1.0,
    }
}

/// `floor(base + bonus * multiplier)`
pub fn houses_for(bonus: u32, multiplier: f64) -> u32 {
    (BASE_HOUSES as f64 + bonus as f64 * multiplier).floor() as u32
}

/// Estimate for one village, with the biome it was based on.
#[derive(Clone, Debug, PartialEq)]
pub struct Estimate {
    pub occupant_count: u32,
    /// Looked-up biome, or "unknown" when the lookup failed
    pub biome: BiomeId,
}

pub struct DensityEstimator<'a, O: PlacementOracle + ?Sized> {
    oracle: &'a O,
}

impl<'a, O: PlacementOracle + ?Sized> DensityEstimator<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self { oracle }
    }

    /// Estimated house count at `position`. Never fails: a failed biome
    /// lookup yields [`FALLBACK_HOUSES`].
    pub fn estimate(&self, seed: Seed, version: &GameVersion, position: Position) -> u32 {
        self.assess(seed, version, position).occupant_count
    }

    /// Estimate plus the biome it used.
    pub fn assess(&self, seed: Seed, version: &GameVersion, position: Position) -> Estimate {
        match self.oracle.biome_at(version, seed, position) {
            Ok(biome) => {
                let bonus = bonus_draw(seed, position);
                Estimate {
                    occupant_count: houses_for(bonus, biome_multiplier(&biome)),
                    biome,
                }
            }
            Err(e) => {
                debug!(
                    "seed {}: biome lookup failed at ({}, {}), using fallback estimate: {}",
                    seed, position.x, position.z, e
                );
                Estimate {
                    occupant_count: FALLBACK_HOUSES,
                    biome: BiomeId::unknown(),
                }
            }
        }
    }
}

/// Random additional houses for the village at `position`.
pub fn bonus_draw(seed: Seed, position: Position) -> u32 {
    let mut rng = ChaCha8Rng::seed_from_u64(derive_position_seed(seed, position, "houses"));
    rng.gen_range(BONUS_HOUSES)
}
