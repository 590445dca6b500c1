//! Approximate village oracle
//!
//! Region placement follows the game's random-spread algorithm exactly
//! (34-chunk spacing, 8-chunk separation, linear spread, village salt).
//! Biomes are NOT the game's: two seeded Perlin fields stand in for the
//! climate parameters, so viability and biome answers are only plausible,
//! never bit-exact.

use noise::{NoiseFn, Perlin};

use super::{JavaRandom, OracleError, PlacementOracle};
use crate::seeds::mask_48;
use crate::types::{BiomeId, Dimension, GameVersion, Position, RegionCoord, Seed, StructureKind};

/// Region spacing for villages, in chunks
pub const VILLAGE_SPACING: i64 = 34;
/// Minimum separation between village attempts, in chunks
pub const VILLAGE_SEPARATION: i64 = 8;
/// Placement salt for villages
pub const VILLAGE_SALT: i64 = 10_387_312;

const REGION_X_MULTIPLIER: i64 = 341_873_128_712;
const REGION_Z_MULTIPLIER: i64 = 132_897_987_541;
const BLOCKS_PER_CHUNK: i64 = 16;

/// Versions whose village placement matches the constants above.
pub const SUPPORTED_VERSIONS: [&str; 11] = [
    "1.20.4", "1.20.1", "1.20", "1.19.4", "1.19.3", "1.19.2", "1.19.1", "1.19", "1.18.2",
    "1.18.1", "1.18",
];

/// Biomes villages can generate in.
pub const VILLAGE_BIOMES: [&str; 6] = [
    "minecraft:plains",
    "minecraft:desert",
    "minecraft:savanna",
    "minecraft:taiga",
    "minecraft:snowy_plains",
    "minecraft:meadow",
];

/// Block scale of the climate noise
const CLIMATE_SCALE: f64 = 1024.0;
/// Continentalness varies slower than climate
const CONTINENT_SCALE: f64 = 2048.0;

#[derive(Clone, Debug, Default)]
pub struct ApproximateOracle;

impl ApproximateOracle {
    pub fn new() -> Self {
        Self
    }

    fn check_version(&self, version: &GameVersion) -> Result<(), OracleError> {
        if self.supports(version) {
            Ok(())
        } else {
            Err(OracleError::UnsupportedVersion(version.clone()))
        }
    }

    /// Chunk offset of the village attempt inside a region.
    fn region_offset(seed: Seed, region: RegionCoord) -> (i64, i64) {
        let region_seed = region
            .x
            .wrapping_mul(REGION_X_MULTIPLIER)
            .wrapping_add(region.z.wrapping_mul(REGION_Z_MULTIPLIER))
            .wrapping_add(seed)
            .wrapping_add(VILLAGE_SALT);
        let mut rng = JavaRandom::new(region_seed);
        let bound = (VILLAGE_SPACING - VILLAGE_SEPARATION) as i32;
        let off_x = rng.next_int_bounded(bound) as i64;
        let off_z = rng.next_int_bounded(bound) as i64;
        (off_x, off_z)
    }

    fn classify(seed: Seed, position: Position) -> &'static str {
        // Only the placement bits matter, mirroring the real generator's
        // structure dependence on the low 48 bits
        let bits = mask_48(seed);
        let temperature = Perlin::new(bits as u32);
        let humidity = Perlin::new((bits >> 16) as u32 ^ 0x9E37_79B9);
        let continent = Perlin::new((bits >> 24) as u32 ^ 0x85EB_CA6B);

        let x = position.x as f64;
        let z = position.z as f64;
        let c = continent.get([x / CONTINENT_SCALE + 0.5, z / CONTINENT_SCALE + 0.5]);
        if c < -0.35 {
            return "minecraft:ocean";
        }

        let t = temperature.get([x / CLIMATE_SCALE + 0.5, z / CLIMATE_SCALE + 0.5]);
        let h = humidity.get([x / CLIMATE_SCALE + 0.5, z / CLIMATE_SCALE + 0.5]);

        if t < -0.3 {
            if h < 0.0 {
                "minecraft:snowy_plains"
            } else {
                "minecraft:taiga"
            }
        } else if t > 0.3 {
            if h < -0.1 {
                "minecraft:desert"
            } else {
                "minecraft:savanna"
            }
        } else if h > 0.35 {
            "minecraft:forest"
        } else if h > 0.15 {
            "minecraft:meadow"
        } else {
            "minecraft:plains"
        }
    }
}

impl PlacementOracle for ApproximateOracle {
    fn place(
        &self,
        kind: StructureKind,
        seed: Seed,
        version: &GameVersion,
        region: RegionCoord,
    ) -> Result<Option<Position>, OracleError> {
        self.check_version(version)?;
        match kind {
            StructureKind::Village => {
                let (off_x, off_z) = Self::region_offset(seed, region);
                let chunk_x = region.x * VILLAGE_SPACING + off_x;
                let chunk_z = region.z * VILLAGE_SPACING + off_z;
                Ok(Some(Position::new(chunk_x * BLOCKS_PER_CHUNK, chunk_z * BLOCKS_PER_CHUNK)))
            }
        }
    }

    fn is_viable(
        &self,
        kind: StructureKind,
        version: &GameVersion,
        seed: Seed,
        position: Position,
        dimension: Dimension,
    ) -> Result<bool, OracleError> {
        self.check_version(version)?;
        match (kind, dimension) {
            (StructureKind::Village, Dimension::Overworld) => {
                let biome = Self::classify(seed, position);
                Ok(VILLAGE_BIOMES.contains(&biome))
            }
        }
    }

    fn biome_at(&self, version: &GameVersion, seed: Seed, position: Position) -> Result<BiomeId, OracleError> {
        self.check_version(version)?;
        Ok(BiomeId::new(Self::classify(seed, position)))
    }

    fn supports(&self, version: &GameVersion) -> bool {
        SUPPORTED_VERSIONS.contains(&version.as_str())
    }
}
