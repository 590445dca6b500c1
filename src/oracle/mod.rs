//! Structure placement oracle boundary
//!
//! The oracle answers three questions for a world: where a region's
//! structure candidate sits, whether it actually generates there, and which
//! biome a block is in. The scanning core treats it as a pure, stateless
//! capability and recovers locally from every error it reports.
//!
//! [`ApproximateOracle`] is a self-contained implementation good enough to
//! exercise the tool end to end. Exact results need a bit-exact biome
//! generator plugged in behind the same trait.

pub mod approx;
pub mod java_random;

pub use approx::ApproximateOracle;
pub use java_random::JavaRandom;

use thiserror::Error;

use crate::types::{BiomeId, Dimension, GameVersion, Position, RegionCoord, Seed, StructureKind};

/// Errors reported by a single oracle lookup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OracleError {
    #[error("unsupported game version {0}")]
    UnsupportedVersion(GameVersion),
    #[error("lookup failed at ({x}, {z}): {reason}")]
    Lookup { x: i64, z: i64, reason: String },
}

/// Black-box structure placement and biome lookups.
pub trait PlacementOracle: Send + Sync {
    /// Candidate block position of `kind` in `region`, or `None` when the
    /// region holds no attempt.
    fn place(
        &self,
        kind: StructureKind,
        seed: Seed,
        version: &GameVersion,
        region: RegionCoord,
    ) -> Result<Option<Position>, OracleError>;

    /// Whether the structure really generates at `position`.
    fn is_viable(
        &self,
        kind: StructureKind,
        version: &GameVersion,
        seed: Seed,
        position: Position,
        dimension: Dimension,
    ) -> Result<bool, OracleError>;

    /// Biome at a block position.
    fn biome_at(&self, version: &GameVersion, seed: Seed, position: Position) -> Result<BiomeId, OracleError>;

    /// Whether this oracle has rules for `version`. Checked once before a
    /// scan starts.
    fn supports(&self, _version: &GameVersion) -> bool {
        true
    }
}
