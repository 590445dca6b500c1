//! Core data types shared by the locator, estimator, evaluator and scanner.

use std::fmt;

use serde::{Deserialize, Serialize};

/// World seed. Only the low 48 bits drive structure placement in the
/// supported versions, but the full 64-bit value identifies a world.
pub type Seed = i64;

/// Opaque game version token (e.g. "1.20.4").
///
/// The core never interprets it; it is passed through to the oracle.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GameVersion(pub String);

impl GameVersion {
    pub fn new(version: impl Into<String>) -> Self {
        GameVersion(version.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for GameVersion {
    fn default() -> Self {
        GameVersion::new("1.20.4")
    }
}

impl fmt::Display for GameVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Structure families the oracle knows about. This tool only ever asks
/// for villages.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum StructureKind {
    Village,
}

/// Dimension a structure is checked in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Dimension {
    Overworld,
}

/// Block position of a structure instance (x, z). Height is irrelevant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Position {
    pub x: i64,
    pub z: i64,
}

impl Position {
    pub fn new(x: i64, z: i64) -> Self {
        Self { x, z }
    }

    /// Box (Chebyshev) containment: |x| <= radius and |z| <= radius.
    pub fn within_radius(&self, radius: i64) -> bool {
        self.x.abs() <= radius && self.z.abs() <= radius
    }

    /// Squared Euclidean distance, exact in integers.
    pub fn distance_squared(&self, other: &Position) -> i128 {
        let dx = self.x as i128 - other.x as i128;
        let dz = self.z as i128 - other.z as i128;
        dx * dx + dz * dz
    }
}

/// Index of a placement region tile.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RegionCoord {
    pub x: i64,
    pub z: i64,
}

impl RegionCoord {
    pub fn new(x: i64, z: i64) -> Self {
        Self { x, z }
    }
}

/// Biome identifier as reported by the oracle, e.g. "minecraft:plains".
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BiomeId(pub String);

impl BiomeId {
    /// Reported when a biome lookup fails.
    pub const UNKNOWN: &'static str = "unknown";
    /// Stored on aggregated cluster findings instead of a real biome.
    pub const CLUSTER: &'static str = "cluster";

    pub fn new(id: impl Into<String>) -> Self {
        BiomeId(id.into())
    }

    pub fn unknown() -> Self {
        BiomeId::new(Self::UNKNOWN)
    }

    pub fn cluster() -> Self {
        BiomeId::new(Self::CLUSTER)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Biome name without the "minecraft:" style namespace.
    pub fn path(&self) -> &str {
        match self.0.split_once(':') {
            Some((_, path)) => path,
            None => &self.0,
        }
    }
}

impl fmt::Display for BiomeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Marks a finding produced by a reduced-space (48-bit) scan.
///
/// `full_seed` stays `None`: recovering the upper 16 bits is a separate
/// step this crate does not perform.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReducedSeed {
    pub seed_48bit: Seed,
    pub full_seed: Option<Seed>,
}

/// A seed/location that met the occupant threshold.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Finding {
    pub seed: Seed,
    pub x: i64,
    pub z: i64,
    #[serde(rename = "house_count")]
    pub occupant_count: u32,
    pub biome: BiomeId,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub is_cluster: bool,
    #[serde(flatten)]
    pub reduced: Option<ReducedSeed>,
}

impl Finding {
    /// Finding for a single structure instance.
    pub fn single(seed: Seed, position: Position, occupant_count: u32, biome: BiomeId) -> Self {
        Self {
            seed,
            x: position.x,
            z: position.z,
            occupant_count,
            biome,
            is_cluster: false,
            reduced: None,
        }
    }

    /// Finding for an aggregated cluster of nearby instances.
    pub fn cluster(seed: Seed, centroid: Position, occupant_count: u32) -> Self {
        Self {
            seed,
            x: centroid.x,
            z: centroid.z,
            occupant_count,
            biome: BiomeId::cluster(),
            is_cluster: true,
            reduced: None,
        }
    }

    pub fn position(&self) -> Position {
        Position::new(self.x, self.z)
    }

    /// Tag this finding as coming from a 48-bit scan of `masked_seed`.
    pub fn mark_reduced(&mut self, masked_seed: Seed) {
        self.reduced = Some(ReducedSeed {
            seed_48bit: masked_seed,
            full_seed: None,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_within_radius_is_box_check() {
        assert!(Position::new(100, 100).within_radius(500));
        assert!(!Position::new(600, 0).within_radius(500));
        assert!(Position::new(0, 0).within_radius(0));
        // Corner of the box is inside even though its Euclidean distance is not
        assert!(Position::new(500, -500).within_radius(500));
    }

    #[test]
    #[allow(arithmetic_overflow)]
    fn test_distance_squared_at_extreme_coordinates() {
        let a = Position::new(i64::MAX, 0);
        let b = Position::new(i64::MIN, 0);
        let span = i64::MAX as i128 - i64::MIN as i128;
        assert_eq!(a.distance_squared(&b), span * span);
        assert_eq!(Position::new(3, 4).distance_squared(&Position::new(0, 0)), 25);
    }

    #[test]
    fn test_biome_path_strips_namespace() {
        assert_eq!(BiomeId::new("minecraft:snowy_plains").path(), "snowy_plains");
        assert_eq!(BiomeId::new("plains").path(), "plains");
    }

    #[test]
    fn test_cluster_finding_uses_sentinel_biome() {
        let finding = Finding::cluster(7, Position::new(1, 2), 150);
        assert!(finding.is_cluster);
        assert_eq!(finding.biome.as_str(), BiomeId::CLUSTER);
    }

    #[test]
    fn test_finding_json_field_names() {
        let mut finding = Finding::single(5, Position::new(-16, 32), 90, BiomeId::new("minecraft:plains"));
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["house_count"], 90);
        assert!(json.get("is_cluster").is_none());
        assert!(json.get("seed_48bit").is_none());

        finding.mark_reduced(5);
        let json = serde_json::to_value(&finding).unwrap();
        assert_eq!(json["seed_48bit"], 5);
        assert!(json["full_seed"].is_null());
    }

    #[test]
    fn test_finding_json_round_trip() {
        let mut cluster = Finding::cluster(-3, Position::new(100, 100), 210);
        cluster.mark_reduced(0xFFFF_FFFF_FFFD);
        let plain = Finding::single(12, Position::new(0, 544), 77, BiomeId::new("desert"));

        for finding in [cluster, plain] {
            let text = serde_json::to_string(&finding).unwrap();
            let back: Finding = serde_json::from_str(&text).unwrap();
            assert_eq!(back, finding);
        }
    }
}
