//! Village locator
//!
//! Walks every placement region that overlaps the search box around the
//! origin and keeps the oracle's candidates that are inside the box and
//! actually generate.

use std::ops::RangeInclusive;

use log::warn;

use crate::oracle::PlacementOracle;
use crate::types::{Dimension, GameVersion, Position, RegionCoord, Seed, StructureKind};

/// Village region tile edge: 34 chunks of 16 blocks.
pub const REGION_SIZE_BLOCKS: i64 = 34 * 16;

/// Region indices along one axis whose tiles overlap `[-radius, radius]`.
pub fn region_range(radius: i64, region_size: i64) -> RangeInclusive<i64> {
    (-radius).div_euclid(region_size)..=radius.div_euclid(region_size)
}

pub struct VillageLocator<'a, O: PlacementOracle + ?Sized> {
    oracle: &'a O,
    region_size: i64,
}

impl<'a, O: PlacementOracle + ?Sized> VillageLocator<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self {
            oracle,
            region_size: REGION_SIZE_BLOCKS,
        }
    }

    /// Viable village positions within the box of half-width `radius`.
    ///
    /// Positions come back in region order (x outer, z inner, ascending).
    /// Regions are disjoint, so there are no duplicates. A region whose
    /// lookups fail is skipped.
    pub fn locate(&self, seed: Seed, version: &GameVersion, radius: i64) -> Vec<Position> {
        let mut positions = Vec::new();
        if radius < 0 {
            return positions;
        }

        let range = region_range(radius, self.region_size);
        for rx in range.clone() {
            for rz in range.clone() {
                let region = RegionCoord::new(rx, rz);
                if let Some(pos) = self.locate_in_region(seed, version, radius, region) {
                    positions.push(pos);
                }
            }
        }

        positions
    }

    fn locate_in_region(
        &self,
        seed: Seed,
        version: &GameVersion,
        radius: i64,
        region: RegionCoord,
    ) -> Option<Position> {
        let candidate = match self.oracle.place(StructureKind::Village, seed, version, region) {
            Ok(Some(pos)) => pos,
            Ok(None) => return None,
            Err(e) => {
                warn!("seed {}: skipping region ({}, {}): {}", seed, region.x, region.z, e);
                return None;
            }
        };

        if !candidate.within_radius(radius) {
            return None;
        }

        match self
            .oracle
            .is_viable(StructureKind::Village, version, seed, candidate, Dimension::Overworld)
        {
            Ok(true) => Some(candidate),
            Ok(false) => None,
            Err(e) => {
                warn!(
                    "seed {}: viability check failed at ({}, {}): {}",
                    seed, candidate.x, candidate.z, e
                );
                None
            }
        }
    }
}
