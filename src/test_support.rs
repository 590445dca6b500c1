//! Scripted oracle shared by the unit tests

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::locator::REGION_SIZE_BLOCKS;
use crate::oracle::{OracleError, PlacementOracle};
use crate::types::{BiomeId, Dimension, GameVersion, Position, RegionCoord, Seed, StructureKind};

#[derive(Clone, Debug)]
struct ScriptedVillage {
    region: RegionCoord,
    position: Position,
    viable: bool,
    /// Viability lookups at this position fail
    viability_fails: bool,
    /// `None` makes biome lookups at this position fail
    biome: Option<BiomeId>,
}

/// Oracle that answers from a fixed script.
///
/// Villages registered for "every seed" appear in all worlds; per-seed
/// villages only in that seed. A village answers for the region containing
/// its position unless placed in an explicit region, which lets tests put
/// two villages closer together than real placement ever would.
#[derive(Default)]
pub struct ScriptedOracle {
    every_seed: Vec<ScriptedVillage>,
    per_seed: HashMap<Seed, Vec<ScriptedVillage>>,
    failing_regions: HashSet<RegionCoord>,
    panicking_seeds: HashSet<Seed>,
    place_calls: AtomicUsize,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn village_everywhere(mut self, x: i64, z: i64, biome: &str) -> Self {
        self.every_seed.push(ScriptedVillage {
            region: region_of(Position::new(x, z)),
            position: Position::new(x, z),
            viable: true,
            viability_fails: false,
            biome: Some(BiomeId::new(biome)),
        });
        self
    }

    pub fn village(self, seed: Seed, x: i64, z: i64, biome: &str) -> Self {
        let region = region_of(Position::new(x, z));
        self.village_in_region(seed, (region.x, region.z), x, z, biome)
    }

    pub fn village_in_region(mut self, seed: Seed, region: (i64, i64), x: i64, z: i64, biome: &str) -> Self {
        self.per_seed.entry(seed).or_default().push(ScriptedVillage {
            region: RegionCoord::new(region.0, region.1),
            position: Position::new(x, z),
            viable: true,
            viability_fails: false,
            biome: Some(BiomeId::new(biome)),
        });
        self
    }

    pub fn unviable_village(mut self, seed: Seed, x: i64, z: i64) -> Self {
        self.per_seed.entry(seed).or_default().push(ScriptedVillage {
            region: region_of(Position::new(x, z)),
            position: Position::new(x, z),
            viable: false,
            viability_fails: false,
            biome: Some(BiomeId::new("minecraft:plains")),
        });
        self
    }

    pub fn village_without_biome(mut self, seed: Seed, x: i64, z: i64) -> Self {
        self.per_seed.entry(seed).or_default().push(ScriptedVillage {
            region: region_of(Position::new(x, z)),
            position: Position::new(x, z),
            viable: true,
            viability_fails: false,
            biome: None,
        });
        self
    }

    pub fn failing_viability(mut self, seed: Seed, x: i64, z: i64) -> Self {
        self.per_seed.entry(seed).or_default().push(ScriptedVillage {
            region: region_of(Position::new(x, z)),
            position: Position::new(x, z),
            viable: true,
            viability_fails: true,
            biome: Some(BiomeId::new("minecraft:plains")),
        });
        self
    }

    pub fn failing_region(mut self, rx: i64, rz: i64) -> Self {
        self.failing_regions.insert(RegionCoord::new(rx, rz));
        self
    }

    pub fn panicking_seed(mut self, seed: Seed) -> Self {
        self.panicking_seeds.insert(seed);
        self
    }

    pub fn place_calls(&self) -> usize {
        self.place_calls.load(Ordering::SeqCst)
    }

    fn villages_for(&self, seed: Seed) -> impl Iterator<Item = &ScriptedVillage> + '_ {
        self.every_seed
            .iter()
            .chain(self.per_seed.get(&seed).into_iter().flatten())
    }

    fn village_at(&self, seed: Seed, position: Position) -> Option<&ScriptedVillage> {
        self.villages_for(seed).find(|v| v.position == position)
    }
}

fn region_of(position: Position) -> RegionCoord {
    RegionCoord::new(
        position.x.div_euclid(REGION_SIZE_BLOCKS),
        position.z.div_euclid(REGION_SIZE_BLOCKS),
    )
}

impl PlacementOracle for ScriptedOracle {
    fn place(
        &self,
        _kind: StructureKind,
        seed: Seed,
        _version: &GameVersion,
        region: RegionCoord,
    ) -> Result<Option<Position>, OracleError> {
        self.place_calls.fetch_add(1, Ordering::SeqCst);
        if self.panicking_seeds.contains(&seed) {
            panic!("scripted oracle crash for seed {}", seed);
        }
        if self.failing_regions.contains(&region) {
            return Err(OracleError::Lookup {
                x: region.x,
                z: region.z,
                reason: "scripted region failure".to_string(),
            });
        }
        Ok(self
            .villages_for(seed)
            .find(|v| v.region == region)
            .map(|v| v.position))
    }

    fn is_viable(
        &self,
        _kind: StructureKind,
        _version: &GameVersion,
        seed: Seed,
        position: Position,
        _dimension: Dimension,
    ) -> Result<bool, OracleError> {
        match self.village_at(seed, position) {
            Some(v) if v.viability_fails => Err(OracleError::Lookup {
                x: position.x,
                z: position.z,
                reason: "scripted viability failure".to_string(),
            }),
            Some(v) => Ok(v.viable),
            None => Ok(false),
        }
    }

    fn biome_at(&self, _version: &GameVersion, seed: Seed, position: Position) -> Result<BiomeId, OracleError> {
        match self.village_at(seed, position).and_then(|v| v.biome.clone()) {
            Some(biome) => Ok(biome),
            None => Err(OracleError::Lookup {
                x: position.x,
                z: position.z,
                reason: "scripted biome failure".to_string(),
            }),
        }
    }

    fn supports(&self, version: &GameVersion) -> bool {
        version.as_str() != "unsupported"
    }
}

pub fn init_test_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}
