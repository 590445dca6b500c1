//! Configuration parameters for a seed scan
//!
//! Defaults match the usual interactive search. Presets cover quick smoke
//! runs and wide overnight scans.

use serde::{Deserialize, Serialize};

use crate::scanner::ScanError;
use crate::types::{GameVersion, Seed};

/// Largest accepted search radius: the world border, in blocks.
pub const MAX_SEARCH_RADIUS: i64 = 30_000_000;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanParams {
    // Seed range
    /// First seed scanned
    pub seed_start: Seed,
    /// One past the last seed scanned
    pub seed_end: Seed,

    // Thresholds
    /// Minimum estimated houses for a finding
    pub min_occupants: u32,
    /// Maximum spacing between houses (blocks). Carried through to cluster
    /// detection, which currently uses a fixed overlap distance instead
    pub max_merge_distance: u32,
    /// Half-width of the search box around the origin (blocks)
    pub search_radius: i64,

    // Search strategy
    /// Scan only the low 48 bits of each seed
    pub reduced_space: bool,
    /// Game version handed to the oracle
    pub version: GameVersion,
    /// Worker threads; 1 scans sequentially on the calling thread
    pub workers: usize,
}

impl Default for ScanParams {
    fn default() -> Self {
        Self {
            seed_start: 0,
            seed_end: 1_000_000,

            min_occupants: 100,
            max_merge_distance: 25,
            search_radius: 5000,

            reduced_space: true,
            version: GameVersion::default(),
            workers: 1,
        }
    }
}

impl ScanParams {
    /// Small window for checking a setup
    pub fn quick() -> Self {
        Self {
            seed_end: 1_000,
            search_radius: 2000,
            ..Default::default()
        }
    }

    /// Wide search using every core
    pub fn thorough() -> Self {
        Self {
            seed_end: 100_000_000,
            search_radius: 10_000,
            workers: std::thread::available_parallelism()
                .map(|n| n.get())
                .unwrap_or(1),
            ..Default::default()
        }
    }

    /// Parse parameters from TOML; missing keys keep their defaults.
    pub fn from_toml(text: &str) -> Result<Self, ScanError> {
        toml::from_str(text).map_err(|e| ScanError::Config(format!("cannot parse parameters: {}", e)))
    }

    /// Reject parameters a scan cannot run with.
    pub fn validate(&self) -> Result<(), ScanError> {
        if self.seed_start >= self.seed_end {
            return Err(ScanError::Config(format!(
                "seed_start ({}) must be less than seed_end ({})",
                self.seed_start, self.seed_end
            )));
        }
        if self.min_occupants == 0 {
            return Err(ScanError::Config("min_occupants must be positive".to_string()));
        }
        if self.max_merge_distance == 0 {
            return Err(ScanError::Config("max_merge_distance must be positive".to_string()));
        }
        if self.search_radius <= 0 || self.search_radius > MAX_SEARCH_RADIUS {
            return Err(ScanError::Config(format!(
                "search_radius must be in 1..={}, got {}",
                MAX_SEARCH_RADIUS, self.search_radius
            )));
        }
        if self.workers == 0 {
            return Err(ScanError::Config("workers must be at least 1".to_string()));
        }
        Ok(())
    }

    /// Number of seeds in the range.
    pub fn seed_count(&self) -> u64 {
        (self.seed_end as i128 - self.seed_start as i128).max(0) as u64
    }
}
