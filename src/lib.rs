//! Mega-village seed finder library
//!
//! Scans ranges of world seeds for villages with unusually high estimated
//! house counts, or for villages close enough to merge into one cluster.
//! Structure placement and biome lookups go through a [`PlacementOracle`].

pub mod cluster;
pub mod density;
pub mod evaluator;
pub mod export;
pub mod locator;
pub mod oracle;
pub mod params;
pub mod scanner;
pub mod seeds;
pub mod types;

#[cfg(test)]
mod test_support;

pub use oracle::{ApproximateOracle, OracleError, PlacementOracle};
pub use params::ScanParams;
pub use scanner::{scan_range, start_scan, with_quiet_panics, CancelToken, ScanError, ScanEvent, ScanHandle, ScanProgress};
pub use types::{BiomeId, Finding, GameVersion, Position, Seed};
