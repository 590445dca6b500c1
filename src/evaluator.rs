//! Per-seed evaluation: locate villages, estimate each one, and check for a
//! merging cluster.

use log::debug;

use crate::cluster;
use crate::density::DensityEstimator;
use crate::locator::VillageLocator;
use crate::oracle::PlacementOracle;
use crate::types::{Finding, GameVersion, Seed};

pub struct SeedEvaluator<'a, O: PlacementOracle + ?Sized> {
    locator: VillageLocator<'a, O>,
    estimator: DensityEstimator<'a, O>,
}

impl<'a, O: PlacementOracle + ?Sized> SeedEvaluator<'a, O> {
    pub fn new(oracle: &'a O) -> Self {
        Self {
            locator: VillageLocator::new(oracle),
            estimator: DensityEstimator::new(oracle),
        }
    }

    /// All findings for one seed.
    ///
    /// Individual villages come first in locator order, then the cluster
    /// finding if there is one. A village can appear both on its own and
    /// inside the cluster.
    pub fn evaluate(
        &self,
        seed: Seed,
        version: &GameVersion,
        min_occupants: u32,
        max_merge_distance: u32,
        radius: i64,
    ) -> Vec<Finding> {
        let positions = self.locator.locate(seed, version, radius);
        let mut findings = Vec::new();
        let mut estimates = Vec::with_capacity(positions.len());

        for &pos in &positions {
            let estimate = self.estimator.assess(seed, version, pos);
            estimates.push(estimate.occupant_count);
            if estimate.occupant_count >= min_occupants {
                findings.push(Finding::single(seed, pos, estimate.occupant_count, estimate.biome));
            }
        }

        if cluster::detect(&positions, max_merge_distance) {
            if let Some(summary) = cluster::summarize(&positions, &estimates) {
                if summary.occupant_count >= min_occupants {
                    findings.push(Finding::cluster(seed, summary.centroid, summary.occupant_count));
                }
            }
        }

        debug!(
            "seed {}: {} villages, {} findings",
            seed,
            positions.len(),
            findings.len()
        );
        findings
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::density::FALLBACK_HOUSES;
    use crate::oracle::ApproximateOracle;
    use crate::test_support::ScriptedOracle;
    use crate::types::{BiomeId, Position};

    fn version() -> GameVersion {
        GameVersion::new("1.20.4")
    }

    #[test]
    fn test_single_village_finding() {
        let oracle = ScriptedOracle::new().village(0, 100, 200, "plains");
        let findings = SeedEvaluator::new(&oracle).evaluate(0, &version(), 1, 25, 5000);
        assert_eq!(findings.len(), 1);
        let f = &findings[0];
        assert_eq!((f.seed, f.x, f.z), (0, 100, 200));
        assert!(f.occupant_count > 0);
        assert_eq!(f.biome, BiomeId::new("plains"));
        assert!(!f.is_cluster);
    }

    #[test]
    fn test_threshold_filters_individuals() {
        let oracle = ScriptedOracle::new().village(0, 100, 200, "plains");
        // No estimate can reach this
        let findings = SeedEvaluator::new(&oracle).evaluate(0, &version(), 500, 25, 5000);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_cluster_finding_sums_every_village() {
        let oracle = ScriptedOracle::new()
            .village(5, 0, 0, "minecraft:plains")
            .village_in_region(5, (0, 1), 200, 200, "minecraft:meadow")
            .village(5, 3000, -3000, "minecraft:desert");
        let evaluator = SeedEvaluator::new(&oracle);
        let findings = evaluator.evaluate(5, &version(), 1, 25, 5000);

        assert_eq!(findings.len(), 4);
        let individual_sum: u32 = findings[..3].iter().map(|f| f.occupant_count).sum();
        let cluster = findings.last().unwrap();
        assert!(cluster.is_cluster);
        assert_eq!(cluster.biome.as_str(), BiomeId::CLUSTER);
        assert_eq!(cluster.occupant_count, individual_sum);
        assert_eq!(cluster.position(), Position::new(1066, -933));
    }

    #[test]
    fn test_cluster_emitted_even_when_individuals_are_not() {
        let oracle = ScriptedOracle::new()
            .village(1, 0, 0, "minecraft:plains")
            .village_in_region(1, (0, 1), 200, 200, "minecraft:plains");
        let evaluator = SeedEvaluator::new(&oracle);
        let all = evaluator.evaluate(1, &version(), 1, 25, 5000);
        let sum = all[0].occupant_count + all[1].occupant_count;

        // Threshold above any single village but at the combined count
        let findings = evaluator.evaluate(1, &version(), sum, 25, 5000);
        assert_eq!(findings.len(), 1);
        assert!(findings[0].is_cluster);
        assert_eq!(findings[0].occupant_count, sum);
    }

    #[test]
    fn test_distant_villages_do_not_cluster() {
        let oracle = ScriptedOracle::new()
            .village(2, 0, 0, "plains")
            .village(2, 1000, 1000, "plains");
        let findings = SeedEvaluator::new(&oracle).evaluate(2, &version(), 1, 25, 5000);
        assert_eq!(findings.len(), 2);
        assert!(findings.iter().all(|f| !f.is_cluster));
    }

    #[test]
    fn test_unknown_biome_degrades_finding() {
        let oracle = ScriptedOracle::new().village_without_biome(3, 64, 64);
        let findings = SeedEvaluator::new(&oracle).evaluate(3, &version(), 1, 25, 5000);
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].occupant_count, FALLBACK_HOUSES);
        assert_eq!(findings[0].biome, BiomeId::unknown());
    }

    #[test]
    fn test_findings_respect_invariants() {
        let oracle = ApproximateOracle::new();
        let evaluator = SeedEvaluator::new(&oracle);
        let radius = 3000;
        for seed in 0..30 {
            for f in evaluator.evaluate(seed, &version(), 60, 25, radius) {
                assert!(f.occupant_count >= 60);
                assert!(f.x.abs() <= radius && f.z.abs() <= radius);
                assert_eq!(f.is_cluster, f.biome.as_str() == BiomeId::CLUSTER);
            }
        }
    }
}
