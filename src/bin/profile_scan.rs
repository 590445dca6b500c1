//! Profiling tool for the seed scan pipeline

use std::time::{Duration, Instant};

use mega_village_finder::density::DensityEstimator;
use mega_village_finder::evaluator::SeedEvaluator;
use mega_village_finder::locator::VillageLocator;
use mega_village_finder::{scan_range, ApproximateOracle, CancelToken, ScanParams};

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let oracle = ApproximateOracle::new();
    let base = ScanParams {
        seed_start: 0,
        seed_end: 2_000,
        min_occupants: 100,
        search_radius: 5000,
        ..Default::default()
    };
    let cores = std::thread::available_parallelism().map(|n| n.get()).unwrap_or(1);

    println!("=== Scan Profiling ===");
    println!(
        "Seeds {}..{} | radius {} | version {}",
        base.seed_start, base.seed_end, base.search_radius, base.version
    );
    println!();

    // Per-stage cost over a small window
    let locator = VillageLocator::new(&oracle);
    let estimator = DensityEstimator::new(&oracle);
    let evaluator = SeedEvaluator::new(&oracle);
    let window = 0..200i64;

    let start = Instant::now();
    let mut villages = 0usize;
    let mut positions = Vec::new();
    for seed in window.clone() {
        let found = locator.locate(seed, &base.version, base.search_radius);
        villages += found.len();
        positions.push((seed, found));
    }
    let locate_time = start.elapsed();
    println!("Locate ({} seeds): {:?} ({} villages)", window.end, locate_time, villages);

    let start = Instant::now();
    let mut houses = 0u64;
    for (seed, found) in &positions {
        for &pos in found {
            houses += estimator.estimate(*seed, &base.version, pos) as u64;
        }
    }
    let estimate_time = start.elapsed();
    println!(
        "Estimate: {:?} (mean {:.1} houses)",
        estimate_time,
        houses as f64 / villages.max(1) as f64
    );

    let start = Instant::now();
    let mut findings = 0usize;
    for seed in window.clone() {
        findings += evaluator
            .evaluate(seed, &base.version, base.min_occupants, base.max_merge_distance, base.search_radius)
            .len();
    }
    let evaluate_time = start.elapsed();
    println!("Evaluate: {:?} ({} findings)", evaluate_time, findings);
    println!();

    // Whole scans
    let runs = [
        ("reduced, 1 worker", true, 1),
        ("full, 1 worker", false, 1),
        ("reduced, all cores", true, cores),
        ("full, all cores", false, cores),
    ];
    let mut timings: Vec<(&str, Duration, usize)> = Vec::new();
    for (label, reduced_space, workers) in runs {
        let params = ScanParams {
            reduced_space,
            workers,
            ..base.clone()
        };
        let start = Instant::now();
        let found = scan_range(&oracle, &params, &CancelToken::new(), |_| {})?;
        let elapsed = start.elapsed();
        println!("Scan ({}): {:?} ({} findings)", label, elapsed, found.len());
        timings.push((label, elapsed, found.len()));
    }

    println!("\n=== Summary ===");
    let seeds = base.seed_count() as f64;
    for (label, elapsed, _) in &timings {
        println!(
            "{:<20} {:>10.1} seeds/s",
            label,
            seeds / elapsed.as_secs_f64().max(f64::EPSILON)
        );
    }

    Ok(())
}
