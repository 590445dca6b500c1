//! Range scanning over world seeds
//!
//! A scan is a fold over `[seed_start, seed_end)`: each seed is evaluated
//! independently and its findings are appended to one accumulator.
//!
//! - Full mode hands every seed to the evaluator unchanged.
//! - Reduced mode masks each seed to its low 48 bits first, and tags the
//!   findings with the masked seed. The upper 16 bits are left unrecovered.
//!
//! Progress is reported after every seed, cancellation is checked before
//! every seed, and a seed whose evaluation panics is logged and skipped.
//! With more than one worker the range is split into contiguous slices
//! scanned on a rayon pool.

pub mod handle;

pub use handle::{start_scan, ScanEvent, ScanHandle};

use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use log::{debug, info, warn};
use rayon::prelude::*;
use thiserror::Error;

use crate::evaluator::SeedEvaluator;
use crate::oracle::PlacementOracle;
use crate::params::ScanParams;
use crate::seeds::mask_48;
use crate::types::{Finding, Seed};

/// Errors that stop a scan from starting or finishing.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error("invalid scan configuration: {0}")]
    Config(String),
    #[error("could not start scan workers: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("scan worker failed: {0}")]
    Worker(String),
}

/// Snapshot reported after each evaluated seed.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScanProgress {
    /// `100 * (seed - seed_start) / (seed_end - seed_start)`
    pub percent: f64,
    /// Findings accumulated so far
    pub findings: usize,
}

/// Cooperative stop flag shared between a scan and its controller.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Percentage of the range completed before `seed` was evaluated.
pub fn progress_percent(seed: Seed, seed_start: Seed, seed_end: Seed) -> f64 {
    let done = (seed as i128 - seed_start as i128) as f64;
    let total = (seed_end as i128 - seed_start as i128) as f64;
    100.0 * done / total
}

/// Seed evaluation failed outright; the scan skips the seed.
#[derive(Debug, Error)]
#[error("seed {seed} evaluation failed: {reason}")]
pub struct SeedFailure {
    pub seed: Seed,
    pub reason: String,
}

pub struct RangeScanner<'a, O: PlacementOracle + ?Sized> {
    evaluator: SeedEvaluator<'a, O>,
    params: &'a ScanParams,
}

impl<'a, O: PlacementOracle + ?Sized> RangeScanner<'a, O> {
    /// Validates `params` and the oracle's support for the game version.
    pub fn new(oracle: &'a O, params: &'a ScanParams) -> Result<Self, ScanError> {
        check_config(oracle, params)?;
        Ok(Self {
            evaluator: SeedEvaluator::new(oracle),
            params,
        })
    }

    /// Evaluate one seed of the range, applying reduced-space masking.
    /// A panic inside the oracle is turned into a [`SeedFailure`].
    pub fn scan_seed(&self, seed: Seed) -> Result<Vec<Finding>, SeedFailure> {
        let p = self.params;
        let effective = if p.reduced_space { mask_48(seed) } else { seed };

        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            self.evaluator.evaluate(
                effective,
                &p.version,
                p.min_occupants,
                p.max_merge_distance,
                p.search_radius,
            )
        }));

        match result {
            Ok(mut findings) => {
                if p.reduced_space {
                    for finding in &mut findings {
                        finding.mark_reduced(effective);
                    }
                }
                Ok(findings)
            }
            Err(payload) => Err(SeedFailure {
                seed,
                reason: panic_message(payload.as_ref()),
            }),
        }
    }

    /// Scan the whole range on the calling thread, in increasing seed order.
    /// Returns whatever was accumulated when `cancel` fires.
    pub fn scan(&self, cancel: &CancelToken, mut on_progress: impl FnMut(ScanProgress)) -> Vec<Finding> {
        let p = self.params;
        let mut findings = Vec::new();

        for seed in p.seed_start..p.seed_end {
            if cancel.is_cancelled() {
                info!("scan cancelled before seed {}", seed);
                break;
            }

            match self.scan_seed(seed) {
                Ok(found) => findings.extend(found),
                Err(e) => warn!("{}", e),
            }

            on_progress(ScanProgress {
                percent: progress_percent(seed, p.seed_start, p.seed_end),
                findings: findings.len(),
            });
        }

        findings
    }

    /// Scan with `params.workers` threads over contiguous slices.
    ///
    /// Findings are merged in slice order, so an uncancelled run returns the
    /// same list as [`scan`](Self::scan). Progress reports the fraction of
    /// all seeds completed so far; it never decreases within one worker.
    pub fn scan_parallel(
        &self,
        cancel: &CancelToken,
        on_progress: impl Fn(ScanProgress) + Sync,
    ) -> Result<Vec<Finding>, ScanError>
    where
        O: Sync,
    {
        let p = self.params;
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(p.workers)
            .build()?;

        let total = p.seed_count();
        let completed = AtomicU64::new(0);
        let found = AtomicUsize::new(0);
        let slices = split_range(p.seed_start, p.seed_end, p.workers);

        let parts: Vec<Vec<Finding>> = pool.install(|| {
            slices
                .par_iter()
                .map(|&(lo, hi)| {
                    let mut acc = Vec::new();
                    for seed in lo..hi {
                        if cancel.is_cancelled() {
                            break;
                        }
                        match self.scan_seed(seed) {
                            Ok(f) => {
                                found.fetch_add(f.len(), Ordering::SeqCst);
                                acc.extend(f);
                            }
                            Err(e) => warn!("{}", e),
                        }
                        let done = completed.fetch_add(1, Ordering::SeqCst);
                        on_progress(ScanProgress {
                            percent: 100.0 * done as f64 / total as f64,
                            findings: found.load(Ordering::SeqCst),
                        });
                    }
                    acc
                })
                .collect()
        });

        Ok(parts.into_iter().flatten().collect())
    }
}

/// Validate, then scan `params` sequentially or in parallel depending on
/// the worker count.
pub fn scan_range<O: PlacementOracle + ?Sized>(
    oracle: &O,
    params: &ScanParams,
    cancel: &CancelToken,
    on_progress: impl Fn(ScanProgress) + Sync,
) -> Result<Vec<Finding>, ScanError> {
    let scanner = RangeScanner::new(oracle, params)?;
    info!(
        "scanning seeds [{}, {}) for {} ({} mode, {} worker(s))",
        params.seed_start,
        params.seed_end,
        params.version,
        if params.reduced_space { "48-bit" } else { "full" },
        params.workers
    );

    let findings = if params.workers > 1 {
        scanner.scan_parallel(cancel, on_progress)?
    } else {
        scanner.scan(cancel, on_progress)
    };

    info!("scan finished with {} findings", findings.len());
    Ok(findings)
}

/// Configuration checks run before any seed is touched.
pub(crate) fn check_config<O: PlacementOracle + ?Sized>(oracle: &O, params: &ScanParams) -> Result<(), ScanError> {
    params.validate()?;
    if !oracle.supports(&params.version) {
        return Err(ScanError::Config(format!(
            "game version {} is not supported by the placement oracle",
            params.version
        )));
    }
    Ok(())
}

/// Split `[start, end)` into at most `parts` contiguous, non-empty slices.
pub fn split_range(start: Seed, end: Seed, parts: usize) -> Vec<(Seed, Seed)> {
    let total = (end as i128 - start as i128).max(0);
    if total == 0 || parts == 0 {
        return Vec::new();
    }
    let parts = (parts as i128).min(total);
    let chunk = (total + parts - 1) / parts;

    let mut slices = Vec::with_capacity(parts as usize);
    let mut lo = start as i128;
    while lo < end as i128 {
        let hi = (lo + chunk).min(end as i128);
        slices.push((lo as Seed, hi as Seed));
        lo = hi;
    }
    slices
}

/// Run `f` with the process panic hook replaced by a `debug!` log line.
///
/// Seeds that panic are already reported by the scanner at `warn`; this
/// keeps the default hook from also printing a report over a progress
/// line. The previous hook is reinstalled when `f` returns.
pub fn with_quiet_panics<T>(f: impl FnOnce() -> T) -> T {
    let previous = panic::take_hook();
    panic::set_hook(Box::new(|info| debug!("{}", info)));
    let out = f();
    panic::set_hook(previous);
    out
}

pub(crate) fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
