use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use log::info;

use mega_village_finder::export::{export_findings_json, format_finding};
use mega_village_finder::oracle::approx::SUPPORTED_VERSIONS;
use mega_village_finder::{start_scan, with_quiet_panics, ApproximateOracle, GameVersion, ScanEvent, ScanParams};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Preset {
    /// First 1000 seeds, 2000-block radius
    Quick,
    /// Wide range on every core
    Thorough,
}

#[derive(Parser, Debug)]
#[command(name = "mega_village_finder")]
#[command(about = "Search world seeds for oversized and merging villages")]
struct Args {
    /// Start from a parameter preset
    #[arg(long, value_enum, conflicts_with = "config")]
    preset: Option<Preset>,

    /// Read parameters from a TOML file (flags below override it)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// First seed to scan
    #[arg(short, long, allow_hyphen_values = true)]
    start: Option<i64>,

    /// One past the last seed to scan
    #[arg(short, long, allow_hyphen_values = true)]
    end: Option<i64>,

    /// Minimum estimated houses for a result
    #[arg(short = 'm', long)]
    min_houses: Option<u32>,

    /// Maximum spacing between houses in blocks
    #[arg(long)]
    max_spacing: Option<u32>,

    /// Search radius around the origin in blocks
    #[arg(short, long)]
    radius: Option<i64>,

    /// Game version (e.g. 1.20.4)
    #[arg(short = 'v', long = "version")]
    game_version: Option<String>,

    /// Scan full 64-bit seeds instead of the 48-bit placement space
    #[arg(long)]
    full: bool,

    /// Worker threads
    #[arg(short, long)]
    workers: Option<usize>,

    /// Export results to a JSON file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Don't print progress while scanning
    #[arg(short, long)]
    quiet: bool,
}

fn build_params(args: &Args) -> Result<ScanParams> {
    let mut params = match (&args.config, args.preset) {
        (Some(path), _) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("cannot read config file {}", path.display()))?;
            ScanParams::from_toml(&text).with_context(|| format!("bad config file {}", path.display()))?
        }
        (None, Some(Preset::Quick)) => ScanParams::quick(),
        (None, Some(Preset::Thorough)) => ScanParams::thorough(),
        (None, None) => ScanParams::default(),
    };

    if let Some(start) = args.start {
        params.seed_start = start;
    }
    if let Some(end) = args.end {
        params.seed_end = end;
    }
    if let Some(min) = args.min_houses {
        params.min_occupants = min;
    }
    if let Some(spacing) = args.max_spacing {
        params.max_merge_distance = spacing;
    }
    if let Some(radius) = args.radius {
        params.search_radius = radius;
    }
    if let Some(version) = &args.game_version {
        params.version = GameVersion::new(version.as_str());
    }
    if args.full {
        params.reduced_space = false;
    }
    if let Some(workers) = args.workers {
        params.workers = workers;
    }
    Ok(params)
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    let params = build_params(&args)?;

    println!("Mega-village seed finder");
    println!(
        "Seeds {}..{} | min houses {} | radius {} | version {} | {} mode",
        params.seed_start,
        params.seed_end,
        params.min_occupants,
        params.search_radius,
        params.version,
        if params.reduced_space { "48-bit" } else { "full" }
    );

    let oracle = Arc::new(ApproximateOracle::new());
    let handle = start_scan(oracle, params.clone()).with_context(|| {
        format!("cannot start scan (supported versions: {})", SUPPORTED_VERSIONS.join(", "))
    })?;

    let findings = with_quiet_panics(|| {
        // Redraw at most once per tenth of a percent
        let mut last_tenth = -1i64;
        for event in handle.events().iter() {
            match event {
                ScanEvent::Progress { percent, findings } => {
                    let tenth = (percent * 10.0) as i64;
                    if !args.quiet && tenth != last_tenth {
                        eprint!("\rScanning... {:5.1}% ({} found)", percent, findings);
                        last_tenth = tenth;
                    }
                }
                ScanEvent::Finished { .. } | ScanEvent::Failed(_) => break,
            }
        }
        if !args.quiet {
            eprintln!();
        }
        handle.join()
    })
    .context("scan did not complete")?;

    println!("Found {} results", findings.len());
    println!();
    for finding in &findings {
        print!("{}", format_finding(finding));
    }
    if params.reduced_space && !findings.is_empty() {
        println!("Seeds above are 48-bit placement seeds; the upper 16 bits are not recovered.");
    }

    if let Some(path) = &args.output {
        export_findings_json(&findings, path)
            .with_context(|| format!("cannot write results to {}", path.display()))?;
        info!("results exported to {}", path.display());
    }

    Ok(())
}
