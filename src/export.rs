//! Result presentation and JSON export.
//!
//! Findings are written as a pretty-printed JSON array whose objects keep
//! the field names the finder has always used (`house_count`, `is_cluster`,
//! `seed_48bit`, `full_seed`), so older result files load unchanged.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Write};
use std::path::Path;

use thiserror::Error;

use crate::types::Finding;

/// Width of the separator line under each finding.
pub const SEPARATOR_WIDTH: usize = 60;

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
    #[error("invalid findings JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Human-readable block for one finding, ending with a separator line.
pub fn format_finding(finding: &Finding) -> String {
    let mut out = String::new();
    out.push_str(&format!("Seed: {}\n", finding.seed));
    out.push_str(&format!("  Location: ({}, {})\n", finding.x, finding.z));
    out.push_str(&format!("  Houses: {}\n", finding.occupant_count));
    out.push_str(&format!("  Biome: {}\n", finding.biome));
    if finding.is_cluster {
        out.push_str("  [Village Cluster]\n");
    }
    out.push_str(&"-".repeat(SEPARATOR_WIDTH));
    out.push('\n');
    out
}

/// Write `findings` to `path` as a JSON array.
pub fn export_findings_json(findings: &[Finding], path: &Path) -> Result<(), ExportError> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut writer, findings)?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Read findings previously written by [`export_findings_json`].
pub fn load_findings_json(path: &Path) -> Result<Vec<Finding>, ExportError> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
