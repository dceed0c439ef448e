// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — Sweep Report Writers
// ─────────────────────────────────────────────────────────────────────
//! Writes the five artifacts of one experiment into an output directory:
//!
//! - `grid.csv`: one row per simulated cell
//! - `null_evaluation.json`: check results, rejection flag, grid summary
//! - `parameters_used.json`: effective parameters and recorded deviations
//! - `seed_manifest.json`: (K, γ, rep, seed) of every replicate
//! - `wedge_report.md`: human-readable summary

use std::fmt::Write as _;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use resonance_sweep::ExperimentOutcome;
use resonance_types::{
    CheckStatus, ConfigDeviation, GridCell, GridSummary, NullCheck, NullDetails, SweepConfig,
};

pub const GRID_CSV: &str = "grid.csv";
pub const NULL_EVALUATION_JSON: &str = "null_evaluation.json";
pub const PARAMETERS_USED_JSON: &str = "parameters_used.json";
pub const SEED_MANIFEST_JSON: &str = "seed_manifest.json";
pub const WEDGE_REPORT_MD: &str = "wedge_report.md";

const GRID_HEADER: &str =
    "K,gamma,ring_label,r_mean,Delta_PSD_dB,N_over,replicates,valid_replicates,invalid_rate,excluded";

#[derive(Debug, Serialize)]
struct GridShape {
    gamma: usize,
    #[serde(rename = "K")]
    k: usize,
}

#[derive(Debug, Serialize)]
struct NullEvaluationDocument<'a> {
    mode: &'a str,
    rejected: bool,
    nulls: [&'a NullCheck; 4],
    grid_shape: GridShape,
    summary: &'a GridSummary,
}

#[derive(Debug, Serialize)]
struct EffectiveParams {
    dt: f64,
    steps_total: usize,
    steps_burnin: usize,
    steps_measure: usize,
    n: usize,
    k_num: usize,
    gamma_num: usize,
    replicates: usize,
    base_seed: u64,
    max_cells: Option<usize>,
    negative_control: bool,
}

#[derive(Debug, Serialize)]
struct ParametersUsed<'a> {
    mode: &'a str,
    effective: EffectiveParams,
    deviations: &'a [ConfigDeviation],
    config: &'a SweepConfig,
    notes: &'a str,
}

/// One header line plus one row per cell, in grid order.
pub fn grid_csv(cells: &[GridCell]) -> String {
    let mut csv = String::from(GRID_HEADER);
    csv.push('\n');
    for c in cells {
        let _ = writeln!(
            csv,
            "{},{},{},{},{},{},{},{},{},{}",
            c.k,
            c.gamma,
            u8::from(c.ring_label),
            c.r_mean,
            c.delta_psd_db,
            c.n_over,
            c.replicates,
            c.valid_replicates,
            c.invalid_fraction,
            u8::from(c.excluded)
        );
    }
    csv
}

pub fn null_evaluation_json(outcome: &ExperimentOutcome) -> Result<String> {
    let report = &outcome.report;
    let doc = NullEvaluationDocument {
        mode: outcome.run_mode.as_str(),
        rejected: report.rejected,
        nulls: report.checks(),
        grid_shape: GridShape {
            gamma: report.summary.rows,
            k: report.summary.cols,
        },
        summary: &report.summary,
    };
    serde_json::to_string_pretty(&doc).context("serialising null evaluation")
}

pub fn parameters_used_json(outcome: &ExperimentOutcome, max_cells: Option<usize>) -> Result<String> {
    let cfg = &outcome.config;
    let doc = ParametersUsed {
        mode: outcome.run_mode.as_str(),
        effective: EffectiveParams {
            dt: cfg.dynamics.dt,
            steps_total: cfg.dynamics.steps_total,
            steps_burnin: cfg.dynamics.steps_burnin,
            steps_measure: cfg.dynamics.steps_measure,
            n: cfg.network.n,
            k_num: outcome.sweep.k_values.len(),
            gamma_num: outcome.sweep.gamma_values.len(),
            replicates: cfg.replicates,
            base_seed: cfg.base_seed,
            max_cells,
            negative_control: outcome.negative_control.is_some(),
        },
        deviations: &outcome.deviations,
        config: cfg,
        notes: "Seeds derive from SHA-256 of \"K,gamma,rep\" at 6 decimals, added to base_seed mod 1e9.",
    };
    serde_json::to_string_pretty(&doc).context("serialising parameters")
}

pub fn seed_manifest_json(outcome: &ExperimentOutcome) -> Result<String> {
    serde_json::to_string_pretty(&outcome.seed_manifest()).context("serialising seed manifest")
}

/// Markdown summary of the run.
pub fn wedge_report(outcome: &ExperimentOutcome) -> String {
    let cfg = &outcome.config;
    let report = &outcome.report;
    let s = &report.summary;
    let mut md = String::new();

    let _ = writeln!(md, "# Ringing Wedge Report\n");
    let _ = writeln!(md, "- Mode: {}", outcome.run_mode.as_str());
    let _ = writeln!(md, "- Grid: gamma={}, K={}", s.rows, s.cols);
    let _ = writeln!(md, "- Replicates per point: {}", cfg.replicates);
    let _ = writeln!(
        md,
        "- Invalid replicates: {} / {}\n",
        outcome.sweep.invalid_replicates(),
        outcome.sweep.points.len()
    );

    let _ = writeln!(md, "## Ringing thresholds (point-level)\n");
    let _ = writeln!(md, "- Δ_PSD_dB ≥ {}", cfg.thresholds.psd_db);
    let _ = writeln!(md, "- N_over ≥ {}", cfg.thresholds.n_over);
    let _ = writeln!(md, "- r_mean ≥ {}\n", cfg.thresholds.r_mean);

    let _ = writeln!(md, "## Sweep summary\n");
    let _ = writeln!(
        md,
        "- Ringing points |S|: {} / {} ({:.4})",
        s.true_cells, s.total_cells, s.area_fraction
    );
    let _ = writeln!(
        md,
        "- Largest connected component size (4-neighbor): {}\n",
        s.largest_component
    );

    let _ = writeln!(md, "## Null evaluation\n");
    let _ = writeln!(md, "- Rejected: **{}**\n", report.rejected);
    for check in report.checks() {
        match check.status {
            CheckStatus::Skip => {
                let reason = match &check.details {
                    NullDetails::Skipped { reason } => reason.as_str(),
                    _ => "",
                };
                let _ = writeln!(md, "- {}: SKIP ({reason})", check.name);
            }
            status => {
                let _ = writeln!(md, "- {}: {status}", check.name);
                if let Ok(details) = serde_json::to_string(&check.details) {
                    let _ = writeln!(md, "  - details: `{details}`");
                }
            }
        }
    }

    let _ = writeln!(md, "\n## Files written\n");
    for name in [
        GRID_CSV,
        NULL_EVALUATION_JSON,
        PARAMETERS_USED_JSON,
        SEED_MANIFEST_JSON,
        WEDGE_REPORT_MD,
    ] {
        let _ = writeln!(md, "- {name}");
    }

    if !outcome.deviations.is_empty() {
        let _ = writeln!(md, "\n## Deviations (recorded)\n");
        for d in &outcome.deviations {
            let _ = writeln!(md, "- {}: {} -> {}", d.field, d.from, d.to);
        }
    }
    md
}

/// Write all five artifacts into `out_dir`, creating it if needed.
pub fn write_all(out_dir: &Path, outcome: &ExperimentOutcome, max_cells: Option<usize>) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(out_dir)
        .with_context(|| format!("creating output directory {}", out_dir.display()))?;

    let artifacts = [
        (GRID_CSV, grid_csv(&outcome.sweep.cells)),
        (NULL_EVALUATION_JSON, null_evaluation_json(outcome)?),
        (PARAMETERS_USED_JSON, parameters_used_json(outcome, max_cells)?),
        (SEED_MANIFEST_JSON, seed_manifest_json(outcome)?),
        (WEDGE_REPORT_MD, wedge_report(outcome)),
    ];

    let mut written = Vec::with_capacity(artifacts.len());
    for (name, body) in artifacts {
        let path = out_dir.join(name);
        fs::write(&path, body).with_context(|| format!("writing {}", path.display()))?;
        log::info!("wrote {}", path.display());
        written.push(path);
    }
    Ok(written)
}
