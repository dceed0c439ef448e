// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — ringing-sweep Runner
// (C) 1998-2026 Miroslav Sotek. All rights reserved.
// License: GNU AGPL v3 | Commercial licensing available
// ─────────────────────────────────────────────────────────────────────
#![deny(unsafe_code)]
//! Thin I/O shell around `resonance-sweep`: loads a JSON configuration,
//! runs one experiment and writes its reports.

pub mod args;
pub mod output;

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use resonance_sweep::{DiscardSink, Experiment, ExperimentOutcome};
use resonance_types::SweepConfig;

pub use args::Args;

/// Read and validate a configuration file; `None` gives the defaults.
pub fn load_config(path: Option<&Path>) -> Result<SweepConfig> {
    let config = match path {
        Some(p) => {
            let raw = fs::read_to_string(p)
                .with_context(|| format!("reading config {}", p.display()))?;
            SweepConfig::from_json(&raw).with_context(|| format!("parsing config {}", p.display()))?
        }
        None => {
            log::info!("no config given, using defaults");
            SweepConfig::default()
        }
    };
    config.validate().context("invalid sweep configuration")?;
    Ok(config)
}

/// Run the experiment described by `args` and write every artifact.
pub fn run(args: &Args) -> Result<ExperimentOutcome> {
    let config = load_config(args.config.as_deref())?;
    let options = args.options();
    let experiment = Experiment::new(config, options).context("preparing experiment")?;
    let outcome = experiment.run(&DiscardSink).context("running sweep")?;
    output::write_all(&args.out, &outcome, options.max_cells)?;
    log::info!(
        "{} of {} cells ringing, claim rejected: {}",
        outcome.report.summary.true_cells,
        outcome.report.summary.total_cells,
        outcome.report.rejected
    );
    Ok(outcome)
}
