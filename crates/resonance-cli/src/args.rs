// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — ringing-sweep Command Line
// ─────────────────────────────────────────────────────────────────────

use std::path::PathBuf;

use clap::Parser;

use resonance_sweep::{ExecutionMode, ExperimentOptions, RunMode};

/// Run the oscillator-network ringing sweep and evaluate its null checks.
#[derive(Parser, Debug, Clone)]
#[command(name = "ringing-sweep", version, about, long_about = None)]
pub struct Args {
    /// JSON sweep configuration; missing fields take their defaults
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Output directory (created if missing)
    #[arg(short, long, default_value = "outputs")]
    pub out: PathBuf,

    /// 3x3 grid, 1000 steps, one replicate, no negative control
    #[arg(long)]
    pub quick: bool,

    /// Skip the plasticity-off rerun
    #[arg(long)]
    pub no_negative_control: bool,

    /// Simulate at most N grid cells (row-major); development aid
    #[arg(long, value_name = "N")]
    pub max_points: Option<usize>,

    /// Spread grid cells over all cores
    #[arg(long)]
    pub parallel: bool,
}

impl Args {
    pub fn options(&self) -> ExperimentOptions {
        ExperimentOptions {
            run_mode: if self.quick {
                RunMode::Quick
            } else {
                RunMode::Full
            },
            execution: if self.parallel {
                ExecutionMode::Parallel
            } else {
                ExecutionMode::Sequential
            },
            negative_control: !self.no_negative_control,
            max_cells: self.max_points,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["ringing-sweep"]);
        assert!(args.config.is_none());
        assert_eq!(args.out, PathBuf::from("outputs"));
        assert_eq!(args.options(), ExperimentOptions::default());
    }

    #[test]
    fn test_all_flags() {
        let args = Args::parse_from([
            "ringing-sweep",
            "--config",
            "prereg.json",
            "--out",
            "/tmp/x",
            "--quick",
            "--no-negative-control",
            "--max-points",
            "12",
            "--parallel",
        ]);
        let opts = args.options();
        assert_eq!(opts.run_mode, RunMode::Quick);
        assert_eq!(opts.execution, ExecutionMode::Parallel);
        assert!(!opts.negative_control);
        assert_eq!(opts.max_cells, Some(12));
        assert_eq!(args.config, Some(PathBuf::from("prereg.json")));
    }
}
