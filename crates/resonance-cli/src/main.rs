// ─────────────────────────────────────────────────────────────────────
// Director-Class AI — ringing-sweep
// ─────────────────────────────────────────────────────────────────────

use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use resonance_cli::Args;

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    // `log` records from the library crates are forwarded by the subscriber.
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .init();

    let outcome = resonance_cli::run(&args)?;
    println!(
        "rejected={} ringing={}/{} out={}",
        outcome.report.rejected,
        outcome.report.summary.true_cells,
        outcome.report.summary.total_cells,
        args.out.display()
    );
    Ok(())
}
