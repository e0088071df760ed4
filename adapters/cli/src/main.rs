#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Command-line bench that replays the pitch chirp excitation offline.

mod config;
mod trace;

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use pitch_sysid_core::ModeSelector;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::trace::TracePlan;

/// Drives the pitch chirp generator at a fixed control rate and writes a CSV trace.
#[derive(Debug, Parser)]
#[command(name = "pitch-sysid", author, version, about)]
struct Cli {
    /// Raw system-identification selector (0 = 3-2-1-1, 1 = chirp sweep, 2 = doublet)
    #[arg(long, default_value_t = 1)]
    mode: u16,

    /// Control-loop rate in Hz
    #[arg(long, default_value_t = 50.0)]
    rate: f64,

    /// Simulated duration in seconds
    #[arg(long, default_value_t = 40.0)]
    duration: f64,

    /// Clock value of the first tick in seconds
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    start_time: f64,

    /// TOML file overriding the stock excitation profiles
    #[arg(long, value_name = "PATH")]
    profiles: Option<PathBuf>,

    /// Destination for the CSV trace; stdout when omitted
    #[arg(long, value_name = "PATH")]
    output: Option<PathBuf>,
}

/// Entry point for the pitch system-identification bench.
fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let profiles = config::load_profiles(cli.profiles.as_deref())?;
    let plan = TracePlan::new(cli.start_time, cli.rate, cli.duration)?;
    let selector = ModeSelector::new(cli.mode);
    info!(
        selector = selector.get(),
        ticks = plan.ticks(),
        rate_hz = cli.rate,
        "replaying pitch chirp"
    );

    let rows = trace::run(&plan, selector, profiles);

    match cli.output {
        Some(path) => {
            let file = File::create(&path)
                .with_context(|| format!("failed to create trace file {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            trace::write_csv(&mut writer, &rows)
                .and_then(|()| writer.flush())
                .with_context(|| format!("failed to write trace to {}", path.display()))?;
            info!(path = %path.display(), rows = rows.len(), "trace written");
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            trace::write_csv(&mut writer, &rows).context("failed to write trace to stdout")?;
        }
    }

    Ok(())
}

fn init_tracing() {
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let fmt_layer = fmt::layer().with_target(false).with_writer(io::stderr);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();
}
