//! L1Rate CLI

mod jsonl;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use l1r_core::Event;
use l1r_rates::{fill_events_parallel, EventSource, RateConfig, RateEngine, RateMenu, RateReport};

use crate::jsonl::JsonlSource;

#[derive(Parser)]
#[command(name = "l1rate")]
#[command(about = "L1Rate - trigger rate histogram production")]
#[command(version)]
struct Cli {
    /// Log verbosity level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: tracing::Level,

    /// Input events, JSON lines (one event per line)
    #[arg(short, long)]
    input: PathBuf,

    /// Output file for the finalized histogram set (pretty JSON). Defaults to stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Hard cap on processed events
    #[arg(long)]
    max_events: Option<u64>,

    /// Instantaneous luminosity in Hz/cm^2
    #[arg(long, default_value_t = 2e34)]
    inst_lumi: f64,

    /// Minimum-bias cross section in cm^2
    #[arg(long, default_value_t = 6.92e-26)]
    mb_xsec: f64,

    /// Threads (1 = sequential streaming; more buffers the run and
    /// fills partitions in parallel, 0 = all cores)
    #[arg(long, default_value = "1")]
    threads: usize,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_subscriber::fmt().with_max_level(cli.log_level).with_target(false).init();

    let config = RateConfig {
        inst_lumi: cli.inst_lumi,
        mb_xsec: cli.mb_xsec,
        max_events: cli.max_events,
    };

    tracing::info!(path = %cli.input.display(), threads = cli.threads, "starting rate run");
    let report = if cli.threads == 1 {
        run_sequential(&cli.input, config)?
    } else {
        run_parallel(&cli.input, config, cli.threads)?
    };

    tracing::info!(
        events = report.processed_events,
        norm = report.normalization,
        rates = report.rates.len(),
        distributions = report.distributions.len(),
        "rate run complete"
    );

    let json = serde_json::to_string_pretty(&report)?;
    match &cli.output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("writing report to {}", path.display()))?;
            tracing::info!(path = %path.display(), "report written");
        }
        None => println!("{json}"),
    }

    Ok(())
}

fn run_sequential(input: &PathBuf, config: RateConfig) -> Result<RateReport> {
    let mut source = JsonlSource::open(input)
        .with_context(|| format!("opening event file {}", input.display()))?;
    let mut engine = RateEngine::run3(config)?;
    engine.run(&mut source)?;
    Ok(engine.finalize()?)
}

fn run_parallel(input: &PathBuf, config: RateConfig, threads: usize) -> Result<RateReport> {
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .context("initializing thread pool")?;

    let mut source = JsonlSource::open(input)
        .with_context(|| format!("opening event file {}", input.display()))?;
    let mut events: Vec<Event> = Vec::new();
    while let Some(ev) = source.next_event()? {
        events.push(ev);
    }
    tracing::info!(events = events.len(), "buffered event file");

    let engine = fill_events_parallel(&RateMenu::run3(), &config, &events)?;
    Ok(engine.finalize()?)
}
