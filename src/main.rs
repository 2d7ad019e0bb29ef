//! alice-motif - find recurring joint motions in motion-capture recordings
//!
//! Reads one or more recordings, reduces every bone to its distance from the
//! root, and prints every window that recurs under the given tolerances.
//!
//! Author: Moroya Sakamoto

use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::thread;
use std::time::Duration;

use alice_motif::settings::MotifSettings;
use alice_motif::{
    bone_name, load_recordings, CancelToken, JsonLinesReport, MatchSink, PatternFinder,
    SignalStore, SweepSummary, TextReport,
};
use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, ValueEnum};
use tracing::{info, warn, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "alice-motif")]
#[command(about = "Find recurring motion patterns in motion-capture recordings", long_about = None)]
struct Cli {
    /// Recording files, concatenated in the given order
    files: Vec<PathBuf>,

    /// TOML settings file (flags override its values)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Window length, or first length of a sweep
    #[arg(short, long, allow_negative_numbers = true)]
    window: Option<i64>,

    /// Last window length of a sweep (inclusive)
    #[arg(long, allow_negative_numbers = true)]
    window_max: Option<i64>,

    /// Mismatched samples tolerated per comparison
    #[arg(short, long, allow_negative_numbers = true)]
    frame_tolerance: Option<i64>,

    /// Largest per-sample difference still counted as equal
    #[arg(short, long, allow_negative_numbers = true)]
    distance_tolerance: Option<f32>,

    /// Report format
    #[arg(long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Spread the sweep over all cores (needs the `parallel` feature)
    #[arg(long)]
    parallel: bool,

    /// Stop the sweep after this many seconds, keeping matches found so far
    #[arg(long)]
    time_limit: Option<f64>,

    /// Print per-bone mean and standard deviation before searching
    #[arg(long)]
    stats: bool,

    /// Log level (trace, debug, info, warn, error), overrides RUST_LOG
    #[arg(short, long)]
    log_level: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn parse_level(s: &str) -> Result<Level> {
    match s.parse::<Level>() {
        Ok(level) => Ok(level),
        Err(_) => bail!("unknown log level `{s}` (expected trace, debug, info, warn or error)"),
    }
}

/// `--log-level` wins, then `RUST_LOG`, then the settings file
fn log_filter(flag: Option<&str>, configured: &str) -> Result<EnvFilter> {
    if let Some(level) = flag {
        return Ok(EnvFilter::default().add_directive(LevelFilter::from_level(parse_level(level)?).into()));
    }
    let fallback = parse_level(configured)?;
    Ok(EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::default().add_directive(LevelFilter::from_level(fallback).into())))
}

#[cfg(feature = "parallel")]
fn run_search<S: MatchSink>(
    finder: &PatternFinder,
    store: &SignalStore,
    sink: &mut S,
    parallel: bool,
) -> SweepSummary {
    if parallel {
        finder.run_parallel(store, sink)
    } else {
        finder.run(store, sink)
    }
}

#[cfg(not(feature = "parallel"))]
fn run_search<S: MatchSink>(
    finder: &PatternFinder,
    store: &SignalStore,
    sink: &mut S,
    parallel: bool,
) -> SweepSummary {
    if parallel {
        warn!("built without the `parallel` feature, running sequentially");
    }
    finder.run(store, sink)
}

fn write_stats<W: Write>(out: &mut W, store: &SignalStore) -> io::Result<()> {
    writeln!(out, "{:>4}  {:<16} {:>10} {:>10}", "Bone", "Name", "Mean", "Std Dev")?;
    for channel in 0..store.channel_count() {
        let s = store.stats(channel);
        writeln!(out, "{:>4}  {:<16} {:>10.4} {:>10.4}",
            channel, bone_name(channel), s.mean, s.std_dev)?;
    }
    writeln!(out, "Maximum distance from root: {:.4}", store.max_value())?;
    writeln!(out)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut settings = match &cli.config {
        Some(path) => MotifSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => MotifSettings::default(),
    };
    if let Some(window) = cli.window {
        settings.search.window_length = window;
    }
    if cli.window_max.is_some() {
        settings.search.window_length_max = cli.window_max;
    }
    if let Some(frames) = cli.frame_tolerance {
        settings.search.frame_tolerance = frames;
    }
    if let Some(distance) = cli.distance_tolerance {
        settings.search.distance_tolerance = distance;
    }
    if !cli.files.is_empty() {
        settings.input.files = cli.files.clone();
    }
    settings.input.parallel |= cli.parallel;

    // Logs go to stderr so reports on stdout stay machine-readable
    fmt()
        .with_env_filter(log_filter(cli.log_level.as_deref(), &settings.logging.level)?)
        .with_target(true)
        .with_writer(io::stderr)
        .try_init()
        .map_err(|err| anyhow!("installing log subscriber: {err}"))?;

    let config = settings.search_config()?;
    if settings.input.files.is_empty() {
        bail!("no recording files given");
    }

    let set = load_recordings(&settings.input.files, &settings.input.layout())?;
    info!(
        recordings = set.recordings.len(),
        frames = set.store.frame_count(),
        "recordings loaded"
    );

    let mut finder = PatternFinder::new(config);
    if let Some(secs) = cli.time_limit {
        if !(secs > 0.0 && secs.is_finite()) {
            bail!("time limit must be a positive number of seconds, got {secs}");
        }
        let token = CancelToken::new();
        finder = finder.with_cancel(token.clone());
        thread::spawn(move || {
            thread::sleep(Duration::from_secs_f64(secs));
            token.cancel();
        });
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    if cli.stats {
        write_stats(&mut out, &set.store)?;
    }

    let summary = match cli.format {
        OutputFormat::Text => {
            let mut report = TextReport::new(&mut out);
            let summary = run_search(&finder, &set.store, &mut report, settings.input.parallel);
            report.finish()?;
            summary
        }
        OutputFormat::Json => {
            let mut report = JsonLinesReport::new(&mut out);
            let summary = run_search(&finder, &set.store, &mut report, settings.input.parallel);
            report.finish()?;
            summary
        }
    };
    out.flush()?;

    if !summary.completed {
        warn!(total_matches = summary.total_matches, "time limit reached, results are partial");
    }
    Ok(())
}
