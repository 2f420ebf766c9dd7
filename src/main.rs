use std::fs::{self, OpenOptions};
use std::io::{self, IsTerminal, Write};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use scriptlog::cli::Cli;
use scriptlog::{Config, Converter, Inputs};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.log_level());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

/// Log to stderr; `RUST_LOG` takes precedence over `-v`.
fn init_logging(default_level: &str) {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)))
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(io::stderr)
                .with_ansi(io::stderr().is_terminal()),
        )
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::load()?,
    };
    cli.apply(&mut config);

    let converter = Converter::new(config.transcript(cli.start.as_deref())?)?;

    // Open inputs before the output so a bad path never truncates it
    let timing_path = cli.timing_path();
    let inputs = Inputs::open(&cli.capture, &timing_path)?;

    let sink = open_sink(cli)?;
    let stats = converter.convert(inputs.timing, inputs.capture, sink)?;

    if stats.capture_ended_early {
        warn!(
            capture = %cli.capture.display(),
            "capture ended before the timing file; the transcript may be incomplete"
        );
    }
    info!(
        records = stats.records,
        lines = stats.lines,
        entries = stats.entries,
        skipped_timing_lines = stats.skipped_timing_lines,
        unit = %stats.unit,
        size = %humansize::format_size(stats.bytes, humansize::BINARY),
        "converted {}",
        cli.capture.display()
    );

    Ok(())
}

/// Output file (parents created, truncated unless appending) or stdout.
fn open_sink(cli: &Cli) -> Result<Box<dyn Write>> {
    let Some(path) = &cli.output else {
        return Ok(Box::new(io::stdout().lock()));
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create output directory: {}", parent.display()))?;
    }

    let file = OpenOptions::new()
        .create(true)
        .write(true)
        .append(cli.append)
        .truncate(!cli.append)
        .open(path)
        .with_context(|| format!("Failed to open output file: {}", path.display()))?;

    Ok(Box::new(file))
}
