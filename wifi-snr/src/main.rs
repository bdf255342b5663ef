use clap::Parser;
use log::LevelFilter;
use std::time::Duration;

use wifi_signal::{CommandSource, NativeSource, SignalSource, SourceKind, SystemClock};

mod config;
mod controller;
mod mode;

use controller::{OutputOptions, RunController};
use mode::RunRequest;

#[derive(Parser, Debug)]
#[command(name = "wifi-snr")]
#[command(about = "Sample the signal of the associated WiFi network and estimate its SNR")]
struct Args {
    /// Path to wifi-snr.toml
    #[arg(long, short = 'c')]
    config: Option<String>,

    /// Signal source, native or command (overrides config file)
    #[arg(long)]
    source: Option<SourceKind>,

    /// Delay between polls in milliseconds (overrides config file)
    #[arg(long)]
    interval_ms: Option<u64>,

    /// Increase log verbosity
    #[arg(long, short = 'v', action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only log warnings and errors
    #[arg(long, short = 'q', conflicts_with = "verbose")]
    quiet: bool,

    /// `base [duration]` or `monitor [duration]`, duration in seconds (1-60)
    #[arg(value_name = "MODE")]
    mode: Vec<String>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let level = match (args.quiet, args.verbose) {
        (true, _) => LevelFilter::Warn,
        (false, 0) => LevelFilter::Info,
        (false, 1) => LevelFilter::Debug,
        (false, _) => LevelFilter::Trace,
    };

    simple_logger::SimpleLogger::new()
        .with_level(level)
        .env()
        .init()?;

    let mut cfg = match config::load_config(args.config.as_deref()) {
        Ok(c) => c,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    if let Some(interval_ms) = args.interval_ms {
        if interval_ms == 0 {
            log::error!("--interval-ms must be at least 1");
            std::process::exit(1);
        }
        cfg.sampling.interval_ms = interval_ms;
    }

    let kind = match args.source {
        Some(kind) => kind,
        None => cfg.source.kind()?,
    };

    let source: Box<dyn SignalSource> = match kind {
        SourceKind::Native => Box::new(NativeSource::new()),
        SourceKind::Command => Box::new(CommandSource::new(
            cfg.source.program.clone(),
            cfg.source.args.clone(),
            cfg.source.probe_args.clone(),
        )),
    };

    let request = RunRequest::parse(&args.mode.join(" "));

    let mut controller = RunController::new(source, SystemClock::new())
        .with_plan(
            Duration::from_millis(cfg.sampling.interval_ms),
            cfg.sampling.max_samples,
        )
        .with_output(OutputOptions {
            table: cfg.output.table,
            document: cfg.output.document,
        });

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if let Err(err) = controller.run(&request, &mut out) {
        log::error!("failed to capture WiFi signal data: {}", err);
        if let wifi_signal::SignalError::EmptyResult { .. } = err {
            log::info!("the WiFi adapter may not be available or not connected");
        }
        std::process::exit(1);
    }

    Ok(())
}
