//! CLI entry point for the http-get tool.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::process::ExitCode;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;
use clap::error::ErrorKind;
use http_get::{DownloadConfig, DownloadError, Downloader, NoProgress};
use tracing::{debug, error, info};

mod cli;
mod progress_ui;

use cli::Args;
use progress_ui::SpinnerReporter;

/// Exit code for a download that failed outright.
const EXIT_DOWNLOAD_FAILED: u8 = 100;
/// Exit code for command line usage errors.
const EXIT_USAGE: u8 = 101;
/// Exit code for a body whose length differs from `content-length`.
const EXIT_LENGTH_MISMATCH: u8 = 102;

fn main() -> ExitCode {
    // Parse CLI arguments first (before tracing, so --help works without logs)
    let args = match Args::try_parse() {
        Ok(args) => args,
        Err(err) => {
            let _ = err.print();
            return match err.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(EXIT_USAGE),
            };
        }
    };

    // Determine log level based on verbose/quiet flags
    // Priority: RUST_LOG env var > quiet flag > verbose flag > default (info)
    let default_level = if args.quiet {
        "error"
    } else {
        match args.verbose {
            0 => "info",
            1 => "debug",
            _ => "trace",
        }
    };

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level));

    // Logs go to stderr; stdout may carry the body
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    debug!(?args, "CLI arguments parsed");

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{err:#}");
            ExitCode::from(failure_code(&err))
        }
    }
}

/// Maps a failed run to its exit code; a body length mismatch has its own.
fn failure_code(err: &anyhow::Error) -> u8 {
    if err
        .downcast_ref::<DownloadError>()
        .is_some_and(DownloadError::is_length_mismatch)
    {
        EXIT_LENGTH_MISMATCH
    } else {
        EXIT_DOWNLOAD_FAILED
    }
}

fn run(args: &Args) -> Result<()> {
    let config = DownloadConfig::default()
        .with_deadline(Duration::from_secs(args.timeout))
        .with_max_redirects(args.max_redirects);
    let downloader = Downloader::with_config(config);

    let mut sink: Box<dyn Write> = match &args.output {
        Some(path) => {
            let file = File::create(path)
                .with_context(|| format!("cannot create output file {}", path.display()))?;
            Box::new(BufWriter::new(file))
        }
        None => Box::new(io::stdout().lock()),
    };

    info!(url = %args.url, "http-get starting");

    let report = if args.quiet || args.no_progress {
        downloader.download(&args.url, &mut sink, &mut NoProgress)?
    } else {
        let mut reporter = SpinnerReporter::new(&args.url);
        let result = downloader.download(&args.url, &mut sink, &mut reporter);
        if result.is_err() {
            reporter.abandon();
        }
        result?
    };

    sink.flush().context("cannot flush output")?;

    info!(
        url = %report.final_url,
        bytes = report.bytes_received,
        redirects = report.redirects,
        "Download complete"
    );

    report.verify()?;
    Ok(())
}
