//! CLI argument definitions using clap derive macros.

use std::path::PathBuf;

use clap::Parser;

use http_get::download::{DEFAULT_DEADLINE_SECS, DEFAULT_MAX_REDIRECTS};

/// Download a single URL over plain HTTP/1.0.
///
/// The body goes to stdout unless an output file is given. Redirects are
/// followed; progress is shown on stderr.
#[derive(Parser, Debug)]
#[command(name = "http-get")]
#[command(author, version, about)]
pub struct Args {
    /// URL to download (http only; scheme and port are optional)
    pub url: String,

    /// Write the body to this file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Suppress non-error output, including progress
    #[arg(short, long)]
    pub quiet: bool,

    /// Seconds without progress before a connection is abandoned (1-3600)
    #[arg(short = 't', long, value_name = "SECS", default_value_t = DEFAULT_DEADLINE_SECS, value_parser = clap::value_parser!(u64).range(1..=3600))]
    pub timeout: u64,

    /// Maximum chained redirects to follow (0-50)
    #[arg(long, value_name = "N", default_value_t = DEFAULT_MAX_REDIRECTS, value_parser = clap::value_parser!(u32).range(0..=50))]
    pub max_redirects: u32,

    /// Do not show the progress spinner
    #[arg(long)]
    pub no_progress: bool,
}
