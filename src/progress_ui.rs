//! Progress UI (spinner) for a download run.

use std::time::Duration;

use http_get::download::{DownloadReport, LengthCheck, ProgressReporter, ProgressUpdate};
use indicatif::{HumanBytes, HumanDuration, ProgressBar, ProgressStyle};

/// Spinner on stderr that renders progress updates, followed by a summary line.
pub(crate) struct SpinnerReporter {
    spinner: ProgressBar,
}

impl SpinnerReporter {
    pub(crate) fn new(url: &str) -> Self {
        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Connecting to {url}..."));
        spinner.enable_steady_tick(Duration::from_millis(100));
        Self { spinner }
    }

    /// Clears the spinner without a summary, e.g. after a failed download.
    pub(crate) fn abandon(&self) {
        self.spinner.finish_and_clear();
    }
}

impl ProgressReporter for SpinnerReporter {
    fn report(&mut self, update: &ProgressUpdate) {
        self.spinner.set_message(progress_message(update));
    }

    fn finish(&mut self, report: &DownloadReport) {
        self.spinner.finish_and_clear();
        eprintln!("{}", summary_message(report));
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn progress_message(update: &ProgressUpdate) -> String {
    let mut message = format!(
        "{} received, {}/s, {} elapsed",
        HumanBytes(update.bytes_received),
        HumanBytes(update.speed_bytes_per_sec as u64),
        HumanDuration(update.elapsed)
    );
    if let Some(percent) = update.percent_complete {
        message.push_str(&format!(", {percent:.1}%"));
    }
    if let Some(eta) = update.eta {
        message.push_str(&format!(", {} left", HumanDuration(eta)));
    }
    message
}

fn summary_message(report: &DownloadReport) -> String {
    let verdict = match report.length_check() {
        LengthCheck::Matched => "Length verified.".to_string(),
        LengthCheck::Mismatch { expected, actual } => format!(
            "Length mismatch: expected {}, got {}.",
            HumanBytes(expected),
            HumanBytes(actual)
        ),
        LengthCheck::Unknown => "Length not announced by server.".to_string(),
    };
    format!(
        "Downloaded {} in {}. {verdict}",
        HumanBytes(report.bytes_received),
        HumanDuration(report.elapsed)
    )
}
