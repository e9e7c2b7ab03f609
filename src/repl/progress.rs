use std::time::{Duration, Instant};

use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use crate::utils::formatting::format_duration;

/// Spinner shown while a generation request is in flight.
pub struct GenerationSpinner {
    bar: ProgressBar,
    started: Instant,
}

impl GenerationSpinner {
    pub fn start(message: impl Into<String>) -> Self {
        let bar = ProgressBar::new_spinner();
        let spinner_style = ProgressStyle::default_spinner()
            .template("  {spinner:.cyan} {msg} {elapsed:.dim}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        bar.set_style(spinner_style);
        bar.set_message(message.into());
        bar.enable_steady_tick(Duration::from_millis(120));
        Self {
            bar,
            started: Instant::now(),
        }
    }

    /// Hidden spinner for non-interactive output (`--quiet`, piped stdout).
    pub fn hidden() -> Self {
        Self {
            bar: ProgressBar::hidden(),
            started: Instant::now(),
        }
    }

    pub fn elapsed_ms(&self) -> u64 {
        self.started.elapsed().as_millis() as u64
    }

    pub fn finish_ok(self, message: &str) {
        let elapsed = format_duration(self.elapsed_ms());
        self.bar.finish_and_clear();
        if !self.bar.is_hidden() {
            println!("{} {} {}", style("✓").green(), message, style(format!("({})", elapsed)).dim());
        }
    }

    pub fn finish_err(self) {
        self.bar.finish_and_clear();
    }
}
