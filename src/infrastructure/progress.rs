//! Terminal progress bar for trial runs

use crate::domain::TrialCount;
use crate::harness::ProgressReporter;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const TEMPLATE: &str =
    "{prefix:>8} {spinner:.green} [{elapsed_precise}] {bar:45.cyan/blue} {pos}/{len} ETA {eta_precise}";
const TICK_INTERVAL: Duration = Duration::from_millis(120);

/// Progress reporter drawing an indicatif bar on stderr
///
/// Nothing is drawn when stderr is not a terminal.
pub struct ConsoleProgress {
    bar: Option<ProgressBar>,
}

impl ConsoleProgress {
    pub fn new() -> Self {
        Self { bar: None }
    }

    fn style() -> ProgressStyle {
        ProgressStyle::with_template(TEMPLATE).unwrap_or_else(|_| ProgressStyle::default_bar())
    }
}

impl Default for ConsoleProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl ProgressReporter for ConsoleProgress {
    fn begin(&mut self, label: &str, total: TrialCount) {
        let bar = ProgressBar::new(total.into_inner());
        bar.set_style(Self::style());
        bar.enable_steady_tick(TICK_INTERVAL);
        bar.set_prefix(label.to_string());
        self.bar = Some(bar);
    }

    fn report_progress(&mut self, fraction: f64) {
        if let Some(bar) = &self.bar {
            let len = bar.length().unwrap_or(0);
            bar.set_position((fraction.clamp(0.0, 1.0) * len as f64).round() as u64);
        }
    }

    fn finish(&mut self) {
        if let Some(bar) = self.bar.take() {
            bar.finish();
        }
    }
}
