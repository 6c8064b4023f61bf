//! Repeated-trial harness
//!
//! Runs one scenario many times in sequence and folds every final balance
//! into [`TrialStatistics`]. Concurrency lives only inside a single trial;
//! trials never overlap.

use crate::domain::{Balance, TrialCount, TrialStatistics};
use crate::infrastructure::log_messages::harness as messages;
use std::time::Instant;
use tracing::{debug, info, instrument};

/// Capability the harness uses to publish progress
///
/// Keeps the harness free of any console dependency. Closures taking the
/// completed fraction implement it directly.
pub trait ProgressReporter {
    fn begin(&mut self, _label: &str, _total: TrialCount) {}

    /// `fraction` is the share of trials completed, in `[0.0, 1.0]`
    fn report_progress(&mut self, fraction: f64);

    fn finish(&mut self) {}
}

impl<F> ProgressReporter for F
where
    F: FnMut(f64),
{
    fn report_progress(&mut self, fraction: f64) {
        self(fraction)
    }
}

/// Reporter that discards progress, for headless runs
#[derive(Debug, Clone, Copy, Default)]
pub struct SilentProgress;

impl ProgressReporter for SilentProgress {
    fn report_progress(&mut self, _fraction: f64) {}
}

/// Run `scenario_fn` exactly `trial_count` times and aggregate the outcomes
///
/// `label` is passed through to the progress reporter and the log span.
#[instrument(skip(scenario_fn, progress))]
pub fn run_stats<F, P>(
    mut scenario_fn: F,
    trial_count: TrialCount,
    label: &str,
    progress: &mut P,
) -> TrialStatistics
where
    F: FnMut() -> Balance,
    P: ProgressReporter + ?Sized,
{
    let total = trial_count.into_inner();
    let mut stats = TrialStatistics::new();

    debug!(label, total, "{}", messages::STARTING);
    progress.begin(label, trial_count);
    let started = Instant::now();

    for completed in 1..=total {
        stats.record(scenario_fn());
        progress.report_progress(completed as f64 / total as f64);
    }

    stats.set_elapsed(started.elapsed());
    progress.finish();

    info!(
        label,
        trials = stats.trials(),
        violations = stats.violations(),
        distinct_outcomes = stats.outcomes().distinct(),
        elapsed_ms = stats.elapsed().as_millis() as u64,
        "{}",
        messages::COMPLETED
    );
    stats
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct RecordingProgress {
        label: Option<String>,
        total: Option<u64>,
        fractions: Vec<f64>,
        finished: bool,
    }

    impl ProgressReporter for RecordingProgress {
        fn begin(&mut self, label: &str, total: TrialCount) {
            self.label = Some(label.to_string());
            self.total = Some(total.into_inner());
        }

        fn report_progress(&mut self, fraction: f64) {
            self.fractions.push(fraction);
        }

        fn finish(&mut self) {
            self.finished = true;
        }
    }

    #[test]
    fn test_runs_exactly_trial_count_times() {
        let mut calls = 0;
        let stats = run_stats(
            || {
                calls += 1;
                Balance::new(30_000)
            },
            TrialCount::new(25),
            "fixed",
            &mut SilentProgress,
        );
        assert_eq!(calls, 25);
        assert_eq!(stats.trials(), 25);
        assert_eq!(stats.outcomes().count(Balance::new(30_000)), 25);
        assert!(stats.is_clean());
    }

    #[test]
    fn test_violations_are_counted_as_data() {
        let mut sequence = [30_000, -40_000, 30_000, -40_000, -40_000].into_iter();
        let stats = run_stats(
            || Balance::new(sequence.next().unwrap_or(0)),
            TrialCount::new(5),
            "scripted",
            &mut SilentProgress,
        );
        assert_eq!(stats.violations(), 3);
        assert_eq!(stats.outcomes().total(), 5);
        assert_eq!(stats.top_outcomes(1), vec![(Balance::new(-40_000), 3)]);
    }

    #[test]
    fn test_progress_is_reported_after_every_trial() {
        let mut progress = RecordingProgress::default();
        run_stats(|| Balance::new(1), TrialCount::new(4), "naive", &mut progress);

        assert_eq!(progress.label.as_deref(), Some("naive"));
        assert_eq!(progress.total, Some(4));
        assert_eq!(progress.fractions, vec![0.25, 0.5, 0.75, 1.0]);
        assert!(progress.finished);
    }

    #[test]
    fn test_closure_progress_reporter() {
        let mut last = 0.0;
        let mut reporter = |fraction: f64| last = fraction;
        run_stats(|| Balance::new(1), TrialCount::new(3), "closure", &mut reporter);
        assert_eq!(last, 1.0);
    }

    #[test]
    fn test_zero_trials_yield_empty_statistics() {
        let mut progress = RecordingProgress::default();
        let stats = run_stats(
            || unreachable!("no trial should run"),
            TrialCount::new(0),
            "empty",
            &mut progress,
        );
        assert_eq!(stats.trials(), 0);
        assert_eq!(stats.violations(), 0);
        assert!(stats.outcomes().is_empty());
        assert_eq!(stats.violation_rate(), 0.0);
        assert!(progress.fractions.is_empty());
    }
}
