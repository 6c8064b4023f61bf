use crate::config::Experiment;
use crate::domain::{Balance, TrialStatistics};
use crate::harness::{run_stats, ProgressReporter};
use crate::infrastructure::log_messages::application as messages;
use crate::report::{render_json, render_preamble, render_text, ReportFormat, ScenarioReport};
use crate::scenario::Scenario;
use crate::{Error, Result};
use std::io::Write;
use std::process::ExitCode;
use tracing::{error, info, instrument};

/// Statistics gathered for one scenario
#[derive(Debug, Clone)]
pub struct ScenarioOutcome {
    pub scenario: Scenario,
    pub statistics: TrialStatistics,
}

/// Line printed when the locked scenario produced a negative balance
pub const LOCKED_FAILURE_LINE: &str = "ERROR: locked version broke invariant";

/// Outcome of a completed run as seen by the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunStatus {
    Passed,
    LockedInvariantBroken,
}

impl RunStatus {
    pub fn exit_code(self) -> ExitCode {
        match self {
            Self::Passed => ExitCode::SUCCESS,
            Self::LockedInvariantBroken => ExitCode::FAILURE,
        }
    }
}

/// Map the result of [`Application::run`] onto a [`RunStatus`]
///
/// A broken locked invariant prints [`LOCKED_FAILURE_LINE`]: after the text
/// report on `out`, or on `err` for JSON so that `out` stays one document.
/// Any other error is returned unchanged.
pub fn conclude<O, E>(
    result: Result<Vec<ScenarioOutcome>>,
    format: ReportFormat,
    out: &mut O,
    err: &mut E,
) -> Result<RunStatus>
where
    O: Write,
    E: Write,
{
    match result {
        Ok(_) => Ok(RunStatus::Passed),
        Err(Error::LockedInvariantBroken { .. }) => {
            match format {
                ReportFormat::Text => writeln!(out, "{LOCKED_FAILURE_LINE}")?,
                ReportFormat::Json => writeln!(err, "{LOCKED_FAILURE_LINE}")?,
            }
            Ok(RunStatus::LockedInvariantBroken)
        }
        Err(e) => Err(e),
    }
}

/// Runs every selected scenario and writes the reports
pub struct Application {
    experiment: Experiment,
}

impl Application {
    pub fn new(experiment: Experiment) -> Self {
        Self { experiment }
    }

    /// Run the selected scenarios in order, naive before locked
    ///
    /// Returns [`Error::LockedInvariantBroken`] after all reports are written
    /// if the locked scenario ever produced a negative balance.
    #[instrument(skip_all, fields(mode = ?self.experiment.mode))]
    pub fn run<W, P>(&self, out: &mut W, progress: &mut P) -> Result<Vec<ScenarioOutcome>>
    where
        W: Write,
        P: ProgressReporter + ?Sized,
    {
        let experiment = &self.experiment;
        self.run_with(out, progress, |scenario| {
            scenario.run_trial(&experiment.parameters, &experiment.workload)
        })
    }

    fn run_with<W, P, T>(
        &self,
        out: &mut W,
        progress: &mut P,
        trial: T,
    ) -> Result<Vec<ScenarioOutcome>>
    where
        W: Write,
        P: ProgressReporter + ?Sized,
        T: Fn(Scenario) -> Balance,
    {
        let experiment = &self.experiment;
        let text = experiment.report.format == ReportFormat::Text;
        info!("{}", messages::STARTING);

        if text {
            writeln!(
                out,
                "{}",
                render_preamble(
                    &experiment.parameters,
                    &experiment.workload,
                    experiment.trials,
                    &experiment.report.currency,
                )
            )?;
        }

        let mut outcomes = Vec::new();
        let mut reports = Vec::new();
        for scenario in experiment.mode.scenarios() {
            let statistics = self.run_scenario(*scenario, out, progress, &trial)?;
            if text {
                writeln!(out, "{}", render_text(&statistics, &experiment.report))?;
            } else {
                reports.push(ScenarioReport::from_statistics(
                    scenario.label(),
                    &statistics,
                    &experiment.report,
                ));
            }
            outcomes.push(ScenarioOutcome {
                scenario: *scenario,
                statistics,
            });
        }

        if !text {
            writeln!(out, "{}", render_json(&reports)?)?;
        }

        self.self_check(&outcomes)?;
        if text && experiment.mode.scenarios().contains(&Scenario::Locked) {
            writeln!(out, "OK: locked version never broke invariant.")?;
        }
        Ok(outcomes)
    }

    fn run_scenario<W, P, T>(
        &self,
        scenario: Scenario,
        out: &mut W,
        progress: &mut P,
        trial: &T,
    ) -> Result<TrialStatistics>
    where
        W: Write,
        P: ProgressReporter + ?Sized,
        T: Fn(Scenario) -> Balance,
    {
        let experiment = &self.experiment;
        if experiment.report.format == ReportFormat::Text {
            writeln!(out, "{}", scenario.header())?;
            out.flush()?;
        }

        info!(scenario = scenario.label(), "{}", messages::SCENARIO_STARTED);
        let statistics = run_stats(
            || trial(scenario),
            experiment.trials,
            scenario.label(),
            progress,
        );
        info!(
            scenario = scenario.label(),
            violations = statistics.violations(),
            "{}",
            messages::SCENARIO_FINISHED
        );
        Ok(statistics)
    }

    /// A violation is data for the naive scenario and a fault for the locked one
    fn self_check(&self, outcomes: &[ScenarioOutcome]) -> Result<()> {
        for outcome in outcomes {
            if !outcome.scenario.must_preserve_invariant() {
                continue;
            }
            let stats = &outcome.statistics;
            if !stats.is_clean() {
                error!(
                    scenario = outcome.scenario.label(),
                    violations = stats.violations(),
                    trials = stats.trials(),
                    "{}",
                    messages::SELF_CHECK_FAILED
                );
                return Err(Error::LockedInvariantBroken {
                    violations: stats.violations(),
                    trials: stats.trials(),
                });
            }
            info!("{}", messages::SELF_CHECK_PASSED);
        }
        Ok(())
    }
}
