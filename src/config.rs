use crate::domain::{
    CurrencyCode, Parameters, StartBalance, TrialCount, WithdrawAmount, WithdrawalsPerWorker,
    WorkerCount, Workload,
};
use crate::error::{Error, Result};
use crate::infrastructure::log_messages::configuration as messages;
use crate::report::{ReportFormat, ReportOptions};
use crate::scenario::ScenarioMode;
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use std::env;
use std::path::Path;
use tracing::debug;

#[derive(Debug, Deserialize, Clone)]
pub struct Settings {
    pub run: RunSettings,
    pub scenario: ScenarioSettings,
    pub report: ReportSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Deserialize, Clone)]
pub struct RunSettings {
    pub trials: u64,
    pub mode: ScenarioMode,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ScenarioSettings {
    pub start_balance: i64,
    pub withdraw_amount: i64,
    pub workers: usize,
    pub withdrawals_per_worker: usize,
}

#[derive(Debug, Deserialize, Clone)]
pub struct ReportSettings {
    pub currency: String,
    pub top_outcomes: usize,
    pub format: ReportFormat,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    pub level: String,
}

/// Values given on the command line; they win over every other source
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub trials: Option<i64>,
    pub mode: Option<String>,
    pub start_balance: Option<i64>,
    pub withdraw_amount: Option<i64>,
    pub workers: Option<i64>,
    pub withdrawals_per_worker: Option<i64>,
    pub format: Option<String>,
}

impl Overrides {
    /// Configuration keys that this set of overrides replaces
    pub fn applied_keys(&self) -> Vec<&'static str> {
        [
            ("run.trials", self.trials.is_some()),
            ("run.mode", self.mode.is_some()),
            ("scenario.start_balance", self.start_balance.is_some()),
            ("scenario.withdraw_amount", self.withdraw_amount.is_some()),
            ("scenario.workers", self.workers.is_some()),
            (
                "scenario.withdrawals_per_worker",
                self.withdrawals_per_worker.is_some(),
            ),
            ("report.format", self.format.is_some()),
        ]
        .into_iter()
        .filter_map(|(key, set)| set.then_some(key))
        .collect()
    }
}

/// Validated, strongly typed form of [`Settings`]
#[derive(Debug, Clone, PartialEq)]
pub struct Experiment {
    pub trials: TrialCount,
    pub mode: ScenarioMode,
    pub parameters: Parameters,
    pub workload: Workload,
    pub report: ReportOptions,
}

impl Settings {
    /// Defaults, layered config files and `BALANCE_RACE__*` environment variables
    pub fn new() -> std::result::Result<Self, ConfigError> {
        Self::load(None, &Overrides::default())
    }

    /// Like [`Settings::new`], plus an explicit file and command-line overrides
    pub fn load(
        explicit_file: Option<&Path>,
        overrides: &Overrides,
    ) -> std::result::Result<Self, ConfigError> {
        let environment = env::var("ENVIRONMENT").unwrap_or_else(|_| "development".to_string());
        debug!(environment = %environment, "{}", messages::LOADING_CONFIG);

        let mut builder = Config::builder()
            // Start with default values
            .set_default("run.trials", 10_000)?
            .set_default("run.mode", "both")?
            .set_default("scenario.start_balance", 100_000)?
            .set_default("scenario.withdraw_amount", 70_000)?
            .set_default("scenario.workers", 2)?
            .set_default("scenario.withdrawals_per_worker", 1)?
            .set_default("report.currency", "PLN")?
            .set_default("report.top_outcomes", 5)?
            .set_default("report.format", "text")?
            .set_default("logging.level", "warn")?
            // Add configuration files if they exist
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{environment}")).required(false))
            .add_source(File::with_name("config/local").required(false))
            // Add environment variables with prefix
            .add_source(
                Environment::with_prefix("BALANCE_RACE")
                    .separator("__")
                    .try_parsing(true),
            );

        if let Some(path) = explicit_file {
            builder = builder.add_source(File::from(path).required(true));
        }

        for key in overrides.applied_keys() {
            debug!(key, "{}", messages::CONFIG_OVERRIDE);
        }

        let settings: Self = builder
            .set_override_option("run.trials", overrides.trials)?
            .set_override_option("run.mode", overrides.mode.clone())?
            .set_override_option("scenario.start_balance", overrides.start_balance)?
            .set_override_option("scenario.withdraw_amount", overrides.withdraw_amount)?
            .set_override_option("scenario.workers", overrides.workers)?
            .set_override_option(
                "scenario.withdrawals_per_worker",
                overrides.withdrawals_per_worker,
            )?
            .set_override_option("report.format", overrides.format.clone())?
            .build()?
            .try_deserialize()?;

        debug!("{}", messages::CONFIG_LOADED);
        Ok(settings)
    }

    /// Convert raw values into domain types, rejecting anything out of range
    pub fn validate(&self) -> Result<Experiment> {
        if self.run.trials == 0 {
            return Err(Error::invalid_input(
                "run.trials",
                "must be a positive integer",
            ));
        }

        let start_balance = StartBalance::try_new(self.scenario.start_balance)
            .map_err(|e| Error::invalid_input("scenario.start_balance", e))?;
        let withdraw_amount = WithdrawAmount::try_new(self.scenario.withdraw_amount)
            .map_err(|e| Error::invalid_input("scenario.withdraw_amount", e))?;
        let workers = WorkerCount::try_new(self.scenario.workers)
            .map_err(|e| Error::invalid_input("scenario.workers", e))?;
        let withdrawals_per_worker =
            WithdrawalsPerWorker::try_new(self.scenario.withdrawals_per_worker)
                .map_err(|e| Error::invalid_input("scenario.withdrawals_per_worker", e))?;
        let currency = CurrencyCode::try_new(self.report.currency.clone())
            .map_err(|e| Error::invalid_input("report.currency", e))?;

        Ok(Experiment {
            trials: TrialCount::new(self.run.trials),
            mode: self.run.mode,
            parameters: Parameters::new(start_balance, withdraw_amount),
            workload: Workload::new(workers, withdrawals_per_worker),
            report: ReportOptions {
                currency,
                top_outcomes: self.report.top_outcomes,
                format: self.report.format,
            },
        })
    }
}
