//! Command-line surface

use crate::config::Overrides;
use crate::report::ReportFormat;
use crate::scenario::ScenarioMode;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "balance_race")]
#[command(about = "Measure how often concurrent withdrawals break a non-negative balance invariant")]
#[command(version)]
pub struct Cli {
    /// Number of trials per scenario
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..))]
    pub trials: Option<i64>,

    /// Which scenario(s) to run
    #[arg(long, value_enum)]
    pub mode: Option<ScenarioMode>,

    /// Opening balance of every trial, in minor units
    #[arg(long, value_parser = clap::value_parser!(i64).range(0..))]
    pub start_balance: Option<i64>,

    /// Amount each withdrawal attempts to take, in minor units
    #[arg(long = "withdraw", value_parser = clap::value_parser!(i64).range(0..))]
    pub withdraw_amount: Option<i64>,

    /// Concurrent workers per trial
    #[arg(long, value_parser = clap::value_parser!(i64).range(1..=256))]
    pub workers: Option<i64>,

    /// Withdrawal attempts per worker
    #[arg(long = "ops", value_parser = clap::value_parser!(i64).range(1..=1_000_000))]
    pub withdrawals_per_worker: Option<i64>,

    /// Report format
    #[arg(long, value_enum)]
    pub format: Option<ReportFormat>,

    /// Extra configuration file, applied after the layered defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Do not draw progress bars
    #[arg(long)]
    pub no_progress: bool,
}

impl Cli {
    /// Command-line values as configuration overrides
    pub fn overrides(&self) -> Overrides {
        Overrides {
            trials: self.trials,
            mode: self.mode.map(value_name),
            start_balance: self.start_balance,
            withdraw_amount: self.withdraw_amount,
            workers: self.workers,
            withdrawals_per_worker: self.withdrawals_per_worker,
            format: self.format.map(value_name),
        }
    }
}

fn value_name<V: ValueEnum>(value: V) -> String {
    value
        .to_possible_value()
        .map(|v| v.get_name().to_string())
        .unwrap_or_default()
}
