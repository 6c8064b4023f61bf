//! Domain model for the balance race experiment
//!
//! Amounts, run parameters, the balance invariant, and the statistics a
//! series of trials produces.

pub mod invariant;
pub mod money;
pub mod parameters;
pub mod statistics;

pub use invariant::invariant_ok;
pub use money::{format_currency, Balance, CurrencyCode, StartBalance, WithdrawAmount};
pub use parameters::{Parameters, WithdrawalsPerWorker, WorkerCount, Workload};
pub use statistics::{OutcomeTally, TrialCount, TrialStatistics};
