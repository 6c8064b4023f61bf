//! Immutable per-run configuration of a withdrawal trial

use crate::domain::money::{Balance, StartBalance, WithdrawAmount};
use nutype::nutype;
use serde::{Deserialize, Serialize};

/// Amounts a trial starts from and withdraws
///
/// Constructed once per run and shared by value with every trial and worker.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Parameters {
    pub start_balance: StartBalance,
    pub withdraw_amount: WithdrawAmount,
}

impl Parameters {
    pub fn new(start_balance: StartBalance, withdraw_amount: WithdrawAmount) -> Self {
        Self {
            start_balance,
            withdraw_amount,
        }
    }

    /// Final balance after `successful` withdrawals went through
    pub fn balance_after(&self, successful: u64) -> Balance {
        let taken = i128::from(self.withdraw_amount.into_inner()) * i128::from(successful);
        let remaining = i128::from(self.start_balance.into_inner()) - taken;
        Balance::new(remaining.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }
}

/// Number of concurrent workers launched per trial
#[nutype(
    validate(greater = 0, less_or_equal = 256),
    default = 2,
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        Display,
        Default
    )
)]
pub struct WorkerCount(usize);

/// Withdrawal attempts each worker makes within one trial
#[nutype(
    validate(greater = 0, less_or_equal = 1_000_000),
    default = 1,
    derive(
        Debug,
        Clone,
        Copy,
        PartialEq,
        Eq,
        PartialOrd,
        Ord,
        Hash,
        Serialize,
        Deserialize,
        Display,
        Default
    )
)]
pub struct WithdrawalsPerWorker(usize);

/// Shape of the concurrent work inside one trial
///
/// The default is the classic race: two workers, one withdrawal each.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Workload {
    pub workers: WorkerCount,
    pub withdrawals_per_worker: WithdrawalsPerWorker,
}

impl Workload {
    pub fn new(workers: WorkerCount, withdrawals_per_worker: WithdrawalsPerWorker) -> Self {
        Self {
            workers,
            withdrawals_per_worker,
        }
    }

    /// Upper bound on withdrawals attempted across all workers
    pub fn total_attempts(&self) -> u64 {
        (self.workers.into_inner() as u64) * (self.withdrawals_per_worker.into_inner() as u64)
    }
}
