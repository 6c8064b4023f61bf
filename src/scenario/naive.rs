//! Unsynchronized check-then-withdraw
//!
//! Every individual access to the balance is an atomic operation, so there
//! is no data race. The read and the subtraction are still two separate
//! operations, and two workers can both pass the guard before either one
//! subtracts. The final balance can then go negative without anything
//! crashing.

use super::launch_workers;
use crate::domain::{Balance, Parameters, WithdrawAmount, Workload};
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

/// Shared balance cell with independently atomic reads and writes
#[derive(Debug)]
pub struct AtomicBalance {
    cell: AtomicI64,
}

impl AtomicBalance {
    pub fn new(initial: Balance) -> Self {
        Self {
            cell: AtomicI64::new(initial.into_inner()),
        }
    }

    pub fn load(&self) -> Balance {
        Balance::new(self.cell.load(Ordering::Relaxed))
    }

    /// Withdraw if the balance looks sufficient
    ///
    /// Check and subtract are not atomic as a unit.
    pub fn withdraw_unguarded(&self, amount: WithdrawAmount) {
        let amount = amount.into_inner();
        if self.cell.load(Ordering::Relaxed) >= amount {
            self.cell.fetch_sub(amount, Ordering::Relaxed);
        }
    }
}

/// One trial of the naive scenario with the default two-worker workload
pub fn run_once_naive(params: &Parameters) -> Balance {
    run_trial_naive(params, &Workload::default())
}

/// One trial of the naive scenario with an explicit workload
pub fn run_trial_naive(params: &Parameters, workload: &Workload) -> Balance {
    let balance = Arc::new(AtomicBalance::new(Balance::from(params.start_balance)));
    launch_workers(
        &balance,
        workload,
        params.withdraw_amount,
        AtomicBalance::withdraw_unguarded,
    );
    // Joining every worker orders all their writes before this load.
    balance.load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{StartBalance, WithdrawalsPerWorker, WorkerCount};

    fn params(start: i64, withdraw: i64) -> Parameters {
        Parameters::new(
            StartBalance::try_new(start).expect("valid start"),
            WithdrawAmount::try_new(withdraw).expect("valid amount"),
        )
    }

    #[test]
    fn test_single_threaded_withdrawal_respects_guard() {
        let balance = AtomicBalance::new(Balance::new(100));
        let amount = WithdrawAmount::try_new(70).expect("valid amount");
        balance.withdraw_unguarded(amount);
        assert_eq!(balance.load(), Balance::new(30));
        balance.withdraw_unguarded(amount);
        assert_eq!(balance.load(), Balance::new(30));
    }

    #[test]
    fn test_amount_larger_than_balance_is_rejected() {
        for _ in 0..100 {
            assert_eq!(run_once_naive(&params(500, 1_000)), Balance::new(500));
        }
    }

    #[test]
    fn test_zero_withdrawal_leaves_balance_unchanged() {
        assert_eq!(run_once_naive(&params(100_000, 0)), Balance::new(100_000));
    }

    #[test]
    fn test_outcomes_stay_within_reachable_set() {
        let params = Parameters::default();
        for _ in 0..200 {
            let final_balance = run_once_naive(&params);
            assert!(
                [100_000, 30_000, -40_000].contains(&final_balance.into_inner()),
                "unexpected final balance {final_balance}"
            );
            assert_ne!(final_balance, Balance::new(100_000));
        }
    }

    #[test]
    fn test_enough_funds_for_every_worker() {
        let workload = Workload::new(
            WorkerCount::try_new(4).expect("valid"),
            WithdrawalsPerWorker::try_new(3).expect("valid"),
        );
        let final_balance = run_trial_naive(&params(10_000, 100), &workload);
        assert_eq!(final_balance, Balance::new(8_800));
    }
}
