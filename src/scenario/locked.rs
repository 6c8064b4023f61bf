//! Mutex-protected check-then-withdraw

use super::launch_workers;
use crate::domain::{Balance, Parameters, WithdrawAmount, Workload};
use parking_lot::Mutex;
use std::sync::Arc;

/// Shared balance whose every read and write happens under one lock
#[derive(Debug)]
pub struct LockedBalance {
    cell: Mutex<i64>,
}

impl LockedBalance {
    pub fn new(initial: Balance) -> Self {
        Self {
            cell: Mutex::new(initial.into_inner()),
        }
    }

    pub fn load(&self) -> Balance {
        Balance::new(*self.cell.lock())
    }

    /// Check and subtract inside a single critical section
    pub fn withdraw(&self, amount: WithdrawAmount) {
        let amount = amount.into_inner();
        let mut balance = self.cell.lock();
        if *balance >= amount {
            *balance -= amount;
        }
    }
}

/// One trial of the locked scenario with the default two-worker workload
pub fn run_once_locked(params: &Parameters) -> Balance {
    run_trial_locked(params, &Workload::default())
}

/// One trial of the locked scenario with an explicit workload
pub fn run_trial_locked(params: &Parameters, workload: &Workload) -> Balance {
    let balance = Arc::new(LockedBalance::new(Balance::from(params.start_balance)));
    launch_workers(&balance, workload, params.withdraw_amount, LockedBalance::withdraw);
    balance.load()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{invariant_ok, StartBalance, WithdrawalsPerWorker, WorkerCount};

    fn params(start: i64, withdraw: i64) -> Parameters {
        Parameters::new(
            StartBalance::try_new(start).expect("valid start"),
            WithdrawAmount::try_new(withdraw).expect("valid amount"),
        )
    }

    #[test]
    fn test_second_withdrawal_is_blocked() {
        let balance = LockedBalance::new(Balance::new(100_000));
        let amount = WithdrawAmount::try_new(70_000).expect("valid amount");
        balance.withdraw(amount);
        balance.withdraw(amount);
        assert_eq!(balance.load(), Balance::new(30_000));
    }

    #[test]
    fn test_default_parameters_always_end_at_thirty_thousand() {
        let params = Parameters::default();
        for _ in 0..500 {
            assert_eq!(run_once_locked(&params), Balance::new(30_000));
        }
    }

    #[test]
    fn test_both_withdrawals_succeed_when_funds_allow() {
        assert_eq!(run_once_locked(&params(100_000, 50_000)), Balance::new(0));
    }

    #[test]
    fn test_many_workers_never_overdraw() {
        let workload = Workload::new(
            WorkerCount::try_new(8).expect("valid"),
            WithdrawalsPerWorker::try_new(10).expect("valid"),
        );
        let params = params(1_050, 100);
        for _ in 0..50 {
            let final_balance = run_trial_locked(&params, &workload);
            assert!(invariant_ok(final_balance));
            assert_eq!(final_balance, Balance::new(50));
        }
    }
}
