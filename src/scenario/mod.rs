//! Concurrent withdrawal scenarios
//!
//! Each trial launches its workers against one freshly allocated shared
//! balance, waits for all of them, and returns the final balance. The two
//! scenarios differ only in how that shared balance is protected.

pub mod locked;
pub mod naive;

pub use locked::{run_once_locked, run_trial_locked, LockedBalance};
pub use naive::{run_once_naive, run_trial_naive, AtomicBalance};

use crate::domain::{Balance, Parameters, WithdrawAmount, Workload};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Barrier};
use std::thread;

/// Which withdrawal implementation a trial uses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scenario {
    /// Atomic loads and stores, no exclusion around check-then-subtract
    Naive,
    /// Whole check-then-subtract inside one mutex critical section
    Locked,
}

impl Scenario {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Naive => "naive",
            Self::Locked => "locked",
        }
    }

    /// Section header printed before the scenario's report
    pub fn header(&self) -> &'static str {
        match self {
            Self::Naive => "=== NAIVE ===",
            Self::Locked => "=== LOCKED ===",
        }
    }

    /// Whether a violation in this scenario is a fault rather than data
    pub fn must_preserve_invariant(&self) -> bool {
        matches!(self, Self::Locked)
    }

    pub fn run_trial(&self, params: &Parameters, workload: &Workload) -> Balance {
        match self {
            Self::Naive => run_trial_naive(params, workload),
            Self::Locked => run_trial_locked(params, workload),
        }
    }
}

/// Scenario selection accepted on the command line and in configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum ScenarioMode {
    Naive,
    Locked,
    #[default]
    Both,
}

impl ScenarioMode {
    /// Selected scenarios in run order, naive first
    pub fn scenarios(&self) -> &'static [Scenario] {
        match self {
            Self::Naive => &[Scenario::Naive],
            Self::Locked => &[Scenario::Locked],
            Self::Both => &[Scenario::Naive, Scenario::Locked],
        }
    }
}

/// Run `withdraw` on `workload.workers` threads against one shared handle
///
/// Workers wait at a common start gate so their withdrawals overlap, and all
/// of them are joined before this returns. A worker panic is re-raised here.
fn launch_workers<S, F>(shared: &Arc<S>, workload: &Workload, amount: WithdrawAmount, withdraw: F)
where
    S: Send + Sync + 'static,
    F: Fn(&S, WithdrawAmount) + Send + Sync + Copy + 'static,
{
    let workers = workload.workers.into_inner();
    let attempts = workload.withdrawals_per_worker.into_inner();
    let start_gate = Arc::new(Barrier::new(workers));

    let handles: Vec<_> = (0..workers)
        .map(|_| {
            let shared = Arc::clone(shared);
            let start_gate = Arc::clone(&start_gate);
            thread::spawn(move || {
                start_gate.wait();
                for _ in 0..attempts {
                    withdraw(shared.as_ref(), amount);
                }
            })
        })
        .collect();

    for handle in handles {
        if let Err(payload) = handle.join() {
            std::panic::resume_unwind(payload);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_run_order() {
        assert_eq!(ScenarioMode::Naive.scenarios(), &[Scenario::Naive]);
        assert_eq!(ScenarioMode::Locked.scenarios(), &[Scenario::Locked]);
        assert_eq!(
            ScenarioMode::Both.scenarios(),
            &[Scenario::Naive, Scenario::Locked]
        );
        assert_eq!(ScenarioMode::default(), ScenarioMode::Both);
    }

    #[test]
    fn test_only_locked_must_preserve_invariant() {
        assert!(Scenario::Locked.must_preserve_invariant());
        assert!(!Scenario::Naive.must_preserve_invariant());
    }

    #[test]
    fn test_headers_and_labels() {
        assert_eq!(Scenario::Naive.header(), "=== NAIVE ===");
        assert_eq!(Scenario::Locked.header(), "=== LOCKED ===");
        assert_eq!(Scenario::Naive.label(), "naive");
        assert_eq!(Scenario::Locked.label(), "locked");
    }

    #[test]
    fn test_mode_deserializes_lowercase() {
        let mode: ScenarioMode = serde_json::from_str("\"locked\"").expect("valid mode");
        assert_eq!(mode, ScenarioMode::Locked);
    }
}
