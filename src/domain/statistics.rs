//! Aggregate results of a series of trials

use crate::domain::invariant::invariant_ok;
use crate::domain::money::Balance;
use nutype::nutype;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Duration;

/// Number of trials the harness runs for one scenario
///
/// Zero is accepted here and yields empty statistics; callers that need a
/// positive count validate at the configuration boundary.
#[nutype(derive(
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
    From,
    Into
))]
pub struct TrialCount(u64);

/// How many trials ended at each distinct final balance
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OutcomeTally {
    counts: HashMap<Balance, u64>,
}

impl OutcomeTally {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, balance: Balance) {
        *self.counts.entry(balance).or_insert(0) += 1;
    }

    pub fn count(&self, balance: Balance) -> u64 {
        self.counts.get(&balance).copied().unwrap_or(0)
    }

    /// Sum of all counts; equals the number of recorded trials
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct final balances seen
    pub fn distinct(&self) -> usize {
        self.counts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Balance, u64)> + '_ {
        self.counts.iter().map(|(balance, count)| (*balance, *count))
    }

    /// Outcomes ordered by descending count, ties by ascending balance
    pub fn ranked(&self) -> Vec<(Balance, u64)> {
        let mut entries: Vec<_> = self.iter().collect();
        entries.sort_by(|(a_balance, a_count), (b_balance, b_count)| {
            b_count.cmp(a_count).then(a_balance.cmp(b_balance))
        });
        entries
    }
}

/// Totals for one scenario run: trials, invariant violations, outcome tally
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrialStatistics {
    trials: u64,
    violations: u64,
    outcomes: OutcomeTally,
    elapsed: Duration,
}

impl TrialStatistics {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one trial's final balance into the totals
    pub fn record(&mut self, balance: Balance) {
        self.trials += 1;
        self.outcomes.record(balance);
        if !invariant_ok(balance) {
            self.violations += 1;
        }
    }

    pub(crate) fn set_elapsed(&mut self, elapsed: Duration) {
        self.elapsed = elapsed;
    }

    pub fn trials(&self) -> u64 {
        self.trials
    }

    pub fn violations(&self) -> u64 {
        self.violations
    }

    pub fn outcomes(&self) -> &OutcomeTally {
        &self.outcomes
    }

    /// Wall-clock time spent running the trials
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Violations per trial in `[0.0, 1.0]`; `0.0` when nothing ran
    pub fn violation_rate(&self) -> f64 {
        if self.trials == 0 {
            return 0.0;
        }
        self.violations as f64 / self.trials as f64
    }

    pub fn violation_percent(&self) -> f64 {
        self.violation_rate() * 100.0
    }

    pub fn is_clean(&self) -> bool {
        self.violations == 0
    }

    /// The `n` most frequent final balances
    pub fn top_outcomes(&self, n: usize) -> Vec<(Balance, u64)> {
        let mut ranked = self.outcomes.ranked();
        ranked.truncate(n);
        ranked
    }
}
