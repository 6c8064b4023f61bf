//! The balance invariant every scenario is measured against

use crate::domain::money::Balance;

/// `true` when the balance is non-negative
pub fn invariant_ok(balance: Balance) -> bool {
    balance.into_inner() >= 0
}
