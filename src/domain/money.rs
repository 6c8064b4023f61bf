//! Monetary amounts in minor currency units (cents, groszy)
//!
//! Amounts are kept as integers end to end. Only the reporting layer turns
//! them into decimal strings.

use nutype::nutype;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Digits after the decimal point for every supported currency
pub const MINOR_UNIT_SCALE: u32 = 2;

/// Balance observed at the end of a trial
///
/// Deliberately unvalidated: the naive scenario can drive it below zero and
/// that observation has to be representable.
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
pub struct Balance(i64);

/// Opening balance of every trial
#[nutype(
    validate(greater_or_equal = 0),
    default = 100_000,
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
pub struct StartBalance(i64);

/// Amount each withdrawal attempt tries to take
///
/// May exceed the start balance; the withdrawal guard then rejects it.
#[nutype(
    validate(greater_or_equal = 0),
    default = 70_000,
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
pub struct WithdrawAmount(i64);

impl From<StartBalance> for Balance {
    fn from(start: StartBalance) -> Self {
        Balance::new(start.into_inner())
    }
}

/// ISO-style currency code appended to formatted amounts
#[nutype(
    sanitize(trim, uppercase),
    validate(not_empty, len_char_max = 8),
    derive(
        Debug,
        Clone,
        PartialEq,
        Eq,
        Hash,
        Serialize,
        Deserialize,
        AsRef,
        Display
    )
)]
pub struct CurrencyCode(String);

impl Balance {
    /// Amount as a decimal in major units, e.g. `100000` -> `1000.00`
    pub fn to_major_units(self) -> Decimal {
        Decimal::new(self.into_inner(), MINOR_UNIT_SCALE)
    }
}

/// Format a balance for display, e.g. `1000.00 PLN`
pub fn format_currency(balance: Balance, currency: &CurrencyCode) -> String {
    format!("{} {}", balance.to_major_units(), currency)
}
