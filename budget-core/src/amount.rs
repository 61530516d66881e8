//! Overflow-checked decimal sums.

use anyhow::{anyhow, Result};
use rust_decimal::Decimal;

/// `a + b`, or an error once the sum leaves `Decimal`'s range.
pub fn checked_sum(a: Decimal, b: Decimal) -> Result<Decimal> {
    a.checked_add(b)
        .ok_or_else(|| anyhow!("amount overflow adding {b} to {a}"))
}

pub fn checked_total<I>(amounts: I) -> Result<Decimal>
where
    I: IntoIterator<Item = Decimal>,
{
    amounts.into_iter().try_fold(Decimal::ZERO, checked_sum)
}
