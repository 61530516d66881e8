//! Income / expense totals and net cash flow.

use std::borrow::Borrow;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::Serialize;

use crate::amount::checked_sum;
use crate::Transaction;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Summary {
    /// Sum of all non-negative amounts
    pub total_income: Decimal,
    /// Sum of all negative amounts (stays negative)
    pub total_expenses: Decimal,
    /// total_income - |total_expenses|
    pub net_cash_flow: Decimal,
}

/// Errors if either running total overflows.
pub fn calculate_summary<I, T>(txns: I) -> Result<Summary>
where
    I: IntoIterator<Item = T>,
    T: Borrow<Transaction>,
{
    let mut total_income = Decimal::ZERO;
    let mut total_expenses = Decimal::ZERO;

    for txn in txns {
        let txn = txn.borrow();
        if txn.is_expense() {
            total_expenses =
                checked_sum(total_expenses, txn.amount).context("summing expenses")?;
        } else {
            total_income = checked_sum(total_income, txn.amount).context("summing income")?;
        }
    }

    // income >= 0 >= expenses, so income - |expenses| cannot leave the range
    Ok(Summary {
        total_income,
        total_expenses,
        net_cash_flow: total_income + total_expenses,
    })
}
