//! Transaction record type shared by every stage of the pipeline

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::Serialize;

/// One parsed transaction line
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct Transaction {
    /// Date of the transaction (YYYY-MM-DD)
    pub date: NaiveDate,
    /// Account/source (Chase, Capital One, etc.)
    pub account: String,
    /// Merchant or payee text as exported
    pub description: String,
    /// Category label; the only field rules may rewrite
    pub category: String,
    /// Free-form tag, often empty
    pub tag: String,
    /// Positive = income, negative = expense
    pub amount: Decimal,
}

impl Transaction {
    /// Create a new Transaction
    pub fn new(
        date: NaiveDate,
        account: impl Into<String>,
        description: impl Into<String>,
        category: impl Into<String>,
        tag: impl Into<String>,
        amount: Decimal,
    ) -> Self {
        Self {
            date,
            account: account.into(),
            description: description.into(),
            category: category.into(),
            tag: tag.into(),
            amount,
        }
    }

    /// Month number (1-12) of the transaction date
    pub fn month(&self) -> u32 {
        self.date.month()
    }

    /// Returns true if this is an expense (negative amount)
    pub fn is_expense(&self) -> bool {
        self.amount < Decimal::ZERO
    }

    /// Get the absolute amount
    pub fn abs_amount(&self) -> Decimal {
        self.amount.abs()
    }
}
