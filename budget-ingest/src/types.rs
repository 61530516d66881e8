use std::str::FromStr;

use anyhow::{anyhow, Result};
use budget_core::Transaction;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;

/// Number of columns every data row must have.
pub const FIELD_COUNT: usize = 6;

/// One CSV row as text, in column order:
/// date, account, description, category, tag, amount
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawRow {
    pub date: String,
    pub account: String,
    pub description: String,
    pub category: String,
    pub tag: String,
    pub amount: String,
}

impl RawRow {
    /// Convert to a typed record. Any unparseable field is an error.
    pub fn parse(self) -> Result<Transaction> {
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|e| anyhow!("invalid date '{}': {e}", self.date))?;
        let amount = Decimal::from_str(self.amount.trim())
            .map_err(|e| anyhow!("invalid amount '{}': {e}", self.amount))?;

        Ok(Transaction {
            date,
            account: self.account,
            description: self.description,
            category: self.category,
            tag: self.tag,
            amount,
        })
    }
}
