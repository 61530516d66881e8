//! Lazy record views.

use std::borrow::Borrow;

use crate::Transaction;

/// Records whose date falls in `month` (1-12), in input order.
///
/// This is a view over `txns`: nothing is copied, and it can only be walked
/// again if the source can. Collect into a `Vec` for repeated passes.
pub fn filter_by_month<I, T>(txns: I, month: u32) -> impl Iterator<Item = T>
where
    I: IntoIterator<Item = T>,
    T: Borrow<Transaction>,
{
    txns.into_iter()
        .filter(move |txn| txn.borrow().month() == month)
}

/// Apply an optional month filter, materializing the result.
pub fn select_month(txns: Vec<Transaction>, month: Option<u32>) -> Vec<Transaction> {
    match month {
        Some(m) => filter_by_month(txns, m).collect(),
        None => txns,
    }
}
