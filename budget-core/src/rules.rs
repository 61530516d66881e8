//! Deterministic category rules: exact description match -> replacement category.
//!
//! A `RuleTable` is built once (built-ins plus any configured overrides) and
//! then passed by reference to whatever needs it. It is never mutated while
//! records flow through it.

use std::collections::BTreeMap;

use crate::Transaction;

/// Description -> category overrides shipped with the binary.
const BUILTIN_RULES: &[(&str, &str)] = &[("American Express", "Restaurants")];

/// Immutable mapping from exact description text to category
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleTable {
    rules: BTreeMap<String, String>,
}

impl RuleTable {
    /// An empty table; applying it changes nothing.
    pub fn new() -> Self {
        Self::default()
    }

    /// The compiled-in rules.
    pub fn builtin() -> Self {
        Self::from_iter(
            BUILTIN_RULES
                .iter()
                .map(|(desc, cat)| (desc.to_string(), cat.to_string())),
        )
    }

    /// Add (or replace) a single rule.
    pub fn with_rule(mut self, description: impl Into<String>, category: impl Into<String>) -> Self {
        self.rules.insert(description.into(), category.into());
        self
    }

    /// Merge `other` into this table. Entries from `other` win.
    pub fn extend(mut self, other: impl IntoIterator<Item = (String, String)>) -> Self {
        self.rules.extend(other);
        self
    }

    pub fn lookup(&self, description: &str) -> Option<&str> {
        self.rules.get(description).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules in description order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.rules.iter().map(|(d, c)| (d.as_str(), c.as_str()))
    }

    /// Return a copy of `txn` with its category rewritten if a rule matches.
    pub fn apply(&self, txn: &Transaction) -> Transaction {
        let mut out = txn.clone();
        self.apply_in_place(&mut out);
        out
    }

    /// Rewrite the category of `txn` if a rule matches. Returns whether it did.
    pub fn apply_in_place(&self, txn: &mut Transaction) -> bool {
        match self.lookup(&txn.description) {
            Some(category) => {
                if txn.category != category {
                    log::debug!(
                        "rule: {:?} category {:?} -> {:?}",
                        txn.description,
                        txn.category,
                        category
                    );
                    txn.category = category.to_string();
                }
                true
            }
            None => false,
        }
    }

    /// Lazily apply the table to a stream of records, preserving order.
    pub fn apply_all<'a, I>(&'a self, txns: I) -> impl Iterator<Item = Transaction> + 'a
    where
        I: IntoIterator<Item = Transaction>,
        I::IntoIter: 'a,
    {
        txns.into_iter().map(move |mut txn| {
            self.apply_in_place(&mut txn);
            txn
        })
    }
}

impl FromIterator<(String, String)> for RuleTable {
    fn from_iter<T: IntoIterator<Item = (String, String)>>(iter: T) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}
