//! Group transactions by a field and sum their signed amounts.

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use rust_decimal::Decimal;
use serde::{Serialize, Serializer};
use serde::ser::SerializeMap;

use crate::amount::{checked_sum, checked_total};
use crate::month::month_abbr;
use crate::Transaction;

/// Which field a transaction is grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Month,
    Account,
    Description,
    Tag,
    Category,
}

impl GroupKey {
    pub const ALL: [GroupKey; 5] = [
        GroupKey::Month,
        GroupKey::Account,
        GroupKey::Description,
        GroupKey::Tag,
        GroupKey::Category,
    ];

    /// Key under which `txn` is accumulated.
    pub fn key_of<'a>(&self, txn: &'a Transaction) -> &'a str {
        match self {
            // chrono guarantees 1..=12
            GroupKey::Month => month_abbr(txn.month()).unwrap_or("???"),
            GroupKey::Account => &txn.account,
            GroupKey::Description => &txn.description,
            GroupKey::Tag => &txn.tag,
            GroupKey::Category => &txn.category,
        }
    }

    /// Plural noun used in report titles ("Spending by Months").
    pub fn plural(&self) -> &'static str {
        match self {
            GroupKey::Month => "Months",
            GroupKey::Account => "Accounts",
            GroupKey::Description => "Transactions",
            GroupKey::Tag => "Tags",
            GroupKey::Category => "Categories",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            GroupKey::Month => "month",
            GroupKey::Account => "account",
            GroupKey::Description => "description",
            GroupKey::Tag => "tag",
            GroupKey::Category => "category",
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GroupKey {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "month" | "months" | "date" => Ok(GroupKey::Month),
            "account" | "accounts" => Ok(GroupKey::Account),
            "description" | "transaction" | "transactions" => Ok(GroupKey::Description),
            "tag" | "tags" => Ok(GroupKey::Tag),
            "category" | "categories" => Ok(GroupKey::Category),
            other => Err(format!(
                "unknown group key '{other}' (expected month, account, description, tag or category)"
            )),
        }
    }
}

/// Ordered key -> summed amount. Iteration follows first-seen order unless sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AggregateMap {
    entries: Vec<(String, Decimal)>,
    index: HashMap<String, usize>,
}

impl AggregateMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `amount` to the running sum for `key`, creating it at zero if new.
    /// Fails, leaving the sum untouched, if the result would overflow.
    pub fn add(&mut self, key: &str, amount: Decimal) -> Result<()> {
        match self.index.get(key) {
            Some(&i) => {
                let sum = &mut self.entries[i].1;
                *sum = checked_sum(*sum, amount).with_context(|| format!("summing '{key}'"))?;
            }
            None => {
                self.index.insert(key.to_string(), self.entries.len());
                self.entries.push((key.to_string(), amount));
            }
        }
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<Decimal> {
        self.index.get(key).map(|&i| self.entries[i].1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Decimal)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn values(&self) -> impl Iterator<Item = Decimal> + '_ {
        self.entries.iter().map(|(_, v)| *v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum over all groups; equals the sum of the aggregated amounts.
    pub fn total(&self) -> Result<Decimal> {
        checked_total(self.values())
    }

    /// Reorder by amount, largest first. Equal amounts keep their current order.
    pub fn sort_by_amount_desc(&mut self) {
        self.entries.sort_by(|a, b| b.1.cmp(&a.1));
        self.reindex();
    }

    fn reindex(&mut self) {
        self.index = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, (k, _))| (k.clone(), i))
            .collect();
    }
}

impl Serialize for AggregateMap {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (k, v) in &self.entries {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Group `txns` by `key`, summing signed amounts. Category views come back
/// sorted by amount descending; every other view keeps first-seen order.
pub fn aggregate<I, T>(txns: I, key: GroupKey) -> Result<AggregateMap>
where
    I: IntoIterator<Item = T>,
    T: Borrow<Transaction>,
{
    let mut out = AggregateMap::new();
    let mut count = 0usize;
    for txn in txns {
        let txn = txn.borrow();
        out.add(key.key_of(txn), txn.amount)?;
        count += 1;
    }
    if key == GroupKey::Category {
        out.sort_by_amount_desc();
    }
    log::debug!("aggregated {} records into {} {} groups", count, out.len(), key);
    Ok(out)
}

pub fn aggregate_by_month<I, T>(txns: I) -> Result<AggregateMap>
where
    I: IntoIterator<Item = T>,
    T: Borrow<Transaction>,
{
    aggregate(txns, GroupKey::Month)
}

pub fn aggregate_by_account<I, T>(txns: I) -> Result<AggregateMap>
where
    I: IntoIterator<Item = T>,
    T: Borrow<Transaction>,
{
    aggregate(txns, GroupKey::Account)
}

pub fn aggregate_by_description<I, T>(txns: I) -> Result<AggregateMap>
where
    I: IntoIterator<Item = T>,
    T: Borrow<Transaction>,
{
    aggregate(txns, GroupKey::Description)
}

pub fn aggregate_by_tag<I, T>(txns: I) -> Result<AggregateMap>
where
    I: IntoIterator<Item = T>,
    T: Borrow<Transaction>,
{
    aggregate(txns, GroupKey::Tag)
}

pub fn aggregate_by_category<I, T>(txns: I) -> Result<AggregateMap>
where
    I: IntoIterator<Item = T>,
    T: Borrow<Transaction>,
{
    aggregate(txns, GroupKey::Category)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn txn(date: &str, account: &str, desc: &str, cat: &str, tag: &str, amount: &str) -> Transaction {
        Transaction::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            account,
            desc,
            cat,
            tag,
            Decimal::from_str(amount).unwrap(),
        )
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn("2023-11-01", "Capital One", "Chipotle", "Restaurants", "", "-12.63"),
            txn("2023-10-01", "Chase", "CVS", "Drugs", "", "-5.00"),
            txn("2023-10-15", "Chase", "Paycheck", "Income", "work", "2500.00"),
            txn("2023-11-03", "Capital One", "Chipotle", "Restaurants", "lunch", "-9.87"),
            txn("2023-11-20", "Chase", "Landlord", "Rent", "", "-1200.00"),
            txn("2023-12-02", "Chase", "Refund", "Drugs", "", "5.00"),
        ]
    }

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_by_month_uses_abbreviations_in_first_seen_order() {
        let agg = aggregate_by_month(&sample()).unwrap();
        let keys: Vec<_> = agg.keys().collect();
        assert_eq!(keys, vec!["Nov", "Oct", "Dec"]);
        assert_eq!(agg.get("Nov"), Some(dec("-1222.50")));
        assert_eq!(agg.get("Oct"), Some(dec("2495.00")));
        assert_eq!(agg.get("Dec"), Some(dec("5.00")));
    }

    #[test]
    fn test_amounts_are_signed() {
        let agg = aggregate_by_category(&sample()).unwrap();
        // -5.00 and +5.00 cancel out
        assert_eq!(agg.get("Drugs"), Some(Decimal::ZERO));
        assert_eq!(agg.get("Restaurants"), Some(dec("-22.50")));
    }

    #[test]
    fn test_by_category_sorted_descending() {
        let agg = aggregate_by_category(&sample()).unwrap();
        let keys: Vec<_> = agg.keys().collect();
        assert_eq!(keys, vec!["Income", "Drugs", "Restaurants", "Rent"]);
        let values: Vec<_> = agg.values().collect();
        for w in values.windows(2) {
            assert!(w[0] >= w[1], "not sorted: {:?}", values);
        }
        // lookups still work after sorting
        assert_eq!(agg.get("Rent"), Some(dec("-1200.00")));
    }

    #[test]
    fn test_by_account_tag_and_description() {
        let txns = sample();
        let by_account = aggregate_by_account(&txns).unwrap();
        assert_eq!(by_account.keys().collect::<Vec<_>>(), vec!["Capital One", "Chase"]);
        assert_eq!(by_account.get("Capital One"), Some(dec("-22.50")));

        let by_tag = aggregate_by_tag(&txns).unwrap();
        assert_eq!(by_tag.get(""), Some(dec("-1212.63")));
        assert_eq!(by_tag.get("work"), Some(dec("2500.00")));

        let by_desc = aggregate_by_description(&txns).unwrap();
        assert_eq!(by_desc.len(), 5);
        assert_eq!(by_desc.get("Chipotle"), Some(dec("-22.50")));
    }

    #[test]
    fn test_mass_conservation_for_every_key() {
        let txns = sample();
        let expected: Decimal = txns.iter().map(|t| t.amount).sum();
        for key in GroupKey::ALL {
            let agg = aggregate(&txns, key).unwrap();
            assert_eq!(agg.total().unwrap(), expected, "key {key}");
        }
    }

    #[test]
    fn test_empty_input() {
        let agg = aggregate(Vec::<Transaction>::new(), GroupKey::Category).unwrap();
        assert!(agg.is_empty());
        assert_eq!(agg.total().unwrap(), Decimal::ZERO);
    }

    #[test]
    fn test_overflowing_group_is_an_error() {
        let huge = Decimal::MAX.to_string();
        let txns = vec![
            txn("2023-10-01", "Chase", "Big", "Windfall", "", &huge),
            txn("2023-10-02", "Chase", "Bigger", "Windfall", "", &huge),
        ];
        let err = aggregate(&txns, GroupKey::Category).unwrap_err();
        assert!(format!("{err:#}").contains("Windfall"));
        // distinct groups stay in range on their own
        assert_eq!(aggregate(&txns, GroupKey::Description).unwrap().len(), 2);
    }

    #[test]
    fn test_failed_add_keeps_previous_sum() {
        let mut map = AggregateMap::new();
        map.add("Sep", Decimal::MAX).unwrap();
        assert!(map.add("Sep", Decimal::ONE).is_err());
        assert_eq!(map.get("Sep"), Some(Decimal::MAX));
    }

    #[test]
    fn test_accepts_owned_records() {
        let agg = aggregate(sample(), GroupKey::Account).unwrap();
        assert_eq!(agg.len(), 2);
    }

    #[test]
    fn test_group_key_parsing() {
        assert_eq!("Month".parse::<GroupKey>(), Ok(GroupKey::Month));
        assert_eq!("categories".parse::<GroupKey>(), Ok(GroupKey::Category));
        assert_eq!("transactions".parse::<GroupKey>(), Ok(GroupKey::Description));
        assert!("amount".parse::<GroupKey>().is_err());
        assert_eq!(GroupKey::Month.plural(), "Months");
    }

    #[test]
    fn test_serializes_in_order() {
        let agg = aggregate_by_category(&sample()).unwrap();
        let json = serde_json::to_string(&agg).unwrap();
        let income = json.find("Income").unwrap();
        let rent = json.find("Rent").unwrap();
        assert!(income < rent);
    }
}
