//! Console output: aggregate listings, summaries, and the per-category transaction printer.

use std::io::{self, Write};

use anyhow::Result;
use budget_core::{aggregate_by_category, checked_total, AggregateMap, Summary, Transaction};
use crossterm::style::{style, Stylize};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serialize;

/// Label shown for an empty group key (untagged rows, blank categories).
const EMPTY_KEY: &str = "(none)";

/// "$1,234.56" / "-$5.00" with `dp` decimal places.
pub fn dollars(amount: Decimal, dp: u32) -> String {
    let mut rounded = amount.round_dp_with_strategy(dp, RoundingStrategy::MidpointAwayFromZero);
    let negative = rounded < Decimal::ZERO;
    rounded = rounded.abs();
    rounded.rescale(dp);

    let text = rounded.to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(int_part.len() + int_part.len() / 3);
    for (i, ch) in int_part.chars().enumerate() {
        if i > 0 && (int_part.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }

    let sign = if negative { "-" } else { "" };
    match frac_part {
        Some(f) => format!("{sign}${grouped}.{f}"),
        None => format!("{sign}${grouped}"),
    }
}

pub(crate) fn key_label(key: &str) -> &str {
    if key.is_empty() { EMPTY_KEY } else { key }
}

fn colored_amount(amount: Decimal, width: usize, color: bool) -> String {
    let text = format!("{:>width$}", dollars(amount, 2));
    if !color {
        return text;
    }
    if amount < Decimal::ZERO {
        style(text).red().to_string()
    } else {
        style(text).green().to_string()
    }
}

/// `key: $amount` per group, in map order.
pub fn print_aggregated(out: &mut impl Write, map: &AggregateMap) -> io::Result<()> {
    for (key, amount) in map.iter() {
        writeln!(out, "{}: {}", key_label(key), dollars(amount, 2))?;
    }
    writeln!(out)
}

pub fn print_summary(out: &mut impl Write, summary: &Summary, color: bool) -> io::Result<()> {
    writeln!(out, "Total income:   {}", colored_amount(summary.total_income, 14, color))?;
    writeln!(out, "Total expenses: {}", colored_amount(summary.total_expenses, 14, color))?;
    writeln!(out, "Net cash flow:  {}", colored_amount(summary.net_cash_flow, 14, color))
}

/// Categories `print` walks: the ones asked for, in the order given, or every
/// category present in category-view order (largest sum first).
pub fn categories_to_print(txns: &[Transaction], requested: Vec<String>) -> Result<Vec<String>> {
    if !requested.is_empty() {
        return Ok(requested);
    }
    Ok(aggregate_by_category(txns)?
        .keys()
        .map(str::to_string)
        .collect())
}

/// Records of each named category, cheapest (most negative) first.
/// Categories are returned in the order given, even when empty.
pub fn group_by_category<'a>(
    txns: &'a [Transaction],
    categories: &[String],
) -> Vec<(String, Vec<&'a Transaction>)> {
    categories
        .iter()
        .map(|name| {
            let mut rows: Vec<&Transaction> =
                txns.iter().filter(|t| &t.category == name).collect();
            rows.sort_by_key(|t| t.amount);
            (name.clone(), rows)
        })
        .collect()
}

/// Expects records that have already been through the rule table.
pub fn print_transactions(
    out: &mut impl Write,
    txns: &[Transaction],
    categories: &[String],
    color: bool,
) -> Result<()> {
    for (name, rows) in group_by_category(txns, categories) {
        let heading = format!("== {} ==", key_label(&name));
        if color {
            writeln!(out, "{}", style(heading).bold())?;
        } else {
            writeln!(out, "{heading}")?;
        }

        if rows.is_empty() {
            writeln!(out, "  (no transactions)\n")?;
            continue;
        }

        for t in &rows {
            writeln!(
                out,
                "  {}  {:<32} {}",
                t.date.format("%Y-%m-%d"),
                t.description,
                colored_amount(t.amount, 12, color)
            )?;
        }
        let total = checked_total(rows.iter().map(|t| t.amount))?;
        writeln!(out, "  {:<44} {}\n", "total", colored_amount(total, 12, color))?;
    }
    Ok(())
}

pub fn print_json<T: Serialize>(out: &mut impl Write, value: &T) -> Result<()> {
    serde_json::to_writer_pretty(&mut *out, value)?;
    writeln!(out)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use budget_core::{aggregate_by_tag, calculate_summary};
    use chrono::NaiveDate;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    fn txn(date: &str, desc: &str, cat: &str, tag: &str, amount: &str) -> Transaction {
        Transaction::new(
            NaiveDate::parse_from_str(date, "%Y-%m-%d").unwrap(),
            "Chase",
            desc,
            cat,
            tag,
            dec(amount),
        )
    }

    fn sample() -> Vec<Transaction> {
        vec![
            txn("2023-11-01", "Chipotle", "Restaurants", "", "-12.63"),
            txn("2023-10-01", "CVS", "Drugs", "", "-5.00"),
            txn("2023-11-05", "Nobu", "Restaurants", "date", "-180.00"),
            txn("2023-10-15", "Paycheck", "Income", "work", "2500"),
            txn("2023-11-09", "Refund", "Restaurants", "", "4.10"),
        ]
    }

    fn render<E: std::fmt::Debug>(f: impl FnOnce(&mut Vec<u8>) -> Result<(), E>) -> String {
        let mut buf = Vec::new();
        f(&mut buf).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn test_dollars_formatting() {
        assert_eq!(dollars(dec("1234.5"), 0), "$1,235");
        assert_eq!(dollars(dec("-1234567.891"), 2), "-$1,234,567.89");
        assert_eq!(dollars(dec("-12.63"), 2), "-$12.63");
        assert_eq!(dollars(dec("100"), 2), "$100.00");
        assert_eq!(dollars(dec("999"), 0), "$999");
        assert_eq!(dollars(dec("-0.001"), 2), "$0.00");
        assert_eq!(dollars(Decimal::ZERO, 0), "$0");
    }

    #[test]
    fn test_group_by_category_sorts_ascending() {
        let txns = sample();
        let groups = group_by_category(&txns, &["Restaurants".to_string(), "Rent".to_string()]);
        assert_eq!(groups.len(), 2);

        let (name, rows) = &groups[0];
        assert_eq!(name, "Restaurants");
        let descs: Vec<_> = rows.iter().map(|t| t.description.as_str()).collect();
        assert_eq!(descs, vec!["Nobu", "Chipotle", "Refund"]);

        assert_eq!(groups[1].0, "Rent");
        assert!(groups[1].1.is_empty());
    }

    #[test]
    fn test_categories_to_print_defaults_to_category_view_order() {
        let txns = sample();
        let all = categories_to_print(&txns, Vec::new()).unwrap();
        assert_eq!(all, vec!["Income", "Drugs", "Restaurants"]);

        let wanted = vec!["Rent".to_string(), "Drugs".to_string()];
        assert_eq!(categories_to_print(&txns, wanted.clone()).unwrap(), wanted);

        assert!(categories_to_print(&[], Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn test_print_transactions_plain() {
        let txns = sample();
        let text = render(|out| {
            print_transactions(out, &txns, &["Drugs".to_string(), "Rent".to_string()], false)
        });
        assert!(text.contains("== Drugs =="));
        assert!(text.contains("2023-10-01  CVS"));
        assert!(text.contains("-$5.00"));
        assert!(text.contains("== Rent ==\n  (no transactions)"));
        assert!(!text.contains('\u{1b}'), "plain output must not contain escapes");
    }

    #[test]
    fn test_print_transactions_colored() {
        let txns = sample();
        let text = render(|out| print_transactions(out, &txns, &["Income".to_string()], true));
        assert!(text.contains('\u{1b}'));
        assert!(text.contains("$2,500.00"));
    }

    #[test]
    fn test_print_aggregated_labels_empty_key() {
        let agg = aggregate_by_tag(&sample()).unwrap();
        let text = render(|out| print_aggregated(out, &agg));
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines[0], "(none): -$13.53");
        assert_eq!(lines[1], "date: -$180.00");
        assert_eq!(lines[2], "work: $2,500.00");
    }

    #[test]
    fn test_print_summary() {
        let summary = calculate_summary(&sample()).unwrap();
        let text = render(|out| print_summary(out, &summary, false));
        assert!(text.contains("Total income:"));
        assert!(text.contains("$2,504.10"));
        assert!(text.contains("-$197.63"));
        assert!(text.contains("$2,306.47"));
    }
}
