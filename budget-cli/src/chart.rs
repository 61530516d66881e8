//! Bar charts of aggregate maps.
//!
//! Bars are drawn at the absolute whole-dollar value of each group; the
//! annotation above each bar keeps the sign ("-$1,200").

use std::io::{self, Write};

use anyhow::Result;
use budget_core::{AggregateMap, GroupKey};
use ratatui::{
    backend::CrosstermBackend,
    style::{Style, Stylize},
    text::Line,
    widgets::{Bar, BarChart, BarGroup, Block},
    Terminal, TerminalOptions, Viewport,
};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::config::ChartSection;
use crate::report::{dollars, key_label};

/// Width of the longest bar in the plain-text rendering.
pub const TEXT_BAR_WIDTH: usize = 40;

pub fn chart_title(key: GroupKey) -> String {
    format!("Spending by {}", key.plural())
}

fn bar_height(amount: Decimal) -> u64 {
    amount
        .abs()
        .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
        .to_u64()
        .unwrap_or(u64::MAX)
}

pub fn bar_chart<'a>(title: &'a str, map: &'a AggregateMap, opts: &ChartSection) -> BarChart<'a> {
    let bars: Vec<Bar<'a>> = map
        .iter()
        .map(|(key, amount)| {
            Bar::default()
                .label(Line::from(key_label(key)))
                .value(bar_height(amount))
                .text_value(dollars(amount, 0))
        })
        .collect();

    BarChart::default()
        .block(Block::bordered().title(title))
        .bar_width(opts.bar_width)
        .bar_gap(opts.bar_gap)
        .bar_style(Style::new().magenta())
        .value_style(Style::new().black().on_magenta().bold())
        .label_style(Style::new().white())
        .data(BarGroup::default().bars(&bars))
}

/// Draw the chart below the cursor in an inline viewport.
pub fn draw_chart(title: &str, map: &AggregateMap, opts: &ChartSection) -> Result<()> {
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::with_options(
        backend,
        TerminalOptions {
            viewport: Viewport::Inline(opts.height),
        },
    )?;
    terminal.draw(|frame| frame.render_widget(bar_chart(title, map, opts), frame.area()))?;
    println!();
    Ok(())
}

/// Horizontal text bars, for pipes and dumb terminals.
pub fn write_text_chart(
    out: &mut impl Write,
    title: &str,
    map: &AggregateMap,
    width: usize,
) -> io::Result<()> {
    writeln!(out, "{title}")?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))?;

    let max = map.values().map(|v| v.abs()).max().unwrap_or(Decimal::ZERO);
    let label_width = map
        .keys()
        .map(|k| key_label(k).chars().count())
        .max()
        .unwrap_or(0);

    for (key, amount) in map.iter() {
        let len = if max.is_zero() {
            0
        } else {
            (amount.abs() / max * Decimal::from(width))
                .round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero)
                .to_usize()
                .unwrap_or(0)
        };
        writeln!(
            out,
            "{:<label_width$}  {:<width$}  {}",
            key_label(key),
            "█".repeat(len),
            dollars(amount, 0)
        )?;
    }
    writeln!(out)
}
