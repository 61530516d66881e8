use anyhow::{bail, Context, Result};
use budget_core::{
    aggregate, calculate_summary, month_abbr, month_from_abbr, select_month, GroupKey,
    RuleTable, Transaction,
};
use budget_ingest::read_transactions;
use clap::{ArgAction, Parser, Subcommand};
use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

mod chart;
mod config;
mod report;

use config::Config;

#[derive(Parser, Debug)]
#[command(
    name = "budget",
    version = concat!(env!("CARGO_PKG_VERSION"), " (", env!("BUDGET_BUILD_SHA"), ")"),
    about = "Summaries and bar charts from a transactions CSV"
)]
struct Cli {
    /// Transactions CSV (defaults to [input].csv from the config, then ./transactions.csv)
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Config file (default: ~/.budget/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Disable colored output
    #[arg(long, global = true)]
    no_color: bool,

    /// More log output on stderr (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Total income, total expenses and net cash flow
    Summary {
        /// Only count this month (1-12 or Jan..Dec)
        #[arg(long, value_parser = parse_month)]
        month: Option<u32>,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Sum amounts per month, account, description, tag or category
    Aggregate {
        #[arg(long, default_value = "category")]
        by: GroupKey,

        #[arg(long, value_parser = parse_month)]
        month: Option<u32>,

        #[arg(long)]
        json: bool,
    },

    /// Bar chart of per-group sums
    Chart {
        #[arg(long, default_value = "month")]
        by: GroupKey,

        #[arg(long, value_parser = parse_month)]
        month: Option<u32>,

        /// Plain text bars even on a terminal
        #[arg(long)]
        plain: bool,
    },

    /// Print transactions per category, cheapest first
    Print {
        /// Category to print (repeatable; default: every category present)
        #[arg(long = "category")]
        categories: Vec<String>,

        #[arg(long, value_parser = parse_month)]
        month: Option<u32>,
    },

    /// List the active description -> category rules
    Rules,

    /// Write a default config file
    InitConfig,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let config_path = config::config_path(cli.config.as_deref());
    let cfg = config::load_optional_config(config_path.as_deref())?;
    let rules = cfg.rule_table();
    let color = !cli.no_color && io::stdout().is_terminal();
    let csv = cli.csv.as_deref();

    let mut out = io::stdout().lock();

    match cli.command {
        Command::Summary { month, json } => {
            let txns = load_transactions(csv, &cfg, &rules, month)?;
            let summary = calculate_summary(&txns)?;
            if json {
                report::print_json(&mut out, &summary)?;
            } else {
                print_scope(&mut out, txns.len(), month)?;
                report::print_summary(&mut out, &summary, color)?;
            }
        }

        Command::Aggregate { by, month, json } => {
            let txns = load_transactions(csv, &cfg, &rules, month)?;
            let aggregated = aggregate(&txns, by)?;
            if json {
                report::print_json(&mut out, &aggregated)?;
            } else {
                print_scope(&mut out, txns.len(), month)?;
                report::print_aggregated(&mut out, &aggregated)?;
            }
        }

        Command::Chart { by, month, plain } => {
            let txns = load_transactions(csv, &cfg, &rules, month)?;
            let aggregated = aggregate(&txns, by)?;
            if aggregated.is_empty() {
                writeln!(out, "No transactions to chart.")?;
                return Ok(());
            }

            let title = match month.and_then(month_abbr) {
                Some(m) => format!("{} ({m})", chart::chart_title(by)),
                None => chart::chart_title(by),
            };
            if plain || !io::stdout().is_terminal() {
                chart::write_text_chart(&mut out, &title, &aggregated, chart::TEXT_BAR_WIDTH)?;
            } else {
                drop(out);
                chart::draw_chart(&title, &aggregated, &cfg.chart)?;
            }
        }

        Command::Print { categories, month } => {
            let txns = load_transactions(csv, &cfg, &rules, month)?;
            let categories = report::categories_to_print(&txns, categories)?;
            report::print_transactions(&mut out, &txns, &categories, color)?;
        }

        Command::Rules => {
            let source = match &config_path {
                Some(path) => path.display().to_string(),
                None => "built-in".to_string(),
            };
            writeln!(out, "{} rules ({source})", rules.len())?;
            for (description, category) in rules.iter() {
                writeln!(out, "  {description:?} -> {category}")?;
            }
        }

        Command::InitConfig => {
            let path = config::init_config(config_path.as_deref())?;
            writeln!(out, "Wrote {}", path.display())?;
        }
    }

    Ok(())
}

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

/// Read the CSV, run the rule table over every record, then apply the month filter.
fn load_transactions(
    csv: Option<&Path>,
    cfg: &Config,
    rules: &RuleTable,
    month: Option<u32>,
) -> Result<Vec<Transaction>> {
    let path = csv.map(Path::to_path_buf).unwrap_or_else(|| cfg.input.csv.clone());
    if !path.exists() {
        bail!("CSV not found: {} (pass --csv <path>)", path.display());
    }

    let txns = read_transactions(&path).with_context(|| format!("parsing {}", path.display()))?;
    let txns: Vec<Transaction> = rules.apply_all(txns).collect();
    Ok(select_month(txns, month))
}

fn print_scope(out: &mut impl Write, count: usize, month: Option<u32>) -> io::Result<()> {
    match month.and_then(month_abbr) {
        Some(m) => writeln!(out, "{count} transactions in {m}\n"),
        None => writeln!(out, "{count} transactions\n"),
    }
}

/// Accepts "10" or "Oct".
fn parse_month(s: &str) -> Result<u32, String> {
    if let Ok(n) = s.trim().parse::<u32>() {
        return match n {
            1..=12 => Ok(n),
            _ => Err(format!("month must be 1-12, got {n}")),
        };
    }
    month_from_abbr(s).ok_or_else(|| format!("unknown month '{s}' (use 1-12 or Jan..Dec)"))
}
