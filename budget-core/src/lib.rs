//! budget-core: transaction records, category rules, aggregation and summaries

pub mod aggregate;
pub mod amount;
pub mod filter;
pub mod month;
pub mod rules;
pub mod summary;
pub mod transaction;

pub use aggregate::{
    aggregate, aggregate_by_account, aggregate_by_category, aggregate_by_description,
    aggregate_by_month, aggregate_by_tag, AggregateMap, GroupKey,
};
pub use amount::{checked_sum, checked_total};
pub use filter::{filter_by_month, select_month};
pub use month::{month_abbr, month_from_abbr};
pub use rules::RuleTable;
pub use summary::{calculate_summary, Summary};
pub use transaction::Transaction;
