//! budget-ingest: read transaction CSV exports into typed records.

pub mod reader;
pub mod types;

pub use reader::{parse_transactions, read_transactions, TransactionReader};
pub use types::{RawRow, FIELD_COUNT};
