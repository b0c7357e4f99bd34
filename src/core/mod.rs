pub mod aggregate;
pub mod amount;
pub mod category;
pub mod error;
pub mod filter;
pub mod monthly;
pub mod period;
pub mod report;
pub mod tax;
pub mod transaction;
pub mod warnings;

// Flat public surface for domain types and functions.
pub use aggregate::{aggregate, CategoryTotals};
pub use amount::{base_amount, effective_amount};
pub use category::{CategoryEntry, CategoryKind, CategoryLabels};
pub use error::ConfigError;
pub use filter::InclusionPolicy;
pub use monthly::{monthly_series, MonthlyEntry};
pub use period::{window_for, DateWindow, PeriodKind, PeriodSelection};
pub use report::{PLReport, ReportAssembler, ReportPeriod};
pub use tax::{compute_tax, BracketSlice, BracketWidth, TaxBracket, TaxComputation, TaxConfiguration};
pub use transaction::{
    read_transactions_csv, read_transactions_json, BusinessFlag, Transaction, TransactionError,
    TransactionInput,
};
pub use warnings::{scan_transactions, TransactionWarning, Warning};

/// Column description generated by `#[derive(CsvSchema)]`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CsvField {
    pub name: &'static str,
    pub required: bool,
    pub description: &'static str,
}
