pub mod categories;
pub mod monthly;
pub mod report;
pub mod schema;
pub mod tax;
pub mod validate;

use anyhow::Context;
use clap::ValueEnum;
use pltax::core::{
    read_transactions_csv, read_transactions_json, CategoryLabels, InclusionPolicy,
    TaxConfiguration, Transaction,
};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::fs::File;
use std::io::{self, BufReader, Read};
use std::path::Path;

/// Read transactions (JSON or CSV) from a file, or stdin with "-"
pub fn read_transactions(path: &Path) -> anyhow::Result<Vec<Transaction>> {
    if path.as_os_str() == "-" {
        return read_from_stdin();
    }
    let reader = BufReader::new(
        File::open(path).with_context(|| format!("opening {}", path.display()))?,
    );
    let is_csv = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
    let transactions = if is_csv {
        read_transactions_csv(reader)?
    } else {
        read_transactions_json(reader)?
    };
    Ok(transactions)
}

fn read_from_stdin() -> anyhow::Result<Vec<Transaction>> {
    let stdin = io::stdin();
    let mut reader = BufReader::new(stdin.lock());

    let mut buffer = Vec::new();
    reader.read_to_end(&mut buffer)?;

    let first = buffer.iter().find(|b| !b.is_ascii_whitespace());
    let transactions = match first {
        None => anyhow::bail!("No input received. Provide a file or pipe data to stdin."),
        Some(b'[') | Some(b'{') => read_transactions_json(io::Cursor::new(buffer))?,
        Some(_) => read_transactions_csv(io::Cursor::new(buffer))?,
    };
    Ok(transactions)
}

/// Load a tax configuration file; `None` means use the default schedule
pub fn load_tax_config(path: Option<&Path>) -> anyhow::Result<Option<TaxConfiguration>> {
    let Some(path) = path else {
        return Ok(None);
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let config: TaxConfiguration = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing tax configuration {}", path.display()))?;
    log::info!(
        "Loaded tax configuration: exemption {}, {} brackets",
        config.exemption_threshold,
        config.brackets.len()
    );
    Ok(Some(config))
}

/// Built-in category labels, extended by an optional `{ "key": "label" }` file
pub fn load_labels(path: Option<&Path>) -> anyhow::Result<CategoryLabels> {
    let Some(path) = path else {
        return Ok(CategoryLabels::builtin());
    };
    let file = File::open(path).with_context(|| format!("opening {}", path.display()))?;
    let overrides: BTreeMap<String, String> = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("parsing category labels {}", path.display()))?;
    Ok(CategoryLabels::with_overrides(overrides))
}

#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum PolicyArg {
    /// Count everything except transactions flagged personal
    #[default]
    OptOut,
    /// Count only transactions flagged business or mixed
    OptIn,
}

impl From<PolicyArg> for InclusionPolicy {
    fn from(arg: PolicyArg) -> Self {
        match arg {
            PolicyArg::OptOut => InclusionPolicy::OptOut,
            PolicyArg::OptIn => InclusionPolicy::OptIn,
        }
    }
}

pub fn format_naira(amount: Decimal) -> String {
    if amount < Decimal::ZERO {
        format!("-₦{:.2}", amount.abs())
    } else {
        format!("₦{:.2}", amount)
    }
}

pub fn format_rate(rate: Decimal) -> String {
    let s = format!("{:.2}", rate * Decimal::ONE_HUNDRED);
    let trimmed = s.trim_end_matches('0').trim_end_matches('.');
    format!("{}%", trimmed)
}
