//! Validate command - surface data quality issues without generating a report

use super::{load_labels, read_transactions};
use clap::Args;
use pltax::core::{scan_transactions, TransactionWarning, Warning};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub struct ValidateCommand {
    /// Transactions file (JSON or CSV). Reads from stdin with "-".
    #[arg(short, long, default_value = "-")]
    transactions: PathBuf,

    /// Category label overrides JSON; extra keys count as known
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

/// JSON output structure
#[derive(Debug, Serialize)]
struct ValidationOutput<'a> {
    transaction_count: usize,
    issue_count: usize,
    issues: &'a [TransactionWarning],
}

impl ValidateCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let labels = load_labels(self.labels.as_deref())?;
        let transactions = read_transactions(&self.transactions)?;
        let issues = scan_transactions(&transactions, &labels);

        if self.json {
            let output = ValidationOutput {
                transaction_count: transactions.len(),
                issue_count: issues.len(),
                issues: &issues,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        } else {
            print_text(&issues, transactions.len());
        }

        // Exit with code 1 if issues found
        if !issues.is_empty() {
            std::process::exit(1);
        }
        Ok(())
    }
}

fn print_text(issues: &[TransactionWarning], count: usize) {
    println!();
    println!("VALIDATION RESULTS ({} transactions)", count);
    println!();

    if issues.is_empty() {
        println!("\u{2713} No issues found.");
        return;
    }

    println!("\u{26A0} {} issue(s) found:", issues.len());
    println!();
    for (i, issue) in issues.iter().enumerate() {
        println!(
            "  {}. [{}] row {}",
            i + 1,
            warning_type_name(&issue.warning),
            issue.index + 1
        );
        println!("     {}", warning_message(&issue.warning));
        println!();
    }
}

fn warning_type_name(warning: &Warning) -> &'static str {
    match warning {
        Warning::MissingDate => "MissingDate",
        Warning::MissingAmount => "MissingAmount",
        Warning::UnknownCategory { .. } => "UnknownCategory",
        Warning::DeductibleOutOfRange { .. } => "DeductibleOutOfRange",
        Warning::IgnoredDeductible => "IgnoredDeductible",
    }
}

fn warning_message(warning: &Warning) -> String {
    match warning {
        Warning::MissingDate => {
            "No usable date - excluded from monthly, quarterly and chart views".to_string()
        }
        Warning::MissingAmount => "No amount or naira_value - counted as zero".to_string(),
        Warning::UnknownCategory { key } => {
            format!("Category '{}' is not in the label table - shown as-is", key)
        }
        Warning::DeductibleOutOfRange { percentage } => {
            format!("Deductible percentage {} exceeds 100 - treated as 100", percentage)
        }
        Warning::IgnoredDeductible => {
            "Deductible percentage only applies to mixed-use expenses - ignored".to_string()
        }
    }
}
