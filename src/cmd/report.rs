//! Report command - P&L for a period with estimated tax

use super::{format_naira, format_rate, load_labels, load_tax_config, read_transactions, PolicyArg};
use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::Args;
use pltax::core::{CategoryLabels, PLReport, PeriodKind, PeriodSelection, ReportAssembler};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct ReportCommand {
    /// Transactions file (JSON or CSV). Reads from stdin with "-".
    #[arg(short, long, default_value = "-")]
    transactions: PathBuf,

    /// Report period: monthly, quarterly or annual
    #[arg(short, long, default_value = "annual")]
    period: String,

    /// Reference date selecting the month/quarter (YYYY-MM-DD)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Tax configuration JSON (exemption threshold and brackets)
    #[arg(long)]
    tax_config: Option<PathBuf>,

    /// Category label overrides JSON ({ "key": "label" })
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Which transactions count as business
    #[arg(long, value_enum, default_value_t = PolicyArg::OptOut)]
    policy: PolicyArg,

    /// Output as JSON instead of formatted tables
    #[arg(long, conflicts_with = "csv")]
    json: bool,

    /// Output category totals as CSV
    #[arg(long)]
    csv: bool,
}

impl ReportCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let kind: PeriodKind = self.period.parse()?;
        let selection = PeriodSelection::new(kind, self.date);
        let tax_config = load_tax_config(self.tax_config.as_deref())?;
        let labels = load_labels(self.labels.as_deref())?;
        let assembler = ReportAssembler::new(tax_config, self.policy.into())?;
        log::debug!(
            "Policy {}, exemption {}, {} brackets",
            assembler.policy(),
            assembler.tax_configuration().exemption_threshold,
            assembler.tax_configuration().brackets.len()
        );

        let transactions = read_transactions(&self.transactions)?;
        let report = assembler.assemble(&transactions, &selection, Local::now().date_naive());

        if self.json {
            println!("{}", serde_json::to_string_pretty(&report)?);
        } else if self.csv {
            write_csv(&report, &labels, io::stdout()).context("writing CSV")?;
        } else {
            print_report(&report, &labels);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Tabled)]
struct CategoryRow {
    #[tabled(rename = "Category")]
    label: String,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Debug, Clone, Tabled)]
struct SummaryRow {
    #[tabled(rename = "")]
    name: &'static str,
    #[tabled(rename = "Amount")]
    amount: String,
}

#[derive(Debug, Clone, Tabled)]
struct SliceRow {
    #[tabled(rename = "Bracket")]
    bracket: usize,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Taxed Amount")]
    amount: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

fn print_report(report: &PLReport, labels: &CategoryLabels) {
    println!();
    println!("PROFIT & LOSS ({})", report.period.label);
    if let (Some(start), Some(end)) = (report.period.start, report.period.end) {
        println!("{} to {}", start.format("%Y-%m-%d"), end.format("%Y-%m-%d"));
    }
    println!();

    if !report.has_data {
        println!("No business transactions found for this period.");
        println!();
    }

    print_categories("INCOME", &report.income_by_category, labels);
    print_categories("EXPENSES", &report.expenses_by_category, labels);

    let net_label = if report.is_loss { "Net Loss" } else { "Net Profit" };
    let summary = vec![
        SummaryRow {
            name: "Total Income",
            amount: format_naira(report.total_business_income),
        },
        SummaryRow {
            name: "Total Expenses",
            amount: format_naira(report.total_business_expenses),
        },
        SummaryRow {
            name: net_label,
            amount: format_naira(report.net_profit),
        },
        SummaryRow {
            name: "Taxable Income",
            amount: format_naira(report.taxable_income),
        },
        SummaryRow {
            name: "Estimated Tax",
            amount: format_naira(report.estimated_tax),
        },
        SummaryRow {
            name: "Net Profit After Tax",
            amount: format_naira(report.net_profit_after_tax),
        },
    ];
    println!("SUMMARY");
    println!("{}", right_aligned(Table::new(summary)));
    println!(
        "  Effective tax rate: {}",
        format_rate(report.effective_tax_rate)
    );
    println!();

    if !report.tax_breakdown.is_empty() {
        let rows: Vec<SliceRow> = report
            .tax_breakdown
            .iter()
            .map(|s| SliceRow {
                bracket: s.index + 1,
                rate: format_rate(s.rate),
                amount: format_naira(s.amount),
                tax: format_naira(s.tax),
            })
            .collect();
        println!("TAX BREAKDOWN");
        println!("{}", right_aligned(Table::new(rows)));
        println!();
    }
}

fn print_categories(title: &str, totals: &BTreeMap<String, Decimal>, labels: &CategoryLabels) {
    println!("{}", title);
    if totals.is_empty() {
        println!("  (none)");
        println!();
        return;
    }
    let rows: Vec<CategoryRow> = totals
        .iter()
        .map(|(key, amount)| CategoryRow {
            label: labels.label(key).to_string(),
            amount: format_naira(*amount),
        })
        .collect();
    println!("{}", right_aligned(Table::new(rows)));
    println!();
}

fn right_aligned(mut table: Table) -> String {
    table
        .with(Style::rounded())
        .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
        .to_string()
}

/// section,category,label,amount rows followed by the summary figures
fn write_csv<W: io::Write>(
    report: &PLReport,
    labels: &CategoryLabels,
    writer: W,
) -> anyhow::Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(["section", "category", "label", "amount"])?;
    for (section, totals) in [
        ("income", &report.income_by_category),
        ("expense", &report.expenses_by_category),
    ] {
        for (key, amount) in totals {
            wtr.write_record([
                section,
                key.as_str(),
                labels.label(key),
                format!("{:.2}", amount).as_str(),
            ])?;
        }
    }
    let summary = [
        ("total_income", report.total_business_income),
        ("total_expenses", report.total_business_expenses),
        ("net_profit", report.net_profit),
        ("taxable_income", report.taxable_income),
        ("estimated_tax", report.estimated_tax),
        ("net_profit_after_tax", report.net_profit_after_tax),
    ];
    for (name, amount) in summary {
        wtr.write_record(["summary", name, "", format!("{:.2}", amount).as_str()])?;
    }
    wtr.flush()?;
    Ok(())
}
