//! Monthly command - twelve-month business series for charting

use super::{format_naira, read_transactions, PolicyArg};
use chrono::{Datelike, Local, NaiveDate};
use clap::Args;
use pltax::core::{monthly_series, InclusionPolicy, MonthlyEntry};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct MonthlyCommand {
    /// Transactions file (JSON or CSV). Reads from stdin with "-".
    #[arg(short, long, default_value = "-")]
    transactions: PathBuf,

    /// Calendar year (defaults to the year of --date, else the current year)
    #[arg(short, long, conflicts_with = "date")]
    year: Option<i32>,

    /// Any date in the year to chart (YYYY-MM-DD)
    #[arg(short, long)]
    date: Option<NaiveDate>,

    /// Which transactions count as business
    #[arg(long, value_enum, default_value_t = PolicyArg::OptOut)]
    policy: PolicyArg,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct MonthlyOutput<'a> {
    year: i32,
    policy: InclusionPolicy,
    months: &'a [MonthlyEntry],
}

#[derive(Debug, Clone, Tabled)]
struct MonthRow {
    #[tabled(rename = "Month")]
    month: String,
    #[tabled(rename = "Income")]
    income: String,
    #[tabled(rename = "Expenses")]
    expenses: String,
    #[tabled(rename = "Profit")]
    profit: String,
}

impl MonthlyCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let year = self
            .year
            .or(self.date.map(|d| d.year()))
            .unwrap_or_else(|| Local::now().year());
        let policy: InclusionPolicy = self.policy.into();
        let transactions = read_transactions(&self.transactions)?;
        let months = monthly_series(&transactions, year, policy);

        if self.json {
            let output = MonthlyOutput {
                year,
                policy,
                months: &months,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        let mut rows: Vec<MonthRow> = months
            .iter()
            .map(|m| MonthRow {
                month: m.month.clone(),
                income: format_naira(m.income),
                expenses: format_naira(m.expenses),
                profit: format_naira(m.profit),
            })
            .collect();
        let (income, expenses) = months.iter().fold(
            (Decimal::ZERO, Decimal::ZERO),
            |(income, expenses), m| {
                (
                    income.saturating_add(m.income),
                    expenses.saturating_add(m.expenses),
                )
            },
        );
        rows.push(MonthRow {
            month: "Total".to_string(),
            income: format_naira(income),
            expenses: format_naira(expenses),
            profit: format_naira(income - expenses),
        });

        println!();
        println!("MONTHLY BUSINESS TOTALS ({}, {})", year, policy);
        println!();
        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
        Ok(())
    }
}
