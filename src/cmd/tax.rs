//! Tax command - progressive tax on a net profit figure

use super::{format_naira, format_rate, load_tax_config};
use clap::Args;
use pltax::core::{compute_tax, TaxComputation, TaxConfiguration};
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::PathBuf;
use tabled::{
    settings::{object::Rows, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct TaxCommand {
    /// Net profit before tax (negative for a loss)
    #[arg(short, long, allow_hyphen_values = true)]
    net_profit: Decimal,

    /// Tax configuration JSON (exemption threshold and brackets)
    #[arg(long)]
    tax_config: Option<PathBuf>,

    /// Output as JSON instead of formatted text
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Serialize)]
struct TaxOutput<'a> {
    net_profit: Decimal,
    exemption_threshold: Decimal,
    #[serde(flatten)]
    computation: &'a TaxComputation,
    net_profit_after_tax: Decimal,
}

#[derive(Debug, Clone, Tabled)]
struct BracketRow {
    #[tabled(rename = "Bracket")]
    bracket: usize,
    #[tabled(rename = "Rate")]
    rate: String,
    #[tabled(rename = "Taxed Amount")]
    amount: String,
    #[tabled(rename = "Tax")]
    tax: String,
}

impl TaxCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let config = TaxConfiguration::resolve(load_tax_config(self.tax_config.as_deref())?)?;
        let computation = compute_tax(self.net_profit, &config);
        let after_tax = self.net_profit - computation.estimated_tax;

        if self.json {
            let output = TaxOutput {
                net_profit: self.net_profit,
                exemption_threshold: config.exemption_threshold,
                computation: &computation,
                net_profit_after_tax: after_tax,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        println!();
        println!("TAX ESTIMATE");
        println!(
            "  Net profit: {} | Exempt: {} | Taxable: {}",
            format_naira(self.net_profit),
            format_naira(config.exemption_threshold),
            format_naira(computation.taxable_income)
        );
        println!();

        if !computation.slices.is_empty() {
            let rows: Vec<BracketRow> = computation
                .slices
                .iter()
                .map(|s| BracketRow {
                    bracket: s.index + 1,
                    rate: format_rate(s.rate),
                    amount: format_naira(s.amount),
                    tax: format_naira(s.tax),
                })
                .collect();
            let table = Table::new(rows)
                .with(Style::rounded())
                .with(Modify::new(Rows::new(1..)).with(Alignment::right()))
                .to_string();
            println!("{}", table);
            println!();
        }

        println!("ESTIMATED TAX: {}", format_naira(computation.estimated_tax));
        println!("NET PROFIT AFTER TAX: {}", format_naira(after_tax));
        println!();
        Ok(())
    }
}
