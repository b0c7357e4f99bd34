//! Categories command - category keys and their display labels

use super::load_labels;
use clap::Args;
use pltax::core::CategoryKind;
use std::path::PathBuf;
use tabled::{settings::Style, Table, Tabled};

#[derive(Args, Debug)]
pub struct CategoriesCommand {
    /// Category label overrides JSON ({ "key": "label" })
    #[arg(long)]
    labels: Option<PathBuf>,

    /// Output as JSON instead of a formatted table
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Tabled)]
struct CategoryRow {
    #[tabled(rename = "Key")]
    key: String,
    #[tabled(rename = "Kind")]
    kind: &'static str,
    #[tabled(rename = "Label")]
    label: String,
}

impl CategoriesCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let entries = load_labels(self.labels.as_deref())?.entries();

        if self.json {
            println!("{}", serde_json::to_string_pretty(&entries)?);
            return Ok(());
        }

        let rows: Vec<CategoryRow> = entries
            .into_iter()
            .map(|e| CategoryRow {
                key: e.key,
                kind: match e.kind {
                    Some(CategoryKind::Income) => "income",
                    Some(CategoryKind::Expense) => "expense",
                    None => "custom",
                },
                label: e.label,
            })
            .collect();
        println!("{}", Table::new(rows).with(Style::rounded()));
        Ok(())
    }
}
