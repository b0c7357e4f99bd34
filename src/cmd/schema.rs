//! Schema command - print expected input formats

use clap::Args;
use pltax::core::{TaxConfiguration, Transaction, TransactionInput};
use schemars::schema_for;

#[derive(Args, Debug)]
pub struct SchemaCommand {
    /// What to print
    #[arg(value_enum, default_value = "json-schema")]
    format: SchemaFormat,
}

#[derive(Debug, Clone, Copy, clap::ValueEnum)]
pub enum SchemaFormat {
    /// JSON Schema for the transactions input
    JsonSchema,
    /// JSON Schema for the tax configuration file
    TaxConfigSchema,
    /// CSV header row with column names
    CsvHeader,
    /// CSV column descriptions
    CsvFields,
}

impl SchemaCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        match self.format {
            SchemaFormat::JsonSchema => {
                let schema = schema_for!(TransactionInput);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::TaxConfigSchema => {
                let schema = schema_for!(TaxConfiguration);
                println!("{}", serde_json::to_string_pretty(&schema)?);
            }
            SchemaFormat::CsvHeader => println!("{}", Transaction::csv_header()),
            SchemaFormat::CsvFields => self.print_csv_fields(),
        }
        Ok(())
    }

    fn print_csv_fields(&self) {
        println!("CSV Input Format");
        println!("================");
        println!();
        for field in Transaction::csv_schema() {
            let req = if field.required { "required" } else { "optional" };
            println!("{:24} ({:8})  {}", field.name, req, field.description);
        }
        println!();
        println!("Malformed values are treated as absent rather than rejected.");
    }
}
