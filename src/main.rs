use clap::{Parser, Subcommand};

mod cmd;

/// Business profit & loss reporting with estimated income tax
#[derive(Parser, Debug)]
#[command(name = "pltax", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// P&L report for a period, with estimated tax
    Report(cmd::report::ReportCommand),
    /// Income, expenses and profit for each month of a year
    Monthly(cmd::monthly::MonthlyCommand),
    /// Estimate tax for a given net profit
    Tax(cmd::tax::TaxCommand),
    /// List category keys and their display labels
    Categories(cmd::categories::CategoriesCommand),
    /// Check transactions for data quality issues
    Validate(cmd::validate::ValidateCommand),
    /// Print the expected input formats
    Schema(cmd::schema::SchemaCommand),
}

fn main() -> anyhow::Result<()> {
    pretty_env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Command::Report(report) => report.exec(),
        Command::Monthly(monthly) => monthly.exec(),
        Command::Tax(tax) => tax.exec(),
        Command::Categories(categories) => categories.exec(),
        Command::Validate(validate) => validate.exec(),
        Command::Schema(schema) => schema.exec(),
    }
}
