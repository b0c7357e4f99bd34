use super::aggregate::{aggregate, CategoryTotals};
use super::filter::InclusionPolicy;
use super::period::DateWindow;
use super::transaction::Transaction;
use chrono::Datelike;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;

/// Business totals for one calendar month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct MonthlyEntry {
    /// Short month name, e.g. "Jan"
    pub month: String,
    /// 1-based month number
    pub month_number: u32,
    #[schemars(with = "f64")]
    pub income: Decimal,
    #[schemars(with = "f64")]
    pub expenses: Decimal,
    #[schemars(with = "f64")]
    pub profit: Decimal,
}

impl MonthlyEntry {
    fn new(month_number: u32, label: String, totals: &CategoryTotals) -> Self {
        MonthlyEntry {
            month: label,
            month_number,
            income: totals.total_income,
            expenses: totals.total_expenses,
            profit: totals.net_profit(),
        }
    }
}

/// Twelve calendar-month aggregates for `year`, regardless of the report period.
///
/// Runs over the full transaction set; only the inclusion policy applies.
pub fn monthly_series(
    transactions: &[Transaction],
    year: i32,
    policy: InclusionPolicy,
) -> Vec<MonthlyEntry> {
    let relevant: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| policy.is_business_relevant(tx))
        .filter(|tx| tx.date.is_some_and(|d| d.year() == year))
        .collect();

    (1..=12)
        .map(|month| match DateWindow::month(year, month) {
            Some(window) => {
                let totals = aggregate(
                    relevant
                        .iter()
                        .copied()
                        .filter(|tx| window.contains(tx.date)),
                );
                MonthlyEntry::new(month, window.start.format("%b").to_string(), &totals)
            }
            None => MonthlyEntry::new(month, format!("{month:02}"), &CategoryTotals::default()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::BusinessFlag;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn tx(date: Option<&str>, amount: Decimal, is_income: bool) -> Transaction {
        Transaction {
            date: date.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            amount: Some(amount),
            is_income,
            ..Default::default()
        }
    }

    #[test]
    fn always_twelve_months() {
        let series = monthly_series(&[], 2024, InclusionPolicy::OptOut);
        assert_eq!(series.len(), 12);
        assert_eq!(series[0].month, "Jan");
        assert_eq!(series[11].month, "Dec");
        assert!(series.iter().all(|m| m.income.is_zero() && m.expenses.is_zero()));
        let numbers: Vec<u32> = series.iter().map(|m| m.month_number).collect();
        assert_eq!(numbers, (1..=12).collect::<Vec<_>>());
    }

    #[test]
    fn buckets_by_calendar_month() {
        let txs = vec![
            tx(Some("2024-01-31"), dec!(100), true),
            tx(Some("2024-02-01"), dec!(50), true),
            tx(Some("2024-02-29"), dec!(20), false),
            tx(Some("2024-12-31"), dec!(7), false),
        ];
        let series = monthly_series(&txs, 2024, InclusionPolicy::OptOut);
        assert_eq!(series[0].income, dec!(100));
        assert_eq!(series[1].income, dec!(50));
        assert_eq!(series[1].expenses, dec!(20));
        assert_eq!(series[1].profit, dec!(30));
        assert_eq!(series[11].expenses, dec!(7));
        assert_eq!(series[11].profit, dec!(-7));
    }

    #[test]
    fn other_years_and_undated_rows_excluded() {
        let txs = vec![
            tx(Some("2023-06-15"), dec!(999), true),
            tx(None, dec!(999), true),
            tx(Some("2024-06-15"), dec!(1), true),
        ];
        let series = monthly_series(&txs, 2024, InclusionPolicy::OptOut);
        let total: Decimal = series.iter().map(|m| m.income).sum();
        assert_eq!(total, dec!(1));
    }

    #[test]
    fn inclusion_policy_applies() {
        let mut personal = tx(Some("2024-03-03"), dec!(500), false);
        personal.business_flag = Some(BusinessFlag::Personal);
        let unflagged = tx(Some("2024-03-04"), dec!(40), false);
        let txs = vec![personal, unflagged];

        let opt_out = monthly_series(&txs, 2024, InclusionPolicy::OptOut);
        assert_eq!(opt_out[2].expenses, dec!(40));

        let opt_in = monthly_series(&txs, 2024, InclusionPolicy::OptIn);
        assert_eq!(opt_in[2].expenses, Decimal::ZERO);
    }

    #[test]
    fn applies_mixed_use_deduction() {
        let mut mixed = tx(Some("2024-08-10"), dec!(10000), false);
        mixed.business_flag = Some(BusinessFlag::Mixed);
        mixed.deductible_percentage = Some(dec!(40));
        let series = monthly_series(&[mixed], 2024, InclusionPolicy::OptOut);
        assert_eq!(series[7].expenses, dec!(4000));
    }
}
