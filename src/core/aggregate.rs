use super::amount::effective_amount;
use super::transaction::Transaction;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::BTreeMap;

/// Effective amounts summed per category, split by income and expense
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, JsonSchema)]
pub struct CategoryTotals {
    #[schemars(with = "BTreeMap<String, f64>")]
    pub income: BTreeMap<String, Decimal>,
    #[schemars(with = "BTreeMap<String, f64>")]
    pub expenses: BTreeMap<String, Decimal>,
    #[schemars(with = "f64")]
    pub total_income: Decimal,
    #[schemars(with = "f64")]
    pub total_expenses: Decimal,
    /// Number of transactions folded in
    pub count: usize,
}

impl CategoryTotals {
    pub fn add(&mut self, tx: &Transaction) {
        let amount = effective_amount(tx);
        let key = tx.category_key().to_string();
        let (categories, total) = if tx.is_income {
            (&mut self.income, &mut self.total_income)
        } else {
            (&mut self.expenses, &mut self.total_expenses)
        };
        let entry = categories.entry(key).or_insert(Decimal::ZERO);
        *entry = capped_add(*entry, amount);
        *total = capped_add(*total, amount);
        self.count += 1;
    }

    pub fn net_profit(&self) -> Decimal {
        self.total_income - self.total_expenses
    }
}

/// Sums stop at `Decimal::MAX` instead of overflowing.
fn capped_add(sum: Decimal, amount: Decimal) -> Decimal {
    sum.checked_add(amount).unwrap_or_else(|| {
        log::warn!("Total exceeds {}, capping", Decimal::MAX);
        Decimal::MAX
    })
}

/// Fold transactions into per-category totals. Input order does not matter.
pub fn aggregate<'a, I>(transactions: I) -> CategoryTotals
where
    I: IntoIterator<Item = &'a Transaction>,
{
    transactions
        .into_iter()
        .fold(CategoryTotals::default(), |mut totals, tx| {
            totals.add(tx);
            totals
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::transaction::BusinessFlag;
    use rust_decimal_macros::dec;

    fn income(category: Option<&str>, amount: Decimal) -> Transaction {
        Transaction {
            amount: Some(amount),
            is_income: true,
            category: category.map(str::to_string),
            ..Default::default()
        }
    }

    fn expense(category: Option<&str>, amount: Decimal) -> Transaction {
        Transaction {
            amount: Some(amount),
            category: category.map(str::to_string),
            ..Default::default()
        }
    }

    #[test]
    fn sums_per_category() {
        let txs = vec![
            income(Some("sales"), dec!(1000)),
            income(Some("sales"), dec!(2500.50)),
            income(Some("consulting"), dec!(300)),
            expense(Some("rent"), dec!(800)),
            expense(Some("rent"), dec!(200)),
        ];
        let totals = aggregate(&txs);
        assert_eq!(totals.income["sales"], dec!(3500.50));
        assert_eq!(totals.income["consulting"], dec!(300));
        assert_eq!(totals.expenses["rent"], dec!(1000));
        assert_eq!(totals.total_income, dec!(3800.50));
        assert_eq!(totals.total_expenses, dec!(1000));
        assert_eq!(totals.net_profit(), dec!(2800.50));
        assert_eq!(totals.count, 5);
    }

    #[test]
    fn missing_category_uses_defaults() {
        let txs = vec![income(None, dec!(10)), expense(None, dec!(4))];
        let totals = aggregate(&txs);
        assert_eq!(totals.income["other_income"], dec!(10));
        assert_eq!(totals.expenses["miscellaneous"], dec!(4));
    }

    #[test]
    fn totals_equal_sum_of_map_values() {
        let txs = vec![
            income(Some("salary"), dec!(0.1)),
            income(Some("interest"), dec!(0.2)),
            expense(Some("food"), dec!(0.3)),
            Transaction {
                business_flag: Some(BusinessFlag::Mixed),
                deductible_percentage: Some(dec!(33)),
                ..expense(Some("internet_phone"), dec!(1000))
            },
        ];
        let totals = aggregate(&txs);
        assert_eq!(totals.total_income, totals.income.values().copied().sum::<Decimal>());
        assert_eq!(totals.total_expenses, totals.expenses.values().copied().sum::<Decimal>());
        assert_eq!(totals.total_expenses, dec!(330.3));
    }

    #[test]
    fn order_independent() {
        let mut txs = vec![
            income(Some("sales"), dec!(1.11)),
            expense(Some("rent"), dec!(2.22)),
            income(Some("sales"), dec!(3.33)),
            expense(Some("travel"), dec!(4.44)),
        ];
        let forward = aggregate(&txs);
        txs.reverse();
        assert_eq!(aggregate(&txs), forward);
    }

    #[test]
    fn empty_input_is_zero() {
        let totals = aggregate(&[] as &[Transaction]);
        assert!(totals.income.is_empty());
        assert!(totals.expenses.is_empty());
        assert_eq!(totals.net_profit(), Decimal::ZERO);
        assert_eq!(totals.count, 0);
    }

    #[test]
    fn totals_cap_at_decimal_max() {
        let txs = vec![
            expense(Some("rent"), Decimal::MAX),
            expense(Some("rent"), dec!(1)),
            expense(Some("travel"), dec!(5)),
        ];
        let totals = aggregate(&txs);
        assert_eq!(totals.expenses["rent"], Decimal::MAX);
        assert_eq!(totals.expenses["travel"], dec!(5));
        assert_eq!(totals.total_expenses, Decimal::MAX);
        assert_eq!(totals.net_profit(), -Decimal::MAX);
    }
}
