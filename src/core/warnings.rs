use super::category::CategoryLabels;
use super::transaction::{BusinessFlag, Transaction};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::Serialize;

/// Data quality issues that were defaulted rather than rejected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(tag = "type")]
pub enum Warning {
    /// Date absent or unparsable; excluded from every dated view.
    MissingDate,
    /// Neither `naira_value` nor `amount` present; counted as zero.
    MissingAmount,
    /// Category key outside the label table.
    UnknownCategory { key: String },
    /// Deductible percentage above 100, clamped.
    DeductibleOutOfRange {
        #[schemars(with = "f64")]
        percentage: Decimal,
    },
    /// Deductible percentage only applies to mixed-use expenses.
    IgnoredDeductible,
}

/// A warning tied to a transaction's position in the input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TransactionWarning {
    /// 0-based row index
    pub index: usize,
    pub warning: Warning,
}

pub fn scan_transactions(
    transactions: &[Transaction],
    labels: &CategoryLabels,
) -> Vec<TransactionWarning> {
    transactions
        .iter()
        .enumerate()
        .flat_map(|(index, tx)| {
            transaction_warnings(tx, labels)
                .into_iter()
                .map(move |warning| TransactionWarning { index, warning })
        })
        .collect()
}

fn transaction_warnings(tx: &Transaction, labels: &CategoryLabels) -> Vec<Warning> {
    let mut warnings = Vec::new();
    if tx.date.is_none() {
        warnings.push(Warning::MissingDate);
    }
    if tx.naira_value.is_none() && tx.amount.is_none() {
        warnings.push(Warning::MissingAmount);
    }
    if let Some(key) = tx.category.as_deref() {
        if !labels.contains(key) {
            warnings.push(Warning::UnknownCategory {
                key: key.to_string(),
            });
        }
    }
    if let Some(percentage) = tx.deductible_percentage {
        let mixed_expense = tx.business_flag == Some(BusinessFlag::Mixed) && !tx.is_income;
        if !mixed_expense {
            warnings.push(Warning::IgnoredDeductible);
        } else if percentage > dec!(100) {
            warnings.push(Warning::DeductibleOutOfRange { percentage });
        }
    }
    warnings
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn clean() -> Transaction {
        Transaction {
            date: NaiveDate::from_ymd_opt(2024, 1, 1),
            amount: Some(dec!(100)),
            category: Some("rent".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn clean_transaction_has_no_warnings() {
        assert!(scan_transactions(&[clean()], &CategoryLabels::default()).is_empty());
    }

    #[test]
    fn missing_fields_reported_with_index() {
        let txs = vec![
            clean(),
            Transaction {
                date: None,
                amount: None,
                ..clean()
            },
        ];
        let warnings = scan_transactions(&txs, &CategoryLabels::default());
        assert_eq!(
            warnings,
            vec![
                TransactionWarning {
                    index: 1,
                    warning: Warning::MissingDate
                },
                TransactionWarning {
                    index: 1,
                    warning: Warning::MissingAmount
                },
            ]
        );
    }

    #[test]
    fn unknown_category_respects_injected_labels() {
        let tx = Transaction {
            category: Some("crypto_mining".to_string()),
            ..clean()
        };
        let builtin = scan_transactions(std::slice::from_ref(&tx), &CategoryLabels::default());
        assert_eq!(
            builtin[0].warning,
            Warning::UnknownCategory {
                key: "crypto_mining".to_string()
            }
        );

        let extended = CategoryLabels::with_overrides([(
            "crypto_mining".to_string(),
            "Crypto Mining".to_string(),
        )]);
        assert!(scan_transactions(&[tx], &extended).is_empty());
    }

    #[test]
    fn deductible_percentage_checks() {
        let ignored = Transaction {
            deductible_percentage: Some(dec!(50)),
            business_flag: Some(BusinessFlag::Business),
            ..clean()
        };
        let too_high = Transaction {
            deductible_percentage: Some(dec!(150)),
            business_flag: Some(BusinessFlag::Mixed),
            ..clean()
        };
        let warnings = scan_transactions(&[ignored, too_high], &CategoryLabels::default());
        assert_eq!(warnings[0].warning, Warning::IgnoredDeductible);
        assert_eq!(
            warnings[1].warning,
            Warning::DeductibleOutOfRange {
                percentage: dec!(150)
            }
        );
    }
}
