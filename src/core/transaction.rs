use chrono::{DateTime, NaiveDate, NaiveDateTime};
use pltax_derive::CsvSchema;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::de::{self, Deserializer, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::Read;
use std::str::FromStr;

#[derive(Debug, thiserror::Error)]
pub enum TransactionError {
    #[error("invalid transactions JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid transactions CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("expected a JSON array of transactions or an object with a `transactions` array")]
    UnexpectedShape,
}

/// Input root for transaction JSON
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TransactionInput {
    pub transactions: Vec<Transaction>,
}

/// How a transaction relates to the business
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum BusinessFlag {
    Business,
    /// Partly business, partly personal. Expenses are deductible by `deductible_percentage`.
    Mixed,
    Personal,
}

impl BusinessFlag {
    /// Lenient parse, unknown values are `None`.
    pub fn parse(s: &str) -> Option<BusinessFlag> {
        match s.trim().to_lowercase().as_str() {
            "business" => Some(BusinessFlag::Business),
            "mixed" => Some(BusinessFlag::Mixed),
            "personal" => Some(BusinessFlag::Personal),
            _ => None,
        }
    }
}

/// A raw financial transaction as supplied by the storage service.
///
/// Every field is decoded leniently: malformed values become absent rather
/// than failing the whole document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema, CsvSchema)]
pub struct Transaction {
    /// Transaction date (YYYY-MM-DD or RFC3339); unparsable dates are treated as absent
    #[serde(default, deserialize_with = "deserialize_date")]
    #[schemars(with = "Option<String>")]
    pub date: Option<NaiveDate>,
    /// Transaction amount
    #[serde(default, deserialize_with = "deserialize_decimal")]
    #[schemars(with = "Option<f64>")]
    pub amount: Option<Decimal>,
    /// Amount in Naira, takes precedence over amount when present
    #[serde(default, alias = "nairaValue", deserialize_with = "deserialize_decimal")]
    #[schemars(with = "Option<f64>")]
    pub naira_value: Option<Decimal>,
    /// true for income, false for expense
    #[serde(default, alias = "isIncome", deserialize_with = "deserialize_flag")]
    #[schemars(with = "bool")]
    pub is_income: bool,
    /// Category key (e.g. salary, rent); defaults to other_income / miscellaneous
    #[serde(default, deserialize_with = "deserialize_category")]
    #[schemars(with = "Option<String>")]
    pub category: Option<String>,
    /// business, mixed or personal
    #[serde(
        default,
        alias = "businessFlag",
        deserialize_with = "deserialize_business_flag"
    )]
    #[schemars(with = "Option<BusinessFlag>")]
    pub business_flag: Option<BusinessFlag>,
    /// Deductible share (0-100) of a mixed-use expense, defaults to 100
    #[serde(
        default,
        alias = "deductiblePercentage",
        deserialize_with = "deserialize_decimal"
    )]
    #[schemars(with = "Option<f64>")]
    pub deductible_percentage: Option<Decimal>,
    /// Optional description
    #[serde(default)]
    pub description: Option<String>,
}

impl Transaction {
    /// Category key with the income/expense default applied
    pub fn category_key(&self) -> &str {
        match self.category.as_deref() {
            Some(key) => key,
            None if self.is_income => super::category::DEFAULT_INCOME_CATEGORY,
            None => super::category::DEFAULT_EXPENSE_CATEGORY,
        }
    }
}

/// Read transactions from JSON, either a bare array or `{ "transactions": [...] }`
pub fn read_transactions_json<R: Read>(reader: R) -> Result<Vec<Transaction>, TransactionError> {
    let value: serde_json::Value = serde_json::from_reader(reader)?;
    let transactions: Vec<Transaction> = match value {
        serde_json::Value::Array(_) => serde_json::from_value(value)?,
        serde_json::Value::Object(_) => {
            let input: TransactionInput = serde_json::from_value(value)?;
            input.transactions
        }
        _ => return Err(TransactionError::UnexpectedShape),
    };
    log::info!("Read {} transactions (json)", transactions.len());
    Ok(transactions)
}

/// Read transactions from a flat CSV file with a header row
pub fn read_transactions_csv<R: Read>(reader: R) -> Result<Vec<Transaction>, TransactionError> {
    let mut rdr = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);
    let transactions = rdr
        .deserialize()
        .collect::<Result<Vec<Transaction>, csv::Error>>()?;
    log::info!("Read {} transactions (csv)", transactions.len());
    Ok(transactions)
}

pub(crate) fn parse_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(date);
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.date_naive());
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt.date());
        }
    }
    None
}

/// Parse a numeric string, tolerating whitespace, a leading Naira sign and
/// thousands separators. Magnitudes are never negative.
pub(crate) fn parse_decimal(s: &str) -> Option<Decimal> {
    let cleaned: String = s
        .trim()
        .trim_start_matches('₦')
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .ok()
        .map(|d| d.abs())
}

/// Builds a visitor that maps strings, numbers and booleans through the given
/// closures and treats every other shape as absent.
macro_rules! lenient_visitor {
    ($name:ident, $value:ty, $expecting:literal, |$s:ident| $from_str:expr, |$n:ident| $from_num:expr, |$b:ident| $from_bool:expr) => {
        struct $name;

        impl<'de> Visitor<'de> for $name {
            type Value = $value;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str($expecting)
            }

            fn visit_str<E: de::Error>(self, $s: &str) -> Result<Self::Value, E> {
                Ok($from_str)
            }

            fn visit_bool<E: de::Error>(self, $b: bool) -> Result<Self::Value, E> {
                Ok($from_bool)
            }

            fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
                let $n = Decimal::from(v);
                Ok($from_num)
            }

            fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
                let $n = Decimal::from(v);
                Ok($from_num)
            }

            fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
                match Decimal::from_str(&v.to_string()) {
                    Ok($n) => Ok($from_num),
                    Err(_) => Ok(Default::default()),
                }
            }

            fn visit_none<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Default::default())
            }

            fn visit_unit<E: de::Error>(self) -> Result<Self::Value, E> {
                Ok(Default::default())
            }

            fn visit_some<D: Deserializer<'de>>(self, d: D) -> Result<Self::Value, D::Error> {
                d.deserialize_any(self)
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                while seq.next_element::<IgnoredAny>()?.is_some() {}
                Ok(Default::default())
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
                Ok(Default::default())
            }
        }
    };
}

lenient_visitor!(
    DecimalVisitor,
    Option<Decimal>,
    "a number or numeric string",
    |s| {
        let parsed = parse_decimal(s);
        if parsed.is_none() && !s.trim().is_empty() {
            log::debug!("Unparsable amount {:?}, treating as absent", s);
        }
        parsed
    },
    |n| Some(n.abs()),
    |_b| None
);

lenient_visitor!(
    FlagVisitor,
    bool,
    "a boolean",
    |s| matches!(
        s.trim().to_lowercase().as_str(),
        "true" | "yes" | "y" | "1" | "income"
    ),
    |n| !n.is_zero(),
    |b| b
);

lenient_visitor!(
    DateVisitor,
    Option<NaiveDate>,
    "a date string",
    |s| {
        let parsed = parse_date(s);
        if parsed.is_none() && !s.trim().is_empty() {
            log::debug!("Unparsable date {:?}, treating as absent", s);
        }
        parsed
    },
    |_n| None,
    |_b| None
);

lenient_visitor!(
    CategoryVisitor,
    Option<String>,
    "a category key",
    |s| {
        let key = s.trim().to_lowercase();
        (!key.is_empty()).then_some(key)
    },
    |_n| None,
    |_b| None
);

lenient_visitor!(
    BusinessFlagVisitor,
    Option<BusinessFlag>,
    "business, mixed or personal",
    |s| {
        let flag = BusinessFlag::parse(s);
        if flag.is_none() && !s.trim().is_empty() {
            log::debug!("Unknown business flag {:?}, treating as unset", s);
        }
        flag
    },
    |_n| None,
    |_b| None
);

fn deserialize_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DecimalVisitor)
}

fn deserialize_flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(FlagVisitor)
}

fn deserialize_date<'de, D>(deserializer: D) -> Result<Option<NaiveDate>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(DateVisitor)
}

fn deserialize_category<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(CategoryVisitor)
}

fn deserialize_business_flag<'de, D>(deserializer: D) -> Result<Option<BusinessFlag>, D::Error>
where
    D: Deserializer<'de>,
{
    deserializer.deserialize_any(BusinessFlagVisitor)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[test]
    fn reads_bare_json_array() {
        let json = r#"[
            { "date": "2024-05-10", "amount": 5000, "is_income": true, "category": "sales", "business_flag": "business" }
        ]"#;
        let txs = read_transactions_json(json.as_bytes()).unwrap();
        assert_eq!(txs.len(), 1);
        assert_eq!(txs[0].date, Some(date("2024-05-10")));
        assert_eq!(txs[0].amount, Some(dec!(5000)));
        assert!(txs[0].is_income);
        assert_eq!(txs[0].category.as_deref(), Some("sales"));
        assert_eq!(txs[0].business_flag, Some(BusinessFlag::Business));
    }

    #[test]
    fn reads_wrapped_json_with_camel_case_aliases() {
        let json = r#"{ "transactions": [
            { "date": "2024-05-10T09:30:00+01:00", "nairaValue": "12,500.50", "isIncome": false,
              "businessFlag": "Mixed", "deductiblePercentage": 40 }
        ]}"#;
        let txs = read_transactions_json(json.as_bytes()).unwrap();
        assert_eq!(txs.len(), 1);
        let tx = &txs[0];
        assert_eq!(tx.date, Some(date("2024-05-10")));
        assert_eq!(tx.naira_value, Some(dec!(12500.50)));
        assert!(!tx.is_income);
        assert_eq!(tx.business_flag, Some(BusinessFlag::Mixed));
        assert_eq!(tx.deductible_percentage, Some(dec!(40)));
    }

    #[test]
    fn malformed_fields_default_instead_of_failing() {
        let json = r#"[
            { "date": "not a date", "amount": "abc", "is_income": "maybe",
              "category": "  ", "business_flag": "corporate", "deductible_percentage": [1, 2] },
            { "date": null, "amount": null },
            {}
        ]"#;
        let txs = read_transactions_json(json.as_bytes()).unwrap();
        assert_eq!(txs.len(), 3);
        for tx in &txs {
            assert_eq!(tx.date, None);
            assert_eq!(tx.amount, None);
            assert!(!tx.is_income);
            assert_eq!(tx.category, None);
            assert_eq!(tx.business_flag, None);
            assert_eq!(tx.deductible_percentage, None);
        }
    }

    #[test]
    fn negative_amounts_are_magnitudes() {
        let json = r#"[{ "amount": -250 }, { "amount": "-1,000" }]"#;
        let txs = read_transactions_json(json.as_bytes()).unwrap();
        assert_eq!(txs[0].amount, Some(dec!(250)));
        assert_eq!(txs[1].amount, Some(dec!(1000)));
    }

    #[test]
    fn non_array_json_rejected() {
        let err = read_transactions_json("42".as_bytes()).unwrap_err();
        assert!(matches!(err, TransactionError::UnexpectedShape));
    }

    #[test]
    fn reads_csv_with_blank_fields() {
        let csv = "\
date,amount,naira_value,is_income,category,business_flag,deductible_percentage,description
2024-01-15,1000,,true,salary,business,,January pay
2024-02-01,,2500.75,false,rent,mixed,50,
garbage,12,,no,,,,
";
        let txs = read_transactions_csv(csv.as_bytes()).unwrap();
        assert_eq!(txs.len(), 3);

        assert_eq!(txs[0].date, Some(date("2024-01-15")));
        assert_eq!(txs[0].amount, Some(dec!(1000)));
        assert_eq!(txs[0].naira_value, None);
        assert!(txs[0].is_income);
        assert_eq!(txs[0].description.as_deref(), Some("January pay"));

        assert_eq!(txs[1].amount, None);
        assert_eq!(txs[1].naira_value, Some(dec!(2500.75)));
        assert_eq!(txs[1].business_flag, Some(BusinessFlag::Mixed));
        assert_eq!(txs[1].deductible_percentage, Some(dec!(50)));

        assert_eq!(txs[2].date, None);
        assert!(!txs[2].is_income);
        assert_eq!(txs[2].category_key(), "miscellaneous");
    }

    #[test]
    fn category_defaults_depend_on_direction() {
        let income = Transaction {
            is_income: true,
            ..Default::default()
        };
        let expense = Transaction::default();
        assert_eq!(income.category_key(), "other_income");
        assert_eq!(expense.category_key(), "miscellaneous");
    }

    #[test]
    fn parse_date_formats() {
        assert_eq!(parse_date("2024-03-01"), Some(date("2024-03-01")));
        assert_eq!(parse_date("2024-03-01T23:59:59"), Some(date("2024-03-01")));
        assert_eq!(parse_date("2024-03-01 08:00:00"), Some(date("2024-03-01")));
        assert_eq!(parse_date("2024-03-01T08:00:00.123"), Some(date("2024-03-01")));
        assert_eq!(parse_date("2024-03-01T08:00:00Z"), Some(date("2024-03-01")));
        assert_eq!(parse_date("2024-02-30"), None);
        assert_eq!(parse_date(""), None);
    }

    #[test]
    fn parse_decimal_tolerates_formatting() {
        assert_eq!(parse_decimal(" ₦1,234.50 "), Some(dec!(1234.50)));
        assert_eq!(parse_decimal("1e3"), Some(dec!(1000)));
        assert_eq!(parse_decimal("twelve"), None);
        assert_eq!(parse_decimal(""), None);
    }

    #[test]
    fn csv_schema_lists_columns() {
        let header = Transaction::csv_header();
        assert_eq!(
            header,
            "date,amount,naira_value,is_income,category,business_flag,deductible_percentage,description"
        );
        let schema = Transaction::csv_schema();
        assert!(schema.iter().all(|f| !f.required));
        assert!(schema[0].description.contains("YYYY-MM-DD"));
    }
}
