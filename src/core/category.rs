use schemars::JsonSchema;
use serde::Serialize;
use std::collections::BTreeMap;

pub const DEFAULT_INCOME_CATEGORY: &str = "other_income";
pub const DEFAULT_EXPENSE_CATEGORY: &str = "miscellaneous";

/// Whether a category collects income or expenses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    Income,
    Expense,
}

/// Built-in category catalogue: (key, kind, label)
const BUILTIN_CATEGORIES: &[(&str, CategoryKind, &str)] = &[
    ("salary", CategoryKind::Income, "Salary"),
    ("business_income", CategoryKind::Income, "Business Income"),
    ("freelance", CategoryKind::Income, "Freelance / Contract"),
    ("consulting", CategoryKind::Income, "Consulting"),
    ("sales", CategoryKind::Income, "Sales"),
    ("rental_income", CategoryKind::Income, "Rental Income"),
    ("investment", CategoryKind::Income, "Investment Income"),
    ("dividends", CategoryKind::Income, "Dividends"),
    ("interest", CategoryKind::Income, "Interest"),
    ("grants", CategoryKind::Income, "Grants"),
    (DEFAULT_INCOME_CATEGORY, CategoryKind::Income, "Other Income"),
    ("rent", CategoryKind::Expense, "Rent"),
    ("utilities", CategoryKind::Expense, "Utilities"),
    ("salaries_wages", CategoryKind::Expense, "Salaries & Wages"),
    ("office_supplies", CategoryKind::Expense, "Office Supplies"),
    ("equipment", CategoryKind::Expense, "Equipment"),
    ("software", CategoryKind::Expense, "Software & Subscriptions"),
    ("internet_phone", CategoryKind::Expense, "Internet & Phone"),
    ("transport", CategoryKind::Expense, "Transport"),
    ("travel", CategoryKind::Expense, "Travel"),
    ("marketing", CategoryKind::Expense, "Marketing & Advertising"),
    ("professional_fees", CategoryKind::Expense, "Professional Fees"),
    ("bank_charges", CategoryKind::Expense, "Bank Charges"),
    ("insurance", CategoryKind::Expense, "Insurance"),
    ("repairs_maintenance", CategoryKind::Expense, "Repairs & Maintenance"),
    ("training", CategoryKind::Expense, "Training & Education"),
    ("taxes_levies", CategoryKind::Expense, "Taxes & Levies"),
    ("food", CategoryKind::Expense, "Food & Meals"),
    (DEFAULT_EXPENSE_CATEGORY, CategoryKind::Expense, "Miscellaneous"),
];

/// Immutable lookup from category key to human-readable label.
///
/// Keys outside the table pass through unchanged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryLabels {
    labels: BTreeMap<String, String>,
}

/// One row of the catalogue, for listing
#[derive(Debug, Clone, Serialize)]
pub struct CategoryEntry {
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kind: Option<CategoryKind>,
    pub label: String,
}

impl Default for CategoryLabels {
    fn default() -> Self {
        Self::builtin()
    }
}

impl CategoryLabels {
    pub fn builtin() -> Self {
        let labels = BUILTIN_CATEGORIES
            .iter()
            .map(|(key, _, label)| (key.to_string(), label.to_string()))
            .collect();
        CategoryLabels { labels }
    }

    /// Built-in labels with `overrides` layered on top (new keys are added).
    pub fn with_overrides<I>(overrides: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut labels = Self::builtin().labels;
        for (key, label) in overrides {
            labels.insert(key.trim().to_lowercase(), label);
        }
        CategoryLabels { labels }
    }

    pub fn label<'a>(&'a self, key: &'a str) -> &'a str {
        self.labels.get(key).map_or(key, String::as_str)
    }

    /// Kind of a built-in category, `None` for keys outside the catalogue
    pub fn kind_of(key: &str) -> Option<CategoryKind> {
        BUILTIN_CATEGORIES
            .iter()
            .find(|(k, _, _)| *k == key)
            .map(|(_, kind, _)| *kind)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.labels.contains_key(key)
    }

    /// Built-in entries first in catalogue order, then any extra keys
    pub fn entries(&self) -> Vec<CategoryEntry> {
        let builtin = BUILTIN_CATEGORIES.iter().map(|(key, kind, _)| CategoryEntry {
            key: key.to_string(),
            kind: Some(*kind),
            label: self.label(key).to_string(),
        });
        let extra = self
            .labels
            .iter()
            .filter(|(key, _)| Self::kind_of(key).is_none())
            .map(|(key, label)| CategoryEntry {
                key: key.clone(),
                kind: None,
                label: label.clone(),
            });
        builtin.chain(extra).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_keys_have_labels() {
        let labels = CategoryLabels::builtin();
        assert_eq!(labels.label("salary"), "Salary");
        assert_eq!(labels.label("salaries_wages"), "Salaries & Wages");
        assert_eq!(labels.label(DEFAULT_INCOME_CATEGORY), "Other Income");
        assert_eq!(labels.label(DEFAULT_EXPENSE_CATEGORY), "Miscellaneous");
    }

    #[test]
    fn unknown_keys_pass_through() {
        let labels = CategoryLabels::default();
        assert_eq!(labels.label("crypto_mining"), "crypto_mining");
        assert!(!labels.contains("crypto_mining"));
    }

    #[test]
    fn overrides_replace_and_extend() {
        let labels = CategoryLabels::with_overrides([
            ("rent".to_string(), "Shop Rent".to_string()),
            ("Crypto_Mining".to_string(), "Crypto Mining".to_string()),
        ]);
        assert_eq!(labels.label("rent"), "Shop Rent");
        assert_eq!(labels.label("crypto_mining"), "Crypto Mining");
        assert_eq!(labels.label("salary"), "Salary");

        let entries = labels.entries();
        assert_eq!(entries.len(), BUILTIN_CATEGORIES.len() + 1);
        let extra = entries.last().unwrap();
        assert_eq!(extra.key, "crypto_mining");
        assert_eq!(extra.kind, None);
    }

    #[test]
    fn kinds_of_builtin_categories() {
        assert_eq!(CategoryLabels::kind_of("salary"), Some(CategoryKind::Income));
        assert_eq!(CategoryLabels::kind_of("rent"), Some(CategoryKind::Expense));
        assert_eq!(CategoryLabels::kind_of("unknown"), None);
    }
}
