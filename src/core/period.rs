use super::error::ConfigError;
use chrono::{Datelike, NaiveDate};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Granularity of a P&L report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PeriodKind {
    Monthly,
    Quarterly,
    #[default]
    Annual,
}

impl FromStr for PeriodKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "monthly" | "month" => Ok(PeriodKind::Monthly),
            "quarterly" | "quarter" => Ok(PeriodKind::Quarterly),
            "annual" | "annually" | "yearly" | "year" => Ok(PeriodKind::Annual),
            other => Err(ConfigError::UnknownPeriodKind(other.to_string())),
        }
    }
}

impl fmt::Display for PeriodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PeriodKind::Monthly => write!(f, "monthly"),
            PeriodKind::Quarterly => write!(f, "quarterly"),
            PeriodKind::Annual => write!(f, "annual"),
        }
    }
}

/// Inclusive date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, JsonSchema)]
pub struct DateWindow {
    #[schemars(with = "String")]
    pub start: NaiveDate,
    #[schemars(with = "String")]
    pub end: NaiveDate,
}

impl DateWindow {
    /// Calendar month window, `month` is 1-based
    pub fn month(year: i32, month: u32) -> Option<DateWindow> {
        Self::months(year, month, month)
    }

    fn months(year: i32, first: u32, last: u32) -> Option<DateWindow> {
        let start = NaiveDate::from_ymd_opt(year, first, 1)?;
        let end = (28..=31)
            .rev()
            .find_map(|day| NaiveDate::from_ymd_opt(year, last, day))?;
        Some(DateWindow { start, end })
    }

    /// Undated transactions never match a window
    pub fn contains(&self, date: Option<NaiveDate>) -> bool {
        date.is_some_and(|d| d >= self.start && d <= self.end)
    }
}

/// Window for a period kind anchored at `reference_date`.
///
/// `None` means no date filter: annual reports, or monthly/quarterly without
/// a reference date.
pub fn window_for(kind: PeriodKind, reference_date: Option<NaiveDate>) -> Option<DateWindow> {
    let date = reference_date?;
    match kind {
        PeriodKind::Monthly => DateWindow::month(date.year(), date.month()),
        PeriodKind::Quarterly => {
            let quarter = date.month0() / 3;
            DateWindow::months(date.year(), quarter * 3 + 1, quarter * 3 + 3)
        }
        PeriodKind::Annual => None,
    }
}

/// Period chosen by the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PeriodSelection {
    pub kind: PeriodKind,
    pub reference_date: Option<NaiveDate>,
}

impl PeriodSelection {
    pub fn new(kind: PeriodKind, reference_date: Option<NaiveDate>) -> Self {
        PeriodSelection {
            kind,
            reference_date,
        }
    }

    pub fn window(&self) -> Option<DateWindow> {
        window_for(self.kind, self.reference_date)
    }

    /// Display label, e.g. "May 2024", "Q2 2024" or "All time"
    pub fn label(&self) -> String {
        match (self.kind, self.reference_date) {
            (PeriodKind::Monthly, Some(date)) => date.format("%B %Y").to_string(),
            (PeriodKind::Quarterly, Some(date)) => {
                format!("Q{} {}", date.month0() / 3 + 1, date.year())
            }
            _ => "All time".to_string(),
        }
    }

    /// Year shown by the monthly series: the reference date's year, else `today`'s
    pub fn series_year(&self, today: NaiveDate) -> i32 {
        self.reference_date.unwrap_or(today).year()
    }
}
