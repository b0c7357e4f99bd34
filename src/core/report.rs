//! P&L report assembly

use super::aggregate::aggregate;
use super::error::ConfigError;
use super::filter::InclusionPolicy;
use super::monthly::{monthly_series, MonthlyEntry};
use super::period::{PeriodKind, PeriodSelection};
use super::tax::{compute_tax, BracketSlice, TaxConfiguration};
use super::transaction::Transaction;
use chrono::NaiveDate;
use rust_decimal::Decimal;
use schemars::JsonSchema;
use serde::Serialize;
use std::collections::BTreeMap;

/// The period a report covers
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct ReportPeriod {
    pub kind: PeriodKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub start: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schemars(with = "Option<String>")]
    pub end: Option<NaiveDate>,
    pub label: String,
}

/// Profit & loss for a period with estimated tax
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct PLReport {
    pub period: ReportPeriod,
    #[schemars(with = "BTreeMap<String, f64>")]
    pub income_by_category: BTreeMap<String, Decimal>,
    #[schemars(with = "BTreeMap<String, f64>")]
    pub expenses_by_category: BTreeMap<String, Decimal>,
    #[schemars(with = "f64")]
    pub total_business_income: Decimal,
    #[schemars(with = "f64")]
    pub total_business_expenses: Decimal,
    #[schemars(with = "f64")]
    pub net_profit: Decimal,
    pub is_loss: bool,
    #[schemars(with = "f64")]
    pub taxable_income: Decimal,
    #[schemars(with = "f64")]
    pub estimated_tax: Decimal,
    /// Estimated tax over net profit, zero when there is no profit
    #[schemars(with = "f64")]
    pub effective_tax_rate: Decimal,
    #[schemars(with = "f64")]
    pub net_profit_after_tax: Decimal,
    pub tax_breakdown: Vec<BracketSlice>,
    /// Year of the monthly series
    pub year: i32,
    pub monthly: Vec<MonthlyEntry>,
    /// Business-relevant transactions inside the period
    pub transaction_count: usize,
    pub has_data: bool,
}

/// Builds [`PLReport`]s under one validated tax configuration and inclusion policy.
#[derive(Debug, Clone)]
pub struct ReportAssembler {
    tax: TaxConfiguration,
    policy: InclusionPolicy,
}

impl ReportAssembler {
    /// Validates `tax` (falling back to the default schedule when absent).
    pub fn new(
        tax: Option<TaxConfiguration>,
        policy: InclusionPolicy,
    ) -> Result<Self, ConfigError> {
        Ok(ReportAssembler {
            tax: TaxConfiguration::resolve(tax)?,
            policy,
        })
    }

    pub fn tax_configuration(&self) -> &TaxConfiguration {
        &self.tax
    }

    pub fn policy(&self) -> InclusionPolicy {
        self.policy
    }

    /// Assemble the report. `today` picks the monthly series year when the
    /// selection has no reference date.
    pub fn assemble(
        &self,
        transactions: &[Transaction],
        selection: &PeriodSelection,
        today: NaiveDate,
    ) -> PLReport {
        let window = selection.window();
        let totals = aggregate(
            transactions
                .iter()
                .filter(|tx| self.policy.is_business_relevant(tx))
                .filter(|tx| window.is_none_or(|w| w.contains(tx.date))),
        );

        let net_profit = totals.net_profit();
        let tax = compute_tax(net_profit, &self.tax);
        let effective_tax_rate = if net_profit > Decimal::ZERO {
            tax.estimated_tax / net_profit
        } else {
            Decimal::ZERO
        };

        let year = selection.series_year(today);
        let monthly = monthly_series(transactions, year, self.policy);

        log::info!(
            "{} ({}): {} transactions, income {}, expenses {}, net {}, tax {}",
            selection.label(),
            self.policy,
            totals.count,
            totals.total_income,
            totals.total_expenses,
            net_profit,
            tax.estimated_tax
        );

        PLReport {
            period: ReportPeriod {
                kind: selection.kind,
                start: window.map(|w| w.start),
                end: window.map(|w| w.end),
                label: selection.label(),
            },
            income_by_category: totals.income,
            expenses_by_category: totals.expenses,
            total_business_income: totals.total_income,
            total_business_expenses: totals.total_expenses,
            net_profit,
            is_loss: net_profit < Decimal::ZERO,
            taxable_income: tax.taxable_income,
            estimated_tax: tax.estimated_tax,
            effective_tax_rate,
            net_profit_after_tax: net_profit - tax.estimated_tax,
            tax_breakdown: tax.slices,
            year,
            monthly,
            transaction_count: totals.count,
            has_data: totals.count > 0,
        }
    }
}
