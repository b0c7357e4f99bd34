use super::transaction::{BusinessFlag, Transaction};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

/// Raw magnitude: `naira_value`, else `amount`, else zero
pub fn base_amount(tx: &Transaction) -> Decimal {
    tx.naira_value
        .or(tx.amount)
        .unwrap_or(Decimal::ZERO)
        .abs()
}

/// Monetary contribution of a transaction to P&L.
///
/// Mixed-use expenses only count for their deductible share. The result is
/// never negative and never exceeds the raw magnitude.
pub fn effective_amount(tx: &Transaction) -> Decimal {
    let base = base_amount(tx);
    if tx.business_flag == Some(BusinessFlag::Mixed) && !tx.is_income {
        let pct = tx
            .deductible_percentage
            .unwrap_or(dec!(100))
            .clamp(Decimal::ZERO, dec!(100));
        base * (pct / dec!(100))
    } else {
        base
    }
}
