use rust_decimal::Decimal;

/// Caller-level misuse detected at the engine boundary.
#[derive(Debug, Clone, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid configuration: unknown period kind '{0}' (expected monthly, quarterly or annual)")]
    UnknownPeriodKind(String),
    #[error("invalid configuration: unknown inclusion policy '{0}' (expected opt-out or opt-in)")]
    UnknownInclusionPolicy(String),
    #[error("invalid configuration: bracket {index} has rate {rate}, expected a fraction in [0, 1]")]
    InvalidRate { index: usize, rate: Decimal },
    #[error("invalid configuration: bracket {index} has negative width {width}")]
    NegativeWidth { index: usize, width: Decimal },
    #[error("invalid configuration: negative exemption threshold {0}")]
    NegativeExemption(Decimal),
}
