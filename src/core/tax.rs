use super::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Exemption applied when no tax configuration is supplied
pub const DEFAULT_EXEMPTION_THRESHOLD: Decimal = dec!(800000);

/// Width of the income slice a bracket taxes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "Option<Decimal>", into = "Option<Decimal>")]
pub enum BracketWidth {
    Bounded(Decimal),
    /// Consumes all remaining taxable income
    #[default]
    Unbounded,
}

impl From<Option<Decimal>> for BracketWidth {
    fn from(width: Option<Decimal>) -> Self {
        width.map_or(BracketWidth::Unbounded, BracketWidth::Bounded)
    }
}

impl From<BracketWidth> for Option<Decimal> {
    fn from(width: BracketWidth) -> Self {
        match width {
            BracketWidth::Bounded(w) => Some(w),
            BracketWidth::Unbounded => None,
        }
    }
}

/// One slice of a progressive schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxBracket {
    /// Slice width; null or absent means open-ended
    #[serde(default)]
    #[schemars(with = "Option<f64>")]
    pub width: BracketWidth,
    /// Marginal rate as a fraction (0.07 = 7%)
    #[schemars(with = "f64")]
    pub rate: Decimal,
}

impl TaxBracket {
    pub fn bounded(width: Decimal, rate: Decimal) -> Self {
        TaxBracket {
            width: BracketWidth::Bounded(width),
            rate,
        }
    }

    pub fn unbounded(rate: Decimal) -> Self {
        TaxBracket {
            width: BracketWidth::Unbounded,
            rate,
        }
    }
}

/// Exemption threshold plus brackets, consumed strictly in list order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TaxConfiguration {
    #[serde(default = "default_exemption_threshold")]
    #[schemars(with = "f64")]
    pub exemption_threshold: Decimal,
    #[serde(default)]
    pub brackets: Vec<TaxBracket>,
}

fn default_exemption_threshold() -> Decimal {
    DEFAULT_EXEMPTION_THRESHOLD
}

fn default_brackets() -> Vec<TaxBracket> {
    vec![
        TaxBracket::bounded(dec!(300000), dec!(0.07)),
        TaxBracket::bounded(dec!(300000), dec!(0.11)),
        TaxBracket::bounded(dec!(500000), dec!(0.15)),
        TaxBracket::bounded(dec!(500000), dec!(0.19)),
        TaxBracket::bounded(dec!(1600000), dec!(0.21)),
        TaxBracket::unbounded(dec!(0.24)),
    ]
}

impl Default for TaxConfiguration {
    fn default() -> Self {
        TaxConfiguration {
            exemption_threshold: DEFAULT_EXEMPTION_THRESHOLD,
            brackets: default_brackets(),
        }
    }
}

impl TaxConfiguration {
    /// Reject configurations that would produce a nonsensical tax figure
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.exemption_threshold < Decimal::ZERO {
            return Err(ConfigError::NegativeExemption(self.exemption_threshold));
        }
        for (index, bracket) in self.brackets.iter().enumerate() {
            if bracket.rate < Decimal::ZERO || bracket.rate > Decimal::ONE {
                return Err(ConfigError::InvalidRate {
                    index,
                    rate: bracket.rate,
                });
            }
            if let BracketWidth::Bounded(width) = bracket.width {
                if width < Decimal::ZERO {
                    return Err(ConfigError::NegativeWidth { index, width });
                }
            }
        }
        Ok(())
    }

    /// Validate a supplied configuration, or fall back to the default.
    ///
    /// An empty bracket table keeps the supplied exemption threshold and
    /// takes the default brackets.
    pub fn resolve(config: Option<TaxConfiguration>) -> Result<TaxConfiguration, ConfigError> {
        let Some(mut config) = config else {
            return Ok(TaxConfiguration::default());
        };
        config.validate()?;
        if config.brackets.is_empty() {
            log::warn!("Tax configuration has no brackets, using the default table");
            config.brackets = default_brackets();
        }
        Ok(config)
    }
}

/// Tax attributable to one bracket
#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct BracketSlice {
    /// Position in the bracket list (0-based)
    pub index: usize,
    #[schemars(with = "f64")]
    pub rate: Decimal,
    /// Income taxed in this bracket
    #[schemars(with = "f64")]
    pub amount: Decimal,
    #[schemars(with = "f64")]
    pub tax: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, JsonSchema)]
pub struct TaxComputation {
    #[schemars(with = "f64")]
    pub taxable_income: Decimal,
    #[schemars(with = "f64")]
    pub estimated_tax: Decimal,
    pub slices: Vec<BracketSlice>,
}

/// Apply the exemption threshold and progressive brackets to `net_profit`.
///
/// Brackets are walked in list order. The last bracket is always open-ended.
/// An empty bracket list uses the default table.
pub fn compute_tax(net_profit: Decimal, config: &TaxConfiguration) -> TaxComputation {
    let taxable_income = net_profit
        .saturating_sub(config.exemption_threshold)
        .max(Decimal::ZERO);

    let fallback;
    let brackets = if config.brackets.is_empty() {
        fallback = default_brackets();
        &fallback
    } else {
        &config.brackets
    };

    let last = brackets.len() - 1;
    let mut remaining = taxable_income;
    let mut estimated_tax = Decimal::ZERO;
    let mut slices = Vec::new();

    for (index, bracket) in brackets.iter().enumerate() {
        if remaining <= Decimal::ZERO {
            break;
        }
        let amount = match bracket.width {
            BracketWidth::Bounded(width) if index < last => remaining.min(width.max(Decimal::ZERO)),
            _ => remaining,
        };
        let tax = amount * bracket.rate;
        log::debug!(
            "Bracket {}: {} @ {} = {}",
            index,
            amount,
            bracket.rate,
            tax
        );
        estimated_tax += tax;
        remaining -= amount;
        slices.push(BracketSlice {
            index,
            rate: bracket.rate,
            amount,
            tax,
        });
    }

    TaxComputation {
        taxable_income,
        estimated_tax: estimated_tax.max(Decimal::ZERO),
        slices,
    }
}
