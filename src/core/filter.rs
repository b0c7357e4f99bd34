use super::error::ConfigError;
use super::transaction::{BusinessFlag, Transaction};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which transactions count toward business P&L.
///
/// The same policy is applied to the windowed aggregation and to the monthly
/// series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case")]
pub enum InclusionPolicy {
    /// Everything except transactions flagged `personal` (unset counts)
    #[default]
    OptOut,
    /// Only transactions flagged `business` or `mixed`
    OptIn,
}

impl InclusionPolicy {
    pub fn is_business_relevant(self, tx: &Transaction) -> bool {
        match self {
            InclusionPolicy::OptOut => tx.business_flag != Some(BusinessFlag::Personal),
            InclusionPolicy::OptIn => matches!(
                tx.business_flag,
                Some(BusinessFlag::Business | BusinessFlag::Mixed)
            ),
        }
    }
}

impl FromStr for InclusionPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "opt-out" | "opt_out" | "optout" => Ok(InclusionPolicy::OptOut),
            "opt-in" | "opt_in" | "optin" => Ok(InclusionPolicy::OptIn),
            other => Err(ConfigError::UnknownInclusionPolicy(other.to_string())),
        }
    }
}

impl fmt::Display for InclusionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InclusionPolicy::OptOut => write!(f, "opt-out"),
            InclusionPolicy::OptIn => write!(f, "opt-in"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flagged(flag: Option<BusinessFlag>) -> Transaction {
        Transaction {
            business_flag: flag,
            ..Default::default()
        }
    }

    #[test]
    fn opt_out_excludes_only_personal() {
        let policy = InclusionPolicy::OptOut;
        assert!(policy.is_business_relevant(&flagged(None)));
        assert!(policy.is_business_relevant(&flagged(Some(BusinessFlag::Business))));
        assert!(policy.is_business_relevant(&flagged(Some(BusinessFlag::Mixed))));
        assert!(!policy.is_business_relevant(&flagged(Some(BusinessFlag::Personal))));
    }

    #[test]
    fn opt_in_requires_business_or_mixed() {
        let policy = InclusionPolicy::OptIn;
        assert!(!policy.is_business_relevant(&flagged(None)));
        assert!(policy.is_business_relevant(&flagged(Some(BusinessFlag::Business))));
        assert!(policy.is_business_relevant(&flagged(Some(BusinessFlag::Mixed))));
        assert!(!policy.is_business_relevant(&flagged(Some(BusinessFlag::Personal))));
    }

    #[test]
    fn default_policy_is_opt_out() {
        assert_eq!(InclusionPolicy::default(), InclusionPolicy::OptOut);
    }

    #[test]
    fn parse_policy() {
        assert_eq!("opt-in".parse::<InclusionPolicy>(), Ok(InclusionPolicy::OptIn));
        assert_eq!(" Opt-Out ".parse::<InclusionPolicy>(), Ok(InclusionPolicy::OptOut));
        assert_eq!(
            "sometimes".parse::<InclusionPolicy>(),
            Err(ConfigError::UnknownInclusionPolicy("sometimes".to_string()))
        );
    }
}
