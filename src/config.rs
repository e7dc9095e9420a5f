use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

use crate::decimal::{Money, Rate};
use crate::errors::{AdvanceError, Result};

/// advance policy: eligibility threshold, advance cap and fee band
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvancePolicy {
    pub eligibility: EligibilityConfig,
    pub fee: FeeConfig,
}

/// eligibility configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityConfig {
    /// minimum monthly salary, inclusive
    pub min_monthly_salary: Money,
    /// share of the monthly salary that may be advanced
    #[serde(with = "rust_decimal::serde::float")]
    pub max_advance_ratio: Decimal,
}

/// fee configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeConfig {
    pub fee_rate: Rate,
    pub min_fee: Money,
    pub max_fee: Money,
}

impl AdvancePolicy {
    /// $1,000 monthly minimum, 50% cap, 5% fee between $10 and $50
    pub fn standard() -> Self {
        Self {
            eligibility: EligibilityConfig {
                min_monthly_salary: Money::from_major(1_000),
                max_advance_ratio: dec!(0.5),
            },
            fee: FeeConfig {
                fee_rate: Rate::from_percentage(5),
                min_fee: Money::from_major(10),
                max_fee: Money::from_major(50),
            },
        }
    }

    /// parse and validate a policy from json
    pub fn from_json(json: &str) -> Result<Self> {
        let policy: AdvancePolicy =
            serde_json::from_str(json).map_err(|e| AdvanceError::InvalidConfiguration {
                message: e.to_string(),
            })?;
        policy.validate()?;
        Ok(policy)
    }

    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn validate(&self) -> Result<()> {
        let invalid = |message: &str| -> Result<()> {
            Err(AdvanceError::InvalidConfiguration {
                message: message.to_string(),
            })
        };

        if self.eligibility.min_monthly_salary.is_negative() {
            return invalid("minimum monthly salary must not be negative");
        }
        let ratio = self.eligibility.max_advance_ratio;
        if ratio <= Decimal::ZERO || ratio > Decimal::ONE {
            return invalid("max advance ratio must be in (0, 1]");
        }
        if self.fee.fee_rate.is_negative() {
            return invalid("fee rate must not be negative");
        }
        if self.fee.min_fee.is_negative() || self.fee.min_fee > self.fee.max_fee {
            return invalid("fee band must satisfy 0 <= min_fee <= max_fee");
        }
        Ok(())
    }
}

impl Default for AdvancePolicy {
    fn default() -> Self {
        Self::standard()
    }
}
