use rust_decimal::Decimal;

use crate::config::EligibilityConfig;
use crate::decimal::Money;
use crate::types::EligibilityResult;

/// decides whether a monthly salary qualifies for an advance
#[derive(Debug, Clone)]
pub struct EligibilityEvaluator {
    config: EligibilityConfig,
}

impl EligibilityEvaluator {
    pub fn new(config: EligibilityConfig) -> Self {
        Self { config }
    }

    /// eligible iff the exact monthly salary meets the threshold; the cap is a
    /// fixed share of the monthly salary, zero when ineligible
    pub fn evaluate(&self, monthly_salary: Decimal) -> EligibilityResult {
        let eligible = monthly_salary >= self.config.min_monthly_salary.as_decimal();
        let max_advance = if eligible {
            Money::from_decimal(monthly_salary * self.config.max_advance_ratio)
        } else {
            Money::ZERO
        };

        EligibilityResult {
            monthly_salary: Money::from_decimal(monthly_salary),
            eligible,
            max_advance,
        }
    }

    pub fn threshold(&self) -> Money {
        self.config.min_monthly_salary
    }
}
