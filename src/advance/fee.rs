use crate::config::FeeConfig;
use crate::decimal::Money;
use crate::types::{EligibilityResult, FeeResult};

/// computes the approved advance and its fee
#[derive(Debug, Clone)]
pub struct FeeCalculator {
    config: FeeConfig,
}

impl FeeCalculator {
    pub fn new(config: FeeConfig) -> Self {
        Self { config }
    }

    /// cap the requested amount by the eligibility result, then charge a fee on it
    pub fn calculate(&self, eligibility: &EligibilityResult, requested: Money) -> FeeResult {
        let approved_amount = if eligibility.eligible {
            requested.min(eligibility.max_advance)
        } else {
            Money::ZERO
        };

        FeeResult {
            approved_amount,
            fee: self.fee_for(approved_amount),
        }
    }

    /// percentage fee clamped into the band, rounded to cents; a zero base pays nothing
    pub fn fee_for(&self, approved_amount: Money) -> Money {
        if !approved_amount.is_positive() {
            return Money::ZERO;
        }

        approved_amount
            .portion(self.config.fee_rate)
            .clamp(self.config.min_fee, self.config.max_fee)
            .round_cents()
    }
}
