use rust_decimal::Decimal;

use crate::decimal::Money;
use crate::errors::{AdvanceError, Result};
use crate::types::LoanTerms;

/// compounding periods per year
pub const MONTHLY_COMPOUNDING: u32 = 12;

/// (1 + rate)^periods by repeated multiplication, failing instead of overflowing
pub fn compound_factor(period_rate: Decimal, periods: u32) -> Result<Decimal> {
    let base = Decimal::ONE + period_rate;
    let mut factor = Decimal::ONE;
    for _ in 0..periods {
        factor = factor
            .checked_mul(base)
            .ok_or_else(|| AdvanceError::overflow("compound factor"))?;
    }
    Ok(factor)
}

/// projects the total repayable on a loan under monthly compounding
#[derive(Debug, Clone, Copy, Default)]
pub struct InterestProjector;

impl InterestProjector {
    pub fn new() -> Self {
        Self
    }

    /// `P * (1 + r/12)^(12 * t)` with `t` in years, rounded to cents
    pub fn total_repayable(&self, terms: &LoanTerms) -> Result<Money> {
        terms.validate()?;

        if terms.annual_rate.is_zero() {
            return Ok(terms.principal);
        }

        // n * t with t = months / 12 is the month count itself
        let period_rate = terms.annual_rate.as_decimal() / Decimal::from(MONTHLY_COMPOUNDING);
        let factor = compound_factor(period_rate, terms.term_months)?;
        let total = terms
            .principal
            .as_decimal()
            .checked_mul(factor)
            .ok_or_else(|| AdvanceError::overflow("total repayable"))?;

        Ok(Money::from_decimal_cents(total))
    }

    /// interest portion of the projection
    pub fn total_interest(&self, terms: &LoanTerms) -> Result<Money> {
        Ok(self.total_repayable(terms)? - terms.principal)
    }
}
