use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::advance::PayFrequency;
use crate::decimal::{Money, Rate};
use crate::errors::{AdvanceError, Result};

/// unique identifier for a recorded loan
pub type LoanId = Uuid;

/// longest accepted loan term, one hundred years of monthly periods
pub const MAX_TERM_MONTHS: u32 = 1_200;

/// optional loan attached to an advance request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanTerms {
    pub principal: Money,
    /// annual rate
    pub annual_rate: Rate,
    pub term_months: u32,
}

impl LoanTerms {
    pub fn new(principal: Money, annual_rate: Rate, term_months: u32) -> Self {
        Self {
            principal,
            annual_rate,
            term_months,
        }
    }

    /// reject non-positive principal, negative rates and terms outside
    /// `1..=MAX_TERM_MONTHS`
    pub fn validate(&self) -> Result<()> {
        if !self.principal.is_positive() {
            return Err(AdvanceError::loan_terms(format!(
                "loan amount must be positive, got {}",
                self.principal
            )));
        }
        if self.annual_rate.is_negative() {
            return Err(AdvanceError::loan_terms(format!(
                "interest rate must not be negative, got {}",
                self.annual_rate
            )));
        }
        if self.term_months == 0 {
            return Err(AdvanceError::loan_terms("loan term must be at least one month"));
        }
        if self.term_months > MAX_TERM_MONTHS {
            return Err(AdvanceError::loan_terms(format!(
                "loan term must not exceed {} months, got {}",
                MAX_TERM_MONTHS, self.term_months
            )));
        }
        Ok(())
    }
}

/// salary advance request, optionally with loan terms
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceRequest {
    pub gross_salary: Money,
    pub pay_frequency: PayFrequency,
    pub advance_amount: Money,
    pub loan: Option<LoanTerms>,
    pub include_amortization: bool,
}

impl AdvanceRequest {
    pub fn new(gross_salary: Money, pay_frequency: PayFrequency, advance_amount: Money) -> Self {
        Self {
            gross_salary,
            pay_frequency,
            advance_amount,
            loan: None,
            include_amortization: false,
        }
    }

    /// attach loan terms for interest projection
    pub fn with_loan(mut self, terms: LoanTerms) -> Self {
        self.loan = Some(terms);
        self
    }

    /// also produce an amortization schedule for the loan
    pub fn with_amortization(mut self) -> Self {
        self.include_amortization = true;
        self
    }

    /// fail fast on anything the calculators cannot handle
    pub fn validate(&self) -> Result<()> {
        if !self.gross_salary.is_positive() {
            return Err(AdvanceError::InvalidAmount {
                field: "gross_salary",
                value: self.gross_salary.to_string(),
            });
        }
        if self.advance_amount.is_negative() {
            return Err(AdvanceError::InvalidAmount {
                field: "advance_amount",
                value: self.advance_amount.to_string(),
            });
        }
        match &self.loan {
            Some(terms) => terms.validate(),
            None if self.include_amortization => Err(AdvanceError::loan_terms(
                "amortization requested without loan amount, interest rate and term",
            )),
            None => Ok(()),
        }
    }
}

/// eligibility decision for a monthly salary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EligibilityResult {
    pub monthly_salary: Money,
    pub eligible: bool,
    pub max_advance: Money,
}

/// approved advance and its fee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeResult {
    pub approved_amount: Money,
    pub fee: Money,
}

impl FeeResult {
    pub const NONE: FeeResult = FeeResult {
        approved_amount: Money::ZERO,
        fee: Money::ZERO,
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn request() -> AdvanceRequest {
        AdvanceRequest::new(Money::from_major(5000), PayFrequency::Monthly, Money::from_major(1000))
    }

    #[test]
    fn test_valid_request() {
        assert!(request().validate().is_ok());
    }

    #[test]
    fn test_salary_must_be_positive() {
        let mut req = request();
        req.gross_salary = Money::ZERO;
        assert!(matches!(
            req.validate(),
            Err(AdvanceError::InvalidAmount { field: "gross_salary", .. })
        ));
    }

    #[test]
    fn test_negative_advance_rejected() {
        let mut req = request();
        req.advance_amount = Money::from_major(-1);
        assert!(matches!(
            req.validate(),
            Err(AdvanceError::InvalidAmount { field: "advance_amount", .. })
        ));
    }

    #[test]
    fn test_zero_advance_allowed() {
        let mut req = request();
        req.advance_amount = Money::ZERO;
        assert!(req.validate().is_ok());
    }

    #[test]
    fn test_amortization_requires_loan() {
        let req = request().with_amortization();
        assert!(matches!(req.validate(), Err(AdvanceError::InvalidLoanTerms { .. })));
    }

    #[test]
    fn test_loan_terms_validation() {
        let ok = LoanTerms::new(Money::from_major(5000), Rate::from_percentage(5), 12);
        assert!(ok.validate().is_ok());

        let zero_rate = LoanTerms::new(Money::from_major(5000), Rate::ZERO, 12);
        assert!(zero_rate.validate().is_ok());

        let longest = LoanTerms::new(Money::from_major(5000), Rate::from_percentage(5), MAX_TERM_MONTHS);
        assert!(longest.validate().is_ok());

        let bad = [
            LoanTerms::new(Money::ZERO, Rate::from_percentage(5), 12),
            LoanTerms::new(Money::from_major(-10), Rate::from_percentage(5), 12),
            LoanTerms::new(Money::from_major(5000), Rate::from_percent(dec!(-1)), 12),
            LoanTerms::new(Money::from_major(5000), Rate::from_percentage(5), 0),
            LoanTerms::new(Money::from_major(5000), Rate::ZERO, MAX_TERM_MONTHS + 1),
            LoanTerms::new(Money::from_major(5000), Rate::from_percentage(5), u32::MAX),
        ];
        for terms in bad {
            assert!(matches!(terms.validate(), Err(AdvanceError::InvalidLoanTerms { .. })));
        }
    }
}
