use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::decimal::Money;
use crate::errors::{AdvanceError, Result};
use crate::interest::compound_factor;
use crate::types::LoanTerms;

/// one period of an amortization schedule, rounded to cents
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationEntry {
    pub period: u32,
    pub payment: Money,
    #[serde(rename = "interest")]
    pub interest_portion: Money,
    #[serde(rename = "principal")]
    pub principal_portion: Money,
    #[serde(rename = "balance")]
    pub remaining_balance: Money,
}

/// amortization schedule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AmortizationSchedule {
    pub terms: LoanTerms,
    pub entries: Vec<AmortizationEntry>,
    pub total_payment: Money,
    pub total_interest: Money,
}

impl AmortizationSchedule {
    /// generate the fixed-payment schedule for a loan
    pub fn generate(terms: &LoanTerms) -> Result<Self> {
        AmortizationScheduler::new().schedule(terms)
    }

    /// get entry for a 1-based period
    pub fn get_entry(&self, period: u32) -> Option<&AmortizationEntry> {
        period
            .checked_sub(1)
            .and_then(|index| self.entries.get(index as usize))
    }

    /// balance left after the last period
    pub fn final_balance(&self) -> Money {
        self.entries
            .last()
            .map(|e| e.remaining_balance)
            .unwrap_or(self.terms.principal)
    }

    pub fn total_principal(&self) -> Money {
        self.entries.iter().map(|e| e.principal_portion).sum()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// fixed-payment amortization calculator
///
/// The recurrence runs at full decimal precision. Each emitted entry rounds
/// payment and interest to cents independently and derives the principal as
/// their difference, so `interest + principal == payment` holds exactly per
/// entry. The emitted balance is the rounded full-precision balance floored at
/// zero: it never increases and the last entry reports exactly `0.00`. Summed
/// principal portions may drift from the loan amount by at most one cent per
/// period.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmortizationScheduler;

impl AmortizationScheduler {
    pub fn new() -> Self {
        Self
    }

    /// full-precision fixed monthly payment
    pub fn fixed_payment(&self, terms: &LoanTerms) -> Result<Decimal> {
        terms.validate()?;
        level_payment(terms)
    }

    /// fixed monthly payment rounded to cents
    pub fn monthly_payment(&self, terms: &LoanTerms) -> Result<Money> {
        Ok(Money::from_decimal_cents(self.fixed_payment(terms)?))
    }

    /// calculate full amortization schedule
    pub fn schedule(&self, terms: &LoanTerms) -> Result<AmortizationSchedule> {
        let payment = self.fixed_payment(terms)?;
        let rate = terms.annual_rate.monthly_rate().as_decimal();
        let emitted_payment = Money::from_decimal_cents(payment);

        let mut entries = Vec::with_capacity(terms.term_months as usize);
        let mut balance = terms.principal.as_decimal();

        for period in 1..=terms.term_months {
            let interest = balance * rate;
            let principal = payment - interest;
            balance -= principal;

            let interest_portion = Money::from_decimal_cents(interest);
            entries.push(AmortizationEntry {
                period,
                payment: emitted_payment,
                interest_portion,
                principal_portion: emitted_payment - interest_portion,
                remaining_balance: Money::from_decimal_cents(balance.max(Decimal::ZERO)),
            });
        }

        let total_payment = entries.iter().map(|e| e.payment).sum();
        let total_interest = entries.iter().map(|e| e.interest_portion).sum();

        Ok(AmortizationSchedule {
            terms: *terms,
            entries,
            total_payment,
            total_interest,
        })
    }
}

/// `P * r * (1 + r)^n / ((1 + r)^n - 1)`, or `P / n` without interest
fn level_payment(terms: &LoanTerms) -> Result<Decimal> {
    let principal = terms.principal.as_decimal();
    let months = Decimal::from(terms.term_months);
    let r = terms.annual_rate.monthly_rate().as_decimal();

    if r.is_zero() {
        return Ok(principal / months);
    }

    let compound = compound_factor(r, terms.term_months)?;
    let denominator = compound - Decimal::ONE;
    // a rate too small to move (1 + r) at 28 digits behaves like no interest
    if denominator.is_zero() {
        return Ok(principal / months);
    }

    principal
        .checked_mul(r)
        .and_then(|x| x.checked_mul(compound))
        .and_then(|x| x.checked_div(denominator))
        .ok_or_else(|| AdvanceError::overflow("monthly payment"))
}
