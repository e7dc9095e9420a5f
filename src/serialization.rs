//! json wire types for the advance calculation and loan lookup
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::advance::PayFrequency;
use crate::decimal::{Money, Rate};
use crate::engine::AdvanceOutcome;
use crate::errors::{AdvanceError, Result};
use crate::payments::AmortizationEntry;
use crate::types::{AdvanceRequest, LoanId, LoanTerms};

/// incoming calculation request as sent by a client
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvanceRequestPayload {
    pub gross_salary: Money,
    pub pay_frequency: String,
    pub advance_amount: Money,
    #[serde(default)]
    pub loan_amount: Option<Money>,
    /// annual percentage, 5 means 5%
    #[serde(default, with = "rust_decimal::serde::float_option")]
    pub interest_rate: Option<Decimal>,
    /// months
    #[serde(default)]
    pub loan_term: Option<i64>,
    #[serde(default)]
    pub include_amortization: Option<bool>,
}

impl TryFrom<AdvanceRequestPayload> for AdvanceRequest {
    type Error = AdvanceError;

    fn try_from(payload: AdvanceRequestPayload) -> Result<Self> {
        let pay_frequency: PayFrequency = payload.pay_frequency.parse()?;

        let loan = match (payload.loan_amount, payload.interest_rate, payload.loan_term) {
            (None, None, None) => None,
            (Some(principal), Some(rate), Some(term)) => {
                let term_months = u32::try_from(term)
                    .ok()
                    .filter(|months| *months > 0)
                    .ok_or_else(|| {
                        AdvanceError::loan_terms(format!("loan term must be a positive number of months, got {}", term))
                    })?;
                Some(LoanTerms::new(principal, Rate::from_percent(rate), term_months))
            }
            _ => {
                return Err(AdvanceError::loan_terms(
                    "loan amount, interest rate and loan term must be provided together",
                ))
            }
        };

        let request = AdvanceRequest {
            gross_salary: payload.gross_salary,
            pay_frequency,
            advance_amount: payload.advance_amount,
            loan,
            include_amortization: payload.include_amortization.unwrap_or(false),
        };
        request.validate()?;
        Ok(request)
    }
}

impl From<&AdvanceRequest> for AdvanceRequestPayload {
    fn from(request: &AdvanceRequest) -> Self {
        Self {
            gross_salary: request.gross_salary,
            pay_frequency: request.pay_frequency.to_string(),
            advance_amount: request.advance_amount,
            loan_amount: request.loan.map(|l| l.principal),
            interest_rate: request.loan.map(|l| l.annual_rate.as_percentage()),
            loan_term: request.loan.map(|l| i64::from(l.term_months)),
            include_amortization: Some(request.include_amortization),
        }
    }
}

/// decode and validate a json request body
pub fn decode_request(json: &str) -> Result<AdvanceRequest> {
    let payload: AdvanceRequestPayload = serde_json::from_str(json)?;
    AdvanceRequest::try_from(payload)
}

/// calculation result as returned to a client; amounts are rounded to cents
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceResponse {
    pub eligible: bool,
    pub max_advance: Money,
    pub approved_amount: Money,
    pub fee: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_repayable: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amortization_schedule: Option<Vec<AmortizationEntry>>,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loan_id: Option<String>,
}

impl AdvanceResponse {
    pub fn from_outcome(outcome: &AdvanceOutcome, loan_id: Option<LoanId>) -> Self {
        AdvanceResponse {
            eligible: outcome.eligibility.eligible,
            max_advance: outcome.eligibility.max_advance.round_cents(),
            approved_amount: outcome.fee.approved_amount.round_cents(),
            fee: outcome.fee.fee,
            total_repayable: outcome.total_repayable,
            amortization_schedule: outcome
                .amortization
                .as_ref()
                .map(|schedule| schedule.entries.clone()),
            message: outcome.message.clone(),
            loan_id: loan_id.map(|id| id.to_string()),
        }
    }

    pub fn to_json(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// convert to pretty-printed json string
    pub fn to_json_pretty(&self) -> std::result::Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
