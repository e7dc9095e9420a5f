use std::sync::Arc;

use hourglass_rs::SafeTimeProvider;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::advance::{EligibilityEvaluator, FeeCalculator};
use crate::config::AdvancePolicy;
use crate::decimal::Money;
use crate::errors::{AdvanceError, Result};
use crate::interest::InterestProjector;
use crate::ledger::{InMemoryLoanLedger, LoanLedger, LoanRecord, LoanSnapshot};
use crate::payments::{AmortizationSchedule, AmortizationScheduler};
use crate::serialization::{decode_request, AdvanceResponse};
use crate::types::{AdvanceRequest, EligibilityResult, FeeResult, LoanTerms};

/// composite result of one advance calculation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdvanceOutcome {
    pub eligibility: EligibilityResult,
    pub fee: FeeResult,
    pub total_repayable: Option<Money>,
    pub amortization: Option<AmortizationSchedule>,
    pub message: String,
}

/// salary advance engine
///
/// Runs a request through pay period conversion, eligibility, fee, and the
/// optional loan projection, then records eligible outcomes in the ledger.
/// Cloning is cheap and clones share the same ledger.
#[derive(Clone)]
pub struct AdvanceEngine {
    policy: AdvancePolicy,
    eligibility: EligibilityEvaluator,
    fees: FeeCalculator,
    projector: InterestProjector,
    scheduler: AmortizationScheduler,
    ledger: Arc<dyn LoanLedger>,
}

impl AdvanceEngine {
    /// standard policy over a fresh in-memory ledger
    pub fn new() -> Self {
        let policy = AdvancePolicy::standard();
        Self::build(policy, Arc::new(InMemoryLoanLedger::new()))
    }

    /// custom policy and ledger; the policy is validated first
    pub fn with_ledger(policy: AdvancePolicy, ledger: Arc<dyn LoanLedger>) -> Result<Self> {
        policy.validate()?;
        Ok(Self::build(policy, ledger))
    }

    fn build(policy: AdvancePolicy, ledger: Arc<dyn LoanLedger>) -> Self {
        Self {
            eligibility: EligibilityEvaluator::new(policy.eligibility.clone()),
            fees: FeeCalculator::new(policy.fee.clone()),
            projector: InterestProjector::new(),
            scheduler: AmortizationScheduler::new(),
            policy,
            ledger,
        }
    }

    pub fn policy(&self) -> &AdvancePolicy {
        &self.policy
    }

    pub fn ledger(&self) -> &Arc<dyn LoanLedger> {
        &self.ledger
    }

    /// compute the outcome for a request without recording it
    pub fn evaluate(&self, request: &AdvanceRequest) -> Result<AdvanceOutcome> {
        if let Err(err) = request.validate() {
            tracing::debug!(error = %err, "advance request rejected");
            return Err(err);
        }

        let monthly_salary = request.pay_frequency.monthly_amount(request.gross_salary)?;
        let eligibility = self.eligibility.evaluate(monthly_salary);
        tracing::debug!(
            monthly_salary = %eligibility.monthly_salary,
            eligible = eligibility.eligible,
            max_advance = %eligibility.max_advance,
            "eligibility evaluated"
        );

        if !eligibility.eligible {
            return Ok(AdvanceOutcome {
                eligibility,
                fee: FeeResult::NONE,
                total_repayable: None,
                amortization: None,
                message: format!(
                    "Ineligible: Monthly salary is below the minimum threshold of {}.",
                    self.eligibility.threshold().to_currency()
                ),
            });
        }

        let fee = self.fees.calculate(&eligibility, request.advance_amount);

        let (total_repayable, amortization) = match &request.loan {
            Some(terms) => self.project_loan(terms, request.include_amortization)?,
            None => (None, None),
        };

        let mut message = if request.advance_amount > eligibility.max_advance {
            format!(
                "Requested advance ({}) exceeds maximum allowed ({}); approved {}, Fee: {}",
                request.advance_amount.to_currency(),
                eligibility.max_advance.to_currency(),
                fee.approved_amount.to_currency(),
                fee.fee.to_currency()
            )
        } else {
            format!(
                "Advance approved! Amount: {}, Fee: {}",
                fee.approved_amount.to_currency(),
                fee.fee.to_currency()
            )
        };
        if let (Some(total), Some(terms)) = (total_repayable, &request.loan) {
            message.push_str(&format!(
                ". Loan repayable: {} over {} months.",
                total.to_currency(),
                terms.term_months
            ));
        }

        Ok(AdvanceOutcome {
            eligibility,
            fee,
            total_repayable,
            amortization,
            message,
        })
    }

    fn project_loan(
        &self,
        terms: &LoanTerms,
        include_amortization: bool,
    ) -> Result<(Option<Money>, Option<AmortizationSchedule>)> {
        let total = self.projector.total_repayable(terms)?;
        let schedule = if include_amortization {
            Some(self.scheduler.schedule(terms)?)
        } else {
            None
        };
        Ok((Some(total), schedule))
    }

    /// evaluate a request and record it when eligible
    pub fn calculate(
        &self,
        request: AdvanceRequest,
        time_provider: &SafeTimeProvider,
    ) -> Result<AdvanceResponse> {
        let outcome = self.evaluate(&request)?;

        if !outcome.eligibility.eligible {
            return Ok(AdvanceResponse::from_outcome(&outcome, None));
        }

        let snapshot = LoanSnapshot {
            request,
            outcome,
            created_at: time_provider.now(),
        };
        let response_outcome = snapshot.outcome.clone();
        let loan_id = self.ledger.record(snapshot)?;
        tracing::info!(
            %loan_id,
            approved = %response_outcome.fee.approved_amount,
            fee = %response_outcome.fee.fee,
            "advance recorded"
        );

        Ok(AdvanceResponse::from_outcome(&response_outcome, Some(loan_id)))
    }

    /// decode a json body, then calculate
    pub fn calculate_json(
        &self,
        body: &str,
        time_provider: &SafeTimeProvider,
    ) -> Result<AdvanceResponse> {
        let request = decode_request(body)?;
        self.calculate(request, time_provider)
    }

    /// stored record for an opaque loan identifier
    pub fn fetch_record(&self, loan_id: &str) -> Result<LoanRecord> {
        let parsed = Uuid::parse_str(loan_id.trim()).map_err(|_| AdvanceError::NotFound {
            loan_id: loan_id.to_string(),
        })?;
        self.ledger.fetch(parsed)
    }

    /// response previously produced for a loan
    pub fn lookup(&self, loan_id: &str) -> Result<AdvanceResponse> {
        Ok(self.fetch_record(loan_id)?.to_response())
    }
}

impl Default for AdvanceEngine {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::advance::PayFrequency;
    use crate::decimal::Rate;
    use chrono::{TimeZone, Utc};
    use hourglass_rs::TimeSource;
    use rust_decimal_macros::dec;

    fn test_time() -> SafeTimeProvider {
        SafeTimeProvider::new(TimeSource::Test(Utc.with_ymd_and_hms(2024, 3, 1, 9, 30, 0).unwrap()))
    }

    fn engine_with_ledger() -> (AdvanceEngine, Arc<InMemoryLoanLedger>) {
        let ledger = Arc::new(InMemoryLoanLedger::new());
        let engine = AdvanceEngine::with_ledger(AdvancePolicy::standard(), ledger.clone()).unwrap();
        (engine, ledger)
    }

    fn cents(s: &str) -> Money {
        Money::from_str_exact(s).unwrap()
    }

    #[test]
    fn test_monthly_salary_approved_at_fee_ceiling() {
        let (engine, ledger) = engine_with_ledger();
        let request = AdvanceRequest::new(
            Money::from_major(5_000),
            PayFrequency::Monthly,
            Money::from_major(1_000),
        );

        let outcome = engine.evaluate(&request).unwrap();
        assert_eq!(outcome.eligibility.monthly_salary, Money::from_major(5_000));
        assert!(outcome.eligibility.eligible);
        assert_eq!(outcome.eligibility.max_advance, Money::from_major(2_500));
        assert_eq!(outcome.fee.approved_amount, Money::from_major(1_000));
        assert_eq!(outcome.fee.fee, Money::from_major(50));
        assert!(ledger.is_empty().unwrap(), "evaluate must not record");

        let response = engine.calculate(request, &test_time()).unwrap();
        assert!(response.loan_id.is_some());
        assert_eq!(response.message, "Advance approved! Amount: $1,000.00, Fee: $50.00");
        assert_eq!(ledger.len().unwrap(), 1);
    }

    #[test]
    fn test_low_salary_is_ineligible_and_not_recorded() {
        let (engine, ledger) = engine_with_ledger();
        let request = AdvanceRequest::new(
            Money::from_major(800),
            PayFrequency::Monthly,
            Money::from_major(100),
        );

        let response = engine.calculate(request, &test_time()).unwrap();
        assert!(!response.eligible);
        assert_eq!(response.max_advance, Money::ZERO);
        assert_eq!(response.approved_amount, Money::ZERO);
        assert_eq!(response.fee, Money::ZERO);
        assert!(response.loan_id.is_none());
        assert_eq!(
            response.message,
            "Ineligible: Monthly salary is below the minimum threshold of $1,000.00."
        );
        assert!(ledger.is_empty().unwrap());
    }

    #[test]
    fn test_loan_projection_and_schedule() {
        let engine = AdvanceEngine::new();
        let request = AdvanceRequest::new(
            Money::from_major(5_000),
            PayFrequency::Monthly,
            Money::from_major(200),
        )
        .with_loan(LoanTerms::new(Money::from_major(5_000), Rate::from_percentage(5), 12))
        .with_amortization();

        let response = engine.calculate(request, &test_time()).unwrap();
        assert_eq!(response.total_repayable, Some(cents("5255.81")));
        assert_eq!(response.fee, Money::from_major(10));

        let schedule = response.amortization_schedule.as_ref().unwrap();
        assert_eq!(schedule.len(), 12);
        assert_eq!(schedule[0].payment, cents("427.98"));
        assert_eq!(schedule[0].interest_portion, cents("20.83"));
        assert_eq!(schedule[0].principal_portion, cents("407.15"));
        assert_eq!(schedule[0].remaining_balance, cents("4592.85"));
        assert!(response.message.ends_with(". Loan repayable: $5,255.81 over 12 months."));
    }

    #[test]
    fn test_zero_rate_loan() {
        let engine = AdvanceEngine::new();
        let request = AdvanceRequest::new(
            Money::from_major(3_000),
            PayFrequency::Monthly,
            Money::from_major(500),
        )
        .with_loan(LoanTerms::new(Money::from_major(1_200), Rate::ZERO, 12))
        .with_amortization();

        let outcome = engine.evaluate(&request).unwrap();
        assert_eq!(outcome.total_repayable, Some(Money::from_major(1_200)));
        let schedule = outcome.amortization.unwrap();
        assert!(schedule.entries.iter().all(|e| e.payment == Money::from_major(100)));
    }

    #[test]
    fn test_projection_without_schedule() {
        let engine = AdvanceEngine::new();
        let request = AdvanceRequest::new(
            Money::from_major(5_000),
            PayFrequency::Monthly,
            Money::from_major(200),
        )
        .with_loan(LoanTerms::new(Money::from_major(5_000), Rate::from_percentage(5), 12));

        let outcome = engine.evaluate(&request).unwrap();
        assert!(outcome.total_repayable.is_some());
        assert!(outcome.amortization.is_none());
    }

    #[test]
    fn test_request_above_cap_is_capped() {
        let engine = AdvanceEngine::new();
        let request = AdvanceRequest::new(
            Money::from_major(52_000),
            PayFrequency::Annually,
            Money::from_major(5_000),
        );

        let response = engine.calculate(request, &test_time()).unwrap();
        assert!(response.eligible);
        assert_eq!(response.max_advance, cents("2166.67"));
        assert_eq!(response.approved_amount, cents("2166.67"));
        assert_eq!(response.fee, Money::from_major(50));
        assert!(response.message.starts_with("Requested advance ($5,000.00) exceeds maximum allowed ($2,166.67)"));
        assert!(response.loan_id.is_some());
    }

    #[test]
    fn test_weekly_salary_converted_before_eligibility() {
        let engine = AdvanceEngine::new();
        // 240 a week is 1040 a month
        let request = AdvanceRequest::new(
            Money::from_major(240),
            PayFrequency::Weekly,
            Money::from_major(100),
        );
        let outcome = engine.evaluate(&request).unwrap();
        assert!(outcome.eligibility.eligible);
        assert_eq!(outcome.eligibility.monthly_salary, Money::from_major(1_040));
        assert_eq!(outcome.eligibility.max_advance, Money::from_major(520));
        assert_eq!(outcome.fee.fee, Money::from_major(10));
    }

    #[test]
    fn test_zero_advance_has_no_fee() {
        let engine = AdvanceEngine::new();
        let request = AdvanceRequest::new(Money::from_major(5_000), PayFrequency::Monthly, Money::ZERO);
        let outcome = engine.evaluate(&request).unwrap();
        assert_eq!(outcome.fee, FeeResult::NONE);
    }

    #[test]
    fn test_lookup_returns_original_response() {
        let (engine, ledger) = engine_with_ledger();
        let time = test_time();
        let request = AdvanceRequest::new(
            Money::from_major(5_000),
            PayFrequency::Monthly,
            Money::from_major(1_000),
        )
        .with_loan(LoanTerms::new(Money::from_major(5_000), Rate::from_percentage(5), 12))
        .with_amortization();

        let response = engine.calculate(request.clone(), &time).unwrap();
        let loan_id = response.loan_id.clone().unwrap();

        assert_eq!(engine.lookup(&loan_id).unwrap(), response);

        let record = engine.fetch_record(&loan_id).unwrap();
        assert_eq!(record.request, request);
        assert_eq!(record.created_at, time.now());
        assert_eq!(ledger.fetch(record.loan_id).unwrap(), record);
    }

    #[test]
    fn test_lookup_of_unknown_or_malformed_id() {
        let engine = AdvanceEngine::new();
        assert!(engine.lookup(&Uuid::new_v4().to_string()).unwrap_err().is_not_found());
        assert!(engine.lookup("not-a-loan").unwrap_err().is_not_found());
    }

    #[test]
    fn test_invalid_requests_record_nothing() {
        let (engine, ledger) = engine_with_ledger();
        let time = test_time();

        let no_salary = AdvanceRequest::new(Money::ZERO, PayFrequency::Monthly, Money::from_major(10));
        assert!(matches!(
            engine.calculate(no_salary, &time),
            Err(AdvanceError::InvalidAmount { .. })
        ));

        let bad_loan = AdvanceRequest::new(
            Money::from_major(5_000),
            PayFrequency::Monthly,
            Money::from_major(10),
        )
        .with_loan(LoanTerms::new(Money::from_major(5_000), Rate::from_percent(dec!(-1)), 12));
        assert!(matches!(
            engine.calculate(bad_loan, &time),
            Err(AdvanceError::InvalidLoanTerms { .. })
        ));

        let missing_loan = AdvanceRequest::new(
            Money::from_major(5_000),
            PayFrequency::Monthly,
            Money::from_major(10),
        )
        .with_amortization();
        assert!(matches!(
            engine.calculate(missing_loan, &time),
            Err(AdvanceError::InvalidLoanTerms { .. })
        ));

        assert!(matches!(
            engine.calculate_json(
                r#"{"gross_salary": 5000, "pay_frequency": "Hourly", "advance_amount": 10}"#,
                &time
            ),
            Err(AdvanceError::InvalidFrequency { .. })
        ));

        assert!(ledger.is_empty().unwrap());
    }

    #[test]
    fn test_salary_just_under_threshold_is_ineligible() {
        let (engine, ledger) = engine_with_ledger();
        // 230.769230769 a week is 999.999999999 a month
        let response = engine
            .calculate_json(
                r#"{"gross_salary": 230.769230769, "pay_frequency": "Weekly", "advance_amount": 100}"#,
                &test_time(),
            )
            .unwrap();

        assert!(!response.eligible);
        assert_eq!(response.max_advance, Money::ZERO);
        assert!(response.loan_id.is_none());
        assert!(ledger.is_empty().unwrap());
    }

    #[test]
    fn test_salary_too_large_to_convert_is_an_error() {
        let (engine, ledger) = engine_with_ledger();
        for frequency in ["Weekly", "Bi-Weekly"] {
            let body = format!(
                r#"{{"gross_salary": 7e28, "pay_frequency": "{}", "advance_amount": 100}}"#,
                frequency
            );
            assert!(matches!(
                engine.calculate_json(&body, &test_time()),
                Err(AdvanceError::CalculationError { .. })
            ));
        }
        assert!(ledger.is_empty().unwrap());
    }

    #[test]
    fn test_oversized_loan_term_rejected_before_scheduling() {
        let (engine, ledger) = engine_with_ledger();
        let body = r#"{"gross_salary": 5000, "pay_frequency": "Monthly", "advance_amount": 100,
                       "loan_amount": 5000, "interest_rate": 0, "loan_term": 4000000000,
                       "include_amortization": true}"#;
        assert!(matches!(
            engine.calculate_json(body, &test_time()),
            Err(AdvanceError::InvalidLoanTerms { .. })
        ));
        assert!(ledger.is_empty().unwrap());
    }

    #[test]
    fn test_json_in_json_out() {
        let engine = AdvanceEngine::new();
        let response = engine
            .calculate_json(
                r#"{"gross_salary": 5000, "pay_frequency": "Monthly", "advance_amount": 1000,
                    "loan_amount": 1200, "interest_rate": 0, "loan_term": 12,
                    "include_amortization": true}"#,
                &test_time(),
            )
            .unwrap();

        let value: serde_json::Value = serde_json::from_str(&response.to_json().unwrap()).unwrap();
        assert_eq!(value["eligible"], serde_json::json!(true));
        assert_eq!(value["fee"].as_f64(), Some(50.0));
        assert_eq!(value["total_repayable"].as_f64(), Some(1200.0));
        assert_eq!(value["amortization_schedule"].as_array().unwrap().len(), 12);
        assert_eq!(value["amortization_schedule"][0]["payment"].as_f64(), Some(100.0));
        assert!(value["loan_id"].is_string());
    }

    #[test]
    fn test_custom_policy() {
        let mut policy = AdvancePolicy::standard();
        policy.eligibility.min_monthly_salary = Money::from_major(2_000);
        policy.fee.max_fee = Money::from_major(25);
        let engine =
            AdvanceEngine::with_ledger(policy, Arc::new(InMemoryLoanLedger::new())).unwrap();

        let low = AdvanceRequest::new(Money::from_major(1_500), PayFrequency::Monthly, Money::from_major(100));
        assert!(!engine.evaluate(&low).unwrap().eligibility.eligible);

        let high = AdvanceRequest::new(Money::from_major(4_000), PayFrequency::Monthly, Money::from_major(1_000));
        assert_eq!(engine.evaluate(&high).unwrap().fee.fee, Money::from_major(25));
    }

    #[test]
    fn test_invalid_policy_rejected() {
        let mut policy = AdvancePolicy::standard();
        policy.fee.min_fee = Money::from_major(100);
        assert!(AdvanceEngine::with_ledger(policy, Arc::new(InMemoryLoanLedger::new())).is_err());
    }

    #[test]
    fn test_engine_clones_share_ledger_across_threads() {
        let (engine, ledger) = engine_with_ledger();

        let ids: Vec<String> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let engine = engine.clone();
                    scope.spawn(move || {
                        let time = SafeTimeProvider::new(TimeSource::System);
                        (0..25)
                            .map(|_| {
                                let request = AdvanceRequest::new(
                                    Money::from_major(5_000),
                                    PayFrequency::Monthly,
                                    Money::from_major(400),
                                );
                                engine.calculate(request, &time).unwrap().loan_id.unwrap()
                            })
                            .collect::<Vec<_>>()
                    })
                })
                .collect();
            handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(ids.len(), 100);
        assert_eq!(ledger.len().unwrap(), 100);
        for id in &ids {
            assert!(engine.lookup(id).is_ok());
        }
    }
}
