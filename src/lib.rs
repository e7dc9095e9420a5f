pub mod advance;
pub mod config;
pub mod decimal;
pub mod engine;
pub mod errors;
pub mod interest;
pub mod ledger;
pub mod payments;
pub mod serialization;
pub mod types;

// re-export key types
pub use advance::{EligibilityEvaluator, FeeCalculator, PayFrequency};
pub use config::AdvancePolicy;
pub use decimal::{Money, Rate};
pub use engine::{AdvanceEngine, AdvanceOutcome};
pub use errors::{AdvanceError, Result};
pub use interest::InterestProjector;
pub use ledger::{InMemoryLoanLedger, LoanLedger, LoanRecord, LoanSnapshot};
pub use payments::{AmortizationEntry, AmortizationSchedule, AmortizationScheduler};
pub use serialization::{decode_request, AdvanceRequestPayload, AdvanceResponse};
pub use types::{AdvanceRequest, EligibilityResult, FeeResult, LoanId, LoanTerms, MAX_TERM_MONTHS};

// re-export external dependencies that users will need
pub use chrono;
pub use hourglass_rs::{SafeTimeProvider, TimeSource};
pub use rust_decimal::Decimal;
pub use uuid::Uuid;
