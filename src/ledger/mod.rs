pub mod memory;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::AdvanceOutcome;
use crate::errors::Result;
use crate::serialization::AdvanceResponse;
use crate::types::{AdvanceRequest, LoanId};

pub use memory::InMemoryLoanLedger;

/// a computed outcome waiting for an identifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoanSnapshot {
    pub request: AdvanceRequest,
    pub outcome: AdvanceOutcome,
    pub created_at: DateTime<Utc>,
}

/// immutable stored loan record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoanRecord {
    pub loan_id: LoanId,
    pub created_at: DateTime<Utc>,
    pub request: AdvanceRequest,
    pub outcome: AdvanceOutcome,
}

impl LoanRecord {
    pub fn from_snapshot(loan_id: LoanId, snapshot: LoanSnapshot) -> Self {
        Self {
            loan_id,
            created_at: snapshot.created_at,
            request: snapshot.request,
            outcome: snapshot.outcome,
        }
    }

    /// the response originally produced for this loan
    pub fn to_response(&self) -> AdvanceResponse {
        AdvanceResponse::from_outcome(&self.outcome, Some(self.loan_id))
    }
}

/// write-once store for accepted loans
///
/// Implementations must hand out unique identifiers under concurrent `record`
/// calls and never expose a partially written record to `fetch`.
pub trait LoanLedger: Send + Sync {
    /// store the snapshot under a fresh identifier
    fn record(&self, snapshot: LoanSnapshot) -> Result<LoanId>;

    /// look up a stored record, `NotFound` when the id is unknown
    fn fetch(&self, loan_id: LoanId) -> Result<LoanRecord>;
}
