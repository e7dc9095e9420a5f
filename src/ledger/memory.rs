use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::errors::{AdvanceError, Result};
use crate::ledger::{LoanLedger, LoanRecord, LoanSnapshot};
use crate::types::LoanId;

/// volatile ledger kept in process memory
///
/// Records are lost when the process exits. Identifiers are random v4 uuids,
/// drawn and inserted under a single write lock.
#[derive(Debug, Default)]
pub struct InMemoryLoanLedger {
    records: RwLock<HashMap<LoanId, LoanRecord>>,
}

impl InMemoryLoanLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> Result<usize> {
        self.records
            .read()
            .map(|records| records.len())
            .map_err(|_| AdvanceError::LedgerUnavailable)
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

impl LoanLedger for InMemoryLoanLedger {
    fn record(&self, snapshot: LoanSnapshot) -> Result<LoanId> {
        let mut records = self
            .records
            .write()
            .map_err(|_| AdvanceError::LedgerUnavailable)?;

        let loan_id = loop {
            let candidate = Uuid::new_v4();
            if !records.contains_key(&candidate) {
                break candidate;
            }
        };

        records.insert(loan_id, LoanRecord::from_snapshot(loan_id, snapshot));
        tracing::debug!(%loan_id, stored = records.len(), "loan recorded");
        Ok(loan_id)
    }

    fn fetch(&self, loan_id: LoanId) -> Result<LoanRecord> {
        let records = self
            .records
            .read()
            .map_err(|_| AdvanceError::LedgerUnavailable)?;

        records.get(&loan_id).cloned().ok_or_else(|| {
            tracing::debug!(%loan_id, "loan lookup missed");
            AdvanceError::NotFound {
                loan_id: loan_id.to_string(),
            }
        })
    }
}
