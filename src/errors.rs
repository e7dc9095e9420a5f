use thiserror::Error;

#[derive(Error, Debug)]
pub enum AdvanceError {
    #[error("invalid pay frequency: {tag}")]
    InvalidFrequency {
        tag: String,
    },

    #[error("invalid amount for {field}: {value}")]
    InvalidAmount {
        field: &'static str,
        value: String,
    },

    #[error("invalid loan terms: {message}")]
    InvalidLoanTerms {
        message: String,
    },

    #[error("loan not found: {loan_id}")]
    NotFound {
        loan_id: String,
    },

    #[error("calculation error: {message}")]
    CalculationError {
        message: String,
    },

    #[error("invalid configuration: {message}")]
    InvalidConfiguration {
        message: String,
    },

    #[error("invalid request: {message}")]
    InvalidRequest {
        message: String,
    },

    #[error("loan ledger unavailable")]
    LedgerUnavailable,
}

impl AdvanceError {
    pub(crate) fn loan_terms(message: impl Into<String>) -> Self {
        AdvanceError::InvalidLoanTerms {
            message: message.into(),
        }
    }

    pub(crate) fn overflow(what: &str) -> Self {
        AdvanceError::CalculationError {
            message: format!("decimal overflow while computing {}", what),
        }
    }

    /// true for lookups against unknown identifiers
    pub fn is_not_found(&self) -> bool {
        matches!(self, AdvanceError::NotFound { .. })
    }
}

impl From<serde_json::Error> for AdvanceError {
    fn from(err: serde_json::Error) -> Self {
        AdvanceError::InvalidRequest {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, AdvanceError>;
