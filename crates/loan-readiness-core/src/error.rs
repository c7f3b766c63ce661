use thiserror::Error;

#[derive(Debug, Error)]
pub enum LoanReadinessError {
    #[error("Invalid input: {field} — {reason}")]
    InvalidInput { field: String, reason: String },

    #[error("Invalid bank configuration: {bank} — {reason}")]
    InvalidConfiguration { bank: String, reason: String },

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for LoanReadinessError {
    fn from(e: serde_json::Error) -> Self {
        LoanReadinessError::SerializationError(e.to_string())
    }
}
