use thiserror::Error;

#[derive(Error, Debug)]
pub enum EstateLedgerError {
    #[error("Invalid period: {0}")]
    InvalidPeriod(String),

    #[error("Invalid amount for {field}: '{value}' (expected a non-negative whole number)")]
    InvalidAmount { field: &'static str, value: String },

    #[error("Invalid record kind '{0}': must be INCOME or EXPENSE")]
    InvalidRecordKind(String),

    #[error("Date calculation error: {0}")]
    DateError(String),

    #[error("Validation error for {entity}: {details}")]
    ValidationError { entity: String, details: String },

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, EstateLedgerError>;
