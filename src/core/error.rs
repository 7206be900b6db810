//! Error taxonomy for the ledger core.

use crate::store::StoreError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LedgerError {
    /// A required field is missing or malformed. The caller should re-prompt.
    #[error("{0}")]
    Validation(String),

    #[error("{entity} not found: {key}")]
    NotFound { entity: &'static str, key: String },

    /// A uniqueness invariant would be violated.
    #[error("{entity} already exists: {name}")]
    Conflict { entity: &'static str, name: String },

    /// The underlying storage call failed. Surfaced as-is, never retried here.
    #[error("storage failure: {0}")]
    Persistence(#[from] StoreError),

    #[error("too many submissions from {caller}, please retry later")]
    RateLimited { caller: String },
}

impl LedgerError {
    pub fn required(field: &str) -> Self {
        LedgerError::Validation(format!("{field} is required"))
    }
}

pub type Result<T> = std::result::Result<T, LedgerError>;
