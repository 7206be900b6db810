//! Core business logic: rate ledger, sauda ledger, company registry.

pub mod company;
pub mod config;
pub mod day;
pub mod error;
pub mod log;
pub mod rate;
pub mod sauda;
pub mod throttle;

// Re-export main types for cleaner imports
pub use company::{CompanyProfile, CompanyRegistration, CompanyRegistry, ContactCard};
pub use error::{LedgerError, Result};
pub use rate::{RateBook, RateFilter, RateQuote, RateRecord, RateView};
pub use sauda::{CompletionStatus, SaudaBook, SaudaLedger, SaudaLine, unit_key};
