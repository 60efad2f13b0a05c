//! The module contains the errors the ledger can throw.
//!
//! The errors are:
//!
//! - [`InvalidAmount`] thrown when an amount is non-positive or malformed.
//! - [`Validation`] thrown when a payment references an incoherent or missing subject.
//! - [`KeyNotFound`] thrown when an item is not found.
//! - [`SyncFailure`] thrown when a summary recompute fails while the ledger row survives.
//!
//!  [`InvalidAmount`]: LedgerError::InvalidAmount
//!  [`Validation`]: LedgerError::Validation
//!  [`KeyNotFound`]: LedgerError::KeyNotFound
//!  [`SyncFailure`]: LedgerError::SyncFailure
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
    #[error("Invalid payment: {0}")]
    Validation(String),
    #[error("\"{0}\" key not found!")]
    KeyNotFound(String),
    #[error("\"{0}\" already present!")]
    ExistingKey(String),
    #[error("Summary sync failed: {0}")]
    SyncFailure(String),
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::InvalidAmount(a), Self::InvalidAmount(b)) => a == b,
            (Self::Validation(a), Self::Validation(b)) => a == b,
            (Self::KeyNotFound(a), Self::KeyNotFound(b)) => a == b,
            (Self::ExistingKey(a), Self::ExistingKey(b)) => a == b,
            (Self::SyncFailure(a), Self::SyncFailure(b)) => a == b,
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
            _ => false,
        }
    }
}
