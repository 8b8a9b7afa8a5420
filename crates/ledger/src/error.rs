//! Errors surfaced by the ledger.
//!
//! Validation problems are not errors: they come back as
//! [`RecordResult::Rejected`]. Only storage failures end up here.
//!
//!  [`RecordResult::Rejected`]: super::RecordResult::Rejected
use sea_orm::DbErr;
use thiserror::Error;

/// Ledger custom errors.
#[derive(Error, Debug)]
pub enum LedgerError {
    #[error(transparent)]
    Database(#[from] DbErr),
}

impl PartialEq for LedgerError {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Database(a), Self::Database(b)) => a.to_string() == b.to_string(),
        }
    }
}
