//! Error type for the Atlas facade.

use thiserror::Error;

/// Errors from any Atlas crate.
#[derive(Debug, Error)]
pub enum Error {
    /// Loading or saving the data file failed.
    #[error(transparent)]
    Csv(#[from] atlas_csv::Error),

    /// A store, query or statistics operation failed.
    #[error(transparent)]
    Store(#[from] atlas_store::Error),
}

impl Error {
    /// Check whether the data file was missing.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Csv(e) if e.is_not_found())
    }

    /// The store error, if this is one.
    pub fn as_store(&self) -> Option<&atlas_store::Error> {
        match self {
            Error::Store(e) => Some(e),
            Error::Csv(_) => None,
        }
    }
}

/// Result type for Atlas operations.
pub type Result<T> = std::result::Result<T, Error>;
