//! Error types for the record store.

use std::fmt;

use thiserror::Error;

/// A writable field of a country record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Field {
    Name,
    Population,
    Area,
    Continent,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Field::Name => "name",
            Field::Population => "population",
            Field::Area => "area",
            Field::Continent => "continent",
        })
    }
}

/// Errors that can occur when querying or mutating the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Another record already has the same normalized name.
    #[error("a country named {0:?} already exists")]
    DuplicateName(String),

    /// A field value failed validation.
    #[error("invalid {field}: {reason}")]
    InvalidInput { field: Field, reason: String },

    /// A range filter with its bounds the wrong way round.
    #[error("invalid range: minimum {min} is greater than maximum {max}")]
    InvalidRange { min: u64, max: u64 },

    /// No record matches the given name.
    #[error("no country named {0:?}")]
    NotFound(String),

    /// Statistics requested over an empty record set.
    #[error("no data")]
    NoData,

    /// The store changed after the removal handle was issued.
    #[error("removal of {0:?} was not confirmed before the store changed")]
    StaleHandle(String),
}

impl Error {
    pub(crate) fn invalid(field: Field, reason: impl Into<String>) -> Self {
        Error::InvalidInput {
            field,
            reason: reason.into(),
        }
    }
}

/// Result type for store operations.
pub type Result<T> = std::result::Result<T, Error>;
