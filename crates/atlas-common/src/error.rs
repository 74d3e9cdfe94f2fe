//! Error types for atlas-common.

use thiserror::Error;

/// Errors raised while building a [`Country`](crate::Country).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Country names must contain at least one non-whitespace character.
    #[error("country name must not be empty")]
    EmptyName,
}

/// Result type alias using the common Error type.
pub type Result<T> = std::result::Result<T, Error>;
