//! Common types for Atlas.
//!
//! This crate provides the foundations shared by every other Atlas crate:
//!
//! - [`normalize`] - Case and accent folding used by every name/continent comparison
//! - [`Country`] - The fixed-field country record
//!
//! Continents are stored already normalized, so comparing a stored continent
//! against user input only requires normalizing the input.

mod country;
mod error;
mod normalize;

pub use country::Country;
pub use error::{Error, Result};
pub use normalize::{contains, matches, normalize};
