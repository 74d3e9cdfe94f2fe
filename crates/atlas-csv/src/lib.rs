//! CSV storage for Atlas country records.
//!
//! # File Format
//!
//! A comma-delimited UTF-8 file:
//! - Line 1: header row, written as `name,population,area,continent` and
//!   skipped unread on load
//! - Every other line: `name,population,area,continent`, quoted with the usual
//!   CSV rules when a field contains a comma or a quote
//!
//! Population and area are plain non-negative integers. Continents are written
//! in their normalized form.
//!
//! Loading is lenient: a row with the wrong number of fields, a bad number or
//! an empty name is skipped and reported in [`Loaded::skipped`], never
//! aborting the load. Saving is all-or-nothing: the rows go to a temporary
//! file next to the target which then replaces it.
//!
//! # Example
//!
//! ```no_run
//! use atlas_csv::{load, save};
//!
//! let loaded = load("countries.csv")?;
//! for row in &loaded.skipped {
//!     eprintln!("skipped {row}");
//! }
//! save("countries.csv", &loaded.records)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

mod error;
mod reader;
mod writer;

pub use error::{Error, Result, SkipReason, SkippedRow};
pub use reader::{load, read_countries, Loaded};
pub use writer::{save, write_countries};

/// Header row written at the top of every saved file.
pub const HEADER: [&str; 4] = ["name", "population", "area", "continent"];
