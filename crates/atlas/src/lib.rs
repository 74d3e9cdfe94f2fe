//! Atlas - country record management library.
//!
//! This crate provides a unified interface to the Atlas crates:
//!
//! - [`atlas_common`] - The [`Country`] record and text normalization
//! - [`atlas_csv`] - Loading and saving the CSV data file
//! - [`atlas_store`] - The in-memory store, queries and statistics
//!
//! # Example
//!
//! ```no_run
//! use atlas::prelude::*;
//!
//! let (mut store, skipped) = atlas::load_store("countries.csv")?;
//! println!("{} countries, {} rows skipped", store.len(), skipped.len());
//!
//! store.add("Uruguay", "3500000", "176215", "América")?;
//! atlas::save_store("countries.csv", &store)?;
//!
//! for country in search(&store, "uru") {
//!     println!("{}", country.name());
//! }
//! # Ok::<(), atlas::Error>(())
//! ```

mod error;

use std::path::Path;

pub use error::{Error, Result};

// Re-export all sub-crates
pub use atlas_common as common;
pub use atlas_csv as csv;
pub use atlas_store as store;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use atlas_common::{normalize, Country};
    pub use atlas_csv::{SkipReason, SkippedRow};
    pub use atlas_store::{
        compute_statistics, filter_by_area_range, filter_by_continent,
        filter_by_population_range, search, sort_by, CountryUpdate, Field, Order, Query,
        RecordStore, RemovalHandle, SortField, Statistics, UpdateReport,
    };
}

pub use atlas_common::{normalize, Country};
pub use atlas_store::{RecordStore, Statistics};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Load the data file at `path` into a new store.
///
/// Malformed rows and rows repeating an earlier country name are skipped and
/// returned alongside the store. A missing file is an error for which
/// [`Error::is_not_found`] holds; callers usually fall back to an empty store.
pub fn load_store<P: AsRef<Path>>(path: P) -> Result<(RecordStore, Vec<atlas_csv::SkippedRow>)> {
    let path = path.as_ref();
    let loaded = atlas_csv::load(path)?;
    let mut skipped = loaded.skipped;

    let (store, duplicates) = RecordStore::from_records(loaded.records);
    for (index, duplicate) in duplicates {
        skipped.push(atlas_csv::SkippedRow {
            line: loaded.lines.get(index).copied().unwrap_or_default(),
            reason: atlas_csv::SkipReason::DuplicateName(duplicate.name().to_string()),
        });
    }
    skipped.sort_by_key(|row| row.line);

    tracing::info!(
        path = %path.display(),
        countries = store.len(),
        skipped = skipped.len(),
        "loaded store"
    );
    Ok((store, skipped))
}

/// Save every record of `store` to `path`, replacing the file.
pub fn save_store<P: AsRef<Path>>(path: P, store: &RecordStore) -> Result<()> {
    atlas_csv::save(path, store)?;
    Ok(())
}
