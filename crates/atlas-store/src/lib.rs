//! In-memory store for Atlas country records.
//!
//! - [`RecordStore`] - Ordered records with unique names; add, update and
//!   two-step removal
//! - [`query`] - Search, continent and range filters, stable sorting
//! - [`stats`] - Max/min population, means and per-continent counts
//!
//! Names and continents are always compared through
//! [`atlas_common::normalize`], so "Perú", "peru" and "PERÚ" are the same
//! country everywhere.
//!
//! # Example
//!
//! ```
//! use atlas_store::{compute_statistics, CountryUpdate, RecordStore};
//!
//! let mut store = RecordStore::new();
//! store.add("México", "126000000", "1964375", "América")?;
//! store.add("Japón", "125800000", "377975", "Asia")?;
//!
//! store.update("mexico", &CountryUpdate::new().population("127000000"))?;
//!
//! let handle = store.find_for_removal("JAPON")?;
//! store.confirm_removal(handle)?;
//!
//! let stats = compute_statistics(&store)?;
//! assert_eq!(stats.mean_population, 127_000_000);
//! # Ok::<(), atlas_store::Error>(())
//! ```

mod error;
mod store;

pub mod query;
pub mod stats;

pub use error::{Error, Field, Result};
pub use query::{
    filter_by_area_range, filter_by_continent, filter_by_population_range, search, sort_by, Order,
    Query, SortField,
};
pub use stats::{compute_statistics, ContinentCount, Statistics};
pub use store::{CountryUpdate, RecordStore, RemovalHandle, UpdateReport};

/// Re-exported so callers need only this crate to name records.
pub use atlas_common::Country;
