//! Query API for country records.
//!
//! [`Query`] chains search, filter and sort steps over borrowed records
//! without touching the store. The free functions are single-step shortcuts
//! for the common cases.
//!
//! # Example
//!
//! ```
//! use atlas_store::{Order, RecordStore, SortField};
//!
//! let mut store = RecordStore::new();
//! store.add("Perú", "34000000", "1285216", "América")?;
//! store.add("Chile", "19000000", "756102", "america")?;
//! store.add("Japón", "125800000", "377975", "Asia")?;
//!
//! let rows = store
//!     .query()
//!     .continent("AMÉRICA")
//!     .population_range(0, 20_000_000)?
//!     .sort_by(SortField::Name, Order::Ascending)
//!     .into_vec();
//!
//! assert_eq!(rows.len(), 1);
//! assert_eq!(rows[0].name(), "Chile");
//! # Ok::<(), atlas_store::Error>(())
//! ```

use std::cmp::Ordering;

use atlas_common::{normalize, Country};

use crate::{Error, Result};

/// Field a result set can be sorted on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortField {
    /// Raw stored name, compared lexicographically.
    Name,
    Population,
    Area,
}

/// Sort direction.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Ascending,
    Descending,
}

impl Order {
    /// Orient an ascending comparison.
    #[inline]
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Order::Ascending => ordering,
            Order::Descending => ordering.reverse(),
        }
    }
}

/// Compare two records on `field`, ascending.
pub(crate) fn compare(field: SortField, a: &Country, b: &Country) -> Ordering {
    match field {
        SortField::Name => a.name().cmp(b.name()),
        SortField::Population => a.population().cmp(&b.population()),
        SortField::Area => a.area().cmp(&b.area()),
    }
}

/// A read-only, ordered selection of records.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query<'a> {
    rows: Vec<&'a Country>,
}

impl<'a> Query<'a> {
    /// Start from every record of `records`, in order.
    pub fn new<I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a Country>,
    {
        Self {
            rows: records.into_iter().collect(),
        }
    }

    /// Keep records whose name contains `text`, ignoring case and accents.
    ///
    /// An empty `text` keeps everything.
    pub fn search(mut self, text: &str) -> Self {
        let needle = normalize(text);
        if !needle.is_empty() {
            self.rows.retain(|c| c.key().contains(&needle));
        }
        self
    }

    /// Keep records whose continent equals `value` once normalized.
    pub fn continent(mut self, value: &str) -> Self {
        let wanted = normalize(value);
        self.rows.retain(|c| c.continent() == wanted);
        self
    }

    /// Keep records with `min <= population <= max`.
    pub fn population_range(mut self, min: u64, max: u64) -> Result<Self> {
        check_range(min, max)?;
        self.rows
            .retain(|c| (min..=max).contains(&c.population()));
        Ok(self)
    }

    /// Keep records with `min <= area <= max`.
    pub fn area_range(mut self, min: u64, max: u64) -> Result<Self> {
        check_range(min, max)?;
        self.rows.retain(|c| (min..=max).contains(&c.area()));
        Ok(self)
    }

    /// Stable sort on `field`; ties keep their relative order in both
    /// directions.
    pub fn sort_by(mut self, field: SortField, order: Order) -> Self {
        self.rows
            .sort_by(|a, b| order.apply(compare(field, a, b)));
        self
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Country> + '_ {
        self.rows.iter().copied()
    }

    pub fn into_vec(self) -> Vec<&'a Country> {
        self.rows
    }
}

impl<'a> IntoIterator for Query<'a> {
    type Item = &'a Country;
    type IntoIter = std::vec::IntoIter<&'a Country>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.into_iter()
    }
}

fn check_range(min: u64, max: u64) -> Result<()> {
    if min > max {
        return Err(Error::InvalidRange { min, max });
    }
    Ok(())
}

/// Records whose name contains `text`, ignoring case and accents.
pub fn search<'a, I>(records: I, text: &str) -> Vec<&'a Country>
where
    I: IntoIterator<Item = &'a Country>,
{
    Query::new(records).search(text).into_vec()
}

/// Records on the continent `value`, compared in normalized form.
pub fn filter_by_continent<'a, I>(records: I, value: &str) -> Vec<&'a Country>
where
    I: IntoIterator<Item = &'a Country>,
{
    Query::new(records).continent(value).into_vec()
}

/// Records with a population in `min..=max`.
pub fn filter_by_population_range<'a, I>(records: I, min: u64, max: u64) -> Result<Vec<&'a Country>>
where
    I: IntoIterator<Item = &'a Country>,
{
    Ok(Query::new(records).population_range(min, max)?.into_vec())
}

/// Records with an area in `min..=max`.
pub fn filter_by_area_range<'a, I>(records: I, min: u64, max: u64) -> Result<Vec<&'a Country>>
where
    I: IntoIterator<Item = &'a Country>,
{
    Ok(Query::new(records).area_range(min, max)?.into_vec())
}

/// Records sorted on `field`, stable.
pub fn sort_by<'a, I>(records: I, field: SortField, order: Order) -> Vec<&'a Country>
where
    I: IntoIterator<Item = &'a Country>,
{
    Query::new(records).sort_by(field, order).into_vec()
}
