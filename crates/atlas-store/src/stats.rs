//! Summary statistics over a set of records.

use atlas_common::Country;

use crate::{Error, Result};

/// Number of records on one continent.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ContinentCount {
    /// Normalized continent name.
    pub continent: String,
    pub count: usize,
}

/// Aggregates computed by [`compute_statistics`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Statistics<'a> {
    /// Most populated record; the first one wins ties.
    pub max_population: &'a Country,
    /// Least populated record; the first one wins ties.
    pub min_population: &'a Country,
    /// Mean population, truncated.
    pub mean_population: u64,
    /// Mean area, truncated.
    pub mean_area: u64,
    /// Record count per continent, in order of first appearance.
    pub counts_by_continent: Vec<ContinentCount>,
}

impl Statistics<'_> {
    /// Look up the count for a normalized continent name.
    pub fn count_for(&self, continent: &str) -> Option<usize> {
        self.counts_by_continent
            .iter()
            .find(|c| c.continent == continent)
            .map(|c| c.count)
    }
}

/// Compute max/min population, means and per-continent counts.
///
/// Fails with [`Error::NoData`] when `records` is empty.
pub fn compute_statistics<'a, I>(records: I) -> Result<Statistics<'a>>
where
    I: IntoIterator<Item = &'a Country>,
{
    let mut records = records.into_iter();
    let first = records.next().ok_or(Error::NoData)?;

    let mut max_population = first;
    let mut min_population = first;
    let mut total_population = u128::from(first.population());
    let mut total_area = u128::from(first.area());
    let mut count: u128 = 1;
    let mut counts_by_continent = vec![ContinentCount {
        continent: first.continent().to_string(),
        count: 1,
    }];

    for country in records {
        if country.population() > max_population.population() {
            max_population = country;
        }
        if country.population() < min_population.population() {
            min_population = country;
        }
        total_population += u128::from(country.population());
        total_area += u128::from(country.area());
        count += 1;

        match counts_by_continent
            .iter_mut()
            .find(|c| c.continent == country.continent())
        {
            Some(entry) => entry.count += 1,
            None => counts_by_continent.push(ContinentCount {
                continent: country.continent().to_string(),
                count: 1,
            }),
        }
    }

    // A mean never exceeds the largest value, so it fits back into u64.
    Ok(Statistics {
        max_population,
        min_population,
        mean_population: (total_population / count) as u64,
        mean_area: (total_area / count) as u64,
        counts_by_continent,
    })
}
