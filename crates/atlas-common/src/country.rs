//! The country record.

use crate::normalize::normalize;
use crate::{Error, Result};

/// A single country entry.
///
/// Fields are private so the record invariants hold everywhere:
/// - `name` is trimmed and non-empty, kept in its original casing
/// - `continent` is stored normalized (see [`normalize`])
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Country {
    name: String,
    population: u64,
    area: u64,
    continent: String,
}

impl Country {
    /// Create a new record, trimming the name and normalizing the continent.
    pub fn new(name: &str, population: u64, area: u64, continent: &str) -> Result<Self> {
        Ok(Self {
            name: clean_name(name)?,
            population,
            area,
            continent: normalize(continent.trim()),
        })
    }

    /// Display name, in original casing.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized name, the identity used for duplicate detection and lookup.
    pub fn key(&self) -> String {
        normalize(&self.name)
    }

    /// Population count.
    pub fn population(&self) -> u64 {
        self.population
    }

    /// Area in square kilometres.
    pub fn area(&self) -> u64 {
        self.area
    }

    /// Normalized continent.
    pub fn continent(&self) -> &str {
        &self.continent
    }

    /// Replace the name.
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = clean_name(name)?;
        Ok(())
    }

    /// Replace the population.
    pub fn set_population(&mut self, population: u64) {
        self.population = population;
    }

    /// Replace the area.
    pub fn set_area(&mut self, area: u64) {
        self.area = area;
    }

    /// Replace the continent, normalizing it.
    pub fn set_continent(&mut self, continent: &str) {
        self.continent = normalize(continent.trim());
    }
}

fn clean_name(name: &str) -> Result<String> {
    let name = name.trim();
    if name.is_empty() {
        return Err(Error::EmptyName);
    }
    Ok(name.to_string())
}
