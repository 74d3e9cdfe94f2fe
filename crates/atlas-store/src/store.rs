//! The in-memory record store.

use atlas_common::{normalize, Country};

use crate::query::{compare, Order, Query, SortField};
use crate::{Error, Field, Result};

/// An ordered collection of countries with unique normalized names.
///
/// Records keep insertion order until [`RecordStore::sort_by`] is called.
/// Every mutation bumps an internal revision, which is what invalidates
/// outstanding [`RemovalHandle`]s.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct RecordStore {
    records: Vec<Country>,
    revision: u64,
}

/// New values for [`RecordStore::update`].
///
/// A field that is `None`, empty or only whitespace is left unchanged.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct CountryUpdate {
    pub name: Option<String>,
    pub population: Option<String>,
    pub area: Option<String>,
    pub continent: Option<String>,
}

impl CountryUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn population(mut self, population: impl Into<String>) -> Self {
        self.population = Some(population.into());
        self
    }

    pub fn area(mut self, area: impl Into<String>) -> Self {
        self.area = Some(area.into());
        self
    }

    pub fn continent(mut self, continent: impl Into<String>) -> Self {
        self.continent = Some(continent.into());
        self
    }
}

/// What an update changed.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct UpdateReport {
    /// Fields that were written, in the order name, population, area, continent.
    pub applied: Vec<Field>,
    /// Fields that were supplied but failed validation.
    pub rejected: Vec<(Field, Error)>,
}

impl UpdateReport {
    /// True when no supplied field was rejected.
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// A pending removal, issued by [`RecordStore::find_for_removal`].
///
/// Nothing is removed until the handle is passed to
/// [`RecordStore::confirm_removal`]; dropping it cancels the removal.
#[derive(Debug, PartialEq, Eq)]
#[must_use = "a removal only happens once the handle is confirmed"]
pub struct RemovalHandle {
    index: usize,
    key: String,
    name: String,
    revision: u64,
}

impl RemovalHandle {
    /// Display name of the record that would be removed.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl RecordStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a store from loaded records.
    ///
    /// Records whose normalized name repeats an earlier one are not inserted;
    /// they are returned in the second element with their input position.
    pub fn from_records<I>(records: I) -> (Self, Vec<(usize, Country)>)
    where
        I: IntoIterator<Item = Country>,
    {
        let mut store = Self::new();
        let mut duplicates = Vec::new();

        for (index, country) in records.into_iter().enumerate() {
            if store.position(country.name()).is_some() {
                tracing::warn!(name = country.name(), "dropping duplicate country");
                duplicates.push((index, country));
            } else {
                store.records.push(country);
            }
        }

        (store, duplicates)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of mutations applied so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// All records, in store order.
    pub fn as_slice(&self) -> &[Country] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Country> {
        self.records.iter()
    }

    /// Start a query over every record.
    pub fn query(&self) -> Query<'_> {
        Query::new(&self.records)
    }

    /// Find a record by name, ignoring case and accents.
    pub fn find(&self, name: &str) -> Option<&Country> {
        self.position(name).map(|index| &self.records[index])
    }

    /// Like [`find`](Self::find), but a blank name is invalid input and a
    /// missing record is [`Error::NotFound`].
    pub fn lookup(&self, name: &str) -> Result<&Country> {
        self.locate(name).map(|index| &self.records[index])
    }

    fn locate(&self, name: &str) -> Result<usize> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid(Field::Name, "must not be empty"));
        }
        self.position(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))
    }

    fn position(&self, name: &str) -> Option<usize> {
        let key = normalize(name.trim());
        self.records.iter().position(|c| c.key() == key)
    }

    /// Append an already built record.
    pub fn insert(&mut self, country: Country) -> Result<&Country> {
        if self.position(country.name()).is_some() {
            return Err(Error::DuplicateName(country.name().to_string()));
        }

        tracing::debug!(name = country.name(), "adding country");
        self.records.push(country);
        self.revision += 1;
        Ok(&self.records[self.records.len() - 1])
    }

    /// Validate raw input and append a new record.
    ///
    /// The name is trimmed and keeps its casing; the continent is stored
    /// normalized.
    pub fn add(
        &mut self,
        name: &str,
        population: &str,
        area: &str,
        continent: &str,
    ) -> Result<&Country> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::invalid(Field::Name, "must not be empty"));
        }
        if self.position(name).is_some() {
            return Err(Error::DuplicateName(name.to_string()));
        }

        let population = parse_count(Field::Population, population)?;
        let area = parse_count(Field::Area, area)?;
        let country = Country::new(name, population, area, continent)
            .map_err(|e| Error::invalid(Field::Name, e.to_string()))?;

        self.insert(country)
    }

    /// Overwrite the supplied fields of the record called `name`.
    ///
    /// Each field is validated on its own: a bad value is reported in
    /// [`UpdateReport::rejected`] while the other fields still apply.
    pub fn update(&mut self, name: &str, changes: &CountryUpdate) -> Result<UpdateReport> {
        let index = self.locate(name)?;
        let mut report = UpdateReport::default();

        if let Some(new_name) = supplied(&changes.name) {
            let taken = self
                .position(new_name)
                .is_some_and(|other| other != index);
            if taken {
                report
                    .rejected
                    .push((Field::Name, Error::DuplicateName(new_name.to_string())));
            } else {
                match self.records[index].set_name(new_name) {
                    Ok(()) => report.applied.push(Field::Name),
                    Err(e) => report
                        .rejected
                        .push((Field::Name, Error::invalid(Field::Name, e.to_string()))),
                }
            }
        }

        if let Some(raw) = supplied(&changes.population) {
            match parse_count(Field::Population, raw) {
                Ok(value) => {
                    self.records[index].set_population(value);
                    report.applied.push(Field::Population);
                }
                Err(e) => report.rejected.push((Field::Population, e)),
            }
        }

        if let Some(raw) = supplied(&changes.area) {
            match parse_count(Field::Area, raw) {
                Ok(value) => {
                    self.records[index].set_area(value);
                    report.applied.push(Field::Area);
                }
                Err(e) => report.rejected.push((Field::Area, e)),
            }
        }

        if let Some(continent) = supplied(&changes.continent) {
            self.records[index].set_continent(continent);
            report.applied.push(Field::Continent);
        }

        if !report.applied.is_empty() {
            self.revision += 1;
        }
        tracing::debug!(
            name = self.records[index].name(),
            applied = report.applied.len(),
            rejected = report.rejected.len(),
            "updated country"
        );

        Ok(report)
    }

    /// First step of a removal: locate the record and issue a handle.
    pub fn find_for_removal(&self, name: &str) -> Result<RemovalHandle> {
        let index = self.locate(name)?;
        let country = &self.records[index];

        Ok(RemovalHandle {
            index,
            key: country.key(),
            name: country.name().to_string(),
            revision: self.revision,
        })
    }

    /// Second step of a removal: remove the record the handle points at.
    ///
    /// Fails with [`Error::StaleHandle`] if the store was mutated since the
    /// handle was issued.
    pub fn confirm_removal(&mut self, handle: RemovalHandle) -> Result<Country> {
        let current = handle.revision == self.revision
            && self
                .records
                .get(handle.index)
                .is_some_and(|c| c.key() == handle.key);
        if !current {
            return Err(Error::StaleHandle(handle.name));
        }

        let removed = self.records.remove(handle.index);
        self.revision += 1;
        tracing::debug!(name = removed.name(), "removed country");
        Ok(removed)
    }

    /// Reorder the store itself. Stable: ties keep their current order.
    pub fn sort_by(&mut self, field: SortField, order: Order) {
        self.records
            .sort_by(|a, b| order.apply(compare(field, a, b)));
        self.revision += 1;
    }
}

impl<'a> IntoIterator for &'a RecordStore {
    type Item = &'a Country;
    type IntoIter = std::slice::Iter<'a, Country>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

fn supplied(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Parse a population or area value.
pub(crate) fn parse_count(field: Field, raw: &str) -> Result<u64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(Error::invalid(field, "must not be empty"));
    }

    raw.parse::<u64>().map_err(|_| {
        if raw.parse::<i128>().is_ok_and(|v| v < 0) {
            Error::invalid(field, "must not be negative")
        } else {
            Error::invalid(field, format!("{raw:?} is not a whole number"))
        }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> RecordStore {
        let mut store = RecordStore::new();
        store.add("Argentina", "45376763", "2780400", "América").unwrap();
        store.add("Japón", "125800000", "377975", "Asia").unwrap();
        store.add("Perú", "34000000", "1285216", "america").unwrap();
        store
    }

    fn names(store: &RecordStore) -> Vec<&str> {
        store.iter().map(Country::name).collect()
    }

    #[test]
    fn test_add_keeps_name_and_normalizes_continent() {
        let mut store = RecordStore::new();
        let added = store.add("  México ", " 126000000", "1964375 ", "AMÉRICA").unwrap();
        assert_eq!(added.name(), "México");
        assert_eq!(added.continent(), "america");
        assert_eq!(added.population(), 126_000_000);
        assert_eq!(store.len(), 1);
        assert_eq!(store.revision(), 1);
    }

    #[test]
    fn test_add_rejects_duplicates_ignoring_case_and_accents() {
        let mut store = store();
        assert_eq!(
            store.add("JAPON", "1", "1", "asia"),
            Err(Error::DuplicateName("JAPON".to_string()))
        );
        assert_eq!(
            store.add("peru", "1", "1", "asia"),
            Err(Error::DuplicateName("peru".to_string()))
        );
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_add_validates_input() {
        let mut store = store();
        assert!(matches!(
            store.add("  ", "1", "1", "asia"),
            Err(Error::InvalidInput { field: Field::Name, .. })
        ));
        assert!(matches!(
            store.add("Chile", "many", "1", "america"),
            Err(Error::InvalidInput { field: Field::Population, .. })
        ));
        assert_eq!(
            store.add("Chile", "1", "-5", "america"),
            Err(Error::invalid(Field::Area, "must not be negative"))
        );
        assert_eq!(names(&store), ["Argentina", "Japón", "Perú"]);
    }

    #[test]
    fn test_from_records_drops_duplicates() {
        let records = vec![
            Country::new("Chile", 1, 1, "america").unwrap(),
            Country::new("CHILE", 2, 2, "america").unwrap(),
            Country::new("Perú", 3, 3, "america").unwrap(),
        ];

        let (store, duplicates) = RecordStore::from_records(records);
        assert_eq!(names(&store), ["Chile", "Perú"]);
        assert_eq!(duplicates.len(), 1);
        assert_eq!(duplicates[0].0, 1);
        assert_eq!(duplicates[0].1.population(), 2);
        assert_eq!(store.revision(), 0);
    }

    #[test]
    fn test_find_ignores_case_accents_and_padding() {
        let store = store();
        assert_eq!(store.find(" japon ").map(Country::name), Some("Japón"));
        assert_eq!(store.find("PERÚ").map(Country::name), Some("Perú"));
        assert!(store.find("Chile").is_none());
    }

    #[test]
    fn test_update_applies_supplied_fields() {
        let mut store = store();
        let changes = CountryUpdate::new()
            .population("126000000")
            .continent("ASIA ")
            .area("   ");

        let report = store.update("japon", &changes).unwrap();
        assert_eq!(report.applied, [Field::Population, Field::Continent]);
        assert!(report.is_clean());

        let japan = store.find("Japón").unwrap();
        assert_eq!(japan.population(), 126_000_000);
        assert_eq!(japan.area(), 377_975);
        assert_eq!(japan.continent(), "asia");
    }

    #[test]
    fn test_update_partial_failure() {
        let mut store = store();
        let changes = CountryUpdate::new()
            .name("República Argentina")
            .population("lots")
            .area("2780401");

        let report = store.update("ARGENTINA", &changes).unwrap();
        assert_eq!(report.applied, [Field::Name, Field::Area]);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].0, Field::Population);

        let argentina = store.find("republica argentina").unwrap();
        assert_eq!(argentina.population(), 45_376_763);
        assert_eq!(argentina.area(), 2_780_401);
    }

    #[test]
    fn test_update_rename_collision() {
        let mut store = store();

        let report = store
            .update("Perú", &CountryUpdate::new().name("japon").population("1"))
            .unwrap();
        assert_eq!(report.applied, [Field::Population]);
        assert_eq!(
            report.rejected,
            [(Field::Name, Error::DuplicateName("japon".to_string()))]
        );

        // Renaming to a different spelling of itself is allowed.
        let report = store.update("Perú", &CountryUpdate::new().name("PERU")).unwrap();
        assert_eq!(report.applied, [Field::Name]);
        assert_eq!(store.find("peru").map(Country::name), Some("PERU"));
    }

    #[test]
    fn test_update_missing() {
        let mut store = store();
        assert_eq!(
            store.update("Chile", &CountryUpdate::new().area("1")),
            Err(Error::NotFound("Chile".to_string()))
        );
    }

    #[test]
    fn test_removal_requires_confirmation() {
        let mut store = store();

        let handle = store.find_for_removal("japon").unwrap();
        assert_eq!(handle.name(), "Japón");
        drop(handle);
        assert_eq!(store.len(), 3);

        let handle = store.find_for_removal("JAPÓN").unwrap();
        let removed = store.confirm_removal(handle).unwrap();
        assert_eq!(removed.name(), "Japón");
        assert_eq!(names(&store), ["Argentina", "Perú"]);
    }

    #[test]
    fn test_removal_missing_and_stale() {
        let mut store = store();
        assert_eq!(
            store.find_for_removal("Chile"),
            Err(Error::NotFound("Chile".to_string()))
        );

        let handle = store.find_for_removal("Argentina").unwrap();
        store.add("Chile", "1", "1", "america").unwrap();
        assert_eq!(
            store.confirm_removal(handle),
            Err(Error::StaleHandle("Argentina".to_string()))
        );
        assert_eq!(store.len(), 4);
    }

    #[test]
    fn test_blank_name_is_invalid_input() {
        fn blank<T>() -> Result<T> {
            Err(Error::invalid(Field::Name, "must not be empty"))
        }

        let mut store = store();
        assert_eq!(store.find_for_removal("  "), blank());
        assert_eq!(store.lookup(""), blank());
        assert_eq!(store.update(" ", &CountryUpdate::new().area("1")), blank());
        assert_eq!(store.lookup(" peru "), Ok(&store.as_slice()[2]));
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_sort_store_in_place() {
        let mut store = store();
        store.sort_by(SortField::Population, Order::Descending);
        assert_eq!(names(&store), ["Japón", "Argentina", "Perú"]);

        store.sort_by(SortField::Name, Order::Ascending);
        assert_eq!(names(&store), ["Argentina", "Japón", "Perú"]);
    }

    #[test]
    fn test_parse_count() {
        assert_eq!(parse_count(Field::Area, " 42 "), Ok(42));
        assert_eq!(parse_count(Field::Area, "0"), Ok(0));
        assert_eq!(
            parse_count(Field::Area, ""),
            Err(Error::invalid(Field::Area, "must not be empty"))
        );
        assert_eq!(
            parse_count(Field::Area, "1.5"),
            Err(Error::invalid(Field::Area, "\"1.5\" is not a whole number"))
        );
    }
}
