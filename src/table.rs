//! Plain-text rendering of records and statistics.

use std::fmt::Write;

use atlas::prelude::*;

const NAME_WIDTH: usize = 35;
const NUMBER_WIDTH: usize = 18;
const CONTINENT_WIDTH: usize = 15;
const RULE_WIDTH: usize = 90;

/// Render records as a fixed-width table.
pub fn render_table<'a, I>(records: I) -> String
where
    I: IntoIterator<Item = &'a Country>,
{
    let mut records = records.into_iter().peekable();
    if records.peek().is_none() {
        return "No countries to show.\n".to_string();
    }

    let mut out = String::new();
    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    let _ = writeln!(
        out,
        "{:<NAME_WIDTH$}{:<NUMBER_WIDTH$}{:<NUMBER_WIDTH$}{:<CONTINENT_WIDTH$}",
        "Name", "Population", "Area", "Continent"
    );
    let _ = writeln!(out, "{}", "-".repeat(RULE_WIDTH));

    for country in records {
        let _ = writeln!(
            out,
            "{:<NAME_WIDTH$}{:<NUMBER_WIDTH$}{:<NUMBER_WIDTH$}{:<CONTINENT_WIDTH$}",
            country.name(),
            country.population(),
            country.area(),
            capitalize(country.continent())
        );
    }

    let _ = writeln!(out, "{}", "=".repeat(RULE_WIDTH));
    out
}

/// Render computed statistics as labelled lines.
pub fn render_statistics(stats: &Statistics<'_>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "--- Statistics ---");
    let _ = writeln!(
        out,
        "Highest population: {} ({})",
        stats.max_population.name(),
        stats.max_population.population()
    );
    let _ = writeln!(
        out,
        "Lowest population: {} ({})",
        stats.min_population.name(),
        stats.min_population.population()
    );
    let _ = writeln!(out, "Mean population: {}", stats.mean_population);
    let _ = writeln!(out, "Mean area: {}", stats.mean_area);
    let _ = writeln!(out);
    let _ = writeln!(out, "Countries per continent:");
    for entry in &stats.counts_by_continent {
        let _ = writeln!(out, "{}: {}", capitalize(&entry.continent), entry.count);
    }
    out
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(text: &str) -> String {
    let mut chars = text.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}
