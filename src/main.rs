//! Atlas CLI - Browse and edit a CSV file of country records.
//!
//! This is the main entry point for the Atlas command-line application.
//! Without a subcommand it opens the interactive menu.

mod menu;
mod table;

use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use atlas::prelude::*;

use crate::menu::Menu;
use crate::table::{render_statistics, render_table};

/// Atlas - country record manager
#[derive(Parser)]
#[command(name = "atlas")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the country CSV file
    #[arg(short, long, global = true, env = "ATLAS_DATA", default_value = "countries.csv")]
    data: PathBuf,

    /// Increase log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the interactive menu (default)
    Menu,

    /// List countries, optionally searched, filtered and sorted
    List {
        /// Keep names containing this text (case and accent insensitive)
        #[arg(short, long)]
        search: Option<String>,

        /// Keep countries on this continent
        #[arg(short, long)]
        continent: Option<String>,

        /// Minimum population (inclusive)
        #[arg(long)]
        min_population: Option<u64>,

        /// Maximum population (inclusive)
        #[arg(long)]
        max_population: Option<u64>,

        /// Minimum area (inclusive)
        #[arg(long)]
        min_area: Option<u64>,

        /// Maximum area (inclusive)
        #[arg(long)]
        max_area: Option<u64>,

        /// Sort field
        #[arg(long, value_enum)]
        sort: Option<SortKey>,

        /// Sort in descending order
        #[arg(long, requires = "sort")]
        desc: bool,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Show population and area statistics
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Add a country
    Add {
        /// Country name
        #[arg(short, long)]
        name: String,

        /// Population
        #[arg(short, long)]
        population: String,

        /// Area in square kilometres
        #[arg(short, long)]
        area: String,

        /// Continent
        #[arg(short, long)]
        continent: String,
    },

    /// Update fields of an existing country
    Update {
        /// Country to update
        country: String,

        /// New name
        #[arg(long)]
        rename: Option<String>,

        /// New population
        #[arg(short, long)]
        population: Option<String>,

        /// New area
        #[arg(short, long)]
        area: Option<String>,

        /// New continent
        #[arg(short, long)]
        continent: Option<String>,
    },

    /// Remove a country
    Remove {
        /// Country to remove
        country: String,

        /// Confirm the removal
        #[arg(short, long)]
        yes: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SortKey {
    Name,
    Population,
    Area,
}

impl From<SortKey> for SortField {
    fn from(key: SortKey) -> Self {
        match key {
            SortKey::Name => SortField::Name,
            SortKey::Population => SortField::Population,
            SortKey::Area => SortField::Area,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let data = cli.data.as_path();
    match cli.command.unwrap_or(Commands::Menu) {
        Commands::Menu => cmd_menu(data)?,
        Commands::List {
            search,
            continent,
            min_population,
            max_population,
            min_area,
            max_area,
            sort,
            desc,
            json,
        } => {
            let filters = ListFilters {
                search,
                continent,
                population: range(min_population, max_population),
                area: range(min_area, max_area),
                sort: sort.map(|key| {
                    let order = if desc { Order::Descending } else { Order::Ascending };
                    (key.into(), order)
                }),
            };
            cmd_list(data, &filters, json)?;
        }
        Commands::Stats { json } => cmd_stats(data, json)?,
        Commands::Add {
            name,
            population,
            area,
            continent,
        } => cmd_add(data, &name, &population, &area, &continent)?,
        Commands::Update {
            country,
            rename,
            population,
            area,
            continent,
        } => {
            let changes = CountryUpdate {
                name: rename,
                population,
                area,
                continent,
            };
            cmd_update(data, &country, &changes)?;
        }
        Commands::Remove { country, yes } => cmd_remove(data, &country, yes)?,
    }

    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_writer(io::stderr)
        .try_init();
}

/// Load the store, starting empty when the file does not exist yet.
fn open_store(path: &Path) -> Result<RecordStore> {
    match atlas::load_store(path) {
        Ok((store, _skipped)) => Ok(store),
        Err(e) if e.is_not_found() => {
            tracing::warn!(path = %path.display(), "data file not found, starting empty");
            Ok(RecordStore::new())
        }
        Err(e) => Err(e).with_context(|| format!("Failed to load {}", path.display())),
    }
}

fn save(path: &Path, store: &RecordStore) -> Result<()> {
    atlas::save_store(path, store).with_context(|| format!("Failed to save {}", path.display()))
}

fn cmd_menu(path: &Path) -> Result<()> {
    let store = open_store(path)?;
    let stdin = io::stdin();
    let mut menu = Menu::new(stdin.lock(), io::stdout(), store, path.to_path_buf());
    menu.run().context("Menu I/O failed")?;

    let store = menu.into_store();
    tracing::debug!(countries = store.len(), "menu closed");
    Ok(())
}

/// Inclusive bounds; a missing side is open.
fn range(min: Option<u64>, max: Option<u64>) -> Option<(u64, u64)> {
    if min.is_none() && max.is_none() {
        return None;
    }
    Some((min.unwrap_or(0), max.unwrap_or(u64::MAX)))
}

struct ListFilters {
    search: Option<String>,
    continent: Option<String>,
    population: Option<(u64, u64)>,
    area: Option<(u64, u64)>,
    sort: Option<(SortField, Order)>,
}

fn apply_filters<'a>(store: &'a RecordStore, filters: &ListFilters) -> Result<Query<'a>> {
    let mut query = store.query();
    if let Some(text) = &filters.search {
        query = query.search(text);
    }
    if let Some(continent) = &filters.continent {
        query = query.continent(continent);
    }
    if let Some((min, max)) = filters.population {
        query = query.population_range(min, max)?;
    }
    if let Some((min, max)) = filters.area {
        query = query.area_range(min, max)?;
    }
    if let Some((field, order)) = filters.sort {
        query = query.sort_by(field, order);
    }
    Ok(query)
}

fn cmd_list(path: &Path, filters: &ListFilters, json: bool) -> Result<()> {
    let store = open_store(path)?;
    let rows = apply_filters(&store, filters)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&rows.into_vec())?);
    } else {
        print!("{}", render_table(rows));
    }

    Ok(())
}

fn cmd_stats(path: &Path, json: bool) -> Result<()> {
    let store = open_store(path)?;
    let stats = compute_statistics(&store)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        print!("{}", render_statistics(&stats));
    }

    Ok(())
}

fn cmd_add(path: &Path, name: &str, population: &str, area: &str, continent: &str) -> Result<()> {
    let mut store = open_store(path)?;
    let added = store.add(name, population, area, continent)?.name().to_string();
    save(path, &store)?;

    println!("Added {added}");
    Ok(())
}

fn cmd_update(path: &Path, country: &str, changes: &CountryUpdate) -> Result<()> {
    let mut store = open_store(path)?;
    let report = store.update(country, changes)?;

    for (field, error) in &report.rejected {
        eprintln!("{error}; {field} left unchanged");
    }
    if report.applied.is_empty() {
        println!("Nothing changed");
        return Ok(());
    }

    save(path, &store)?;
    let fields: Vec<String> = report.applied.iter().map(Field::to_string).collect();
    println!("Updated {}", fields.join(", "));
    Ok(())
}

fn cmd_remove(path: &Path, country: &str, yes: bool) -> Result<()> {
    let mut store = open_store(path)?;
    let handle = store.find_for_removal(country)?;

    if !yes {
        anyhow::bail!("refusing to remove {} without --yes", handle.name());
    }

    let removed = store.confirm_removal(handle)?;
    save(path, &store)?;

    println!("Removed {}", removed.name());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write_sample(dir: &Path) -> PathBuf {
        let path = dir.join("countries.csv");
        fs::write(
            &path,
            "name,population,area,continent\n\
             Argentina,45376763,2780400,america\n\
             Japón,125800000,377975,asia\n\
             Perú,34000000,1285216,america\n",
        )
        .unwrap();
        path
    }

    fn names(query: Query<'_>) -> Vec<&str> {
        query.into_iter().map(Country::name).collect()
    }

    #[test]
    fn test_cli_parses() {
        use clap::CommandFactory;
        Cli::command().debug_assert();

        let cli = Cli::parse_from(["atlas", "list", "--sort", "area", "--desc"]);
        assert!(matches!(
            cli.command,
            Some(Commands::List { sort: Some(SortKey::Area), desc: true, .. })
        ));
        assert_eq!(cli.data, PathBuf::from("countries.csv"));
    }

    #[test]
    fn test_range_bounds() {
        assert_eq!(range(None, None), None);
        assert_eq!(range(Some(5), None), Some((5, u64::MAX)));
        assert_eq!(range(None, Some(9)), Some((0, 9)));
    }

    #[test]
    fn test_list_filters_chain() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&write_sample(dir.path())).unwrap();

        let filters = ListFilters {
            search: None,
            continent: Some("AMÉRICA".to_string()),
            population: range(Some(1), None),
            area: None,
            sort: Some((SortField::Population, Order::Ascending)),
        };
        assert_eq!(
            names(apply_filters(&store, &filters).unwrap()),
            ["Perú", "Argentina"]
        );

        let inverted = ListFilters {
            search: None,
            continent: None,
            population: None,
            area: range(Some(10), Some(1)),
            sort: None,
        };
        assert!(apply_filters(&store, &inverted).is_err());
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = open_store(&dir.path().join("countries.csv")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_update_remove_commands() {
        let dir = tempfile::tempdir().unwrap();
        let path = write_sample(dir.path());

        cmd_add(&path, "Uruguay", "3500000", "176215", "América").unwrap();
        assert!(cmd_add(&path, "URUGUAY", "1", "1", "america").is_err());

        let changes = CountryUpdate::new().population("3600000");
        cmd_update(&path, "uruguay", &changes).unwrap();
        let store = open_store(&path).unwrap();
        assert_eq!(store.find("Uruguay").unwrap().population(), 3_600_000);

        assert!(cmd_remove(&path, "japon", false).is_err());
        assert_eq!(open_store(&path).unwrap().len(), 4);

        cmd_remove(&path, "japon", true).unwrap();
        let store = open_store(&path).unwrap();
        assert_eq!(store.len(), 3);
        assert!(store.find("Japón").is_none());
    }
}
