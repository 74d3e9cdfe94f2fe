//! Interactive text menu.
//!
//! Every store error is printed and the menu loops; only choosing `0` or
//! reaching the end of input leaves it. Mutations are saved immediately.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use atlas::prelude::*;

use crate::table::{render_statistics, render_table};

/// A menu session over one store and its data file.
pub struct Menu<R, W> {
    input: R,
    output: W,
    store: RecordStore,
    path: PathBuf,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(input: R, output: W, store: RecordStore, path: PathBuf) -> Self {
        Self {
            input,
            output,
            store,
            path,
        }
    }

    /// Consume the session and return the store.
    pub fn into_store(self) -> RecordStore {
        self.store
    }

    /// Run until the user exits or input ends.
    pub fn run(&mut self) -> io::Result<()> {
        loop {
            writeln!(self.output)?;
            writeln!(self.output, "===== Atlas =====")?;
            writeln!(self.output, "1. Search countries")?;
            writeln!(self.output, "2. Filter countries")?;
            writeln!(self.output, "3. Sort countries")?;
            writeln!(self.output, "4. Show statistics")?;
            writeln!(self.output, "5. Show all")?;
            writeln!(self.output, "6. Add country")?;
            writeln!(self.output, "7. Update country")?;
            writeln!(self.output, "8. Remove country")?;
            writeln!(self.output, "0. Exit")?;

            let Some(choice) = self.prompt("Option: ")? else {
                return Ok(());
            };

            let flow = match choice.as_str() {
                "1" => self.search()?,
                "2" => self.filter()?,
                "3" => self.sort()?,
                "4" => self.statistics()?,
                "5" => {
                    let table = render_table(&self.store);
                    self.output.write_all(table.as_bytes())?;
                    Flow::Continue
                }
                "6" => self.add()?,
                "7" => self.update()?,
                "8" => self.remove()?,
                "0" => {
                    writeln!(self.output, "Goodbye.")?;
                    return Ok(());
                }
                _ => {
                    writeln!(self.output, "Invalid option.")?;
                    Flow::Continue
                }
            };

            if flow == Flow::Eof {
                return Ok(());
            }
        }
    }

    /// Print `label` and read one trimmed line; `None` at end of input.
    fn prompt(&mut self, label: &str) -> io::Result<Option<String>> {
        write!(self.output, "{label}")?;
        self.output.flush()?;

        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim().to_string()))
    }

    fn prompt_number(&mut self, label: &str) -> io::Result<Option<Option<u64>>> {
        Ok(self.prompt(label)?.map(|raw| raw.parse().ok()))
    }

    fn search(&mut self) -> io::Result<Flow> {
        let Some(text) = self.prompt("Search: ")? else {
            return Ok(Flow::Eof);
        };
        let table = render_table(self.store.query().search(&text));
        self.output.write_all(table.as_bytes())?;
        Ok(Flow::Continue)
    }

    fn filter(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "1. By continent")?;
        writeln!(self.output, "2. By population range")?;
        writeln!(self.output, "3. By area range")?;
        let Some(choice) = self.prompt("Option: ")? else {
            return Ok(Flow::Eof);
        };

        match choice.as_str() {
            "1" => {
                let Some(continent) = self.prompt("Continent: ")? else {
                    return Ok(Flow::Eof);
                };
                let table = render_table(self.store.query().continent(&continent));
                self.output.write_all(table.as_bytes())?;
            }
            "2" | "3" => {
                let Some(min) = self.prompt_number("Min: ")? else {
                    return Ok(Flow::Eof);
                };
                let Some(max) = self.prompt_number("Max: ")? else {
                    return Ok(Flow::Eof);
                };
                let (Some(min), Some(max)) = (min, max) else {
                    writeln!(self.output, "Invalid number.")?;
                    return Ok(Flow::Continue);
                };

                let query = self.store.query();
                let rows = if choice == "2" {
                    query.population_range(min, max)
                } else {
                    query.area_range(min, max)
                };
                match rows {
                    Ok(rows) => {
                        let table = render_table(rows);
                        self.output.write_all(table.as_bytes())?;
                    }
                    Err(e) => writeln!(self.output, "{e}")?,
                }
            }
            _ => writeln!(self.output, "Invalid option.")?,
        }

        Ok(Flow::Continue)
    }

    fn sort(&mut self) -> io::Result<Flow> {
        writeln!(self.output, "1. By name")?;
        writeln!(self.output, "2. By population")?;
        writeln!(self.output, "3. By area")?;
        let Some(choice) = self.prompt("Option: ")? else {
            return Ok(Flow::Eof);
        };
        let field = match choice.as_str() {
            "1" => SortField::Name,
            "2" => SortField::Population,
            "3" => SortField::Area,
            _ => {
                writeln!(self.output, "Invalid option.")?;
                return Ok(Flow::Continue);
            }
        };

        let Some(descending) = self.prompt("Descending? (y/n): ")? else {
            return Ok(Flow::Eof);
        };
        let order = if descending.eq_ignore_ascii_case("y") {
            Order::Descending
        } else {
            Order::Ascending
        };

        let table = render_table(self.store.query().sort_by(field, order));
        self.output.write_all(table.as_bytes())?;
        Ok(Flow::Continue)
    }

    fn statistics(&mut self) -> io::Result<Flow> {
        match compute_statistics(&self.store) {
            Ok(stats) => {
                let text = render_statistics(&stats);
                self.output.write_all(text.as_bytes())?;
            }
            Err(e) => writeln!(self.output, "{e}")?,
        }
        Ok(Flow::Continue)
    }

    fn add(&mut self) -> io::Result<Flow> {
        let mut answers = Vec::with_capacity(4);
        for label in ["Name: ", "Population: ", "Area: ", "Continent: "] {
            match self.prompt(label)? {
                Some(answer) => answers.push(answer),
                None => return Ok(Flow::Eof),
            }
        }

        match self
            .store
            .add(&answers[0], &answers[1], &answers[2], &answers[3])
        {
            Ok(country) => {
                let name = country.name().to_string();
                writeln!(self.output, "Added {name}.")?;
                self.save()?;
            }
            Err(e) => writeln!(self.output, "{e}")?,
        }
        Ok(Flow::Continue)
    }

    fn update(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Country to update: ")? else {
            return Ok(Flow::Eof);
        };
        let current = match self.store.lookup(&name) {
            Ok(country) => country.clone(),
            Err(e) => {
                writeln!(self.output, "{e}")?;
                return Ok(Flow::Continue);
            }
        };

        writeln!(self.output, "Leave a field empty to keep it.")?;
        let labels = [
            format!("Name ({}): ", current.name()),
            format!("Population ({}): ", current.population()),
            format!("Area ({}): ", current.area()),
            format!("Continent ({}): ", current.continent()),
        ];
        let mut answers = Vec::with_capacity(4);
        for label in &labels {
            match self.prompt(label)? {
                Some(answer) => answers.push(answer),
                None => return Ok(Flow::Eof),
            }
        }

        let mut answers = answers.into_iter();
        let changes = CountryUpdate {
            name: answers.next(),
            population: answers.next(),
            area: answers.next(),
            continent: answers.next(),
        };

        match self.store.update(current.name(), &changes) {
            Ok(report) => {
                for (field, error) in &report.rejected {
                    writeln!(self.output, "{error}; {field} left unchanged.")?;
                }
                if report.applied.is_empty() {
                    writeln!(self.output, "Nothing changed.")?;
                } else {
                    let renamed = report.applied.contains(&Field::Name);
                    let name = match changes.name.as_deref() {
                        Some(new_name) if renamed => new_name.trim(),
                        _ => current.name(),
                    };
                    writeln!(self.output, "Updated {name}.")?;
                    self.save()?;
                }
            }
            Err(e) => writeln!(self.output, "{e}")?,
        }
        Ok(Flow::Continue)
    }

    fn remove(&mut self) -> io::Result<Flow> {
        let Some(name) = self.prompt("Country to remove: ")? else {
            return Ok(Flow::Eof);
        };
        let handle = match self.store.find_for_removal(&name) {
            Ok(handle) => handle,
            Err(e) => {
                writeln!(self.output, "{e}")?;
                return Ok(Flow::Continue);
            }
        };

        let question = format!("Remove {}? (y/n): ", handle.name());
        let Some(answer) = self.prompt(&question)? else {
            return Ok(Flow::Eof);
        };
        if !answer.eq_ignore_ascii_case("y") {
            writeln!(self.output, "Cancelled.")?;
            return Ok(Flow::Continue);
        }

        match self.store.confirm_removal(handle) {
            Ok(removed) => {
                writeln!(self.output, "Removed {}.", removed.name())?;
                self.save()?;
            }
            Err(e) => writeln!(self.output, "{e}")?,
        }
        Ok(Flow::Continue)
    }

    /// Persist the store; a failure is reported and the session goes on.
    fn save(&mut self) -> io::Result<()> {
        if let Err(e) = atlas::save_store(&self.path, &self.store) {
            tracing::error!(path = %self.path.display(), error = %e, "save failed");
            writeln!(self.output, "Could not save {}: {e}", self.path.display())?;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Eof,
}
