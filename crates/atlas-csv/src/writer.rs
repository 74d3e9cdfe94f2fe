//! Saving records to CSV.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use atlas_common::Country;
use csv::{Terminator, WriterBuilder};
use tempfile::NamedTempFile;

use crate::{Error, Result, HEADER};

/// Save `records` to `path`, replacing the file completely.
///
/// If anything fails the previous file is untouched.
pub fn save<'a, P, I>(path: P, records: I) -> Result<()>
where
    P: AsRef<Path>,
    I: IntoIterator<Item = &'a Country>,
{
    let path = path.as_ref();
    let written = replace_file(path, |file| write_countries(file, records))?;

    tracing::debug!(path = %path.display(), records = written, "saved countries");
    Ok(())
}

/// Fill a temporary file in the same directory as `path`, then move it over
/// `path`. When `fill` fails the temporary file is discarded.
fn replace_file<T, F>(path: &Path, fill: F) -> Result<T>
where
    F: FnOnce(&mut File) -> Result<T>,
{
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut tmp = NamedTempFile::new_in(dir)?;
    let value = fill(tmp.as_file_mut())?;

    // Keep the permissions of the file being replaced.
    if let Ok(meta) = fs::metadata(path) {
        tmp.as_file().set_permissions(meta.permissions())?;
    }
    tmp.as_file().sync_all()?;
    tmp.persist(path).map_err(|e| Error::Io(e.error))?;

    Ok(value)
}

/// Write the header and one row per record to `sink`.
///
/// Returns the number of records written.
pub fn write_countries<'a, W, I>(sink: W, records: I) -> Result<usize>
where
    W: Write,
    I: IntoIterator<Item = &'a Country>,
{
    let mut writer = WriterBuilder::new()
        .terminator(Terminator::Any(b'\n'))
        .from_writer(sink);

    writer.write_record(HEADER)?;

    let mut count = 0;
    for country in records {
        let population = country.population().to_string();
        let area = country.area().to_string();
        writer.write_record([
            country.name(),
            population.as_str(),
            area.as_str(),
            country.continent(),
        ])?;
        count += 1;
    }

    writer.flush()?;
    Ok(count)
}
