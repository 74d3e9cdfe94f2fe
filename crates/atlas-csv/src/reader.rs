//! Loading records from CSV.

use std::fs::File;
use std::io::{self, BufRead, BufReader, Read};
use std::path::Path;

use atlas_common::Country;
use csv::{ErrorKind, Position, ReaderBuilder, StringRecord};

use crate::{Error, Result, SkipReason, SkippedRow};

/// The outcome of a load: the good records plus every row that was dropped.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Loaded {
    /// Records in file order.
    pub records: Vec<Country>,
    /// 1-based source line of each record, parallel to `records`.
    pub lines: Vec<u64>,
    /// Malformed rows, in file order.
    pub skipped: Vec<SkippedRow>,
}

/// Load records from the file at `path`.
///
/// A missing file is reported as [`Error::FileNotFound`], distinct from an
/// empty file (which loads as zero records).
pub fn load<P: AsRef<Path>>(path: P) -> Result<Loaded> {
    let path = path.as_ref();

    let file = match File::open(path) {
        Ok(file) => file,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(Error::FileNotFound(path.to_path_buf()));
        }
        Err(e) => return Err(e.into()),
    };

    let loaded = read_countries(file)?;
    tracing::debug!(
        path = %path.display(),
        records = loaded.records.len(),
        skipped = loaded.skipped.len(),
        "loaded countries"
    );
    Ok(loaded)
}

/// Read records from any CSV source.
///
/// The first physical line is the header. It is consumed as raw bytes and
/// never validated, even when blank.
pub fn read_countries<R: Read>(source: R) -> Result<Loaded> {
    let mut source = BufReader::new(source);
    let mut header = Vec::new();
    source.read_until(b'\n', &mut header)?;

    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(source);

    let mut loaded = Loaded::default();

    for row in reader.records() {
        let row = match row {
            Ok(row) => row,
            Err(e) => {
                if let ErrorKind::Utf8 { pos, .. } = e.kind() {
                    skip(&mut loaded, source_line(pos.as_ref()), SkipReason::InvalidUtf8);
                    continue;
                }
                return Err(e.into());
            }
        };

        let line = source_line(row.position());
        match parse_row(&row) {
            Ok(country) => {
                loaded.records.push(country);
                loaded.lines.push(line);
            }
            Err(reason) => skip(&mut loaded, line, reason),
        }
    }

    Ok(loaded)
}

/// Line in the original source; the csv reader starts counting after the header.
fn source_line(pos: Option<&Position>) -> u64 {
    pos.map_or(0, |p| p.line() + 1)
}

fn skip(loaded: &mut Loaded, line: u64, reason: SkipReason) {
    tracing::warn!(line, %reason, "skipping malformed row");
    loaded.skipped.push(SkippedRow { line, reason });
}

fn parse_row(row: &StringRecord) -> std::result::Result<Country, SkipReason> {
    if row.len() != 4 {
        return Err(SkipReason::FieldCount(row.len()));
    }

    let population = parse_count("population", &row[1])?;
    let area = parse_count("area", &row[2])?;

    Country::new(&row[0], population, area, &row[3]).map_err(|_| SkipReason::EmptyName)
}

fn parse_count(column: &'static str, raw: &str) -> std::result::Result<u64, SkipReason> {
    raw.trim().parse().map_err(|_| SkipReason::InvalidNumber {
        column,
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn read(text: &str) -> Loaded {
        read_countries(text.as_bytes()).unwrap()
    }

    #[test]
    fn test_reads_rows_in_order() {
        let loaded = read(
            "name,population,area,continent\n\
             Argentina,45376763,2780400,América\n\
             Japón, 125800000 ,377975,ASIA\n",
        );

        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.lines, [2, 3]);
        assert_eq!(
            loaded.records,
            vec![
                Country::new("Argentina", 45_376_763, 2_780_400, "america").unwrap(),
                Country::new("Japón", 125_800_000, 377_975, "asia").unwrap(),
            ]
        );
    }

    #[test]
    fn test_header_is_never_validated() {
        let loaded = read("whatever;is;here\nChile,1,2,America\n");
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].name(), "Chile");
    }

    #[test]
    fn test_malformed_rows_are_skipped() {
        let loaded = read(
            "name,population,area,continent\n\
             Peru,1,2\n\
             Chile,many,2,America\n\
             Bolivia,1,-3,America\n\
             ,1,2,America\n\
             Uruguay,3,4,America,extra\n\
             Paraguay,5,6,America\n",
        );

        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].name(), "Paraguay");
        assert_eq!(loaded.lines, [7]);
        assert_eq!(
            loaded.skipped,
            vec![
                SkippedRow { line: 2, reason: SkipReason::FieldCount(3) },
                SkippedRow {
                    line: 3,
                    reason: SkipReason::InvalidNumber {
                        column: "population",
                        value: "many".to_string()
                    }
                },
                SkippedRow {
                    line: 4,
                    reason: SkipReason::InvalidNumber {
                        column: "area",
                        value: "-3".to_string()
                    }
                },
                SkippedRow { line: 5, reason: SkipReason::EmptyName },
                SkippedRow { line: 6, reason: SkipReason::FieldCount(5) },
            ]
        );
    }

    #[test]
    fn test_quoted_fields() {
        let loaded = read(
            "name,population,area,continent\n\
             \"Korea, Republic of\",51000000,100210,asia\n\
             \"The \"\"Big\"\" One\",1,1,oceania\n",
        );

        assert!(loaded.skipped.is_empty());
        assert_eq!(loaded.records[0].name(), "Korea, Republic of");
        assert_eq!(loaded.records[1].name(), "The \"Big\" One");
    }

    #[test]
    fn test_invalid_utf8_row_is_skipped() {
        let mut bytes = b"name,population,area,continent\n".to_vec();
        bytes.extend_from_slice(b"Bad\xff,1,1,asia\n");
        bytes.extend_from_slice(b"Good,2,2,asia\n");

        let loaded = read_countries(&bytes[..]).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.records[0].name(), "Good");
        assert_eq!(loaded.skipped.len(), 1);
        assert_eq!(loaded.skipped[0].reason, SkipReason::InvalidUtf8);
    }

    #[test]
    fn test_blank_first_line_is_the_header() {
        let loaded = read("\nChile,1,2,America\nPeru,3,4,America\n");
        let names: Vec<&str> = loaded.records.iter().map(Country::name).collect();
        assert_eq!(names, ["Chile", "Peru"]);
        assert_eq!(loaded.lines, [2, 3]);
        assert!(loaded.skipped.is_empty());
    }

    #[test]
    fn test_header_bytes_are_not_decoded() {
        let loaded = read_countries(&b"n\xffme;\"unclosed\nChile,1,2,America\n"[..]).unwrap();
        assert_eq!(loaded.records.len(), 1);
        assert_eq!(loaded.lines, [2]);
    }

    #[test]
    fn test_empty_source() {
        assert_eq!(read(""), Loaded::default());
        assert_eq!(read("name,population,area,continent\n"), Loaded::default());
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load(dir.path().join("absent.csv")).unwrap_err();
        assert!(err.is_not_found());
    }
}
