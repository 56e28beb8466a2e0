//! CSV-backed corpus
//!
//! The column schema is fixed and checked once, when the header is read.
//! Numeric cells are parsed here and nowhere else: downstream code only ever
//! sees `Option<i32>` / `Option<f64>`.

use crate::{Error, Result};
use atomicwrites::{AtomicFile, OverwriteBehavior};
use shelfmatch_core::{BookRecord, CorpusSource};
use std::collections::HashSet;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

pub const ID_COLUMN: &str = "isbn13";

/// Columns written by [`CsvCorpus::save`], in order
pub const COLUMNS: &[&str] = &[
    ID_COLUMN,
    "title",
    "subtitle",
    "authors",
    "categories",
    "description",
    "published_year",
    "average_rating",
];

const DEFAULT_TITLE: &str = "Untitled";
const DEFAULT_AUTHORS: &str = "Unknown";
const DEFAULT_CATEGORIES: &str = "Unknown";

/// Header positions of the known columns. Only the id is required.
#[derive(Debug, Clone, Copy)]
struct ColumnMap {
    id: usize,
    title: Option<usize>,
    subtitle: Option<usize>,
    authors: Option<usize>,
    categories: Option<usize>,
    description: Option<usize>,
    published_year: Option<usize>,
    average_rating: Option<usize>,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };

        Ok(Self {
            id: find(ID_COLUMN).ok_or_else(|| Error::MissingColumn(ID_COLUMN.to_string()))?,
            title: find("title"),
            subtitle: find("subtitle"),
            authors: find("authors"),
            categories: find("categories"),
            description: find("description"),
            published_year: find("published_year"),
            average_rating: find("average_rating"),
        })
    }
}

/// Books stored in a CSV file, re-read on every snapshot
#[derive(Debug, Clone)]
pub struct CsvCorpus {
    path: PathBuf,
}

impl CsvCorpus {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Vec<BookRecord>> {
        let file = std::fs::File::open(&self.path)?;
        let books = read_books(file)?;
        info!(path = %self.path.display(), books = books.len(), "Loaded library");
        Ok(books)
    }

    /// Overwrite the file atomically with `books`
    pub fn save(&self, books: &[BookRecord]) -> Result<()> {
        AtomicFile::new(&self.path, OverwriteBehavior::AllowOverwrite)
            .write(|file| write_books(file, books))
            .map_err(|e| match e {
                atomicwrites::Error::Internal(io) => Error::Io(io),
                atomicwrites::Error::User(e) => e,
            })?;
        info!(path = %self.path.display(), books = books.len(), "Saved library");
        Ok(())
    }
}

impl CorpusSource for CsvCorpus {
    fn snapshot(&self) -> shelfmatch_core::Result<Vec<BookRecord>> {
        Ok(self.load()?)
    }
}

/// Parse books from CSV with a header row.
pub fn read_books<R: Read>(reader: R) -> Result<Vec<BookRecord>> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = ColumnMap::from_headers(reader.headers()?)?;
    let mut seen: HashSet<String> = HashSet::new();
    let mut books = Vec::new();

    for result in reader.records() {
        let record = result?;
        let line = record.position().map(|p| p.line()).unwrap_or(0);
        let book = parse_record(&record, &columns, line)?;

        if !seen.insert(book.id.clone()) {
            return Err(Error::DuplicateId { line, id: book.id });
        }
        books.push(book);
    }

    debug!(rows = books.len(), "Parsed CSV records");
    Ok(books)
}

/// Write books with the [`COLUMNS`] header.
pub fn write_books<W: Write>(writer: W, books: &[BookRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(COLUMNS)?;

    for book in books {
        let year = book.published_year.map(|y| y.to_string()).unwrap_or_default();
        let rating = book.average_rating.map(|r| r.to_string()).unwrap_or_default();
        writer.write_record([
            book.id.as_str(),
            book.title(),
            book.subtitle(),
            book.authors(),
            book.categories(),
            book.description(),
            year.as_str(),
            rating.as_str(),
        ])?;
    }

    writer.flush()?;
    Ok(())
}

fn parse_record(record: &csv::StringRecord, columns: &ColumnMap, line: u64) -> Result<BookRecord> {
    let cell = |idx: Option<usize>| {
        idx.and_then(|i| record.get(i))
            .map(str::trim)
            .filter(|s| !s.is_empty())
    };

    let id = cell(Some(columns.id)).ok_or_else(|| Error::InvalidField {
        line,
        column: ID_COLUMN.to_string(),
        value: String::new(),
    })?;

    Ok(BookRecord {
        id: id.to_string(),
        title: Some(cell(columns.title).unwrap_or(DEFAULT_TITLE).to_string()),
        subtitle: cell(columns.subtitle).map(str::to_string),
        authors: Some(cell(columns.authors).unwrap_or(DEFAULT_AUTHORS).to_string()),
        categories: Some(cell(columns.categories).unwrap_or(DEFAULT_CATEGORIES).to_string()),
        description: cell(columns.description).map(str::to_string),
        published_year: cell(columns.published_year)
            .map(|v| parse_year(v, line))
            .transpose()?,
        average_rating: cell(columns.average_rating)
            .map(|v| parse_rating(v, line))
            .transpose()?,
    })
}

/// Integers, or floats with no fractional part ("1965.0")
fn parse_year(value: &str, line: u64) -> Result<i32> {
    let invalid = || Error::InvalidField {
        line,
        column: "published_year".to_string(),
        value: value.to_string(),
    };

    if let Ok(year) = value.parse::<i32>() {
        return Ok(year);
    }
    let year = value.parse::<f64>().map_err(|_| invalid())?;
    if year.is_finite() && year.fract() == 0.0 && year.abs() <= i32::MAX as f64 {
        Ok(year as i32)
    } else {
        Err(invalid())
    }
}

fn parse_rating(value: &str, line: u64) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(rating) if rating.is_finite() => Ok(rating),
        _ => Err(Error::InvalidField {
            line,
            column: "average_rating".to_string(),
            value: value.to_string(),
        }),
    }
}
