//! # shelfmatch Storage
//!
//! CSV persistence for the book corpus. [`CsvCorpus`] implements
//! [`shelfmatch_core::CorpusSource`], so a recommender reads the file afresh
//! on every refresh.

pub mod csv_corpus;
pub mod error;

pub use csv_corpus::{read_books, write_books, CsvCorpus, COLUMNS, ID_COLUMN};
pub use error::{Error, Result};
