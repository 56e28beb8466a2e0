//! # shelfmatch
//!
//! Book recommendations for a personal library, in two modes:
//!
//! - **More like this**: rank every other book by TF-IDF cosine similarity
//!   of its title, authors, categories, description and subtitle
//! - **By preference**: turn chosen categories and minimum rating / year
//!   into a query vector and return its nearest neighbors over authors,
//!   categories, title, year and rating
//!
//! ## Quick Start
//!
//! ### As a CLI
//!
//! ```bash
//! shelfmatch --library books.csv similar 9780441172719 --top 5
//! shelfmatch --library books.csv prefer --category Fantasy --min-rating 4 --year-from 1990
//! ```
//!
//! ### As a Library
//!
//! ```rust,no_run
//! use shelfmatch::prelude::*;
//!
//! let recommender = Recommender::with_defaults(CsvCorpus::new("books.csv"));
//!
//! let similar = recommender.recommend_similar("9780441172719", 5).unwrap();
//! for (book, score) in &similar {
//!     println!("{score:.3} {}", book.title());
//! }
//!
//! let preference = Preference::new().with_category("Fantasy").with_min_rating(4.0);
//! let picks = recommender.recommend_by_preference(&preference, 6).unwrap();
//! ```
//!
//! ## Crate Structure
//!
//! - `shelfmatch-core` - vectorizers, similarity structures, recommendation service
//! - `shelfmatch-storage` - CSV corpus with an explicit column schema

// Re-export core types
pub use shelfmatch_core::{
    category_counts, tally_titles, BookRecord, CorpusSource, Error, FittedModel, Generation,
    HybridVector, InMemoryCorpus, Preference, Recommender, RecommenderConfig, Result, TextField,
};

// Re-export storage
pub use shelfmatch_storage::CsvCorpus;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::{
        BookRecord, CorpusSource, CsvCorpus, Error, Generation, InMemoryCorpus, Preference,
        Recommender, RecommenderConfig, Result,
    };
}
