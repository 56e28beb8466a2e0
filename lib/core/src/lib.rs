//! # shelfmatch Core
//!
//! Hybrid content-similarity engine behind shelfmatch.
//!
//! Book records (free text plus year and rating) are turned into comparable
//! vectors and indexed two ways:
//!
//! - [`TextVectorizer`] - TF-IDF over a learned vocabulary, L2-normalized
//! - [`MinMaxNormalizer`] - per-feature `[0, 1]` scaling with clipping
//! - [`FittedModel`] - both of the above fitted on one corpus snapshot,
//!   producing content documents and [`HybridVector`]s with layout
//!   `[preference text..., year, rating]`
//! - [`SimilarityMatrix`] - dense pairwise cosine scores over content
//!   documents for "more like this"
//! - [`NeighborIndex`] - cosine-distance nearest neighbors for preference queries
//! - [`Recommender`] - owns the published [`Generation`] and swaps it
//!   atomically on refresh
//!
//! ## Example
//!
//! ```rust
//! use shelfmatch_core::{BookRecord, InMemoryCorpus, Preference, Recommender};
//!
//! let corpus = InMemoryCorpus::new(vec![
//!     BookRecord::new("A").with_title("Dune").with_authors("Herbert").with_categories("SciFi"),
//!     BookRecord::new("B").with_title("Dune Messiah").with_authors("Herbert").with_categories("SciFi"),
//!     BookRecord::new("C").with_title("Emma").with_authors("Austen").with_categories("Romance"),
//! ]);
//! let recommender = Recommender::with_defaults(corpus);
//!
//! let similar = recommender.recommend_similar("A", 2).unwrap();
//! assert_eq!(similar[0].0.id, "B");
//!
//! let preference = Preference::new().with_category("Romance");
//! let nearest = recommender.recommend_by_preference(&preference, 1).unwrap();
//! assert_eq!(nearest[0].0.id, "C");
//! ```

pub mod book;
pub mod composer;
pub mod config;
pub mod corpus;
pub mod error;
pub mod neighbors;
pub mod normalize;
pub mod service;
pub mod similarity;
pub mod stats;
pub mod text;
pub mod vector;

pub use book::BookRecord;
pub use composer::{FittedModel, ItemVectors, NUMERIC_FEATURES};
pub use config::{RecommenderConfig, TextField};
pub use corpus::{CorpusSource, InMemoryCorpus};
pub use error::{Error, Result};
pub use neighbors::NeighborIndex;
pub use normalize::{FeatureRange, MinMaxNormalizer};
pub use service::{Generation, Preference, Recommender};
pub use similarity::SimilarityMatrix;
pub use stats::{category_counts, tally_titles};
pub use text::{TextVectorizer, TfidfModel, ENGLISH_STOP_WORDS};
pub use vector::{HybridVector, SparseVector};
