//! Feature composition
//!
//! Fits two text vectorizers and the numeric normalizer against one corpus
//! snapshot. Item-to-item similarity compares the content documents alone;
//! preference queries match hybrid vectors with the fixed layout
//! `[preference text..., year, rating]`.

use crate::config::{RecommenderConfig, TextField};
use crate::normalize::MinMaxNormalizer;
use crate::text::{TextVectorizer, TfidfModel};
use crate::{BookRecord, Error, HybridVector, Result, SparseVector};
use ahash::AHashMap;
use std::sync::Arc;

/// Numeric features in layout order: published year, average rating
pub const NUMERIC_FEATURES: usize = 2;

/// Separator placed between concatenated text fields
const FIELD_SEPARATOR: &str = " ";

/// Vectors produced by one fit, in corpus order
#[derive(Debug, Clone)]
pub struct ItemVectors {
    /// L2-normalized content documents, for item-to-item similarity
    pub content: Vec<SparseVector>,
    /// Preference text plus numeric slots, for the neighbor index
    pub hybrid: Vec<HybridVector>,
}

/// Vectorizers fitted on one snapshot, plus that snapshot's item order.
#[derive(Debug, Clone)]
pub struct FittedModel {
    content: TfidfModel,
    preference: TfidfModel,
    numeric: MinMaxNormalizer,
    config: RecommenderConfig,
    books: Arc<[BookRecord]>,
    index_of: AHashMap<String, usize>,
}

impl FittedModel {
    /// Fit all sub-models. The corpus order becomes the canonical
    /// index-to-item mapping for this model.
    pub fn fit(books: Vec<BookRecord>, config: &RecommenderConfig) -> Result<(Self, ItemVectors)> {
        config.validate()?;
        if books.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let mut index_of = AHashMap::with_capacity(books.len());
        for (idx, book) in books.iter().enumerate() {
            if index_of.insert(book.id.clone(), idx).is_some() {
                return Err(Error::DuplicateItem(book.id.clone()));
            }
        }

        let vectorizer = TextVectorizer::new().with_stop_words(config.stop_words);

        let documents: Vec<String> = books
            .iter()
            .map(|book| join_fields(book, &config.text_fields))
            .collect();
        let (content, content_vectors) = vectorizer.fit_transform(&documents)?;

        let meta: Vec<String> = books
            .iter()
            .map(|book| join_fields(book, &config.preference_fields))
            .collect();
        let (preference, preference_vectors) = vectorizer.fit_transform(&meta)?;

        let rows: Vec<Vec<Option<f64>>> = books.iter().map(numeric_row).collect();
        let numeric = MinMaxNormalizer::fit(&rows, NUMERIC_FEATURES)?;

        let text_dim = preference.vocabulary_size();
        let hybrid = preference_vectors
            .into_iter()
            .zip(rows.iter())
            .map(|(text, row)| HybridVector::new(text, text_dim, numeric.transform(row)))
            .collect();

        let model = Self {
            content,
            preference,
            numeric,
            config: config.clone(),
            books: books.into(),
            index_of,
        };
        let vectors = ItemVectors {
            content: content_vectors,
            hybrid,
        };
        Ok((model, vectors))
    }

    /// Content document vector for any book, fitted or not
    pub fn content_for_item(&self, book: &BookRecord) -> SparseVector {
        self.content.transform(&join_fields(book, &self.config.text_fields))
    }

    /// Hybrid vector for any book, fitted or not, in this model's layout
    pub fn compose_for_item(&self, book: &BookRecord) -> HybridVector {
        let text = self
            .preference
            .transform(&join_fields(book, &self.config.preference_fields));
        HybridVector::new(
            text,
            self.preference.vocabulary_size(),
            self.numeric.transform(&numeric_row(book)),
        )
    }

    /// Vector for an ad-hoc preference: `text` is treated as a pseudo-document,
    /// `year` and `rating` take the numeric slots.
    pub fn compose_for_query(
        &self,
        text: &str,
        year: Option<f64>,
        rating: Option<f64>,
    ) -> HybridVector {
        HybridVector::new(
            self.preference.transform(text),
            self.preference.vocabulary_size(),
            self.numeric.transform(&[year, rating]),
        )
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.books.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.books.is_empty()
    }

    pub fn books(&self) -> &[BookRecord] {
        &self.books
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index_of.get(id).copied()
    }

    /// Model over the content documents
    pub fn tfidf(&self) -> &TfidfModel {
        &self.content
    }

    /// Model over the preference fields
    pub fn preference_tfidf(&self) -> &TfidfModel {
        &self.preference
    }

    pub fn numeric(&self) -> &MinMaxNormalizer {
        &self.numeric
    }

    /// Dimension shared by every hybrid vector this model produces
    #[inline]
    #[must_use]
    pub fn dim(&self) -> usize {
        self.preference.vocabulary_size() + NUMERIC_FEATURES
    }
}

fn join_fields(book: &BookRecord, fields: &[TextField]) -> String {
    fields
        .iter()
        .map(|field| field.read(book))
        .collect::<Vec<_>>()
        .join(FIELD_SEPARATOR)
}

fn numeric_row(book: &BookRecord) -> Vec<Option<f64>> {
    vec![book.published_year.map(f64::from), book.average_rating]
}
