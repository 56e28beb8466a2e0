//! Recommendation service
//!
//! One [`Generation`] (fitted model + similarity structures) is published at
//! a time behind an `Arc`. Queries clone the `Arc` under a short read lock and
//! then run lock-free against that snapshot, so they never see a partially
//! built index and never block each other. Rebuilds are serialized by a
//! mutex and published with a single pointer swap.

use crate::composer::FittedModel;
use crate::config::RecommenderConfig;
use crate::neighbors::NeighborIndex;
use crate::similarity::SimilarityMatrix;
use crate::{stats, BookRecord, CorpusSource, Error, Result};
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Preference query: categories act as a pseudo-document, thresholds fill
/// the numeric slots.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Preference {
    #[serde(default)]
    pub categories: BTreeSet<String>,
    #[serde(default)]
    pub min_rating: Option<f64>,
    #[serde(default)]
    pub year_from: Option<i32>,
}

impl Preference {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.categories.insert(category.into());
        self
    }

    #[must_use]
    pub fn with_min_rating(mut self, rating: f64) -> Self {
        self.min_rating = Some(rating);
        self
    }

    #[must_use]
    pub fn with_year_from(mut self, year: i32) -> Self {
        self.year_from = Some(year);
        self
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(rating) = self.min_rating {
            if !rating.is_finite() {
                return Err(Error::InvalidArgument(format!(
                    "min_rating must be a finite number, got {}",
                    rating
                )));
            }
        }
        Ok(())
    }

    fn query_text(&self) -> String {
        self.categories
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// One complete, immutable fit of the model and its similarity structures.
#[derive(Debug)]
pub struct Generation {
    epoch: u64,
    model: FittedModel,
    matrix: SimilarityMatrix,
    neighbors: NeighborIndex,
}

impl Generation {
    pub fn build(epoch: u64, books: Vec<BookRecord>, config: &RecommenderConfig) -> Result<Self> {
        let (model, vectors) = FittedModel::fit(books, config)?;
        let matrix = SimilarityMatrix::build(&vectors.content, config.parallel_threshold);
        let neighbors = NeighborIndex::build(&vectors.hybrid);

        Ok(Self {
            epoch,
            model,
            matrix,
            neighbors,
        })
    }

    #[inline]
    #[must_use]
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.model.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.model.is_empty()
    }

    pub fn model(&self) -> &FittedModel {
        &self.model
    }

    pub fn books(&self) -> &[BookRecord] {
        self.model.books()
    }

    pub fn book(&self, id: &str) -> Option<&BookRecord> {
        self.model.index_of(id).map(|idx| &self.model.books()[idx])
    }

    fn position(&self, id: &str) -> Result<usize> {
        self.model
            .index_of(id)
            .ok_or_else(|| Error::ItemNotFound(id.to_string()))
    }

    /// Items most similar to `id`, descending by score in `[0, 1]`.
    pub fn similar_to(&self, id: &str, top_n: usize) -> Result<Vec<(BookRecord, f32)>> {
        check_top_n(top_n)?;
        let idx = self.position(id)?;
        Ok(self
            .matrix
            .similar_to(idx, top_n)
            .into_iter()
            .map(|(j, score)| (self.model.books()[j].clone(), score))
            .collect())
    }

    /// Items closest to a preference, ascending by cosine distance in `[0, 2]`.
    pub fn nearest_to(&self, preference: &Preference, top_n: usize) -> Result<Vec<(BookRecord, f32)>> {
        check_top_n(top_n)?;
        preference.validate()?;

        let query = self.model.compose_for_query(
            &preference.query_text(),
            preference.year_from.map(f64::from),
            preference.min_rating,
        );
        Ok(self
            .neighbors
            .nearest(&query, top_n)
            .into_iter()
            .map(|(j, distance)| (self.model.books()[j].clone(), distance))
            .collect())
    }

    /// Pairwise score between two items, self included
    pub fn similarity(&self, a: &str, b: &str) -> Result<f32> {
        let i = self.position(a)?;
        let j = self.position(b)?;
        Ok(self.matrix.score(i, j))
    }

    pub fn categories(&self) -> Vec<(String, usize)> {
        stats::category_counts(self.model.books())
    }
}

fn check_top_n(top_n: usize) -> Result<()> {
    if top_n == 0 {
        return Err(Error::InvalidArgument("top_n must be positive".to_string()));
    }
    Ok(())
}

/// Recommender over a corpus source, owning the published generation
pub struct Recommender<S: CorpusSource> {
    config: RecommenderConfig,
    source: S,
    current: RwLock<Option<Arc<Generation>>>,
    rebuild_lock: Mutex<()>,
    /// Sequence number of the most recently started rebuild
    rebuilds_started: AtomicU64,
}

impl<S: CorpusSource> Recommender<S> {
    pub fn new(source: S, config: RecommenderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::from_parts(source, config))
    }

    pub fn with_defaults(source: S) -> Self {
        Self::from_parts(source, RecommenderConfig::default())
    }

    fn from_parts(source: S, config: RecommenderConfig) -> Self {
        Self {
            config,
            source,
            current: RwLock::new(None),
            rebuild_lock: Mutex::new(()),
            rebuilds_started: AtomicU64::new(0),
        }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    /// Published generation, if any. Never builds.
    pub fn current(&self) -> Option<Arc<Generation>> {
        self.current.read().clone()
    }

    /// Published generation, building it on first use.
    pub fn generation(&self) -> Result<Arc<Generation>> {
        if let Some(generation) = self.current() {
            return Ok(generation);
        }

        let _guard = self.rebuild_lock.lock();
        if let Some(generation) = self.current() {
            return Ok(generation);
        }
        debug!("No generation published yet, building on first query");
        self.rebuild_locked()
    }

    /// Rebuild from a fresh corpus snapshot and publish the result.
    ///
    /// Waits for a rebuild already in flight. If a rebuild that started
    /// after this call was made has been published in the meantime, that
    /// generation is returned instead of building another one. On failure
    /// the previous generation stays published.
    pub fn refresh(&self) -> Result<Arc<Generation>> {
        let arrived_after = self.rebuilds_started.load(Ordering::Acquire);
        let _guard = self.rebuild_lock.lock();

        if let Some(generation) = self.current() {
            if generation.epoch() > arrived_after {
                debug!(epoch = generation.epoch(), "Refresh coalesced with concurrent rebuild");
                return Ok(generation);
            }
        }
        self.rebuild_locked()
    }

    /// Like [`Recommender::refresh`] but fails with
    /// [`Error::RebuildInProgress`] instead of waiting.
    pub fn try_refresh(&self) -> Result<Arc<Generation>> {
        let _guard = self.rebuild_lock.try_lock().ok_or(Error::RebuildInProgress)?;
        self.rebuild_locked()
    }

    /// Must be called with `rebuild_lock` held.
    fn rebuild_locked(&self) -> Result<Arc<Generation>> {
        let epoch = self.rebuilds_started.fetch_add(1, Ordering::AcqRel) + 1;
        let start = Instant::now();

        let built = self
            .source
            .snapshot()
            .and_then(|books| Generation::build(epoch, books, &self.config));

        match built {
            Ok(generation) => {
                let generation = Arc::new(generation);
                *self.current.write() = Some(generation.clone());
                info!(
                    epoch,
                    items = generation.len(),
                    vocabulary = generation.model().tfidf().vocabulary_size(),
                    preference_vocabulary = generation.model().preference_tfidf().vocabulary_size(),
                    elapsed_ms = start.elapsed().as_millis() as u64,
                    "Published recommendation model"
                );
                Ok(generation)
            }
            Err(e) => {
                warn!(epoch, error = %e, "Rebuild failed, keeping previous generation");
                Err(e)
            }
        }
    }

    /// Books most similar to `item_id`, as `(book, score)` descending.
    pub fn recommend_similar(&self, item_id: &str, top_n: usize) -> Result<Vec<(BookRecord, f32)>> {
        check_top_n(top_n)?;
        let generation = self.generation()?;
        let results = generation.similar_to(item_id, top_n)?;
        debug!(item_id, top_n, returned = results.len(), "Similar-item query");
        Ok(results)
    }

    /// Books closest to a preference, as `(book, distance)` ascending.
    pub fn recommend_by_preference(
        &self,
        preference: &Preference,
        top_n: usize,
    ) -> Result<Vec<(BookRecord, f32)>> {
        check_top_n(top_n)?;
        preference.validate()?;
        let generation = self.generation()?;
        let results = generation.nearest_to(preference, top_n)?;
        debug!(
            categories = preference.categories.len(),
            top_n,
            returned = results.len(),
            "Preference query"
        );
        Ok(results)
    }

    pub fn similarity(&self, a: &str, b: &str) -> Result<f32> {
        self.generation()?.similarity(a, b)
    }

    /// Category tags of the current corpus by descending frequency
    pub fn categories(&self) -> Result<Vec<(String, usize)>> {
        Ok(self.generation()?.categories())
    }
}
