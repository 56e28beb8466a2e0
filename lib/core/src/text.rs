//! TF-IDF text vectorizer
//!
//! Fitting learns a vocabulary and smoothed inverse document frequencies:
//!
//! ```text
//! idf(t) = ln((1 + N) / (1 + df(t))) + 1
//! w(t, d) = tf(t, d) * idf(t)
//! ```
//!
//! Every document vector is L2-normalized afterwards, so the dot product of
//! two transformed texts is their cosine similarity.

use crate::{Error, Result, SparseVector};
use ahash::{AHashMap, AHashSet};

/// Fixed English stop-word list
pub const ENGLISH_STOP_WORDS: &[&str] = &[
    "a", "about", "above", "after", "again", "against", "all", "almost", "alone", "along",
    "already", "also", "although", "always", "am", "among", "an", "and", "another", "any",
    "anyone", "anything", "are", "around", "as", "at", "be", "became", "because", "become",
    "been", "before", "being", "below", "between", "both", "but", "by", "can", "cannot",
    "could", "did", "do", "does", "doing", "done", "down", "during", "each", "either",
    "else", "enough", "etc", "even", "ever", "every", "few", "for", "from", "further",
    "had", "has", "have", "having", "he", "her", "here", "hers", "herself", "him",
    "himself", "his", "how", "however", "if", "in", "into", "is", "it", "its",
    "itself", "just", "least", "less", "many", "may", "me", "might", "more", "most",
    "much", "must", "my", "myself", "neither", "never", "no", "nor", "not", "now",
    "of", "off", "often", "on", "once", "one", "only", "or", "other", "others",
    "otherwise", "our", "ours", "ourselves", "out", "over", "own", "per", "perhaps", "rather",
    "same", "she", "should", "since", "so", "some", "still", "such", "than", "that",
    "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they", "this",
    "those", "though", "through", "thus", "to", "too", "under", "until", "up", "upon",
    "us", "very", "was", "we", "well", "were", "what", "whatever", "when", "where",
    "whether", "which", "while", "who", "whole", "whom", "whose", "why", "will", "with",
    "within", "without", "would", "yet", "you", "your", "yours", "yourself", "yourselves",
];

fn english_stop_words() -> AHashSet<String> {
    ENGLISH_STOP_WORDS.iter().map(|w| w.to_string()).collect()
}

/// Unfitted vectorizer settings
#[derive(Debug, Clone)]
pub struct TextVectorizer {
    stop_words: Option<AHashSet<String>>,
}

impl TextVectorizer {
    /// Vectorizer that strips [`ENGLISH_STOP_WORDS`]
    #[must_use]
    pub fn new() -> Self {
        Self {
            stop_words: Some(english_stop_words()),
        }
    }

    #[must_use]
    pub fn with_stop_words(mut self, enabled: bool) -> Self {
        self.stop_words = if enabled {
            Some(english_stop_words())
        } else {
            None
        };
        self
    }

    /// Lower-case, split on whitespace and punctuation, drop single
    /// characters and stop words.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        text.to_lowercase()
            .split(|c: char| c.is_whitespace() || c.is_ascii_punctuation())
            .map(|s| s.trim_matches(|c: char| !c.is_alphanumeric()))
            .filter(|s| s.chars().count() > 1)
            .filter(|s| {
                self.stop_words
                    .as_ref()
                    .map(|set| !set.contains(*s))
                    .unwrap_or(true)
            })
            .map(str::to_string)
            .collect()
    }

    /// Learn vocabulary and idf weights from `documents`.
    pub fn fit<S: AsRef<str>>(&self, documents: &[S]) -> Result<TfidfModel> {
        self.fit_transform(documents).map(|(model, _)| model)
    }

    /// Fit and return the vector of every training document, in input order.
    pub fn fit_transform<S: AsRef<str>>(
        &self,
        documents: &[S],
    ) -> Result<(TfidfModel, Vec<SparseVector>)> {
        if documents.is_empty() {
            return Err(Error::EmptyCorpus);
        }

        let tokenized: Vec<Vec<String>> = documents
            .iter()
            .map(|doc| self.tokenize(doc.as_ref()))
            .collect();

        let mut doc_freq: AHashMap<&str, u32> = AHashMap::new();
        for tokens in &tokenized {
            let unique: AHashSet<&str> = tokens.iter().map(String::as_str).collect();
            for term in unique {
                *doc_freq.entry(term).or_insert(0) += 1;
            }
        }

        // Sorted vocabulary keeps term indices independent of hash order
        let mut terms: Vec<String> = doc_freq.keys().map(|t| t.to_string()).collect();
        terms.sort_unstable();

        let n_docs = documents.len() as f64;
        let idf: Vec<f32> = terms
            .iter()
            .map(|term| {
                let df = doc_freq.get(term.as_str()).copied().unwrap_or(0) as f64;
                (((1.0 + n_docs) / (1.0 + df)).ln() + 1.0) as f32
            })
            .collect();

        let vocabulary: AHashMap<String, u32> = terms
            .iter()
            .enumerate()
            .map(|(idx, term)| (term.clone(), idx as u32))
            .collect();

        let model = TfidfModel {
            vectorizer: self.clone(),
            vocabulary,
            terms,
            idf,
            n_docs: documents.len(),
        };

        let vectors = tokenized.iter().map(|tokens| model.weigh(tokens)).collect();
        Ok((model, vectors))
    }
}

impl Default for TextVectorizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fitted vocabulary and idf weights.
///
/// Immutable once built; [`TfidfModel::transform`] never grows the vocabulary.
#[derive(Debug, Clone)]
pub struct TfidfModel {
    vectorizer: TextVectorizer,
    vocabulary: AHashMap<String, u32>,
    terms: Vec<String>,
    idf: Vec<f32>,
    n_docs: usize,
}

impl TfidfModel {
    /// Vectorize `text` against the fitted vocabulary. Unknown terms are
    /// dropped; all-unknown input yields the zero vector.
    pub fn transform(&self, text: &str) -> SparseVector {
        let tokens = self.vectorizer.tokenize(text);
        self.weigh(&tokens)
    }

    fn weigh(&self, tokens: &[String]) -> SparseVector {
        let pairs: Vec<(u32, f32)> = tokens
            .iter()
            .filter_map(|token| self.vocabulary.get(token.as_str()))
            .map(|&idx| (idx, self.idf[idx as usize]))
            .collect();

        // Repeated indices are summed, which is tf * idf
        let mut vector = SparseVector::from_pairs(pairs);
        vector.normalize();
        vector
    }

    #[inline]
    #[must_use]
    pub fn vocabulary_size(&self) -> usize {
        self.terms.len()
    }

    #[inline]
    #[must_use]
    pub fn n_docs(&self) -> usize {
        self.n_docs
    }

    pub fn term_index(&self, term: &str) -> Option<u32> {
        self.vocabulary.get(term).copied()
    }

    pub fn idf(&self, term: &str) -> Option<f32> {
        self.term_index(term).map(|idx| self.idf[idx as usize])
    }

    /// Vocabulary in index order
    pub fn terms(&self) -> &[String] {
        &self.terms
    }
}
