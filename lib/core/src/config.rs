use crate::{BookRecord, Error, Result};
use serde::{Deserialize, Serialize};

/// Text fields that can feed the vectorizer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextField {
    Title,
    Authors,
    Categories,
    Description,
    Subtitle,
}

impl TextField {
    #[inline]
    pub fn read<'a>(&self, book: &'a BookRecord) -> &'a str {
        match self {
            TextField::Title => book.title(),
            TextField::Authors => book.authors(),
            TextField::Categories => book.categories(),
            TextField::Description => book.description(),
            TextField::Subtitle => book.subtitle(),
        }
    }
}

/// Configuration for a recommender
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RecommenderConfig {
    /// Fields concatenated, in order, into each item's document for
    /// item-to-item similarity
    pub text_fields: Vec<TextField>,
    /// Fields concatenated into the text block matched by preference queries
    pub preference_fields: Vec<TextField>,
    /// Strip the built-in English stop words
    pub stop_words: bool,
    /// Corpus size from which pairwise rows are computed in parallel
    pub parallel_threshold: usize,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            text_fields: vec![
                TextField::Title,
                TextField::Authors,
                TextField::Categories,
                TextField::Description,
                TextField::Subtitle,
            ],
            preference_fields: vec![TextField::Authors, TextField::Categories, TextField::Title],
            stop_words: true,
            parallel_threshold: 256,
        }
    }
}

impl RecommenderConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.text_fields.is_empty() {
            return Err(Error::InvalidConfig(
                "text_fields must name at least one field".to_string(),
            ));
        }
        if self.preference_fields.is_empty() {
            return Err(Error::InvalidConfig(
                "preference_fields must name at least one field".to_string(),
            ));
        }
        Ok(())
    }
}
