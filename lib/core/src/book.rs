use serde::{Deserialize, Serialize};

/// A book as read from the corpus.
///
/// Text fields that the source left blank are stored as `None` and read back
/// as empty strings through the accessors. Numeric fields are already parsed;
/// nothing downstream of ingestion coerces strings to numbers.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookRecord {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub authors: Option<String>,
    /// Comma-separated tag list.
    #[serde(default)]
    pub categories: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub published_year: Option<i32>,
    #[serde(default)]
    pub average_rating: Option<f64>,
}

impl BookRecord {
    #[inline]
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Self::default()
        }
    }

    #[inline]
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = Some(subtitle.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_authors(mut self, authors: impl Into<String>) -> Self {
        self.authors = Some(authors.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_categories(mut self, categories: impl Into<String>) -> Self {
        self.categories = Some(categories.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[inline]
    #[must_use]
    pub fn with_year(mut self, year: i32) -> Self {
        self.published_year = Some(year);
        self
    }

    #[inline]
    #[must_use]
    pub fn with_rating(mut self, rating: f64) -> Self {
        self.average_rating = Some(rating);
        self
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or("")
    }

    pub fn subtitle(&self) -> &str {
        self.subtitle.as_deref().unwrap_or("")
    }

    pub fn authors(&self) -> &str {
        self.authors.as_deref().unwrap_or("")
    }

    pub fn categories(&self) -> &str {
        self.categories.as_deref().unwrap_or("")
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or("")
    }

    /// Individual category tags, trimmed, empties dropped.
    pub fn category_tags(&self) -> impl Iterator<Item = &str> {
        self.categories()
            .split(',')
            .map(str::trim)
            .filter(|c| !c.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_text_reads_as_empty() {
        let book = BookRecord::new("9780000000001");
        assert_eq!(book.title(), "");
        assert_eq!(book.description(), "");
        assert!(book.published_year.is_none());
    }

    #[test]
    fn test_category_tags() {
        let book = BookRecord::new("x").with_categories("Fiction, Science Fiction,, ");
        let tags: Vec<&str> = book.category_tags().collect();
        assert_eq!(tags, vec!["Fiction", "Science Fiction"]);
    }
}
