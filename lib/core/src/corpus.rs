use crate::{BookRecord, Result};
use parking_lot::RwLock;

/// Supplier of full, ordered corpus snapshots.
///
/// Called once per rebuild; implementations own storage and validation.
pub trait CorpusSource: Send + Sync {
    fn snapshot(&self) -> Result<Vec<BookRecord>>;
}

/// Corpus held in memory, mutable between refreshes
#[derive(Debug, Default)]
pub struct InMemoryCorpus {
    books: RwLock<Vec<BookRecord>>,
}

impl InMemoryCorpus {
    pub fn new(books: Vec<BookRecord>) -> Self {
        Self {
            books: RwLock::new(books),
        }
    }

    /// Insert or replace by id. New books go to the end.
    pub fn upsert(&self, book: BookRecord) {
        let mut books = self.books.write();
        match books.iter_mut().find(|b| b.id == book.id) {
            Some(existing) => *existing = book,
            None => books.push(book),
        }
    }

    pub fn remove(&self, id: &str) -> bool {
        let mut books = self.books.write();
        let before = books.len();
        books.retain(|b| b.id != id);
        books.len() != before
    }

    pub fn replace(&self, books: Vec<BookRecord>) {
        *self.books.write() = books;
    }

    pub fn len(&self) -> usize {
        self.books.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.books.read().is_empty()
    }
}

impl CorpusSource for InMemoryCorpus {
    fn snapshot(&self) -> Result<Vec<BookRecord>> {
        Ok(self.books.read().clone())
    }
}
