//! Catalog statistics for calling layers.

use crate::BookRecord;
use ahash::AHashMap;

/// Category tags by descending frequency; ties keep first appearance.
pub fn category_counts(books: &[BookRecord]) -> Vec<(String, usize)> {
    let mut order: Vec<String> = Vec::new();
    let mut counts: AHashMap<String, usize> = AHashMap::new();

    for tag in books.iter().flat_map(BookRecord::category_tags) {
        match counts.get_mut(tag) {
            Some(count) => *count += 1,
            None => {
                counts.insert(tag.to_string(), 1);
                order.push(tag.to_string());
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|tag| {
            let count = counts.get(&tag).copied().unwrap_or(0);
            (tag, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// Titles that recur most across several recommendation lists.
pub fn tally_titles<'a, I, S>(lists: I, top_n: usize) -> Vec<(String, usize)>
where
    I: IntoIterator<Item = &'a [(BookRecord, S)]>,
    S: 'a,
{
    let mut order: Vec<String> = Vec::new();
    let mut counts: AHashMap<String, usize> = AHashMap::new();

    for list in lists {
        for (book, _) in list {
            let title = book.title();
            match counts.get_mut(title) {
                Some(count) => *count += 1,
                None => {
                    counts.insert(title.to_string(), 1);
                    order.push(title.to_string());
                }
            }
        }
    }

    let mut ranked: Vec<(String, usize)> = order
        .into_iter()
        .map(|title| {
            let count = counts.get(&title).copied().unwrap_or(0);
            (title, count)
        })
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked.truncate(top_n);
    ranked
}
