//! Catalog filtering.
//!
//! A book is visible when its title, author or one of its tags contains the query
//! (case-insensitively) and it belongs to the selected category, if any.

use crate::models::{Book, RecordId};

/// Books matching `query` and `category`, in their original order.
pub fn visible<'a>(books: &'a [Book], query: &str, category: Option<&RecordId>) -> Vec<&'a Book> {
    let needle = query.to_lowercase();
    books
        .iter()
        .filter(|book| category.map_or(true, |id| &book.category_id == id))
        .filter(|book| matches_query(book, &needle))
        .collect()
}

/// `needle` must already be lowercased. An empty needle matches everything.
pub fn matches_query(book: &Book, needle: &str) -> bool {
    if needle.is_empty() {
        return true;
    }
    contains(&book.title, needle)
        || contains(&book.author, needle)
        || book.tags.iter().any(|tag| contains(tag, needle))
}

fn contains(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(needle)
}
