//! In-memory catalog snapshot.
//!
//! Holds the categories and active books last fetched from the gateway. A refresh fetches
//! both collections and swaps them in together; if either read fails nothing changes.

use std::collections::HashMap;

use chrono::{DateTime, Utc};

use crate::errors::AppError;
use crate::gateway::DataGateway;
use crate::models::{Book, Category, RecordId};

/// Result of one full fetch, ready to be swapped in.
#[derive(Debug, Clone)]
pub struct CatalogSnapshot {
    pub categories: Vec<Category>,
    pub books: Vec<Book>,
}

impl CatalogSnapshot {
    /// Fetch categories first, then books.
    pub async fn fetch(gateway: &dyn DataGateway) -> Result<Self, AppError> {
        let categories = gateway.fetch_categories().await?;
        let books = gateway.fetch_active_books().await?;
        Ok(Self { categories, books })
    }
}

/// Categories and active books currently shown to the user.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    categories: Vec<Category>,
    index: HashMap<RecordId, usize>,
    books: Vec<Book>,
    refreshed_at: Option<DateTime<Utc>>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-fetch everything and replace the snapshot.
    pub async fn refresh(&mut self, gateway: &dyn DataGateway) -> Result<(), AppError> {
        let snapshot = CatalogSnapshot::fetch(gateway).await?;
        self.replace(snapshot);
        Ok(())
    }

    /// Swap in a previously fetched snapshot.
    pub fn replace(&mut self, snapshot: CatalogSnapshot) {
        let index = snapshot
            .categories
            .iter()
            .enumerate()
            .map(|(pos, category)| (category.id.clone(), pos))
            .collect();

        tracing::info!(
            "Catalog refreshed: {} categories, {} books",
            snapshot.categories.len(),
            snapshot.books.len()
        );

        self.categories = snapshot.categories;
        self.index = index;
        self.books = snapshot.books;
        self.refreshed_at = Some(Utc::now());
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn books(&self) -> &[Book] {
        &self.books
    }

    pub fn category(&self, id: &RecordId) -> Option<&Category> {
        self.index.get(id).map(|&pos| &self.categories[pos])
    }

    pub fn count_in_category(&self, id: &RecordId) -> usize {
        self.books.iter().filter(|b| &b.category_id == id).count()
    }

    /// The `n` newest books.
    pub fn recent(&self, n: usize) -> &[Book] {
        &self.books[..n.min(self.books.len())]
    }

    pub fn is_loaded(&self) -> bool {
        self.refreshed_at.is_some()
    }

    pub fn refreshed_at(&self) -> Option<DateTime<Utc>> {
        self.refreshed_at
    }
}
