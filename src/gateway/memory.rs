//! In-memory gateway for unit tests.

use std::sync::Mutex;
use std::time::Duration as StdDuration;

use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};

use super::DataGateway;
use crate::errors::AppError;
use crate::models::{Book, BookStatus, Category, Difficulty, NewBook, RecordId};

#[derive(Default)]
struct MemoryState {
    categories: Vec<Category>,
    books: Vec<Book>,
    fail_reads: Option<String>,
    fail_inserts: Option<String>,
    insert_calls: usize,
    next_id: u64,
    read_delay: Option<StdDuration>,
    insert_delay: Option<StdDuration>,
}

/// Gateway keeping everything in a vector; failures can be injected.
#[derive(Default)]
pub struct MemoryGateway {
    state: Mutex<MemoryState>,
}

impl MemoryGateway {
    pub fn new(categories: Vec<Category>, books: Vec<Book>) -> Self {
        Self {
            state: Mutex::new(MemoryState {
                categories,
                books,
                next_id: 1000,
                ..Default::default()
            }),
        }
    }

    pub fn fail_reads(&self, message: &str) {
        self.state.lock().unwrap().fail_reads = Some(message.to_string());
    }

    pub fn fail_inserts(&self, message: &str) {
        self.state.lock().unwrap().fail_inserts = Some(message.to_string());
    }

    pub fn heal(&self) {
        let mut state = self.state.lock().unwrap();
        state.fail_reads = None;
        state.fail_inserts = None;
    }

    /// Answer the next book fetch late, with the books as they were when it was issued.
    pub fn delay_next_read(&self, delay: StdDuration) {
        self.state.lock().unwrap().read_delay = Some(delay);
    }

    /// Hold the next insert for `delay` before storing it.
    pub fn delay_next_insert(&self, delay: StdDuration) {
        self.state.lock().unwrap().insert_delay = Some(delay);
    }

    pub fn insert_calls(&self) -> usize {
        self.state.lock().unwrap().insert_calls
    }
}

#[async_trait]
impl DataGateway for MemoryGateway {
    async fn fetch_categories(&self) -> Result<Vec<Category>, AppError> {
        let state = self.state.lock().unwrap();
        match &state.fail_reads {
            Some(message) => Err(AppError::Backend(message.clone())),
            None => Ok(state.categories.clone()),
        }
    }

    async fn fetch_active_books(&self) -> Result<Vec<Book>, AppError> {
        let (books, delay) = {
            let mut state = self.state.lock().unwrap();
            if let Some(message) = &state.fail_reads {
                return Err(AppError::Backend(message.clone()));
            }
            let mut books: Vec<Book> = state
                .books
                .iter()
                .filter(|b| b.is_active())
                .cloned()
                .collect();
            books.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            (books, state.read_delay.take())
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        Ok(books)
    }

    async fn insert_book(&self, book: &NewBook) -> Result<Book, AppError> {
        let delay = {
            let mut state = self.state.lock().unwrap();
            state.insert_calls += 1;
            state.insert_delay.take()
        };
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        let mut state = self.state.lock().unwrap();
        if let Some(message) = &state.fail_inserts {
            return Err(AppError::Backend(message.clone()));
        }

        state.next_id += 1;
        let newest = state
            .books
            .iter()
            .map(|b| b.created_at)
            .max()
            .unwrap_or_else(Utc::now);
        let created = Book {
            id: RecordId::new(state.next_id.to_string()),
            title: book.title.clone(),
            author: book.author.clone(),
            category_id: book.category_id.clone(),
            difficulty: book.difficulty,
            description: book.description.clone(),
            tags: book.tags.clone(),
            status: BookStatus::Active,
            uploaded_by: Some("test-user".to_string()),
            rating: 0.0,
            review_count: 0,
            view_count: 0,
            created_at: newest + Duration::seconds(1),
            uploader: None,
        };
        state.books.push(created.clone());
        Ok(created)
    }
}

pub fn category(id: &str, name: &str) -> Category {
    Category {
        id: RecordId::from(id),
        name: name.to_string(),
        description: String::new(),
        icon: None,
        color: String::new(),
    }
}

/// Book created `age_days` days before a fixed reference date.
pub fn book(id: &str, title: &str, author: &str, category: &str, tags: &[&str], age_days: i64) -> Book {
    let reference = Utc.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap();
    Book {
        id: RecordId::from(id),
        title: title.to_string(),
        author: author.to_string(),
        category_id: RecordId::from(category),
        difficulty: Difficulty::Beginner,
        description: None,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        status: BookStatus::Active,
        uploaded_by: None,
        rating: 0.0,
        review_count: 0,
        view_count: 0,
        created_at: reference - Duration::days(age_days),
        uploader: None,
    }
}
