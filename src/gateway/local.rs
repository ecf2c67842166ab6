//! Embedded SQLite backend for local development.
//!
//! Mirrors what the hosted backend does on its side: it assigns ids, timestamps, status and
//! uploader, filters inactive books and joins uploader profiles.

use std::path::Path;
use std::str::FromStr;

use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions, SqliteRow};
use sqlx::Row;

use super::DataGateway;
use crate::errors::AppError;
use crate::models::{Book, BookStatus, Category, Difficulty, NewBook, RecordId, Uploader};

/// Categories present in a fresh database: (id, name, description, icon, color).
const DEFAULT_CATEGORIES: [(&str, &str, &str, &str, &str); 6] = [
    (
        "1",
        "Psychology",
        "Mind, behaviour and personal growth",
        "Brain",
        "bg-purple-500",
    ),
    (
        "2",
        "Finance",
        "Money, investing and economics",
        "DollarSign",
        "bg-green-500",
    ),
    (
        "3",
        "Science",
        "Physics, biology and the natural world",
        "Microscope",
        "bg-blue-500",
    ),
    (
        "4",
        "Literature",
        "Novels, essays and classics",
        "BookOpen",
        "bg-amber-500",
    ),
    (
        "5",
        "Art & Design",
        "Creativity, design and visual culture",
        "Palette",
        "bg-pink-500",
    ),
    (
        "6",
        "Productivity",
        "Habits, focus and getting things done",
        "Zap",
        "bg-orange-500",
    ),
];

const BOOK_COLUMNS: &str = r#"b.id, b.title, b.author, b.category_id, b.difficulty, b.description,
       b.tags, b.status, b.uploaded_by, b.rating, b.review_count, b.view_count,
       b.created_at, p.username, p.full_name"#;

/// Gateway backed by a local SQLite file.
#[derive(Clone)]
pub struct LocalGateway {
    pool: SqlitePool,
    user_id: String,
}

impl LocalGateway {
    /// Open (or create) the database, run migrations and seed defaults.
    pub async fn open(db_path: &Path, user_id: &str) -> Result<Self, AppError> {
        let pool = init_database(db_path).await?;
        seed_defaults(&pool, user_id).await?;

        Ok(Self {
            pool,
            user_id: user_id.to_string(),
        })
    }

    #[cfg(test)]
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn get_book(&self, id: &str) -> Result<Book, AppError> {
        let row = sqlx::query(&format!(
            "SELECT {} FROM books b LEFT JOIN profiles p ON p.id = b.uploaded_by WHERE b.id = ?",
            BOOK_COLUMNS
        ))
        .bind(id)
        .fetch_one(&self.pool)
        .await?;

        book_from_row(&row)
    }
}

#[async_trait]
impl DataGateway for LocalGateway {
    async fn fetch_categories(&self) -> Result<Vec<Category>, AppError> {
        let rows =
            sqlx::query("SELECT id, name, description, icon, color FROM categories ORDER BY rowid")
                .fetch_all(&self.pool)
                .await?;

        rows.iter().map(category_from_row).collect()
    }

    async fn fetch_active_books(&self) -> Result<Vec<Book>, AppError> {
        let rows = sqlx::query(&format!(
            r#"SELECT {}
               FROM books b LEFT JOIN profiles p ON p.id = b.uploaded_by
               WHERE b.status = 'active'
               ORDER BY b.created_at DESC, b.rowid DESC"#,
            BOOK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(book_from_row).collect()
    }

    async fn insert_book(&self, book: &NewBook) -> Result<Book, AppError> {
        let id = uuid::Uuid::new_v4().to_string();
        let now = Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true);
        let tags_json = serde_json::to_string(&book.tags)?;

        sqlx::query(
            r#"INSERT INTO books (
                id, title, author, category_id, difficulty, description, tags,
                status, uploaded_by, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, 'active', ?, ?)"#,
        )
        .bind(&id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(book.category_id.as_str())
        .bind(book.difficulty.as_str())
        .bind(&book.description)
        .bind(&tags_json)
        .bind(&self.user_id)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        self.get_book(&id).await
    }
}

/// Initialize the database connection pool and run migrations.
pub async fn init_database(db_path: &Path) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the parent directory exists
    if let Some(parent) = db_path.parent() {
        tokio::fs::create_dir_all(parent).await.ok();
    }

    let db_url = format!("sqlite:{}?mode=rwc", db_path.display());

    let options = SqliteConnectOptions::from_str(&db_url)?
        .create_if_missing(true)
        .foreign_keys(true)
        .journal_mode(sqlx::sqlite::SqliteJournalMode::Wal)
        .synchronous(sqlx::sqlite::SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    run_migrations(&pool).await?;

    Ok(pool)
}

/// Run database migrations.
async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS categories (
            id TEXT PRIMARY KEY,
            name TEXT NOT NULL,
            description TEXT,
            icon TEXT,
            color TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS profiles (
            id TEXT PRIMARY KEY,
            username TEXT,
            full_name TEXT
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS books (
            id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            author TEXT NOT NULL,
            category_id TEXT NOT NULL REFERENCES categories(id),
            difficulty TEXT NOT NULL DEFAULT 'Principiante',
            description TEXT,
            tags TEXT,
            status TEXT NOT NULL DEFAULT 'active',
            uploaded_by TEXT,
            rating REAL NOT NULL DEFAULT 0,
            review_count INTEGER NOT NULL DEFAULT 0,
            view_count INTEGER NOT NULL DEFAULT 0,
            created_at TEXT NOT NULL
        );
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE INDEX IF NOT EXISTS idx_books_status_created ON books(status, created_at);
        CREATE INDEX IF NOT EXISTS idx_books_category ON books(category_id);
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Seed the default categories and the local user's profile.
async fn seed_defaults(pool: &SqlitePool, user_id: &str) -> Result<(), sqlx::Error> {
    let mut tx = pool.begin().await?;

    for (id, name, description, icon, color) in DEFAULT_CATEGORIES {
        sqlx::query(
            "INSERT OR IGNORE INTO categories (id, name, description, icon, color) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(icon)
        .bind(color)
        .execute(&mut *tx)
        .await?;
    }

    sqlx::query("INSERT OR IGNORE INTO profiles (id, username, full_name) VALUES (?, ?, NULL)")
        .bind(user_id)
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await
}

// Helper functions for row conversion

fn category_from_row(row: &SqliteRow) -> Result<Category, AppError> {
    Ok(Category {
        id: RecordId::new(row.try_get::<String, _>("id")?),
        name: row.try_get("name")?,
        description: row
            .try_get::<Option<String>, _>("description")?
            .unwrap_or_default(),
        icon: row.try_get("icon")?,
        color: row.try_get::<Option<String>, _>("color")?.unwrap_or_default(),
    })
}

fn book_from_row(row: &SqliteRow) -> Result<Book, AppError> {
    let difficulty: String = row.try_get("difficulty")?;
    let status: String = row.try_get("status")?;
    let tags_str: Option<String> = row.try_get("tags")?;
    let created_at: String = row.try_get("created_at")?;
    let username: Option<String> = row.try_get("username")?;
    let full_name: Option<String> = row.try_get("full_name")?;

    let created_at = DateTime::parse_from_rfc3339(&created_at)
        .map_err(|e| AppError::Backend(format!("Invalid created_at '{}': {}", created_at, e)))?
        .with_timezone(&Utc);

    let uploader = if username.is_some() || full_name.is_some() {
        Some(Uploader {
            username,
            full_name,
        })
    } else {
        None
    };

    Ok(Book {
        id: RecordId::new(row.try_get::<String, _>("id")?),
        title: row.try_get("title")?,
        author: row.try_get("author")?,
        category_id: RecordId::new(row.try_get::<String, _>("category_id")?),
        difficulty: Difficulty::from_label(&difficulty).unwrap_or_default(),
        description: row.try_get("description")?,
        tags: tags_str.map(|s| parse_json_array(&s)).unwrap_or_default(),
        status: if status == "active" {
            BookStatus::Active
        } else {
            BookStatus::Inactive
        },
        uploaded_by: row.try_get("uploaded_by")?,
        rating: row.try_get("rating")?,
        review_count: row.try_get("review_count")?,
        view_count: row.try_get("view_count")?,
        created_at,
        uploader,
    })
}

fn parse_json_array(s: &str) -> Vec<String> {
    serde_json::from_str(s).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    async fn open_gateway() -> (LocalGateway, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let gateway = LocalGateway::open(&temp_dir.path().join("test.sqlite"), "reader-1")
            .await
            .unwrap();
        (gateway, temp_dir)
    }

    fn draft(title: &str, category: &str) -> NewBook {
        NewBook {
            title: title.to_string(),
            author: "Author".to_string(),
            category_id: RecordId::from(category),
            difficulty: Difficulty::Intermediate,
            description: Some("Notes".to_string()),
            tags: vec!["a".to_string(), "b".to_string()],
        }
    }

    #[tokio::test]
    async fn test_seeded_categories() {
        let (gateway, _dir) = open_gateway().await;
        let categories = gateway.fetch_categories().await.unwrap();
        assert_eq!(categories.len(), DEFAULT_CATEGORIES.len());
        assert_eq!(categories[0].id, RecordId::from("1"));
        assert_eq!(categories[2].name, "Science");
    }

    #[tokio::test]
    async fn test_reopen_does_not_duplicate_seed() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("test.sqlite");
        LocalGateway::open(&path, "reader-1").await.unwrap();
        let gateway = LocalGateway::open(&path, "reader-1").await.unwrap();
        assert_eq!(
            gateway.fetch_categories().await.unwrap().len(),
            DEFAULT_CATEGORIES.len()
        );
    }

    #[tokio::test]
    async fn test_insert_assigns_server_fields() {
        let (gateway, _dir) = open_gateway().await;
        let book = gateway.insert_book(&draft("First", "3")).await.unwrap();

        assert!(!book.id.is_blank());
        assert!(book.is_active());
        assert_eq!(book.uploaded_by.as_deref(), Some("reader-1"));
        assert_eq!(book.uploader_name(), "reader-1");
        assert_eq!(book.tags, vec!["a", "b"]);
        assert_eq!(book.difficulty, Difficulty::Intermediate);
    }

    #[tokio::test]
    async fn test_active_books_newest_first() {
        let (gateway, _dir) = open_gateway().await;
        gateway.insert_book(&draft("First", "1")).await.unwrap();
        let hidden = gateway.insert_book(&draft("Hidden", "1")).await.unwrap();
        gateway.insert_book(&draft("Second", "2")).await.unwrap();

        sqlx::query("UPDATE books SET status = 'removed' WHERE id = ?")
            .bind(hidden.id.as_str())
            .execute(gateway.pool())
            .await
            .unwrap();

        let books = gateway.fetch_active_books().await.unwrap();
        let titles: Vec<&str> = books.iter().map(|b| b.title.as_str()).collect();
        assert_eq!(titles, vec!["Second", "First"]);
    }

    #[tokio::test]
    async fn test_unknown_category_is_rejected() {
        let (gateway, _dir) = open_gateway().await;
        let err = gateway
            .insert_book(&draft("Orphan", "999"))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Backend(_)));
        assert!(gateway.fetch_active_books().await.unwrap().is_empty());
    }
}
