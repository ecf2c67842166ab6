//! Book model matching the backend `books` collection.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{null_as_default, RecordId};

/// Display name used when a book has no uploader profile.
pub const UNKNOWN_UPLOADER: &str = "User";

/// Reading level of a book.
///
/// The hosted backend stores the Spanish labels; the English ones are accepted on input.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum Difficulty {
    #[default]
    #[serde(rename = "Principiante", alias = "Beginner")]
    Beginner,
    #[serde(rename = "Intermedio", alias = "Intermediate")]
    Intermediate,
    #[serde(rename = "Avanzado", alias = "Advanced")]
    Advanced,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [
        Difficulty::Beginner,
        Difficulty::Intermediate,
        Difficulty::Advanced,
    ];

    /// Stored label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "Principiante",
            Difficulty::Intermediate => "Intermedio",
            Difficulty::Advanced => "Avanzado",
        }
    }

    pub fn from_label(s: &str) -> Option<Self> {
        match s {
            "Principiante" | "Beginner" => Some(Difficulty::Beginner),
            "Intermedio" | "Intermediate" => Some(Difficulty::Intermediate),
            "Avanzado" | "Advanced" => Some(Difficulty::Advanced),
            _ => None,
        }
    }
}

/// Lifecycle flag; only active books appear in the catalog.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BookStatus {
    #[default]
    Active,
    #[serde(other)]
    Inactive,
}

/// Profile of the user who uploaded a book, joined by the backend.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Uploader {
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl Uploader {
    pub fn display_name(&self) -> Option<&str> {
        self.full_name
            .as_deref()
            .filter(|s| !s.is_empty())
            .or_else(|| self.username.as_deref().filter(|s| !s.is_empty()))
    }
}

/// A shared book as returned by the backend.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Book {
    pub id: RecordId,
    pub title: String,
    pub author: String,
    pub category_id: RecordId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub difficulty: Difficulty,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub status: BookStatus,
    /// Assigned by the backend from the authenticated session
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_by: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub rating: f64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub review_count: i64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub view_count: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default, alias = "profiles", skip_serializing_if = "Option::is_none")]
    pub uploader: Option<Uploader>,
}

impl Book {
    pub fn uploader_name(&self) -> &str {
        self.uploader
            .as_ref()
            .and_then(Uploader::display_name)
            .unwrap_or(UNKNOWN_UPLOADER)
    }

    pub fn is_active(&self) -> bool {
        self.status == BookStatus::Active
    }
}

/// Insert payload for a new book.
///
/// `id`, `created_at`, `status` and `uploaded_by` are left to the backend.
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct NewBook {
    pub title: String,
    pub author: String,
    pub category_id: RecordId,
    pub difficulty: Difficulty,
    pub description: Option<String>,
    pub tags: Vec<String>,
}
