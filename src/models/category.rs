//! Category model matching the backend `categories` collection.

use serde::{Deserialize, Serialize};

use super::{null_as_default, RecordId};

/// Closed set of glyphs a category can be drawn with.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum CategoryIcon {
    Brain,
    DollarSign,
    Microscope,
    BookOpen,
    Palette,
    Zap,
    /// Fallback for missing or unrecognised keys
    Book,
}

impl CategoryIcon {
    /// Resolve a stored icon key, falling back to [`CategoryIcon::Book`].
    pub fn from_key(key: Option<&str>) -> Self {
        match key {
            Some("Brain") => CategoryIcon::Brain,
            Some("DollarSign") => CategoryIcon::DollarSign,
            Some("Microscope") => CategoryIcon::Microscope,
            Some("BookOpen") => CategoryIcon::BookOpen,
            Some("Palette") => CategoryIcon::Palette,
            Some("Zap") => CategoryIcon::Zap,
            _ => CategoryIcon::Book,
        }
    }
}

/// A read-only grouping of books.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Category {
    pub id: RecordId,
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    /// Raw icon key as stored by the backend
    #[serde(default)]
    pub icon: Option<String>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub color: String,
}

impl Category {
    pub fn icon(&self) -> CategoryIcon {
        CategoryIcon::from_key(self.icon.as_deref())
    }
}
