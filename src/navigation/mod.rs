//! View routing state.
//!
//! Tracks which of the three views is shown, the category selected for browsing and the
//! search text.

use serde::{Deserialize, Serialize};

use crate::models::RecordId;

/// The three presentation modes.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Home,
    Browse,
    Upload,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRouter {
    mode: ViewMode,
    category: Option<RecordId>,
    query: String,
}

impl ViewRouter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    pub fn category(&self) -> Option<&RecordId> {
        self.category.as_ref()
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    /// Return home, dropping the category selection and search text.
    pub fn go_home(&mut self) {
        self.mode = ViewMode::Home;
        self.category = None;
        self.query.clear();
    }

    /// Show the browse view, keeping the current selection.
    pub fn browse(&mut self) {
        self.mode = ViewMode::Browse;
    }

    /// Browse a single category.
    pub fn browse_category(&mut self, id: RecordId) {
        self.category = Some(id);
        self.mode = ViewMode::Browse;
    }

    pub fn upload(&mut self) {
        self.mode = ViewMode::Upload;
    }

    /// Dispatch to the operation matching `mode`.
    pub fn navigate(&mut self, mode: ViewMode) {
        match mode {
            ViewMode::Home => self.go_home(),
            ViewMode::Browse => self.browse(),
            ViewMode::Upload => self.upload(),
        }
    }

    pub fn set_category(&mut self, id: Option<RecordId>) {
        self.category = id;
    }

    pub fn clear_category(&mut self) {
        self.category = None;
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_home() {
        let router = ViewRouter::new();
        assert_eq!(router.mode(), ViewMode::Home);
        assert!(router.category().is_none());
        assert_eq!(router.query(), "");
    }

    #[test]
    fn test_go_home_resets_filters() {
        let mut router = ViewRouter::new();
        router.browse_category(RecordId::from("1"));
        router.set_query("dune");
        assert_eq!(router.mode(), ViewMode::Browse);

        router.navigate(ViewMode::Home);

        assert_eq!(router.mode(), ViewMode::Home);
        assert!(router.category().is_none());
        assert_eq!(router.query(), "");
    }

    #[test]
    fn test_upload_and_back_keeps_selection() {
        let mut router = ViewRouter::new();
        router.browse_category(RecordId::from("2"));
        router.set_query("money");

        router.upload();
        router.browse();

        assert_eq!(router.category(), Some(&RecordId::from("2")));
        assert_eq!(router.query(), "money");
    }

    #[test]
    fn test_clear_category() {
        let mut router = ViewRouter::new();
        router.set_category(Some(RecordId::from("2")));
        router.clear_category();
        assert!(router.category().is_none());
    }
}
