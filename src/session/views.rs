//! View models for the home, browse and upload screens.

use serde::Serialize;

use super::Session;
use crate::filter;
use crate::form::{Draft, FormState};
use crate::models::{Book, Category, CategoryIcon, Difficulty, RecordId};
use crate::navigation::ViewMode;

/// Number of books shown under "recent" on the home view.
pub const RECENT_BOOKS: usize = 3;

/// Title of the browse view when no category is selected.
pub const BROWSE_ALL_TITLE: &str = "Browse Books";

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBadge {
    pub id: RecordId,
    pub name: String,
    pub icon: CategoryIcon,
    pub color: String,
}

impl From<&Category> for CategoryBadge {
    fn from(category: &Category) -> Self {
        Self {
            id: category.id.clone(),
            name: category.name.clone(),
            icon: category.icon(),
            color: category.color.clone(),
        }
    }
}

/// A book with what its card needs; keeps the backend's field names.
#[derive(Debug, Clone, Serialize)]
pub struct BookCard {
    #[serde(flatten)]
    pub book: Book,
    pub category: Option<CategoryBadge>,
    pub uploader_name: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryCard {
    #[serde(flatten)]
    pub badge: CategoryBadge,
    pub description: String,
    pub book_count: usize,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HomeView {
    pub book_count: usize,
    pub category_count: usize,
    pub categories: Vec<CategoryCard>,
    pub recent: Vec<BookCard>,
}

/// One entry of the category filter row. `id` is `None` for "all".
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryChip {
    pub id: Option<RecordId>,
    pub name: String,
    pub count: usize,
    pub selected: bool,
}

/// Why the browse view has nothing to show.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum EmptyReason {
    /// A query or category excluded every book
    NoMatches,
    /// Nothing has been shared yet
    EmptyCatalog,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BrowseView {
    pub title: String,
    pub query: String,
    pub selected_category: Option<RecordId>,
    pub chips: Vec<CategoryChip>,
    pub books: Vec<BookCard>,
    pub empty: Option<EmptyReason>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadView {
    pub draft: Draft,
    pub state: FormState,
    pub loading: bool,
    pub error: Option<String>,
    pub success: Option<String>,
    pub categories: Vec<CategoryBadge>,
    pub difficulties: Vec<Difficulty>,
}

/// The view for the current mode, tagged with that mode.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "mode", content = "view", rename_all = "lowercase")]
pub enum ActiveView {
    Home(HomeView),
    Browse(BrowseView),
    Upload(UploadView),
}

impl Session {
    fn card(&self, book: &Book) -> BookCard {
        BookCard {
            book: book.clone(),
            category: self.catalog.category(&book.category_id).map(CategoryBadge::from),
            uploader_name: book.uploader_name().to_string(),
        }
    }

    pub fn home_view(&self) -> HomeView {
        let catalog = &self.catalog;
        HomeView {
            book_count: catalog.books().len(),
            category_count: catalog.categories().len(),
            categories: catalog
                .categories()
                .iter()
                .map(|category| CategoryCard {
                    badge: CategoryBadge::from(category),
                    description: category.description.clone(),
                    book_count: catalog.count_in_category(&category.id),
                })
                .collect(),
            recent: catalog
                .recent(RECENT_BOOKS)
                .iter()
                .map(|b| self.card(b))
                .collect(),
        }
    }

    pub fn browse_view(&self) -> BrowseView {
        let catalog = &self.catalog;
        let selected = self.router.category();
        let query = self.router.query();

        let books: Vec<BookCard> = filter::visible(catalog.books(), query, selected)
            .into_iter()
            .map(|b| self.card(b))
            .collect();

        let mut chips = vec![CategoryChip {
            id: None,
            name: "All".to_string(),
            count: catalog.books().len(),
            selected: selected.is_none(),
        }];
        chips.extend(catalog.categories().iter().map(|category| CategoryChip {
            id: Some(category.id.clone()),
            name: category.name.clone(),
            count: catalog.count_in_category(&category.id),
            selected: selected == Some(&category.id),
        }));

        let title = selected
            .map(|id| {
                catalog
                    .category(id)
                    .map(|c| c.name.clone())
                    .unwrap_or_default()
            })
            .unwrap_or_else(|| BROWSE_ALL_TITLE.to_string());

        let empty = books.is_empty().then(|| {
            if query.is_empty() && selected.is_none() {
                EmptyReason::EmptyCatalog
            } else {
                EmptyReason::NoMatches
            }
        });

        BrowseView {
            title,
            query: query.to_string(),
            selected_category: selected.cloned(),
            chips,
            books,
            empty,
        }
    }

    pub fn upload_view(&self) -> UploadView {
        let form = &self.form;
        UploadView {
            draft: form.draft().clone(),
            state: form.state(),
            loading: form.is_loading(),
            error: form.error().map(str::to_string),
            success: form.success().map(str::to_string),
            categories: self
                .catalog
                .categories()
                .iter()
                .map(CategoryBadge::from)
                .collect(),
            difficulties: Difficulty::ALL.to_vec(),
        }
    }

    pub fn active_view(&self) -> ActiveView {
        match self.router.mode() {
            ViewMode::Home => ActiveView::Home(self.home_view()),
            ViewMode::Browse => ActiveView::Browse(self.browse_view()),
            ViewMode::Upload => ActiveView::Upload(self.upload_view()),
        }
    }
}
