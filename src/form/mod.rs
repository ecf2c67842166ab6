//! Submission form for new books.
//!
//! State machine: `Editing → Submitting → {Success, Failed}`. Any field edit made after a
//! success or a failure puts the form back into `Editing`.

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::AppError;
use crate::gateway::DataGateway;
use crate::models::{Book, Difficulty, NewBook, RecordId};

/// Message shown after a book was stored.
pub const SUCCESS_MESSAGE: &str = "Book uploaded successfully!";

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum FormState {
    Editing,
    Submitting,
    Success,
    Failed,
}

/// Unsaved input for a new book.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Draft {
    pub title: String,
    pub author: String,
    pub category_id: Option<RecordId>,
    pub difficulty: Difficulty,
    pub description: String,
    /// Comma-separated tags as typed
    pub tags_raw: String,
}

/// Partial update of a draft; absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftPatch {
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub author: Option<String>,
    /// `Some(None)` is an explicit `null` and deselects the category
    #[serde(default, deserialize_with = "present")]
    pub category_id: Option<Option<RecordId>>,
    #[serde(default)]
    pub difficulty: Option<Difficulty>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub tags_raw: Option<String>,
}

/// Marks a field that was sent, so `null` can be told apart from absence.
fn present<'de, D>(deserializer: D) -> Result<Option<Option<RecordId>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<RecordId>::deserialize(deserializer).map(Some)
}

/// Split comma-separated input into trimmed, non-empty tags, keeping their order.
pub fn parse_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

/// Draft plus the transient submission flags.
#[derive(Debug, Clone)]
pub struct SubmissionForm {
    draft: Draft,
    state: FormState,
    error: Option<String>,
    success: Option<String>,
    /// Bumped on every success so a delayed dismissal only clears the success it was armed for
    success_seq: u64,
}

impl Default for SubmissionForm {
    fn default() -> Self {
        Self {
            draft: Draft::default(),
            state: FormState::Editing,
            error: None,
            success: None,
            success_seq: 0,
        }
    }
}

impl SubmissionForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn draft(&self) -> &Draft {
        &self.draft
    }

    pub fn state(&self) -> FormState {
        self.state
    }

    pub fn is_loading(&self) -> bool {
        self.state == FormState::Submitting
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.touch();
        self.draft.title = title.into();
    }

    pub fn set_author(&mut self, author: impl Into<String>) {
        self.touch();
        self.draft.author = author.into();
    }

    pub fn set_category(&mut self, category_id: RecordId) {
        self.touch();
        self.draft.category_id = Some(category_id);
    }

    pub fn set_difficulty(&mut self, difficulty: Difficulty) {
        self.touch();
        self.draft.difficulty = difficulty;
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.touch();
        self.draft.description = description.into();
    }

    pub fn set_tags(&mut self, tags_raw: impl Into<String>) {
        self.touch();
        self.draft.tags_raw = tags_raw.into();
    }

    /// Apply several field edits as one mutation.
    pub fn apply(&mut self, patch: DraftPatch) {
        self.touch();
        if let Some(title) = patch.title {
            self.draft.title = title;
        }
        if let Some(author) = patch.author {
            self.draft.author = author;
        }
        if let Some(category_id) = patch.category_id {
            self.draft.category_id = category_id.filter(|id| !id.is_blank());
        }
        if let Some(difficulty) = patch.difficulty {
            self.draft.difficulty = difficulty;
        }
        if let Some(description) = patch.description {
            self.draft.description = description;
        }
        if let Some(tags_raw) = patch.tags_raw {
            self.draft.tags_raw = tags_raw;
        }
    }

    /// Leave a settled outcome and go back to editing.
    fn touch(&mut self) {
        if matches!(self.state, FormState::Success | FormState::Failed) {
            self.state = FormState::Editing;
            self.error = None;
            self.success = None;
        }
    }

    /// Validate the draft and move to `Submitting`, returning the insert payload.
    ///
    /// A missing required field moves straight to `Failed`. While a submission is in flight
    /// further attempts are refused with [`AppError::Busy`] and leave the state unchanged.
    pub fn begin_submit(&mut self) -> Result<NewBook, AppError> {
        if self.state == FormState::Submitting {
            return Err(AppError::Busy);
        }
        self.error = None;
        self.success = None;

        let title = self.draft.title.trim();
        let author = self.draft.author.trim();
        let category_id = self.draft.category_id.as_ref().filter(|id| !id.is_blank());

        let (Some(category_id), false, false) = (category_id, title.is_empty(), author.is_empty())
        else {
            let err = AppError::missing_fields();
            self.state = FormState::Failed;
            self.error = Some(err.to_string());
            return Err(err);
        };

        let description = self.draft.description.trim();
        let book = NewBook {
            title: title.to_string(),
            author: author.to_string(),
            category_id: category_id.clone(),
            difficulty: self.draft.difficulty,
            description: (!description.is_empty()).then(|| description.to_string()),
            tags: parse_tags(&self.draft.tags_raw),
        };

        self.state = FormState::Submitting;
        Ok(book)
    }

    /// Apply the gateway's answer to a submission started with [`Self::begin_submit`].
    ///
    /// On success the draft is reset; on failure it is kept as entered.
    pub fn complete_submit(&mut self, outcome: Result<Book, AppError>) -> Result<Book, AppError> {
        match outcome {
            Ok(book) => {
                self.draft = Draft::default();
                self.state = FormState::Success;
                self.success = Some(SUCCESS_MESSAGE.to_string());
                self.success_seq += 1;
                Ok(book)
            }
            Err(err) => {
                self.state = FormState::Failed;
                self.error = Some(err.to_string());
                Err(err)
            }
        }
    }

    /// Validate, insert through the gateway and settle the outcome.
    pub async fn submit(&mut self, gateway: &dyn DataGateway) -> Result<Book, AppError> {
        let book = self.begin_submit()?;
        let outcome = gateway.insert_book(&book).await;
        self.complete_submit(outcome)
    }

    /// Identifies the success currently on display, if any.
    pub fn success_ticket(&self) -> Option<u64> {
        (self.state == FormState::Success).then_some(self.success_seq)
    }

    /// Clear the success flag if it is still the one identified by `ticket`.
    pub fn dismiss_success(&mut self, ticket: u64) -> bool {
        if self.success_ticket() != Some(ticket) {
            return false;
        }
        self.state = FormState::Editing;
        self.success = None;
        true
    }
}
