//! Inline edit session.

use crate::api::query::Page;
use crate::error::Error;
use crate::error::ProviderError;
use crate::error::ValidationError;
use crate::model::Post;
use crate::model::PostDraft;
use crate::model::PostId;
use crate::model::PostUpdate;

/// The row currently being edited.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditingRow {
    pub id: PostId,
    pub draft: PostDraft,
    /// Field errors from the last failed validation or backend rejection.
    pub errors: ValidationError,
    /// An update for this row is waiting for the provider.
    pub submitting: bool,
}

/// Single-row edit mode: at most one row is being edited at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum EditSession {
    #[default]
    Idle,
    Editing(EditingRow),
}

impl EditSession {
    /// Starts editing `post`, seeding the draft from its values.
    ///
    /// Any other row's session is replaced and its draft discarded. Returns
    /// the id of the replaced session.
    pub fn begin(&mut self, post: &Post) -> Option<PostId> {
        let previous = self.editing_id().filter(|&id| id != post.id);
        *self = EditSession::Editing(EditingRow {
            id: post.id,
            draft: PostDraft::from_post(post),
            errors: ValidationError::new(),
            submitting: false,
        });
        previous
    }

    /// Discards the draft. Returns the id that was being edited.
    pub fn cancel(&mut self) -> Option<PostId> {
        let id = self.editing_id();
        *self = EditSession::Idle;
        id
    }

    /// Returns the id of the row being edited.
    pub fn editing_id(&self) -> Option<PostId> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing(row) => Some(row.id),
        }
    }

    /// Returns `true` if `id` is the row being edited.
    pub fn is_editing(&self, id: PostId) -> bool {
        self.editing_id() == Some(id)
    }

    /// Returns the editing row.
    pub fn row(&self) -> Option<&EditingRow> {
        match self {
            EditSession::Idle => None,
            EditSession::Editing(row) => Some(row),
        }
    }

    fn row_mut(&mut self) -> Result<&mut EditingRow, Error> {
        match self {
            EditSession::Idle => Err(Error::NotEditing),
            EditSession::Editing(row) => Ok(row),
        }
    }

    /// Replaces the draft title and clears its error.
    pub fn set_title(&mut self, title: impl Into<String>) -> Result<(), Error> {
        let row = self.row_mut()?;
        row.draft.title = title.into();
        row.errors.errors.retain(|e| e.field != "title");
        Ok(())
    }

    /// Replaces the draft status and clears its error.
    pub fn set_status(&mut self, status: impl Into<String>) -> Result<(), Error> {
        let row = self.row_mut()?;
        row.draft.status = status.into();
        row.errors.errors.retain(|e| e.field != "status");
        Ok(())
    }

    /// Validates the draft and marks the row as submitting.
    ///
    /// On validation failure the errors are kept on the row and the session
    /// stays open.
    pub fn prepare_submit(&mut self) -> Result<(PostId, PostUpdate), Error> {
        let row = self.row_mut()?;
        if row.submitting {
            return Err(Error::MutationInFlight);
        }
        match row.draft.validate() {
            Ok(update) => {
                row.errors = ValidationError::new();
                row.submitting = true;
                Ok((row.id, update))
            }
            Err(errors) => {
                row.errors = errors.clone();
                Err(Error::Validation(errors))
            }
        }
    }

    /// Closes the session after `id` was saved.
    ///
    /// A session for a different row (the user moved on) is left alone.
    pub fn submit_succeeded(&mut self, id: PostId) -> bool {
        if self.is_editing(id) {
            *self = EditSession::Idle;
            true
        } else {
            false
        }
    }

    /// Reopens the draft for another try after saving `id` failed.
    ///
    /// Backend field errors are attached to the row.
    pub fn submit_failed(&mut self, id: PostId, error: &ProviderError) {
        let EditSession::Editing(row) = self else {
            return;
        };
        if row.id != id {
            return;
        }
        row.submitting = false;
        if let Some(errors) = error.validation() {
            row.errors = errors.clone();
        }
    }

    /// Closes the session if its row is not on `page`.
    ///
    /// Returns the id of the closed session.
    pub fn close_if_missing(&mut self, page: &Page) -> Option<PostId> {
        match self.editing_id() {
            Some(id) if !page.contains(id) => self.cancel(),
            _ => None,
        }
    }
}
