//! Data provider error types

use super::ValidationError;
use crate::model::PostId;

/// Errors reported by a [`DataProvider`](crate::api::DataProvider).
///
/// None of these are fatal: the table keeps its previous state and surfaces
/// the error as a notice.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ProviderError {
    /// The store could not be reached or refused the request.
    #[error("Transport error: {0}")]
    Transport(String),

    /// One or more ids do not exist in the store.
    #[error("Records not found: {}", format_ids(.ids))]
    NotFound {
        /// The ids that were missing.
        ids: Vec<PostId>,
    },

    /// The backend rejected the submitted fields.
    #[error("Rejected by backend: {0}")]
    Validation(ValidationError),

    /// The query cache failed to store or load a page.
    #[error("Cache error: {0}")]
    Cache(String),
}

impl ProviderError {
    /// Creates a new transport error.
    pub fn transport(message: impl Into<String>) -> Self {
        Self::Transport(message.into())
    }

    /// Creates a new not-found error.
    pub fn not_found(ids: impl IntoIterator<Item = PostId>) -> Self {
        Self::NotFound {
            ids: ids.into_iter().collect(),
        }
    }

    /// Returns the backend field errors if this is a validation rejection.
    pub fn validation(&self) -> Option<&ValidationError> {
        match self {
            Self::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

fn format_ids(ids: &[PostId]) -> String {
    ids.iter()
        .map(|id| id.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FieldValidationError;

    #[test]
    fn test_not_found_display() {
        let error = ProviderError::not_found([PostId(3), PostId(7)]);
        assert_eq!(error.to_string(), "Records not found: 3, 7");
    }

    #[test]
    fn test_validation_accessor() {
        let error = ProviderError::Validation(FieldValidationError::new("title", "taken").into());
        assert_eq!(error.validation().map(|v| v.errors.len()), Some(1));
        assert!(ProviderError::transport("offline").validation().is_none());
    }
}
