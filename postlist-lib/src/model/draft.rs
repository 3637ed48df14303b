//! In-progress edit values and the validated update they produce

use serde::Deserialize;
use serde::Serialize;

use super::Post;
use super::PostStatus;
use crate::error::FieldValidationError;
use crate::error::ValidationError;

/// Field values of a row being edited inline.
///
/// Held as raw input text so that an invalid selection can be reported
/// instead of silently dropped.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PostDraft {
    pub title: String,
    pub status: String,
}

impl PostDraft {
    /// Seeds a draft from the row's current values.
    pub fn from_post(post: &Post) -> Self {
        Self {
            title: post.title.clone(),
            status: post.status.as_str().to_string(),
        }
    }

    /// Creates a draft from raw field values.
    pub fn new(title: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            status: status.into(),
        }
    }

    /// Checks required fields and converts the draft into an update.
    ///
    /// Every failing field is reported, not just the first.
    pub fn validate(&self) -> Result<PostUpdate, ValidationError> {
        let mut errors = ValidationError::new();

        if self.title.trim().is_empty() {
            errors.push(FieldValidationError::required("title", "Title is required"));
        }

        let status = if self.status.trim().is_empty() {
            errors.push(FieldValidationError::required("status", "Status is required"));
            None
        } else {
            match self.status.parse::<PostStatus>() {
                Ok(status) => Some(status),
                Err(_) => {
                    errors.push(FieldValidationError::with_code(
                        "status",
                        "Status must be one of published, draft, rejected",
                        "choice",
                    ));
                    None
                }
            }
        };

        match status {
            Some(status) if errors.is_empty() => Ok(PostUpdate {
                title: self.title.clone(),
                status,
            }),
            _ => Err(errors),
        }
    }
}

/// The fields sent to the provider when an edit is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostUpdate {
    pub title: String,
    pub status: PostStatus,
}

impl PostUpdate {
    /// Applies the update to a post, keeping its id and creation time.
    pub fn apply_to(&self, post: &mut Post) {
        post.title = self.title.clone();
        post.status = self.status;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_from_post() {
        let post = Post::new(1, "First", PostStatus::Published, "2024-01-01T00:00:00Z");
        assert_eq!(PostDraft::from_post(&post), PostDraft::new("First", "published"));
    }

    #[test]
    fn test_validate_ok() {
        let update = PostDraft::new("Title", "draft").validate().unwrap();
        assert_eq!(update.title, "Title");
        assert_eq!(update.status, PostStatus::Draft);
    }

    #[test]
    fn test_validate_empty_title() {
        let errors = PostDraft::new("", "draft").validate().unwrap_err();
        assert_eq!(errors.errors.len(), 1);
        assert_eq!(errors.for_field("title").unwrap().message, "Title is required");
    }

    #[test]
    fn test_validate_reports_every_field() {
        let errors = PostDraft::new("  ", "").validate().unwrap_err();
        assert!(errors.for_field("title").is_some());
        assert_eq!(errors.for_field("status").unwrap().message, "Status is required");
    }

    #[test]
    fn test_validate_unknown_status() {
        let errors = PostDraft::new("Title", "archived").validate().unwrap_err();
        assert_eq!(errors.for_field("status").unwrap().code.as_deref(), Some("choice"));
    }
}
