//! Task input validation

use serde::Deserialize;

use super::validation::{required, ValidationError};

/// Maximum length for task titles
const MAX_TITLE_LEN: usize = 255;

/// Validated input for creating a task
#[derive(Debug, Clone)]
pub struct TaskDraft {
    title: String,
    description: String,
}

impl TaskDraft {
    /// Create a task draft.
    ///
    /// # Rules
    /// - Title and description non-empty (after trimming whitespace)
    /// - Title max 255 characters
    pub fn new(title: &str, description: &str) -> Result<Self, ValidationError> {
        let title = required(title, "title")?;
        if title.len() > MAX_TITLE_LEN {
            return Err(ValidationError::TooLong {
                field: "title",
                max: MAX_TITLE_LEN,
            });
        }
        let description = required(description, "description")?;

        Ok(Self { title, description })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }
}

/// Partial update for a task. Absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn valid_draft() {
        let draft = TaskDraft::new("Write report", "Quarterly summary").unwrap();
        assert_eq!(draft.title(), "Write report");
        assert_eq!(draft.description(), "Quarterly summary");
    }

    #[test]
    fn trims_whitespace() {
        let draft = TaskDraft::new("  Write report  ", "  notes  ").unwrap();
        assert_eq!(draft.title(), "Write report");
        assert_eq!(draft.description(), "notes");
    }

    #[test]
    fn rejects_empty_title() {
        assert!(matches!(
            TaskDraft::new("", "desc").unwrap_err(),
            ValidationError::Empty { field: "title" }
        ));
    }

    #[test]
    fn rejects_empty_description() {
        assert!(matches!(
            TaskDraft::new("title", "   ").unwrap_err(),
            ValidationError::Empty { field: "description" }
        ));
    }

    #[test]
    fn max_title_length() {
        let title_255 = "a".repeat(255);
        assert!(TaskDraft::new(&title_255, "desc").is_ok());

        let title_256 = "a".repeat(256);
        let err = TaskDraft::new(&title_256, "desc").unwrap_err();
        assert!(matches!(err, ValidationError::TooLong { max: 255, .. }));
    }
}
