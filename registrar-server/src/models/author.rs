//! Author and book input validation

use serde::Deserialize;

use super::validation::{required, ValidationError};

/// Validated input for creating an author
#[derive(Debug, Clone)]
pub struct AuthorDraft {
    name: String,
    bio: Option<String>,
}

impl AuthorDraft {
    /// Create an author draft. Name is required non-empty, bio is optional.
    pub fn new(name: &str, bio: Option<String>) -> Result<Self, ValidationError> {
        let name = required(name, "author_name")?;
        Ok(Self { name, bio })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bio(&self) -> Option<&str> {
        self.bio.as_deref()
    }
}

/// Validated input for creating a book
#[derive(Debug, Clone)]
pub struct BookDraft {
    book_name: String,
    content: String,
}

impl BookDraft {
    /// Create a book draft. Both book name and content are required.
    pub fn new(book_name: &str, content: &str) -> Result<Self, ValidationError> {
        let book_name = required(book_name, "book_name")?;
        let content = required(content, "content")?;
        Ok(Self { book_name, content })
    }

    pub fn book_name(&self) -> &str {
        &self.book_name
    }

    pub fn content(&self) -> &str {
        &self.content
    }
}

/// Partial update for a book. A present `author_id` re-parents the book;
/// absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BookPatch {
    pub author_id: Option<i64>,
    pub book_name: Option<String>,
    pub content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn author_draft_allows_missing_bio() {
        let draft = AuthorDraft::new("Le Guin", None).unwrap();
        assert_eq!(draft.name(), "Le Guin");
        assert!(draft.bio().is_none());
    }

    #[test]
    fn author_draft_rejects_empty_name() {
        assert!(matches!(
            AuthorDraft::new("  ", None).unwrap_err(),
            ValidationError::Empty {
                field: "author_name"
            }
        ));
    }

    #[test]
    fn book_draft_requires_both_fields() {
        assert!(BookDraft::new("Dispossessed", "An ambiguous utopia").is_ok());
        assert!(matches!(
            BookDraft::new("", "content").unwrap_err(),
            ValidationError::Empty { field: "book_name" }
        ));
        assert!(matches!(
            BookDraft::new("name", "").unwrap_err(),
            ValidationError::Empty { field: "content" }
        ));
    }
}
