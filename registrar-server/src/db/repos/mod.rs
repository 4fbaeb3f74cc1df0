//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - A fixed number of queries per operation (no N+1)
//! - Transactions for multi-step writes and explicit cascade deletes
//! - UNIQUE constraints as a backstop for get-or-create races,
//!   surfaced as Conflict

pub mod authors;
pub mod enrollments;
pub mod tasks;
pub mod users;

pub use authors::{Author, AuthorRepo, AuthorWithBooks, Book, BookWithAuthor};
pub use enrollments::{Course, CreatedEnrollment, EnrollmentRecord, EnrollmentRepo, Student};
pub use tasks::{Task, TaskRepo};
pub use users::{UserRepo, UserWithProfile};

/// Database error type
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Lookup missed; carries the client-facing message.
    #[error("{0}")]
    NotFound(String),

    /// Unique constraint refused a write; carries the client-facing message.
    #[error("{0}")]
    Conflict(String),
}

/// Translate a unique-constraint violation into a Conflict, passing
/// other errors through unchanged.
pub(crate) fn unique_conflict(err: sqlx::Error, message: &str) -> DbError {
    match &err {
        sqlx::Error::Database(db) if db.is_unique_violation() => {
            DbError::Conflict(message.to_owned())
        }
        _ => DbError::Sqlx(err),
    }
}
