//! Domain models with validation at construction
//!
//! All user input is validated when creating these types.
//! Invalid input returns ValidationError, not panic.

pub mod author;
pub mod enrollment;
pub mod task;
pub mod user;
pub mod validation;

pub use author::{AuthorDraft, BookDraft, BookPatch};
pub use enrollment::{CoursePatch, EnrollmentDraft, EnrollmentPatch, StudentPatch};
pub use task::{TaskDraft, TaskPatch};
pub use user::{UserDraft, UserPatch};
pub use validation::ValidationError;
