//! Enrollment input validation
//!
//! An enrollment request carries the natural keys of its student and
//! course; the storage layer resolves them with get-or-create lookups.

use chrono::NaiveDate;
use serde::Deserialize;

use super::validation::{required, ValidationError};

/// Validated input for creating an enrollment
#[derive(Debug, Clone)]
pub struct EnrollmentDraft {
    student_name: String,
    student_email: String,
    course_title: String,
    course_description: String,
    start_date: NaiveDate,
    grade: Option<String>,
}

impl EnrollmentDraft {
    /// Create an enrollment draft.
    ///
    /// # Rules
    /// - Student name and email non-empty
    /// - Course title and description non-empty (both are part of the
    ///   course natural key)
    /// - Grade optional
    pub fn new(
        student_name: &str,
        student_email: &str,
        course_title: &str,
        course_description: &str,
        start_date: NaiveDate,
        grade: Option<String>,
    ) -> Result<Self, ValidationError> {
        let student_name = required(student_name, "name")?;
        let student_email = required(student_email, "email")?;
        let course_title = required(course_title, "title")?;
        let course_description = required(course_description, "description")?;

        Ok(Self {
            student_name,
            student_email,
            course_title,
            course_description,
            start_date,
            grade,
        })
    }

    pub fn student_name(&self) -> &str {
        &self.student_name
    }

    pub fn student_email(&self) -> &str {
        &self.student_email
    }

    pub fn course_title(&self) -> &str {
        &self.course_title
    }

    pub fn course_description(&self) -> &str {
        &self.course_description
    }

    pub fn start_date(&self) -> NaiveDate {
        self.start_date
    }

    pub fn grade(&self) -> Option<&str> {
        self.grade.as_deref()
    }
}

/// Partial update for the student row referenced by an enrollment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct StudentPatch {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Partial update for the course row referenced by an enrollment
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CoursePatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
}

/// Partial update for an enrollment. Student and course patches mutate
/// the referenced rows in place; absent fields keep their current value.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct EnrollmentPatch {
    pub student: Option<StudentPatch>,
    pub course: Option<CoursePatch>,
    pub grade: Option<String>,
}
