//! Enrollment repository
//!
//! An enrollment joins one student to one course. Creation resolves both
//! sides with get-or-create lookups inside a single transaction, so a
//! repeated (name, email) or (title, description, start_date) payload
//! reuses the existing row instead of inserting a duplicate.

use chrono::{NaiveDate, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::{FromRow, Row, SqlitePool};

use super::{unique_conflict, DbError};
use crate::models::{EnrollmentDraft, EnrollmentPatch};

/// Student record from database
#[derive(Debug, Clone, FromRow)]
pub struct Student {
    pub id: i64,
    pub name: String,
    pub email: String,
}

/// Course record from database
#[derive(Debug, Clone, FromRow)]
pub struct Course {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_date: NaiveDate,
}

/// Result of a successful enrollment creation
#[derive(Debug, Clone)]
pub struct CreatedEnrollment {
    pub id: i64,
    pub student_id: i64,
    pub course_id: i64,
    pub student_name: String,
    pub course_title: String,
    pub enrollment_date: NaiveDate,
    pub grade: Option<String>,
}

/// Enrollment joined with snapshots of its student and course
#[derive(Debug, Clone)]
pub struct EnrollmentRecord {
    pub id: i64,
    pub student: Student,
    pub course: Course,
    pub enrollment_date: NaiveDate,
    pub grade: Option<String>,
}

impl<'r> FromRow<'r, SqliteRow> for EnrollmentRecord {
    fn from_row(row: &'r SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            student: Student {
                id: row.try_get("student_id")?,
                name: row.try_get("student_name")?,
                email: row.try_get("student_email")?,
            },
            course: Course {
                id: row.try_get("course_id")?,
                title: row.try_get("course_title")?,
                description: row.try_get("course_description")?,
                start_date: row.try_get("start_date")?,
            },
            enrollment_date: row.try_get("enrollment_date")?,
            grade: row.try_get("grade")?,
        })
    }
}

const RECORD_SELECT: &str = r#"
    SELECT
        e.id,
        s.id AS student_id, s.name AS student_name, s.email AS student_email,
        c.id AS course_id, c.title AS course_title,
        c.description AS course_description, c.start_date,
        e.enrollment_date, e.grade
    FROM enrollments e
    JOIN students s ON s.id = e.student_id
    JOIN courses c ON c.id = e.course_id
"#;

/// Enrollment repository
pub struct EnrollmentRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> EnrollmentRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an enrollment, resolving student and course by their
    /// natural keys first.
    ///
    /// The whole sequence runs in one transaction: a duplicate
    /// (student, course) pair rolls back any rows created along the way.
    pub async fn create(&self, draft: EnrollmentDraft) -> Result<CreatedEnrollment, DbError> {
        let mut tx = self.pool.begin().await?;

        let student_id: i64 = match sqlx::query_scalar(
            "SELECT id FROM students WHERE name = ? AND email = ?",
        )
        .bind(draft.student_name())
        .bind(draft.student_email())
        .fetch_optional(&mut *tx)
        .await?
        {
            Some(id) => id,
            None => sqlx::query("INSERT INTO students (name, email) VALUES (?, ?)")
                .bind(draft.student_name())
                .bind(draft.student_email())
                .execute(&mut *tx)
                .await
                .map_err(|err| {
                    unique_conflict(err, "A student with this email already exists")
                })?
                .last_insert_rowid(),
        };

        let course_id: i64 = match sqlx::query_scalar(
            "SELECT id FROM courses WHERE title = ? AND description = ? AND start_date = ?",
        )
        .bind(draft.course_title())
        .bind(draft.course_description())
        .bind(draft.start_date())
        .fetch_optional(&mut *tx)
        .await?
        {
            Some(id) => id,
            None => sqlx::query(
                "INSERT INTO courses (title, description, start_date) VALUES (?, ?, ?)",
            )
            .bind(draft.course_title())
            .bind(draft.course_description())
            .bind(draft.start_date())
            .execute(&mut *tx)
            .await?
            .last_insert_rowid(),
        };

        let already_enrolled: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE student_id = ? AND course_id = ?)",
        )
        .bind(student_id)
        .bind(course_id)
        .fetch_one(&mut *tx)
        .await?;
        if already_enrolled.0 {
            return Err(DbError::Conflict(
                "Enrollment already exists for this student and course".to_owned(),
            ));
        }

        let enrollment_date = Utc::now().date_naive();
        let result = sqlx::query(
            "INSERT INTO enrollments (student_id, course_id, enrollment_date, grade) VALUES (?, ?, ?, ?)",
        )
        .bind(student_id)
        .bind(course_id)
        .bind(enrollment_date)
        .bind(draft.grade())
        .execute(&mut *tx)
        .await
        .map_err(|err| {
            unique_conflict(err, "Enrollment already exists for this student and course")
        })?;

        tx.commit().await?;

        Ok(CreatedEnrollment {
            id: result.last_insert_rowid(),
            student_id,
            course_id,
            student_name: draft.student_name().to_owned(),
            course_title: draft.course_title().to_owned(),
            enrollment_date,
            grade: draft.grade().map(ToOwned::to_owned),
        })
    }

    /// List every enrollment with nested student and course snapshots.
    pub async fn list(&self) -> Result<Vec<EnrollmentRecord>, DbError> {
        let records = sqlx::query_as(&format!("{RECORD_SELECT} ORDER BY e.id"))
            .fetch_all(self.pool)
            .await?;
        Ok(records)
    }

    /// Fetch one enrollment with nested snapshots.
    pub async fn get(&self, id: i64) -> Result<EnrollmentRecord, DbError> {
        sqlx::query_as(&format!("{RECORD_SELECT} WHERE e.id = ?"))
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound("Enrollment not found".to_owned()))
    }

    /// Patch an enrollment. Student and course sub-patches mutate the
    /// referenced rows in place; everything runs in one transaction.
    pub async fn update(&self, id: i64, patch: EnrollmentPatch) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let ids: Option<(i64, i64)> =
            sqlx::query_as("SELECT student_id, course_id FROM enrollments WHERE id = ?")
                .bind(id)
                .fetch_optional(&mut *tx)
                .await?;
        let (student_id, course_id) =
            ids.ok_or_else(|| DbError::NotFound("Enrollment not found".to_owned()))?;

        if let Some(student) = patch.student {
            sqlx::query(
                r#"
                UPDATE students SET
                    name = COALESCE(?, name),
                    email = COALESCE(?, email)
                WHERE id = ?
                "#,
            )
            .bind(student.name)
            .bind(student.email)
            .bind(student_id)
            .execute(&mut *tx)
            .await
            .map_err(|err| unique_conflict(err, "A student with this email already exists"))?;
        }

        if let Some(course) = patch.course {
            sqlx::query(
                r#"
                UPDATE courses SET
                    title = COALESCE(?, title),
                    description = COALESCE(?, description),
                    start_date = COALESCE(?, start_date)
                WHERE id = ?
                "#,
            )
            .bind(course.title)
            .bind(course.description)
            .bind(course.start_date)
            .bind(course_id)
            .execute(&mut *tx)
            .await?;
        }

        if let Some(grade) = patch.grade {
            sqlx::query("UPDATE enrollments SET grade = ? WHERE id = ?")
                .bind(grade)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete the join row only. Student and course rows stay.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM enrollments WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Enrollment not found".to_owned()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;
    use crate::models::{CoursePatch, StudentPatch};

    fn draft(name: &str, email: &str, title: &str) -> EnrollmentDraft {
        EnrollmentDraft::new(
            name,
            email,
            title,
            "Course description",
            NaiveDate::from_ymd_opt(2025, 9, 1).unwrap(),
            Some("A".into()),
        )
        .unwrap()
    }

    async fn count(pool: &SqlitePool, table: &str) -> i64 {
        let row: (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM {table}"))
            .fetch_one(pool)
            .await
            .unwrap();
        row.0
    }

    #[tokio::test]
    async fn create_resolves_student_and_course_by_natural_key() {
        let (pool, _dir) = testing::pool().await;
        let repo = EnrollmentRepo::new(&pool);

        let first = repo.create(draft("Ada", "ada@example.com", "Analysis")).await.unwrap();
        let second = repo.create(draft("Ada", "ada@example.com", "Algebra")).await.unwrap();

        assert_eq!(first.student_id, second.student_id);
        assert_eq!(count(&pool, "students").await, 1);
        assert_eq!(count(&pool, "courses").await, 2);
        assert_eq!(count(&pool, "enrollments").await, 2);
    }

    #[tokio::test]
    async fn duplicate_pair_conflicts_without_side_effects() {
        let (pool, _dir) = testing::pool().await;
        let repo = EnrollmentRepo::new(&pool);

        repo.create(draft("Ada", "ada@example.com", "Analysis")).await.unwrap();
        let err = repo
            .create(draft("Ada", "ada@example.com", "Analysis"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Conflict(msg) if msg.contains("already exists")));
        assert_eq!(count(&pool, "students").await, 1);
        assert_eq!(count(&pool, "courses").await, 1);
        assert_eq!(count(&pool, "enrollments").await, 1);
    }

    #[tokio::test]
    async fn same_email_different_name_conflicts() {
        let (pool, _dir) = testing::pool().await;
        let repo = EnrollmentRepo::new(&pool);

        repo.create(draft("Ada", "ada@example.com", "Analysis")).await.unwrap();
        let err = repo
            .create(draft("Grace", "ada@example.com", "Compilers"))
            .await
            .unwrap_err();

        assert!(matches!(err, DbError::Conflict(msg) if msg.contains("email")));
        assert_eq!(count(&pool, "students").await, 1);
    }

    #[tokio::test]
    async fn update_patches_nested_rows_in_place() {
        let (pool, _dir) = testing::pool().await;
        let repo = EnrollmentRepo::new(&pool);

        let created = repo.create(draft("Ada", "ada@example.com", "Analysis")).await.unwrap();

        let patch = EnrollmentPatch {
            student: Some(StudentPatch {
                name: Some("Ada Lovelace".into()),
                ..Default::default()
            }),
            course: Some(CoursePatch {
                title: Some("Real Analysis".into()),
                ..Default::default()
            }),
            grade: Some("B+".into()),
        };
        repo.update(created.id, patch).await.unwrap();

        let record = repo.get(created.id).await.unwrap();
        assert_eq!(record.student.name, "Ada Lovelace");
        assert_eq!(record.student.email, "ada@example.com");
        assert_eq!(record.course.title, "Real Analysis");
        assert_eq!(record.course.description, "Course description");
        assert_eq!(record.grade.as_deref(), Some("B+"));
    }

    #[tokio::test]
    async fn delete_removes_join_row_only() {
        let (pool, _dir) = testing::pool().await;
        let repo = EnrollmentRepo::new(&pool);

        let created = repo.create(draft("Ada", "ada@example.com", "Analysis")).await.unwrap();
        repo.delete(created.id).await.unwrap();

        assert!(matches!(
            repo.get(created.id).await.unwrap_err(),
            DbError::NotFound(_)
        ));
        assert_eq!(count(&pool, "students").await, 1);
        assert_eq!(count(&pool, "courses").await, 1);

        assert!(matches!(
            repo.delete(created.id).await.unwrap_err(),
            DbError::NotFound(msg) if msg == "Enrollment not found"
        ));
    }
}
