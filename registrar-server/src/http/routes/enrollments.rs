//! Enrollment endpoints
//!
//! Creation takes the student and course by natural key; existing rows
//! are reused, new ones created as needed, and the same (student, course)
//! pair can only be enrolled once.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::db::repos::{Course, EnrollmentRecord, EnrollmentRepo, Student};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, RecordId};
use crate::http::server::AppState;
use crate::models::{EnrollmentDraft, EnrollmentPatch, ValidationError};

/// Student natural key in a creation request
#[derive(Deserialize)]
pub struct StudentEntry {
    pub name: Option<String>,
    pub email: Option<String>,
}

/// Course natural key in a creation request
#[derive(Deserialize)]
pub struct CourseEntry {
    pub title: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<NaiveDate>,
}

/// Create enrollment request
#[derive(Deserialize)]
pub struct CreateEnrollmentRequest {
    pub student: Option<StudentEntry>,
    pub course: Option<CourseEntry>,
    pub grade: Option<String>,
}

#[derive(Serialize)]
pub struct EnrollmentCreatedResponse {
    pub message: &'static str,
    pub enrollment_id: i64,
    pub student: String,
    pub course: String,
    pub enrollment_date: String,
    pub grade: Option<String>,
}

/// Student snapshot nested in enrollment responses
#[derive(Serialize)]
pub struct StudentBody {
    pub id: i64,
    pub name: String,
    pub email: String,
}

impl From<Student> for StudentBody {
    fn from(s: Student) -> Self {
        Self {
            id: s.id,
            name: s.name,
            email: s.email,
        }
    }
}

/// Course snapshot nested in enrollment responses
#[derive(Serialize)]
pub struct CourseBody {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub start_date: String,
}

impl From<Course> for CourseBody {
    fn from(c: Course) -> Self {
        Self {
            id: c.id,
            title: c.title,
            description: c.description,
            start_date: c.start_date.to_string(),
        }
    }
}

/// Enrollment with nested snapshots
#[derive(Serialize)]
pub struct EnrollmentResponse {
    pub id: i64,
    pub student: StudentBody,
    pub course: CourseBody,
    pub enrollment_date: String,
    pub grade: Option<String>,
}

impl From<EnrollmentRecord> for EnrollmentResponse {
    fn from(e: EnrollmentRecord) -> Self {
        Self {
            id: e.id,
            student: StudentBody::from(e.student),
            course: CourseBody::from(e.course),
            enrollment_date: e.enrollment_date.to_string(),
            grade: e.grade,
        }
    }
}

/// POST /enrollments - enroll a student in a course
async fn create_enrollment(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateEnrollmentRequest>,
) -> Result<(StatusCode, Json<EnrollmentCreatedResponse>), ApiError> {
    let student = req
        .student
        .ok_or(ApiError::Validation(ValidationError::Empty {
            field: "student",
        }))?;
    let course = req
        .course
        .ok_or(ApiError::Validation(ValidationError::Empty {
            field: "course",
        }))?;
    let start_date = course
        .start_date
        .ok_or(ApiError::Validation(ValidationError::Empty {
            field: "start_date",
        }))?;

    let draft = EnrollmentDraft::new(
        student.name.as_deref().unwrap_or_default(),
        student.email.as_deref().unwrap_or_default(),
        course.title.as_deref().unwrap_or_default(),
        course.description.as_deref().unwrap_or_default(),
        start_date,
        req.grade,
    )?;

    let created = EnrollmentRepo::new(&state.pool).create(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(EnrollmentCreatedResponse {
            message: "Enrollment created successfully",
            enrollment_id: created.id,
            student: created.student_name,
            course: created.course_title,
            enrollment_date: created.enrollment_date.to_string(),
            grade: created.grade,
        }),
    ))
}

/// GET /enrollments - list all enrollments
async fn list_enrollments(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<EnrollmentResponse>>, ApiError> {
    let records = EnrollmentRepo::new(&state.pool).list().await?;
    Ok(Json(
        records.into_iter().map(EnrollmentResponse::from).collect(),
    ))
}

/// GET /enrollments/{id} - one enrollment with nested snapshots
async fn get_enrollment(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<EnrollmentResponse>, ApiError> {
    let record = EnrollmentRepo::new(&state.pool).get(id).await?;
    Ok(Json(EnrollmentResponse::from(record)))
}

/// PUT /enrollments/{id} - patch the enrollment and its referenced rows
async fn update_enrollment(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    ApiJson(patch): ApiJson<EnrollmentPatch>,
) -> Result<Json<MessageResponse>, ApiError> {
    EnrollmentRepo::new(&state.pool).update(id, patch).await?;

    Ok(Json(MessageResponse {
        message: "Enrollment updated successfully",
    }))
}

/// DELETE /enrollments/{id} - remove the enrollment, keeping the
/// student and course rows
async fn delete_enrollment(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<MessageResponse>, ApiError> {
    EnrollmentRepo::new(&state.pool).delete(id).await?;

    Ok(Json(MessageResponse {
        message: "Enrollment deleted successfully",
    }))
}

/// Enrollment routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route(
            "/enrollments",
            get(list_enrollments).post(create_enrollment),
        )
        .route(
            "/enrollments/{id}",
            get(get_enrollment)
                .put(update_enrollment)
                .delete(delete_enrollment),
        )
}
