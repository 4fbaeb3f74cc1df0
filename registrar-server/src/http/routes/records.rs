//! Record inspection endpoint
//!
//! GET /records - row counts per table, a quick look at what the
//! store currently holds.

use std::sync::Arc;

use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use sqlx::SqlitePool;

use crate::http::error::ApiError;
use crate::http::server::AppState;

/// Row counts per table
#[derive(Serialize)]
pub struct RecordCounts {
    pub tasks: i64,
    pub users: i64,
    pub profiles: i64,
    pub authors: i64,
    pub books: i64,
    pub students: i64,
    pub courses: i64,
    pub enrollments: i64,
}

async fn count(pool: &SqlitePool, table: &str) -> Result<i64, sqlx::Error> {
    sqlx::query_scalar(&format!("SELECT COUNT(*) FROM {table}"))
        .fetch_one(pool)
        .await
}

/// GET /records
async fn records(State(state): State<Arc<AppState>>) -> Result<Json<RecordCounts>, ApiError> {
    let pool = &state.pool;

    Ok(Json(RecordCounts {
        tasks: count(pool, "tasks").await?,
        users: count(pool, "users").await?,
        profiles: count(pool, "profiles").await?,
        authors: count(pool, "authors").await?,
        books: count(pool, "books").await?,
        students: count(pool, "students").await?,
        courses: count(pool, "courses").await?,
        enrollments: count(pool, "enrollments").await?,
    }))
}

/// Record inspection routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/records", get(records))
}
