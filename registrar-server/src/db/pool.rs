//! Database connection pool management
//!
//! Uses a sqlx SqlitePool with explicit connection limits.

use std::path::Path;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;

/// Default maximum connections for the pool.
/// Kept low for single-service tooling.
const DEFAULT_MAX_CONNECTIONS: u32 = 5;

/// Create a SQLite connection pool.
///
/// Creates the database file if it does not exist and enables
/// foreign-key enforcement on every connection.
///
/// # Errors
///
/// Returns an error if the database cannot be opened.
pub async fn create_pool(path: &Path) -> Result<SqlitePool, sqlx::Error> {
    create_pool_with_options(path, DEFAULT_MAX_CONNECTIONS).await
}

/// Create a SQLite connection pool with a custom connection limit.
pub async fn create_pool_with_options(
    path: &Path,
    max_connections: u32,
) -> Result<SqlitePool, sqlx::Error> {
    let options = SqliteConnectOptions::new()
        .filename(path)
        .create_if_missing(true)
        .foreign_keys(true);

    SqlitePoolOptions::new()
        .max_connections(max_connections)
        .connect_with(options)
        .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn pool_acquires_connection() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pool = create_pool(&dir.path().join("test.db"))
            .await
            .expect("pool creation failed");

        let result: (i32,) = sqlx::query_as("SELECT 1")
            .fetch_one(&pool)
            .await
            .expect("query failed");

        assert_eq!(result.0, 1);
    }

    #[tokio::test]
    async fn creates_missing_database_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("fresh.db");
        assert!(!path.exists());

        let _pool = create_pool(&path).await.expect("pool creation failed");
        assert!(path.exists());
    }

    #[tokio::test]
    async fn concurrent_pool_access() {
        let dir = tempfile::tempdir().expect("tempdir");
        let pool = create_pool(&dir.path().join("test.db"))
            .await
            .expect("pool creation failed");

        let handles: Vec<_> = (0..10)
            .map(|i: i32| {
                let pool = pool.clone();
                tokio::spawn(async move {
                    let result: (i32,) = sqlx::query_as("SELECT ?")
                        .bind(i)
                        .fetch_one(&pool)
                        .await
                        .expect("concurrent query failed");
                    result.0
                })
            })
            .collect();

        for (i, handle) in handles.into_iter().enumerate() {
            let result = handle.await.expect("task panicked");
            assert_eq!(result, i as i32);
        }
    }
}
