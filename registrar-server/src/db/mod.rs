//! Database layer - connection pool, schema bootstrap, and repositories
//!
//! # Design Principles
//!
//! - Connection pool (max 5 connections) - no Arc<Mutex<Connection>>
//! - All list operations use a fixed number of queries - no N+1
//! - Transactions for multi-step writes, including explicit cascade
//!   deletes, so composite operations fully succeed or fully fail

pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::create_pool;
pub use repos::*;

#[cfg(test)]
pub(crate) mod testing {
    use sqlx::SqlitePool;
    use tempfile::TempDir;

    /// Open a pooled database in a fresh temp directory with the schema
    /// applied. The TempDir must be kept alive for the pool's lifetime.
    pub async fn pool() -> (SqlitePool, TempDir) {
        let dir = tempfile::tempdir().expect("tempdir");
        let pool = super::create_pool(&dir.path().join("test.db"))
            .await
            .expect("pool");
        super::migrations::run(&pool).await.expect("migrations");
        (pool, dir)
    }
}
