//! Task repository
//!
//! Plain CRUD with no relationships.

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use super::DbError;
use crate::models::{TaskDraft, TaskPatch};

/// Task record from database
#[derive(Debug, Clone, FromRow)]
pub struct Task {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub created_at: DateTime<Utc>,
}

/// Task repository
pub struct TaskRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TaskRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a task with a server-assigned creation timestamp,
    /// returning its id.
    pub async fn create(&self, draft: TaskDraft) -> Result<i64, DbError> {
        let result = sqlx::query(
            "INSERT INTO tasks (title, description, created_at) VALUES (?, ?, ?)",
        )
        .bind(draft.title())
        .bind(draft.description())
        .bind(Utc::now())
        .execute(self.pool)
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// List all tasks in insertion order.
    pub async fn list(&self) -> Result<Vec<Task>, DbError> {
        let tasks = sqlx::query_as(
            "SELECT id, title, description, created_at FROM tasks ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        Ok(tasks)
    }

    /// Get a single task by id.
    pub async fn get(&self, id: i64) -> Result<Task, DbError> {
        let task = sqlx::query_as(
            "SELECT id, title, description, created_at FROM tasks WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound(format!("Task with id {} not found", id)))?;

        Ok(task)
    }

    /// Apply a partial update, returning the updated task.
    pub async fn update(&self, id: i64, patch: TaskPatch) -> Result<Task, DbError> {
        let task = sqlx::query_as(
            r#"
            UPDATE tasks SET
                title = COALESCE(?, title),
                description = COALESCE(?, description)
            WHERE id = ?
            RETURNING id, title, description, created_at
            "#,
        )
        .bind(patch.title)
        .bind(patch.description)
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound("Task not found".to_owned()))?;

        Ok(task)
    }

    /// Delete a task by id.
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ?")
            .bind(id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Task not found".to_owned()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;

    #[tokio::test]
    async fn create_then_get_round_trips() {
        let (pool, _dir) = testing::pool().await;
        let repo = TaskRepo::new(&pool);

        let draft = TaskDraft::new("Write report", "Quarterly summary").unwrap();
        let id = repo.create(draft).await.unwrap();

        let task = repo.get(id).await.unwrap();
        assert_eq!(task.title, "Write report");
        assert_eq!(task.description, "Quarterly summary");
    }

    #[tokio::test]
    async fn get_missing_is_not_found() {
        let (pool, _dir) = testing::pool().await;
        let repo = TaskRepo::new(&pool);

        let err = repo.get(99).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound(msg) if msg == "Task with id 99 not found"));
    }

    #[tokio::test]
    async fn update_only_touches_present_fields() {
        let (pool, _dir) = testing::pool().await;
        let repo = TaskRepo::new(&pool);

        let id = repo
            .create(TaskDraft::new("Original", "Keep me").unwrap())
            .await
            .unwrap();

        let patch = TaskPatch {
            title: Some("Renamed".into()),
            description: None,
        };
        let task = repo.update(id, patch).await.unwrap();

        assert_eq!(task.title, "Renamed");
        assert_eq!(task.description, "Keep me");
    }

    #[tokio::test]
    async fn delete_removes_the_row() {
        let (pool, _dir) = testing::pool().await;
        let repo = TaskRepo::new(&pool);

        let id = repo
            .create(TaskDraft::new("Short lived", "gone soon").unwrap())
            .await
            .unwrap();

        repo.delete(id).await.unwrap();
        assert!(repo.get(id).await.is_err());
        assert!(matches!(
            repo.delete(id).await.unwrap_err(),
            DbError::NotFound(_)
        ));
    }
}
