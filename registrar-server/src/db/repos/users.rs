//! User repository
//!
//! A user owns exactly one profile. Creation writes both rows in one
//! transaction; deletion removes the profile explicitly before the user.

use sqlx::{FromRow, SqlitePool};

use super::DbError;
use crate::models::{UserDraft, UserPatch};

/// User joined with its optional profile. A user whose profile is
/// absent surfaces null bio/website rather than an error.
#[derive(Debug, Clone, FromRow)]
pub struct UserWithProfile {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub bio: Option<String>,
    pub website: Option<String>,
}

/// User repository
pub struct UserRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create a user and its profile atomically, returning both ids.
    pub async fn create_with_profile(&self, draft: UserDraft) -> Result<(i64, i64), DbError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query("INSERT INTO users (username, email) VALUES (?, ?)")
            .bind(draft.username())
            .bind(draft.email())
            .execute(&mut *tx)
            .await?;
        let user_id = user.last_insert_rowid();

        let profile = sqlx::query("INSERT INTO profiles (user_id, bio, website) VALUES (?, ?, ?)")
            .bind(user_id)
            .bind(draft.bio())
            .bind(draft.website())
            .execute(&mut *tx)
            .await?;
        let profile_id = profile.last_insert_rowid();

        tx.commit().await?;
        Ok((user_id, profile_id))
    }

    /// Get a user with its profile fields via LEFT JOIN.
    pub async fn get(&self, id: i64) -> Result<UserWithProfile, DbError> {
        let user = sqlx::query_as(
            r#"
            SELECT u.id, u.username, u.email, p.bio, p.website
            FROM users u
            LEFT JOIN profiles p ON p.user_id = u.id
            WHERE u.id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or_else(|| DbError::NotFound("User not found".to_owned()))?;

        Ok(user)
    }

    /// List all users with their profile fields in a single query.
    pub async fn list(&self) -> Result<Vec<UserWithProfile>, DbError> {
        let users = sqlx::query_as(
            r#"
            SELECT u.id, u.username, u.email, p.bio, p.website
            FROM users u
            LEFT JOIN profiles p ON p.user_id = u.id
            ORDER BY u.id
            "#,
        )
        .fetch_all(self.pool)
        .await?;

        Ok(users)
    }

    /// Patch user and profile rows in one transaction. Both rows must
    /// exist; a missing profile is reported distinctly.
    pub async fn update(&self, id: i64, patch: UserPatch) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        let user = sqlx::query(
            r#"
            UPDATE users SET
                username = COALESCE(?, username),
                email = COALESCE(?, email)
            WHERE id = ?
            "#,
        )
        .bind(patch.username)
        .bind(patch.email)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if user.rows_affected() == 0 {
            return Err(DbError::NotFound("User not found".to_owned()));
        }

        let profile = sqlx::query(
            r#"
            UPDATE profiles SET
                bio = COALESCE(?, bio),
                website = COALESCE(?, website)
            WHERE user_id = ?
            "#,
        )
        .bind(patch.bio)
        .bind(patch.website)
        .bind(id)
        .execute(&mut *tx)
        .await?;

        if profile.rows_affected() == 0 {
            return Err(DbError::NotFound("User profile not found".to_owned()));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a user and its profile in one transaction (explicit cascade).
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM profiles WHERE user_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let user = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if user.rows_affected() == 0 {
            return Err(DbError::NotFound("User not found".to_owned()));
        }

        tx.commit().await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;

    fn draft() -> UserDraft {
        UserDraft::new(
            "ada",
            "ada@example.com",
            "mathematician",
            Some("https://example.com".into()),
        )
        .unwrap()
    }

    #[tokio::test]
    async fn create_then_get_returns_profile_fields() {
        let (pool, _dir) = testing::pool().await;
        let repo = UserRepo::new(&pool);

        let (user_id, profile_id) = repo.create_with_profile(draft()).await.unwrap();
        assert!(profile_id > 0);

        let user = repo.get(user_id).await.unwrap();
        assert_eq!(user.username, "ada");
        assert_eq!(user.bio.as_deref(), Some("mathematician"));
        assert_eq!(user.website.as_deref(), Some("https://example.com"));
    }

    #[tokio::test]
    async fn user_without_profile_gets_null_fields() {
        let (pool, _dir) = testing::pool().await;

        sqlx::query("INSERT INTO users (username, email) VALUES ('bare', 'bare@example.com')")
            .execute(&pool)
            .await
            .unwrap();

        let repo = UserRepo::new(&pool);
        let users = repo.list().await.unwrap();
        assert_eq!(users.len(), 1);
        assert!(users[0].bio.is_none());
        assert!(users[0].website.is_none());
    }

    #[tokio::test]
    async fn update_patches_both_rows() {
        let (pool, _dir) = testing::pool().await;
        let repo = UserRepo::new(&pool);

        let (user_id, _) = repo.create_with_profile(draft()).await.unwrap();

        let patch = UserPatch {
            username: Some("lovelace".into()),
            bio: Some("first programmer".into()),
            ..Default::default()
        };
        repo.update(user_id, patch).await.unwrap();

        let user = repo.get(user_id).await.unwrap();
        assert_eq!(user.username, "lovelace");
        assert_eq!(user.email, "ada@example.com");
        assert_eq!(user.bio.as_deref(), Some("first programmer"));
    }

    #[tokio::test]
    async fn update_without_profile_reports_profile_missing() {
        let (pool, _dir) = testing::pool().await;

        sqlx::query("INSERT INTO users (username, email) VALUES ('bare', 'bare@example.com')")
            .execute(&pool)
            .await
            .unwrap();

        let repo = UserRepo::new(&pool);
        let err = repo.update(1, UserPatch::default()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound(msg) if msg == "User profile not found"));
    }

    #[tokio::test]
    async fn delete_cascades_to_profile() {
        let (pool, _dir) = testing::pool().await;
        let repo = UserRepo::new(&pool);

        let (user_id, _) = repo.create_with_profile(draft()).await.unwrap();
        repo.delete(user_id).await.unwrap();

        assert!(repo.get(user_id).await.is_err());
        let profiles: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM profiles")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(profiles.0, 0);
    }
}
