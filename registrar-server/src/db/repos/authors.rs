//! Author repository
//!
//! An author owns many books. Composite creation and cascade deletion
//! run in transactions; book deletion is scoped by author ownership.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use sqlx::{FromRow, SqlitePool};

use super::DbError;
use crate::models::{AuthorDraft, BookDraft, BookPatch};

/// Author record from database
#[derive(Debug, Clone, FromRow)]
pub struct Author {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
}

/// Book record from database
#[derive(Debug, Clone, FromRow)]
pub struct Book {
    pub id: i64,
    pub author_id: i64,
    pub book_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Book joined with its author's name for response shaping
#[derive(Debug, Clone, FromRow)]
pub struct BookWithAuthor {
    pub id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub book_name: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Author nested with all its books in insertion order
#[derive(Debug, Clone)]
pub struct AuthorWithBooks {
    pub author: Author,
    pub books: Vec<Book>,
}

/// Author repository
pub struct AuthorRepo<'a> {
    pool: &'a SqlitePool,
}

impl<'a> AuthorRepo<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }

    /// Create an author and all its books atomically.
    ///
    /// Drafts are validated before this is called, so either the author
    /// and every book land together or nothing is persisted.
    pub async fn create_with_books(
        &self,
        author: AuthorDraft,
        books: Vec<BookDraft>,
    ) -> Result<(i64, Vec<i64>), DbError> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query("INSERT INTO authors (name, bio) VALUES (?, ?)")
            .bind(author.name())
            .bind(author.bio())
            .execute(&mut *tx)
            .await?;
        let author_id = result.last_insert_rowid();

        let created_at = Utc::now();
        let mut book_ids = Vec::with_capacity(books.len());
        for book in &books {
            let result = sqlx::query(
                "INSERT INTO books (author_id, book_name, content, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(author_id)
            .bind(book.book_name())
            .bind(book.content())
            .bind(created_at)
            .execute(&mut *tx)
            .await?;
            book_ids.push(result.last_insert_rowid());
        }

        tx.commit().await?;
        Ok((author_id, book_ids))
    }

    /// Create an author without books.
    pub async fn create(&self, author: AuthorDraft) -> Result<Author, DbError> {
        let result = sqlx::query("INSERT INTO authors (name, bio) VALUES (?, ?)")
            .bind(author.name())
            .bind(author.bio())
            .execute(self.pool)
            .await?;

        Ok(Author {
            id: result.last_insert_rowid(),
            name: author.name().to_owned(),
            bio: author.bio().map(ToOwned::to_owned),
        })
    }

    /// Create a batch of books under an existing author, atomically.
    pub async fn create_books(
        &self,
        author_id: i64,
        books: Vec<BookDraft>,
    ) -> Result<Vec<BookWithAuthor>, DbError> {
        let mut tx = self.pool.begin().await?;

        let author: Author = sqlx::query_as("SELECT id, name, bio FROM authors WHERE id = ?")
            .bind(author_id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::NotFound("Author not found".to_owned()))?;

        let created_at = Utc::now();
        let mut created = Vec::with_capacity(books.len());
        for book in &books {
            let result = sqlx::query(
                "INSERT INTO books (author_id, book_name, content, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(author.id)
            .bind(book.book_name())
            .bind(book.content())
            .bind(created_at)
            .execute(&mut *tx)
            .await?;

            created.push(BookWithAuthor {
                id: result.last_insert_rowid(),
                author_id: author.id,
                author_name: author.name.clone(),
                book_name: book.book_name().to_owned(),
                content: book.content().to_owned(),
                created_at,
            });
        }

        tx.commit().await?;
        Ok(created)
    }

    /// List every author nested with its books. Two queries total,
    /// grouped in memory.
    pub async fn list_with_books(&self) -> Result<Vec<AuthorWithBooks>, DbError> {
        let authors: Vec<Author> = sqlx::query_as("SELECT id, name, bio FROM authors ORDER BY id")
            .fetch_all(self.pool)
            .await?;

        let books: Vec<Book> = sqlx::query_as(
            "SELECT id, author_id, book_name, content, created_at FROM books ORDER BY id",
        )
        .fetch_all(self.pool)
        .await?;

        let mut by_author: HashMap<i64, Vec<Book>> = HashMap::new();
        for book in books {
            by_author.entry(book.author_id).or_default().push(book);
        }

        Ok(authors
            .into_iter()
            .map(|author| {
                let books = by_author.remove(&author.id).unwrap_or_default();
                AuthorWithBooks { author, books }
            })
            .collect())
    }

    /// Get one author nested with its books.
    pub async fn get_with_books(&self, id: i64) -> Result<AuthorWithBooks, DbError> {
        let author: Author = sqlx::query_as("SELECT id, name, bio FROM authors WHERE id = ?")
            .bind(id)
            .fetch_optional(self.pool)
            .await?
            .ok_or_else(|| DbError::NotFound("Author not found".to_owned()))?;

        let books: Vec<Book> = sqlx::query_as(
            "SELECT id, author_id, book_name, content, created_at FROM books WHERE author_id = ? ORDER BY id",
        )
        .bind(id)
        .fetch_all(self.pool)
        .await?;

        Ok(AuthorWithBooks { author, books })
    }

    /// Patch a book, optionally re-parenting it to another author.
    /// The target author must exist.
    pub async fn update_book(
        &self,
        book_id: i64,
        patch: BookPatch,
    ) -> Result<BookWithAuthor, DbError> {
        let mut tx = self.pool.begin().await?;

        if let Some(author_id) = patch.author_id {
            let author_exists: (bool,) =
                sqlx::query_as("SELECT EXISTS(SELECT 1 FROM authors WHERE id = ?)")
                    .bind(author_id)
                    .fetch_one(&mut *tx)
                    .await?;
            if !author_exists.0 {
                return Err(DbError::NotFound("Author not found".to_owned()));
            }
        }

        let updated = sqlx::query(
            r#"
            UPDATE books SET
                author_id = COALESCE(?, author_id),
                book_name = COALESCE(?, book_name),
                content = COALESCE(?, content)
            WHERE id = ?
            "#,
        )
        .bind(patch.author_id)
        .bind(patch.book_name)
        .bind(patch.content)
        .bind(book_id)
        .execute(&mut *tx)
        .await?;

        if updated.rows_affected() == 0 {
            return Err(DbError::NotFound("Book not found".to_owned()));
        }

        let book: BookWithAuthor = sqlx::query_as(
            r#"
            SELECT b.id, b.author_id, a.name AS author_name, b.book_name, b.content, b.created_at
            FROM books b
            JOIN authors a ON a.id = b.author_id
            WHERE b.id = ?
            "#,
        )
        .bind(book_id)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(book)
    }

    /// Delete an author and all its books in one transaction
    /// (explicit cascade).
    pub async fn delete(&self, id: i64) -> Result<(), DbError> {
        let mut tx = self.pool.begin().await?;

        sqlx::query("DELETE FROM books WHERE author_id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let author = sqlx::query("DELETE FROM authors WHERE id = ?")
            .bind(id)
            .execute(&mut *tx)
            .await?;

        if author.rows_affected() == 0 {
            return Err(DbError::NotFound("Author not found".to_owned()));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Delete a book only if it belongs to the given author.
    pub async fn delete_book(&self, author_id: i64, book_id: i64) -> Result<(), DbError> {
        let result = sqlx::query("DELETE FROM books WHERE id = ? AND author_id = ?")
            .bind(book_id)
            .bind(author_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::NotFound("Book not found".to_owned()));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::testing;

    fn author_draft(name: &str) -> AuthorDraft {
        AuthorDraft::new(name, Some("bio".into())).unwrap()
    }

    fn book_draft(name: &str) -> BookDraft {
        BookDraft::new(name, "content").unwrap()
    }

    #[tokio::test]
    async fn composite_create_persists_author_and_books() {
        let (pool, _dir) = testing::pool().await;
        let repo = AuthorRepo::new(&pool);

        let (author_id, book_ids) = repo
            .create_with_books(
                author_draft("Le Guin"),
                vec![book_draft("Dispossessed"), book_draft("Left Hand")],
            )
            .await
            .unwrap();

        let nested = repo.get_with_books(author_id).await.unwrap();
        assert_eq!(nested.author.name, "Le Guin");
        assert_eq!(nested.books.len(), 2);
        assert_eq!(nested.books[0].id, book_ids[0]);
        assert_eq!(nested.books[0].book_name, "Dispossessed");
    }

    #[tokio::test]
    async fn create_books_for_missing_author_persists_nothing() {
        let (pool, _dir) = testing::pool().await;
        let repo = AuthorRepo::new(&pool);

        let err = repo
            .create_books(42, vec![book_draft("Orphan")])
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::NotFound(msg) if msg == "Author not found"));

        let books: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(books.0, 0);
    }

    #[tokio::test]
    async fn delete_cascades_to_books() {
        let (pool, _dir) = testing::pool().await;
        let repo = AuthorRepo::new(&pool);

        let (author_id, _) = repo
            .create_with_books(author_draft("Le Guin"), vec![book_draft("Dispossessed")])
            .await
            .unwrap();

        repo.delete(author_id).await.unwrap();

        assert!(repo.get_with_books(author_id).await.is_err());
        let books: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM books")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(books.0, 0);
    }

    #[tokio::test]
    async fn scoped_delete_requires_matching_author() {
        let (pool, _dir) = testing::pool().await;
        let repo = AuthorRepo::new(&pool);

        let (owner_id, book_ids) = repo
            .create_with_books(author_draft("Owner"), vec![book_draft("Kept")])
            .await
            .unwrap();
        let other = repo.create(author_draft("Other")).await.unwrap();

        let err = repo.delete_book(other.id, book_ids[0]).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound(msg) if msg == "Book not found"));

        let nested = repo.get_with_books(owner_id).await.unwrap();
        assert_eq!(nested.books.len(), 1);

        repo.delete_book(owner_id, book_ids[0]).await.unwrap();
        let nested = repo.get_with_books(owner_id).await.unwrap();
        assert!(nested.books.is_empty());
    }

    #[tokio::test]
    async fn update_book_keeps_absent_fields() {
        let (pool, _dir) = testing::pool().await;
        let repo = AuthorRepo::new(&pool);

        let (author_id, book_ids) = repo
            .create_with_books(author_draft("Le Guin"), vec![book_draft("Draft title")])
            .await
            .unwrap();

        let patch = BookPatch {
            content: Some("revised content".into()),
            ..Default::default()
        };
        let book = repo.update_book(book_ids[0], patch).await.unwrap();

        assert_eq!(book.book_name, "Draft title");
        assert_eq!(book.content, "revised content");
        assert_eq!(book.author_id, author_id);
    }

    #[tokio::test]
    async fn update_book_rejects_missing_target_author() {
        let (pool, _dir) = testing::pool().await;
        let repo = AuthorRepo::new(&pool);

        let (_, book_ids) = repo
            .create_with_books(author_draft("Le Guin"), vec![book_draft("Dispossessed")])
            .await
            .unwrap();

        let patch = BookPatch {
            author_id: Some(99),
            ..Default::default()
        };
        let err = repo.update_book(book_ids[0], patch).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound(msg) if msg == "Author not found"));
    }
}
