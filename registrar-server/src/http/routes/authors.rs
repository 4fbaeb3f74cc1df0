//! Author and book endpoints
//!
//! Three creation surfaces: author together with books, author alone,
//! and a batch of books under an existing author (the batch body is a
//! bare JSON array). Deleting an author cascades to its books; deleting
//! a book is scoped by the owning author.

use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::db::repos::{Author, AuthorRepo, AuthorWithBooks, Book, BookWithAuthor};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, RecordId, RecordIdPair};
use crate::http::server::AppState;
use crate::models::{AuthorDraft, BookDraft, BookPatch, ValidationError};

/// One book entry in a creation request
#[derive(Deserialize)]
pub struct BookEntry {
    pub book_name: Option<String>,
    pub content: Option<String>,
}

/// Create author request (author alone)
#[derive(Deserialize)]
pub struct CreateAuthorRequest {
    pub author_name: Option<String>,
    pub author_bio: Option<String>,
}

/// Create author request with an inline list of books
#[derive(Deserialize)]
pub struct CreateAuthorWithBooksRequest {
    pub author_name: Option<String>,
    pub author_bio: Option<String>,
    #[serde(default)]
    pub books: Vec<BookEntry>,
}

/// Author fields in creation responses
#[derive(Serialize)]
pub struct AuthorBody {
    pub id: i64,
    pub name: String,
    pub bio: Option<String>,
}

impl From<Author> for AuthorBody {
    fn from(a: Author) -> Self {
        Self {
            id: a.id,
            name: a.name,
            bio: a.bio,
        }
    }
}

/// Book joined with its author's name, for create and update responses
#[derive(Serialize)]
pub struct BookBody {
    pub id: i64,
    pub author_id: i64,
    pub author_name: String,
    pub book_name: String,
    pub content: String,
}

impl From<BookWithAuthor> for BookBody {
    fn from(b: BookWithAuthor) -> Self {
        Self {
            id: b.id,
            author_id: b.author_id,
            author_name: b.author_name,
            book_name: b.book_name,
            content: b.content,
        }
    }
}

/// Book fields nested under an author response
#[derive(Serialize)]
pub struct NestedBookBody {
    pub id: i64,
    pub book_name: String,
    pub content: String,
    pub created_at: String,
}

impl From<Book> for NestedBookBody {
    fn from(b: Book) -> Self {
        Self {
            id: b.id,
            book_name: b.book_name,
            content: b.content,
            created_at: b.created_at.to_rfc3339(),
        }
    }
}

/// Author nested with its books
#[derive(Serialize)]
pub struct AuthorWithBooksResponse {
    pub id: i64,
    pub author_name: String,
    pub bio: Option<String>,
    pub books: Vec<NestedBookBody>,
}

impl From<AuthorWithBooks> for AuthorWithBooksResponse {
    fn from(a: AuthorWithBooks) -> Self {
        Self {
            id: a.author.id,
            author_name: a.author.name,
            bio: a.author.bio,
            books: a.books.into_iter().map(NestedBookBody::from).collect(),
        }
    }
}

#[derive(Serialize)]
pub struct AuthorWithBooksCreatedResponse {
    pub message: &'static str,
    pub author_id: i64,
    pub book_ids: Vec<i64>,
}

#[derive(Serialize)]
pub struct AuthorCreatedResponse {
    pub message: &'static str,
    pub author: AuthorBody,
}

#[derive(Serialize)]
pub struct BooksCreatedResponse {
    pub message: &'static str,
    pub books: Vec<BookBody>,
}

#[derive(Serialize)]
pub struct BookUpdatedResponse {
    pub message: &'static str,
    pub book: BookBody,
}

/// Validate every entry before anything is written.
fn validate_books(entries: Vec<BookEntry>) -> Result<Vec<BookDraft>, ApiError> {
    entries
        .into_iter()
        .map(|entry| {
            BookDraft::new(
                entry.book_name.as_deref().unwrap_or_default(),
                entry.content.as_deref().unwrap_or_default(),
            )
            .map_err(ApiError::from)
        })
        .collect()
}

/// POST /authors-with-books - create an author and its books atomically
async fn create_author_with_books(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateAuthorWithBooksRequest>,
) -> Result<(StatusCode, Json<AuthorWithBooksCreatedResponse>), ApiError> {
    let author = AuthorDraft::new(req.author_name.as_deref().unwrap_or_default(), req.author_bio)?;
    if req.books.is_empty() {
        return Err(ApiError::Validation(ValidationError::Empty {
            field: "books",
        }));
    }
    let books = validate_books(req.books)?;

    let (author_id, book_ids) = AuthorRepo::new(&state.pool)
        .create_with_books(author, books)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthorWithBooksCreatedResponse {
            message: "Author and books created successfully",
            author_id,
            book_ids,
        }),
    ))
}

/// POST /authors - create an author without books
async fn create_author(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateAuthorRequest>,
) -> Result<(StatusCode, Json<AuthorCreatedResponse>), ApiError> {
    let draft = AuthorDraft::new(req.author_name.as_deref().unwrap_or_default(), req.author_bio)?;
    let author = AuthorRepo::new(&state.pool).create(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(AuthorCreatedResponse {
            message: "Author created successfully",
            author: AuthorBody::from(author),
        }),
    ))
}

/// POST /authors/{id}/books - batch-create books under an author
async fn create_books(
    State(state): State<Arc<AppState>>,
    RecordId(author_id): RecordId,
    ApiJson(entries): ApiJson<Vec<BookEntry>>,
) -> Result<(StatusCode, Json<BooksCreatedResponse>), ApiError> {
    let books = validate_books(entries)?;
    let created = AuthorRepo::new(&state.pool)
        .create_books(author_id, books)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BooksCreatedResponse {
            message: "Books created successfully",
            books: created.into_iter().map(BookBody::from).collect(),
        }),
    ))
}

/// GET /authors - list authors nested with their books
async fn list_authors(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<AuthorWithBooksResponse>>, ApiError> {
    let authors = AuthorRepo::new(&state.pool).list_with_books().await?;
    Ok(Json(
        authors
            .into_iter()
            .map(AuthorWithBooksResponse::from)
            .collect(),
    ))
}

/// GET /authors/{id} - one author nested with its books
async fn get_author(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<AuthorWithBooksResponse>, ApiError> {
    let author = AuthorRepo::new(&state.pool).get_with_books(id).await?;
    Ok(Json(AuthorWithBooksResponse::from(author)))
}

/// PUT /books/{id} - patch a book, optionally re-parenting it
async fn update_book(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    ApiJson(patch): ApiJson<BookPatch>,
) -> Result<Json<BookUpdatedResponse>, ApiError> {
    let book = AuthorRepo::new(&state.pool).update_book(id, patch).await?;

    Ok(Json(BookUpdatedResponse {
        message: "Book updated successfully",
        book: BookBody::from(book),
    }))
}

/// DELETE /authors/{id} - delete an author and all its books
async fn delete_author(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<MessageResponse>, ApiError> {
    AuthorRepo::new(&state.pool).delete(id).await?;

    Ok(Json(MessageResponse {
        message: "Author deleted successfully",
    }))
}

/// DELETE /authors/{id}/books/{book_id} - delete one book scoped by owner
async fn delete_book(
    State(state): State<Arc<AppState>>,
    RecordIdPair(author_id, book_id): RecordIdPair,
) -> Result<Json<MessageResponse>, ApiError> {
    AuthorRepo::new(&state.pool)
        .delete_book(author_id, book_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Book deleted successfully",
    }))
}

/// Author and book routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/authors-with-books", post(create_author_with_books))
        .route("/authors", get(list_authors).post(create_author))
        .route("/authors/{id}", get(get_author).delete(delete_author))
        .route("/authors/{id}/books", post(create_books))
        .route("/authors/{id}/books/{book_id}", delete(delete_book))
        .route("/books/{id}", put(update_book))
}
