//! User and profile endpoints
//!
//! A user is always created together with its profile, but rows inserted
//! outside this API may lack one; reads surface those as null profile
//! fields rather than an error.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use super::MessageResponse;
use crate::db::repos::{UserRepo, UserWithProfile};
use crate::http::error::ApiError;
use crate::http::extractors::{ApiJson, RecordId};
use crate::http::server::AppState;
use crate::models::{UserDraft, UserPatch};

/// Create user request
#[derive(Deserialize)]
pub struct CreateUserRequest {
    pub username: Option<String>,
    pub email: Option<String>,
    pub bio: Option<String>,
    pub website: Option<String>,
}

/// Profile fields nested in user responses
#[derive(Serialize)]
pub struct ProfileBody {
    pub bio: Option<String>,
    pub website: Option<String>,
}

/// User response with nested profile
#[derive(Serialize)]
pub struct UserResponse {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub profile: ProfileBody,
}

impl From<UserWithProfile> for UserResponse {
    fn from(u: UserWithProfile) -> Self {
        Self {
            id: u.id,
            username: u.username,
            email: u.email,
            profile: ProfileBody {
                bio: u.bio,
                website: u.website,
            },
        }
    }
}

#[derive(Serialize)]
pub struct UserCreatedResponse {
    pub message: &'static str,
    pub user_id: i64,
    pub profile_id: i64,
}

/// POST /users - create a user together with its profile
async fn create_user(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<UserCreatedResponse>), ApiError> {
    let draft = UserDraft::new(
        req.username.as_deref().unwrap_or_default(),
        req.email.as_deref().unwrap_or_default(),
        req.bio.as_deref().unwrap_or_default(),
        req.website,
    )?;
    let (user_id, profile_id) = UserRepo::new(&state.pool).create_with_profile(draft).await?;

    Ok((
        StatusCode::CREATED,
        Json(UserCreatedResponse {
            message: "User and Profile created successfully",
            user_id,
            profile_id,
        }),
    ))
}

/// GET /users - list all users with their profiles
async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let users = UserRepo::new(&state.pool).list().await?;
    Ok(Json(users.into_iter().map(UserResponse::from).collect()))
}

/// GET /users/{id} - get a user; profile fields are null when the
/// profile row is missing
async fn get_user(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<UserResponse>, ApiError> {
    let user = UserRepo::new(&state.pool).get(id).await?;
    Ok(Json(UserResponse::from(user)))
}

/// PUT /users/{id} - patch the user and its profile
async fn update_user(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
    ApiJson(patch): ApiJson<UserPatch>,
) -> Result<Json<MessageResponse>, ApiError> {
    UserRepo::new(&state.pool).update(id, patch).await?;

    Ok(Json(MessageResponse {
        message: "User profile updated successfully",
    }))
}

/// DELETE /users/{id} - delete the user and its profile
async fn delete_user(
    State(state): State<Arc<AppState>>,
    RecordId(id): RecordId,
) -> Result<Json<MessageResponse>, ApiError> {
    UserRepo::new(&state.pool).delete(id).await?;

    Ok(Json(MessageResponse {
        message: "User deleted successfully",
    }))
}

/// User routes
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}
