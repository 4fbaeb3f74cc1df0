//! Custom Axum extractors

use axum::extract::{FromRequest, FromRequestParts, Path, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;

use super::error::ApiError;
use crate::models::ValidationError;

/// JSON body extractor whose rejection carries the standard error shape
/// instead of axum's plain-text body.
pub struct ApiJson<T>(pub T);

impl<S, T> FromRequest<S> for ApiJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|_| ApiError::BadRequest {
                message: "Invalid JSON",
            })?;
        Ok(Self(value))
    }
}

/// Extract and parse a numeric record id from the path
pub struct RecordId(pub i64);

impl<S> FromRequestParts<S> for RecordId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw): Path<String> = Path::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let id = raw.parse().map_err(|_| {
            ApiError::Validation(ValidationError::InvalidFormat {
                field: "id",
                reason: "must be a numeric id",
            })
        })?;

        Ok(Self(id))
    }
}

/// Extract a pair of numeric ids from a two-parameter path
pub struct RecordIdPair(pub i64, pub i64);

impl<S> FromRequestParts<S> for RecordIdPair
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path((first, second)): Path<(String, String)> =
            Path::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::Validation(ValidationError::Empty { field: "id" }))?;

        let parse = |raw: &str| {
            raw.parse().map_err(|_| {
                ApiError::Validation(ValidationError::InvalidFormat {
                    field: "id",
                    reason: "must be a numeric id",
                })
            })
        };

        Ok(Self(parse(&first)?, parse(&second)?))
    }
}
