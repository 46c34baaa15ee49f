use axum::extract::{FromRequest, FromRequestParts, Query, Request};
use axum::http::request::Parts;
use axum::Json;
use serde::de::DeserializeOwned;
use tracing::warn;

use crate::error::AppError;

/// Boundary checks run on request input before it reaches the service.
pub trait Validate {
    fn validate(&self) -> Result<(), AppError>;
}

/// JSON body that deserialized and passed validation. Any failure is a 400.
pub struct ValidJson<T>(pub T);

/// Query string that deserialized. A failed parse is a 400.
pub struct ValidQuery<T>(pub T);

impl<S, T> FromRequest<S> for ValidJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate + Send,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|rejection| {
                warn!(reason = %rejection.body_text(), "Rejected request body");
                AppError::BadRequest(rejection.body_text())
            })?;
        value.validate()?;
        Ok(ValidJson(value))
    }
}

impl<S, T> FromRequestParts<S> for ValidQuery<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Send,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                warn!(reason = %rejection.body_text(), "Rejected query string");
                AppError::BadRequest(rejection.body_text())
            })?;
        Ok(ValidQuery(value))
    }
}
