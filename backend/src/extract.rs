//! Request extractors with consistent error bodies

use crate::error::ApiError;
use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

/// JSON body extractor whose rejections render as `{message}` with 400
pub struct AppJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for AppJson<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(req, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => Err(ApiError::BadRequest(rejection_message(&rejection))),
        }
    }
}

fn rejection_message(rejection: &JsonRejection) -> String {
    match rejection {
        JsonRejection::JsonDataError(_) | JsonRejection::JsonSyntaxError(_) => {
            "Invalid input format".to_string()
        }
        JsonRejection::MissingJsonContentType(_) => "Missing JSON content type".to_string(),
        _ => "Failed to parse JSON body".to_string(),
    }
}

/// Parse a numeric path segment, reporting `label` on failure
pub fn parse_id(raw: &str, label: &str) -> Result<i64, ApiError> {
    raw.parse::<u32>()
        .map(i64::from)
        .map_err(|_| ApiError::BadRequest(format!("Invalid {} format", label)))
}
