//! HTTP error mapping.

use axum::extract::rejection::{JsonRejection, PathRejection};
use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::memorization::MemorizationError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Memorization(#[from] MemorizationError),

    /// Due-list failures get a fixed message the client shows as-is.
    #[error("unable to load review queue")]
    ReviewQueue(#[source] MemorizationError),

    #[error("missing or invalid x-user-id header")]
    MissingIdentity,

    /// A body or path that could not be decoded into the expected shape.
    #[error("invalid input: {0}")]
    MalformedRequest(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl ApiError {
    pub fn review_queue(err: ApiError) -> ApiError {
        match err {
            ApiError::Memorization(inner) => ApiError::ReviewQueue(inner),
            other => other,
        }
    }

    /// Storage hiccups (e.g. a locked database) are worth retrying.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Memorization(err) | Self::ReviewQueue(err) => err.is_transient(),
            _ => false,
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Memorization(err) | Self::ReviewQueue(err) => match err {
                MemorizationError::Validation(_) => StatusCode::BAD_REQUEST,
                MemorizationError::ItemNotFound { .. } => StatusCode::NOT_FOUND,
                MemorizationError::StorageUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            },
            Self::MissingIdentity => StatusCode::UNAUTHORIZED,
            Self::MalformedRequest(_) => StatusCode::BAD_REQUEST,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        Self::MalformedRequest(rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            match &self {
                Self::ReviewQueue(inner) => tracing::error!(error = %inner, "review queue failed"),
                other => tracing::error!(error = %other, "request failed"),
            }
        }
        let body = serde_json::json!({ "message": self.to_string() });
        let mut response = (status, Json(body)).into_response();
        if self.is_transient() {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, HeaderValue::from_static("1"));
        }
        response
    }
}
