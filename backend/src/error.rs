//! HTTP-facing error taxonomy.
//!
//! Handlers map domain outcomes to [`ApiError`]; its `ResponseError` impl is the one
//! place where variants turn into status codes and `{success:false, error}` bodies.
//! Details of `Internal` errors are hidden from clients in production by the
//! top-level handler in [`crate::middleware::errors`].

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::response::ErrorBody;
use crate::search::MissingSource;
use crate::store::StoreError;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error("{0}")]
    RateLimited(String),

    #[error("{0}")]
    Internal(String),
}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(ErrorBody::new(self.to_string()))
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::InvalidIdentifier(_) => {
                ApiError::Validation("Invalid quote ID format".to_string())
            }
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl From<MissingSource> for ApiError {
    fn from(_: MissingSource) -> Self {
        ApiError::Validation("Source parameter is required".to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_mapping() {
        assert_eq!(ApiError::Validation("x".into()).status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::NotFound("x".into()).status_code(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::RateLimited("x".into()).status_code(),
            StatusCode::TOO_MANY_REQUESTS
        );
        assert_eq!(
            ApiError::Internal("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn invalid_identifier_is_a_validation_error() {
        let err = ApiError::from(StoreError::InvalidIdentifier("123".into()));
        assert!(matches!(err, ApiError::Validation(ref m) if m == "Invalid quote ID format"));
    }

    #[test]
    fn unavailable_store_is_internal() {
        let err = ApiError::from(StoreError::Unavailable("down".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
