//! Error types for the HTTP API
//!
//! Every handler returns `Result<_, ApiError>`; the `IntoResponse`
//! implementation maps each variant to a status code and a structured
//! `{"error": "..."}` body. Internal errors are logged with their full
//! chain and surface as an opaque 500.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use catalog_core::domain::DomainError;

/// Error type for the Catalog API
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Malformed or semantically invalid request
    #[error("{0}")]
    BadRequest(String),

    /// Missing or invalid credentials
    #[error("{0}")]
    Unauthorized(String),

    /// Authenticated but lacking the admin role
    #[error("admin role required")]
    Forbidden,

    /// Requested entity does not exist
    #[error("{0} not found")]
    NotFound(&'static str),

    /// Request conflicts with existing state (e.g. duplicate email)
    #[error("{0}")]
    Conflict(String),

    /// Domain validation failure
    #[error("{0}")]
    Validation(#[from] DomainError),

    /// Anything unexpected from the storage or sync layers
    #[error("internal server error")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal(ref err) = self {
            tracing::error!(error = %format!("{err:#}"), "Internal error serving request");
        }

        let status = self.status();
        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::BadRequest("nope".into()).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::Unauthorized("no token".into()).status(),
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(ApiError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(ApiError::NotFound("product").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::Conflict("taken".into()).status(),
            StatusCode::CONFLICT
        );
        assert_eq!(
            ApiError::Validation(DomainError::InvalidPrice(-1.0)).status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
        assert_eq!(
            ApiError::Internal(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_internal_error_hides_details() {
        let err = ApiError::Internal(anyhow::anyhow!("connection pool exhausted"));
        assert_eq!(err.to_string(), "internal server error");
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(ApiError::NotFound("product").to_string(), "product not found");
    }
}
