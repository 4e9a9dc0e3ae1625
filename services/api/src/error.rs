//! Error taxonomy for the calendar API
//!
//! Authentication and validation failures never propagate as panics; every
//! variant converts into a structured HTTP response with a human-readable
//! `error` string. Store failures surface as generic 500s with the detail
//! logged, not echoed to the client.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

/// Custom error type for the calendar API
#[derive(Error, Debug)]
pub enum ApiError {
    /// A required input was not supplied
    #[error("{0}")]
    MissingInput(String),

    /// An input was present but did not have the expected shape
    #[error("{0}")]
    MalformedInput(String),

    /// A signed input failed verification or fell outside its freshness window
    #[error("{0}")]
    InvalidOrExpiredInput(String),

    /// An input failed a semantic validation rule
    #[error("{0}")]
    Unprocessable(String),

    /// No credential, or an invalid/expired one
    #[error("Unauthorized")]
    Unauthorized,

    /// Valid credential, insufficient privilege
    #[error("Forbidden: Admin access required")]
    Forbidden,

    /// Referenced entity does not exist
    #[error("{0}")]
    NotFound(String),

    /// Required server-side configuration is missing
    #[error("Server configuration error")]
    ServerConfig,

    /// Membership lookup could not be completed
    #[error("Failed to check admin status")]
    Upstream,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl ApiError {
    pub(crate) fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingInput(_) | ApiError::MalformedInput(_) => StatusCode::BAD_REQUEST,
            ApiError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::InvalidOrExpiredInput(_) | ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::ServerConfig | ApiError::Upstream | ApiError::Database(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let message = match &self {
            ApiError::Database(e) => {
                tracing::error!("Database error: {}", e);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(json!({
            "error": message,
        }));

        (self.status(), body).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
