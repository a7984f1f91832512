//! Shared API types
//!
//! Error responses use one envelope for every endpoint:
//! `{"error": <kind>, "code": <CODE>, "message": <text>}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use validator::ValidationError;

use crate::core::constants::MAX_RESTAURANT_LIMIT;
use crate::data::DataError;
use crate::domain::{FilterError, SearchError};

/// `status` value of every successful listing response
pub const STATUS_SUCCESS: &str = "success";

/// Maximum length of the free-text search query
pub const MAX_SEARCH_QUERY_LENGTH: u64 = 256;

/// Validator function for the optional `limit` parameter
pub fn validate_limit(limit: i64) -> Result<(), ValidationError> {
    if !(1..=i64::from(MAX_RESTAURANT_LIMIT)).contains(&limit) {
        return Err(ValidationError::new("limit_range").with_message(
            format!("Limit must be between 1 and {}", MAX_RESTAURANT_LIMIT).into(),
        ));
    }
    Ok(())
}

/// Standard API error response
#[derive(Debug)]
pub enum ApiError {
    Unprocessable { code: String, message: String },
    NotFound { code: String, message: String },
    ServiceUnavailable { message: String },
    Internal { message: String },
}

impl ApiError {
    pub fn unprocessable(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unprocessable {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn not_found(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::NotFound {
            code: code.into(),
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        Self::ServiceUnavailable {
            message: message.into(),
        }
    }

    pub fn from_data(e: DataError) -> Self {
        if e.is_transient() {
            tracing::warn!(error = %e, backend = e.backend(), "Transient data error");
            return Self::service_unavailable("Database temporarily unavailable");
        }
        tracing::error!(error = %e, "Data error");
        Self::internal("Database operation failed")
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Unprocessable { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::ServiceUnavailable { .. } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<FilterError> for ApiError {
    fn from(e: FilterError) -> Self {
        match e {
            FilterError::InvalidFilterSet => Self::unprocessable("INVALID_FILTERS", e.to_string()),
            FilterError::InvalidParameter { .. } => {
                Self::unprocessable("INVALID_PARAMETER", e.to_string())
            }
            FilterError::MissingRequiredParameter { .. } => {
                Self::unprocessable("MISSING_REQUIRED_PARAMETER", e.to_string())
            }
            FilterError::StorageFailure(inner) => Self::from_data(inner),
        }
    }
}

impl From<SearchError> for ApiError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::EmptyQuery => Self::unprocessable("EMPTY_QUERY", e.to_string()),
            SearchError::StorageFailure(inner) => Self::from_data(inner),
        }
    }
}

impl From<serde_json::Error> for ApiError {
    fn from(e: serde_json::Error) -> Self {
        tracing::error!(error = %e, "Response serialization failed");
        Self::internal("Failed to build response")
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (error_type, code, message) = match self {
            Self::Unprocessable { code, message } => ("unprocessable_entity", code, message),
            Self::NotFound { code, message } => ("not_found", code, message),
            Self::ServiceUnavailable { message } => (
                "service_unavailable",
                "SERVICE_UNAVAILABLE".to_string(),
                message,
            ),
            Self::Internal { message } => ("internal_error", "INTERNAL".to_string(), message),
        };
        (
            status,
            Json(serde_json::json!({
                "error": error_type,
                "code": code,
                "message": message
            })),
        )
            .into_response()
    }
}
