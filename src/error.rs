//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every handler returns `Result<_, AppError>`, and `AppError` implements
//! `actix_web::error::ResponseError` so failures leave the server as a JSON body of the
//! shape `{ "error": "..." }` with a matching status code.
//!
//! Server-side failures carry two strings: the message the client sees and the detail
//! that only reaches the log. Handlers replace the client message with a route-specific
//! one through [`AppError::context`].

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

/// Client-facing message used for server failures that no handler has given context to.
pub const GENERIC_FAILURE: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Authentication failed, or the bearer token is missing or invalid (HTTP 401).
    Unauthorized(String),
    /// The request body could not be parsed (HTTP 400).
    BadRequest(String),
    /// The requested record does not exist, or is not visible to the caller (HTTP 404).
    NotFound(String),
    /// The request body parsed but failed validation (HTTP 422).
    ValidationError(String),
    /// An unexpected failure in the store, hashing or token signing (HTTP 500).
    ///
    /// `message` is returned to the client, `detail` is only logged.
    Internal { message: String, detail: String },
}

impl AppError {
    /// Builds a server failure with the generic client message.
    pub fn internal(detail: impl Into<String>) -> Self {
        AppError::Internal {
            message: GENERIC_FAILURE.to_string(),
            detail: detail.into(),
        }
    }

    /// Replaces the client-facing message of a server failure.
    ///
    /// Client errors (401, 400, 404, 422) pass through untouched, so a handler can wrap
    /// its whole body without hiding a deliberate "not found".
    pub fn context(self, message: &str) -> Self {
        match self {
            AppError::Internal { detail, .. } => AppError::Internal {
                message: message.to_string(),
                detail,
            },
            other => other,
        }
    }

    fn client_message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::NotFound(msg)
            | AppError::ValidationError(msg) => msg,
            AppError::Internal { message, .. } => message,
        }
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Internal { message, detail } => write!(f, "{}: {}", message, detail),
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::ValidationError(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        if let AppError::Internal { message, detail } = self {
            log::error!("{}: {}", message, detail);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.client_message()
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` is mapped to `NotFound`; everything else is a server failure whose
/// detail stays in the log.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::internal(format!("database error: {}", error)),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

/// Token decoding failures are authorization failures.
impl From<jsonwebtoken::errors::Error> for AppError {
    fn from(error: jsonwebtoken::errors::Error) -> AppError {
        AppError::Unauthorized(format!("Invalid token: {}", error))
    }
}

impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::internal(format!("bcrypt error: {}", error))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_statuses() {
        let error = AppError::Unauthorized("Invalid token".into());
        assert_eq!(error.error_response().status(), 401);

        let error = AppError::BadRequest("Invalid input".into());
        assert_eq!(error.error_response().status(), 400);

        let error = AppError::NotFound("Resource not found".into());
        assert_eq!(error.error_response().status(), 404);

        let error = AppError::ValidationError("title: length".into());
        assert_eq!(error.error_response().status(), 422);

        let error = AppError::internal("boom");
        assert_eq!(error.error_response().status(), 500);
    }

    #[actix_web::test]
    async fn test_internal_detail_is_not_returned() {
        let error = AppError::internal("connection refused on 10.0.0.3").context("Failed to create task");
        let body = to_bytes(error.error_response().into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();

        assert_eq!(json, json!({ "error": "Failed to create task" }));
    }

    #[test]
    fn test_context_keeps_client_errors() {
        let error = AppError::NotFound("Task not found".into()).context("Failed to update task");
        match error {
            AppError::NotFound(msg) => assert_eq!(msg, "Task not found"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_row_not_found_maps_to_not_found() {
        assert!(matches!(
            AppError::from(sqlx::Error::RowNotFound),
            AppError::NotFound(_)
        ));
    }
}
