//!
//! # Custom Error Handling
//!
//! This module defines `AppError`, the error type every HTTP handler returns.
//! Each variant maps to exactly one status code and is rendered as a
//! `{"error": "<message>"}` JSON body, so failures never escape a handler
//! without a response.
//!
//! `From` conversions for store, token, blocking and validation errors let
//! handlers use the `?` operator throughout.

use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::token::TokenError;
use crate::store::StoreError;

/// Represents all possible errors that can occur while serving a request.
#[derive(Debug)]
pub enum AppError {
    /// Missing, invalid or expired bearer token (HTTP 401).
    Unauthorized(String),
    /// Malformed request that could not be decoded (HTTP 400).
    BadRequest(String),
    /// A required field is missing or empty (HTTP 400).
    ValidationError(String),
    /// The email/password pair does not match a stored user (HTTP 400).
    InvalidCredentials(String),
    /// No record matches the requested key (HTTP 404).
    NotFound(String),
    /// A record with the same unique field already exists (HTTP 409).
    Conflict(String),
    /// Unexpected server-side failure (HTTP 500).
    InternalServerError(String),
    /// Failure reported by the credential store (HTTP 500).
    DatabaseError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {}", msg),
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::InvalidCredentials(msg) => write!(f, "Invalid Credentials: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
            AppError::DatabaseError(msg) => write!(f, "Database Error: {}", msg),
        }
    }
}

impl AppError {
    /// The client-facing message carried by the variant.
    pub fn message(&self) -> &str {
        match self {
            AppError::Unauthorized(msg)
            | AppError::BadRequest(msg)
            | AppError::ValidationError(msg)
            | AppError::InvalidCredentials(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg)
            | AppError::InternalServerError(msg)
            | AppError::DatabaseError(msg) => msg,
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::BadRequest(_)
            | AppError::ValidationError(_)
            | AppError::InvalidCredentials(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::InternalServerError(_) | AppError::DatabaseError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            log::error!("{}", self);
        }
        // Store details stay in the log; the client gets a generic message.
        let message = match self {
            AppError::DatabaseError(_) => "Internal server error",
            other => other.message(),
        };
        HttpResponse::build(status).json(json!({ "error": message }))
    }
}

impl From<ValidationErrors> for AppError {
    fn from(error: ValidationErrors) -> AppError {
        AppError::ValidationError(error.to_string())
    }
}

impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<StoreError> for AppError {
    fn from(error: StoreError) -> AppError {
        match error {
            StoreError::Conflict(msg) => AppError::Conflict(msg),
            StoreError::Backend(msg) => AppError::DatabaseError(msg),
        }
    }
}

/// Expired tokens get their own message so clients know to log in again.
impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        match error {
            TokenError::Expired => {
                AppError::Unauthorized("Token expired. Please log in again.".into())
            }
            TokenError::Invalid(_) => AppError::Unauthorized("Invalid token.".into()),
            TokenError::Signing(msg) => {
                AppError::InternalServerError(format!("Failed to generate token: {}", msg))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::body::to_bytes;

    #[test]
    fn test_error_statuses() {
        let cases = [
            (AppError::Unauthorized("x".into()), 401),
            (AppError::BadRequest("x".into()), 400),
            (AppError::ValidationError("x".into()), 400),
            (AppError::InvalidCredentials("x".into()), 400),
            (AppError::NotFound("x".into()), 404),
            (AppError::Conflict("x".into()), 409),
            (AppError::InternalServerError("x".into()), 500),
            (AppError::DatabaseError("x".into()), 500),
        ];
        for (error, status) in cases {
            assert_eq!(error.error_response().status(), status, "{}", error);
        }
    }

    #[actix_rt::test]
    async fn test_error_body_is_json() {
        let response = AppError::Conflict("User already exists".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "User already exists");
    }

    #[actix_rt::test]
    async fn test_database_error_details_are_hidden() {
        let response = AppError::DatabaseError("connection refused".into()).error_response();
        let body = to_bytes(response.into_body()).await.unwrap();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["error"], "Internal server error");
    }

    #[test]
    fn test_token_errors_map_to_unauthorized() {
        let expired: AppError = TokenError::Expired.into();
        assert_eq!(expired.message(), "Token expired. Please log in again.");
        assert_eq!(expired.status_code(), StatusCode::UNAUTHORIZED);

        let invalid: AppError = TokenError::Invalid("InvalidSignature".into()).into();
        assert_eq!(invalid.message(), "Invalid token.");
        assert_eq!(invalid.status_code(), StatusCode::UNAUTHORIZED);
    }

    #[test]
    fn test_store_conflict_maps_to_409() {
        let error: AppError = StoreError::Conflict("User already exists".into()).into();
        assert_eq!(error.status_code(), StatusCode::CONFLICT);
    }
}
