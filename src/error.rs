// HTTP API Error Types
use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::{json, Value};

/// HTTP API error with appropriate status codes and client-friendly messages
#[derive(Debug)]
pub enum ApiError {
    // 400 Bad Request
    BadRequest(String),

    // 400 Bad Request - scoped lookup attempted without a series/book hint
    ScopeMissing(String),

    // 401 Unauthorized
    Unauthorized(String),

    // 403 Forbidden
    Forbidden(String),

    // 404 Not Found
    NotFound(String),

    // 409 Conflict
    Conflict(String),

    // 500 Internal Server Error
    InternalServerError(String),

    // 503 Service Unavailable
    ServiceUnavailable(String),
}

impl ApiError {
    /// Get HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::BadRequest(_) => 400,
            ApiError::ScopeMissing(_) => 400,
            ApiError::Unauthorized(_) => 401,
            ApiError::Forbidden(_) => 403,
            ApiError::NotFound(_) => 404,
            ApiError::Conflict(_) => 409,
            ApiError::InternalServerError(_) => 500,
            ApiError::ServiceUnavailable(_) => 503,
        }
    }

    /// Get client-safe error message
    pub fn message(&self) -> &str {
        match self {
            ApiError::BadRequest(msg) => msg,
            ApiError::ScopeMissing(msg) => msg,
            ApiError::Unauthorized(msg) => msg,
            ApiError::Forbidden(msg) => msg,
            ApiError::NotFound(msg) => msg,
            ApiError::Conflict(msg) => msg,
            ApiError::InternalServerError(msg) => msg,
            ApiError::ServiceUnavailable(msg) => msg,
        }
    }

    /// Convert to JSON response body
    pub fn to_json(&self) -> Value {
        json!({
            "error": true,
            "message": self.message(),
            "code": self.error_code()
        })
    }

    /// Get error code for client handling
    pub fn error_code(&self) -> &'static str {
        match self {
            ApiError::BadRequest(_) => "BAD_REQUEST",
            ApiError::ScopeMissing(_) => "SCOPE_MISSING",
            ApiError::Unauthorized(_) => "UNAUTHORIZED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::NotFound(_) => "NOT_FOUND",
            ApiError::Conflict(_) => "CONFLICT",
            ApiError::InternalServerError(_) => "INTERNAL_SERVER_ERROR",
            ApiError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
        }
    }
}

// Static constructor methods
impl ApiError {
    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn scope_missing() -> Self {
        ApiError::ScopeMissing(
            "a seriesId or bookId query parameter is required for this record type".to_string(),
        )
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        ApiError::Unauthorized(message.into())
    }

    pub fn forbidden(message: impl Into<String>) -> Self {
        ApiError::Forbidden(message.into())
    }

    /// The single denial used when a record is not reachable through the
    /// caller's ownership graph. Covers both "not yours" and "does not
    /// exist" with one message, so responses never reveal whether a given
    /// id is real.
    pub fn ownership_denied() -> Self {
        ApiError::Forbidden("you do not have access to this record".to_string())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        ApiError::Conflict(message.into())
    }

    pub fn internal_server_error(message: impl Into<String>) -> Self {
        ApiError::InternalServerError(message.into())
    }

    pub fn service_unavailable(message: impl Into<String>) -> Self {
        ApiError::ServiceUnavailable(message.into())
    }
}

// Convert other error types to ApiError
impl From<crate::database::manager::StoreError> for ApiError {
    fn from(err: crate::database::manager::StoreError) -> Self {
        match err {
            crate::database::manager::StoreError::ConfigMissing => {
                tracing::error!("DATABASE_URL is not configured");
                ApiError::service_unavailable("Storage is not configured")
            }
            crate::database::manager::StoreError::Sqlx(sqlx::Error::PoolTimedOut) => {
                ApiError::service_unavailable("Database temporarily unavailable")
            }
            crate::database::manager::StoreError::Sqlx(sqlx_err) => {
                // Log the real error but return generic message
                tracing::error!("SQLx error: {}", sqlx_err);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            crate::database::manager::StoreError::Migration(e) => {
                tracing::error!("Migration error: {}", e);
                ApiError::service_unavailable("Service is being updated, please try again later")
            }
        }
    }
}

impl From<crate::auth::token::TokenError> for ApiError {
    fn from(err: crate::auth::token::TokenError) -> Self {
        match err {
            crate::auth::token::TokenError::Invalid => {
                ApiError::unauthorized("Session token is invalid or expired")
            }
            crate::auth::token::TokenError::Signing(msg) => {
                tracing::error!("Token signing failed: {}", msg);
                ApiError::internal_server_error("Could not establish a session")
            }
        }
    }
}

impl From<crate::services::account::AccountError> for ApiError {
    fn from(err: crate::services::account::AccountError) -> Self {
        match err {
            crate::services::account::AccountError::EmailTaken => {
                ApiError::conflict("An account with this email already exists")
            }
            crate::services::account::AccountError::InvalidCredentials => {
                ApiError::unauthorized("Invalid email or password")
            }
            crate::services::account::AccountError::Hash(msg) => {
                tracing::error!("Password hashing failed: {}", msg);
                ApiError::internal_server_error("An error occurred while processing your request")
            }
            crate::services::account::AccountError::Store(e) => e.into(),
        }
    }
}

// Standard error trait implementations
impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl std::error::Error for ApiError {}

// Automatic HTTP response conversion for Axum
impl IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        let status = StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_json())).into_response()
    }
}
