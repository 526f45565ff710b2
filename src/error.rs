use axum::{http::StatusCode, response::IntoResponse, Json};
use serde_json::json;
use thiserror::Error;

pub type AppResult<T> = Result<T, AppError>;

/// Application error type for the request gateway.
///
/// Every outcome the gateway can produce for a request maps onto one of
/// these variants, so route handlers and middleware never panic or leak a
/// non-JSON error body.
#[derive(Error, Debug)]
pub enum AppError {
    // ===== Request Validation =====
    #[error("validation error: {0}")]
    Validation(String),

    // ===== Authentication & Authorization =====
    /// Deliberately identical for "unknown user" and "wrong password"
    /// to avoid user enumeration.
    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("authentication required")]
    Unauthorized,

    #[error("insufficient permissions: requires role {0}")]
    Forbidden(String),

    // ===== Rate Limiting =====
    #[error("rate limit exceeded: {0}")]
    RateLimitExceeded(String),

    // ===== Configuration Errors =====
    #[error("configuration error: {0}")]
    Config(String),

    // ===== Internal Server Errors =====
    #[error("internal server error: {0}")]
    Internal(String),

    #[error("unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}

impl AppError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::InvalidCredentials | AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::RateLimitExceeded(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Config(_) | AppError::Internal(_) | AppError::Unknown(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    /// Get error code for programmatic error handling
    pub fn error_code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::Unauthorized => "UNAUTHORIZED",
            AppError::Forbidden(_) => "FORBIDDEN",
            AppError::RateLimitExceeded(_) => "RATE_LIMIT_EXCEEDED",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Internal(_) | AppError::Unknown(_) => "INTERNAL_ERROR",
        }
    }

    /// Get a user-friendly error message (without sensitive details)
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => format!("Validation error: {}", msg),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::Unauthorized => "Authentication required".to_string(),
            AppError::Forbidden(role) => {
                format!("Access denied: requires role {}", role)
            }
            AppError::RateLimitExceeded(msg) => msg.clone(),
            _ => "Internal server error".to_string(),
        }
    }

    /// Log this error with a severity matched to its class
    pub fn log(&self) {
        let status = self.status_code();
        let code = self.error_code();

        if status.is_server_error() {
            tracing::error!(
                error = %self,
                error_code = %code,
                status = %status.as_u16(),
                "Server error occurred"
            );
        } else if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::warn!(
                error = %self,
                error_code = %code,
                "Request denied"
            );
        } else {
            tracing::debug!(
                error = %self,
                error_code = %code,
                "Client error occurred"
            );
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        self.log();

        let status = self.status_code();
        let body = json!({
            "error": self.user_message(),
            "code": self.error_code(),
            "status": status.as_u16(),
        });

        (status, Json(body)).into_response()
    }
}

impl AppError {
    /// Create a validation error
    pub fn validation(msg: impl Into<String>) -> Self {
        AppError::Validation(msg.into())
    }

    /// Create an internal server error
    pub fn internal(msg: impl Into<String>) -> Self {
        AppError::Internal(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        AppError::Config(msg.into())
    }
}
