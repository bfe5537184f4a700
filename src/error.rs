use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Wrong email or password. Reported as an unsuccessful result, not a transport error.
    #[error("{0}")]
    InvalidCredentials(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Not found: {0}")]
    NotFound(String),

    /// Business-rule refusal: duplicate registration, unavailable slot, repeated transition.
    #[error("{0}")]
    Conflict(String),

    #[error("Payment error: {0}")]
    Payment(String),

    #[error("Email error: {0}")]
    Email(String),

    #[error("Internal server error")]
    InternalError,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Validation,
    Unauthorized,
    Forbidden,
    NotFound,
    Conflict,
    Payment,
    Email,
    Storage,
    Internal,
}

impl AppError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Database(_) => ErrorKind::Storage,
            AppError::Validation(_) => ErrorKind::Validation,
            AppError::Unauthorized(_) | AppError::InvalidCredentials(_) => ErrorKind::Unauthorized,
            AppError::Forbidden(_) => ErrorKind::Forbidden,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::Conflict(_) => ErrorKind::Conflict,
            AppError::Payment(_) => ErrorKind::Payment,
            AppError::Email(_) => ErrorKind::Email,
            AppError::InternalError => ErrorKind::Internal,
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Database(_) | AppError::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            // Business outcomes keep 200 and are told apart by `kind`.
            AppError::InvalidCredentials(_) | AppError::Conflict(_) => StatusCode::OK,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Payment(_) => StatusCode::PAYMENT_REQUIRED,
            AppError::Email(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let message = match self {
            AppError::Database(ref e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error occurred".to_string()
            }
            AppError::InternalError => "Internal server error".to_string(),
            AppError::Validation(ref msg)
            | AppError::Unauthorized(ref msg)
            | AppError::InvalidCredentials(ref msg)
            | AppError::Forbidden(ref msg)
            | AppError::NotFound(ref msg)
            | AppError::Conflict(ref msg)
            | AppError::Payment(ref msg)
            | AppError::Email(ref msg) => msg.clone(),
        };

        let body = Json(json!({
            "success": false,
            "message": message,
            "kind": self.kind(),
        }));

        (self.status_code(), body).into_response()
    }
}

pub type Result<T> = std::result::Result<T, AppError>;
