use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sea_orm::error::{DbErr, SqlErr};
use serde::Serialize;
use tracing::error;

/// Uniform error body: `{"status": <code>, "message": <text>}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub status: u16,
    pub message: String,
}

/// Error taxonomy for the whole API surface.
///
/// Every failure path maps to one of these kinds before it reaches the
/// caller; storage transactions roll back before the error is surfaced.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// The requested id does not exist.
    #[error("Not found")]
    NotFound,

    /// Malformed or missing fields, or an unresolvable reference in the
    /// payload. The message enumerates the offending fields.
    #[error("{0}")]
    Validation(String),

    /// A uniqueness or referential constraint rejected the commit.
    #[error("Integrity error")]
    Integrity,

    /// No body supplied where one is required, or an unreadable body.
    #[error("{0}")]
    BadRequest(String),

    #[error("Database error: {0}")]
    Database(DbErr),
}

impl From<DbErr> for ApiError {
    fn from(err: DbErr) -> Self {
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(_))
            | Some(SqlErr::ForeignKeyConstraintViolation(_)) => ApiError::Integrity,
            _ => ApiError::Database(err),
        }
    }
}

impl From<validator::ValidationErrors> for ApiError {
    fn from(errs: validator::ValidationErrors) -> Self {
        let mut parts: Vec<String> = errs
            .field_errors()
            .iter()
            .map(|(field, errors)| {
                let reasons: Vec<String> = errors
                    .iter()
                    .map(|e| match &e.message {
                        Some(msg) => msg.to_string(),
                        None => e.code.to_string(),
                    })
                    .collect();
                format!("{}: {}", field, reasons.join(", "))
            })
            .collect();
        parts.sort();
        ApiError::Validation(parts.join("; "))
    }
}

impl ApiError {
    /// Single source of truth for the error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Integrity | Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message for the HTTP body. Internal errors return a generic message;
    /// details go to the log only.
    pub fn response_message(&self) -> String {
        match self {
            Self::Database(_) => "Database error".to_string(),
            _ => self.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Database(err) = &self {
            error!("database failure: {err}");
        }
        let status = self.status_code();
        let body = ErrorBody {
            status: status.as_u16(),
            message: self.response_message(),
        };
        (status, Json(body)).into_response()
    }
}
