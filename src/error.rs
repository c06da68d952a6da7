//! Error types for Booklib server

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Transport-independent classification of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Malformed or out-of-range input
    ClientInput,
    /// Referenced entity does not exist
    NotFound,
    /// Unique-constraint or referential-integrity violation
    Conflict,
    /// Anything unclassified
    Server,
}

impl ErrorKind {
    pub fn status_code(self) -> StatusCode {
        match self {
            ErrorKind::ClientInput => StatusCode::BAD_REQUEST,
            ErrorKind::NotFound => StatusCode::NOT_FOUND,
            ErrorKind::Conflict => StatusCode::CONFLICT,
            ErrorKind::Server => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Main application error type
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error("A book with ISBN {0} already exists")]
    DuplicateIsbn(String),

    #[error("Category '{0}' already exists")]
    DuplicateName(String),

    #[error("{0}")]
    Conflict(String),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl AppError {
    pub fn book_not_found(id: i32) -> Self {
        AppError::NotFound(format!("Book with ID {} not found", id))
    }

    pub fn author_not_found(id: i32) -> Self {
        AppError::NotFound(format!("Author with ID {} not found", id))
    }

    pub fn category_not_found(id: i32) -> Self {
        AppError::NotFound(format!("Category with ID {} not found", id))
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AppError::Validation(_) | AppError::BadRequest(_) => ErrorKind::ClientInput,
            AppError::NotFound(_) => ErrorKind::NotFound,
            AppError::DuplicateIsbn(_) | AppError::DuplicateName(_) | AppError::Conflict(_) => {
                ErrorKind::Conflict
            }
            AppError::Database(_) | AppError::Internal(_) => ErrorKind::Server,
        }
    }
}

/// Error response body
#[derive(Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let kind = self.kind();
        let message = match &self {
            AppError::Database(e) => {
                tracing::error!("Database error: {:?}", e);
                "Database error".to_string()
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };

        let body = Json(ErrorResponse {
            success: false,
            error: message,
        });

        (kind.status_code(), body).into_response()
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let message = fields
            .into_iter()
            .flat_map(|(field, errs)| {
                errs.iter().map(move |e| match &e.message {
                    Some(msg) => msg.to_string(),
                    None => format!("Invalid value for {}", field),
                })
            })
            .next()
            .unwrap_or_else(|| "Invalid input".to_string());

        AppError::Validation(message)
    }
}

/// Result type alias for application operations
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_mapping() {
        assert_eq!(AppError::Validation("x".into()).kind(), ErrorKind::ClientInput);
        assert_eq!(AppError::book_not_found(3).kind(), ErrorKind::NotFound);
        assert_eq!(AppError::DuplicateIsbn("1".into()).kind(), ErrorKind::Conflict);
        assert_eq!(AppError::DuplicateName("Fiction".into()).kind(), ErrorKind::Conflict);
        assert_eq!(AppError::Conflict("x".into()).kind(), ErrorKind::Conflict);
        assert_eq!(AppError::Internal("x".into()).kind(), ErrorKind::Server);
    }

    #[test]
    fn test_messages() {
        assert_eq!(AppError::book_not_found(7).to_string(), "Book with ID 7 not found");
        assert_eq!(
            AppError::DuplicateIsbn("9780132350884".into()).to_string(),
            "A book with ISBN 9780132350884 already exists"
        );
        assert_eq!(
            AppError::DuplicateName("Fiction".into()).to_string(),
            "Category 'Fiction' already exists"
        );
    }

    #[test]
    fn test_server_errors_are_not_leaked() {
        let response = AppError::Internal("connection reset by peer".into()).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let response = AppError::Conflict("busy".into()).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }
}
