//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use cookbook_recipe::ParseError;
use cookbook_storage::{StorageError, StorageErrorKind};
use serde_json::json;

/// Server error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// No recipe, folder or image at the requested path.
    #[error("Invalid path: {0}")]
    NotFound(String),

    /// The requested path would leave the content root.
    #[error("Restricted path: {0}")]
    Forbidden(String),

    /// Recipe document could not be parsed.
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Template rendering failed.
    #[error("Template error: {0}")]
    Template(#[from] minijinja::Error),

    /// Page model could not be serialized.
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Any other storage failure.
    #[error("Storage error: {0}")]
    Storage(StorageError),
}

impl ServerError {
    /// Build an error from a storage failure for the given request path.
    pub(crate) fn from_storage(err: StorageError, path: &str) -> Self {
        match err.kind {
            StorageErrorKind::NotFound => Self::NotFound(path.to_owned()),
            StorageErrorKind::Forbidden => Self::Forbidden(path.to_owned()),
            _ => Self::Storage(err),
        }
    }

    pub(crate) fn status(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::Parse(_) | Self::Template(_) | Self::Json(_) | Self::Storage(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            Self::NotFound(path) => json!({"error": "Invalid path", "path": path}),
            Self::Forbidden(path) => json!({"error": "Restricted path", "path": path}),
            Self::Parse(_) | Self::Template(_) | Self::Json(_) | Self::Storage(_) => {
                tracing::error!(error = %self, "Request failed");
                json!({"error": self.to_string()})
            }
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_storage_maps_kinds() {
        let not_found = ServerError::from_storage(StorageError::not_found("x"), "Desserts/x");
        let forbidden = ServerError::from_storage(StorageError::forbidden(".."), "../etc");
        let other = ServerError::from_storage(
            StorageError::new(StorageErrorKind::Other),
            "Desserts",
        );

        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_parse_error_is_internal() {
        let err = ServerError::from(ParseError::UnclosedBrace { line: 3 });
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
