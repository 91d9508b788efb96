//! Storage error type.

use std::path::PathBuf;

/// Semantic error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum StorageErrorKind {
    /// No real entry matches the requested path.
    NotFound,
    /// The path would leave the content root.
    Forbidden,
    /// Other I/O failure.
    Other,
}

/// Storage error with semantic kind, optional path and underlying source.
#[derive(Debug)]
pub struct StorageError {
    /// Semantic error category.
    pub kind: StorageErrorKind,
    /// Path context (if applicable).
    pub path: Option<PathBuf>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl StorageError {
    /// Create a new storage error.
    #[must_use]
    pub fn new(kind: StorageErrorKind) -> Self {
        Self {
            kind,
            path: None,
            source: None,
        }
    }

    /// Attach path context.
    #[must_use]
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Create a not found error with path.
    #[must_use]
    pub fn not_found(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::NotFound).with_path(path)
    }

    /// Create a forbidden error with path.
    #[must_use]
    pub fn forbidden(path: impl Into<PathBuf>) -> Self {
        Self::new(StorageErrorKind::Forbidden).with_path(path)
    }

    /// Create a storage error from an I/O error.
    ///
    /// A missing file maps to `NotFound`, everything else to `Other`.
    #[must_use]
    pub fn io(err: std::io::Error, path: impl Into<PathBuf>) -> Self {
        let kind = match err.kind() {
            std::io::ErrorKind::NotFound => StorageErrorKind::NotFound,
            _ => StorageErrorKind::Other,
        };
        Self::new(kind).with_path(path).with_source(err)
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.kind == StorageErrorKind::NotFound
    }

    #[must_use]
    pub fn is_forbidden(&self) -> bool {
        self.kind == StorageErrorKind::Forbidden
    }
}

impl std::fmt::Display for StorageError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "Kind: message (path: /foo/bar)"
        let kind_str = match self.kind {
            StorageErrorKind::NotFound => "Not found",
            StorageErrorKind::Forbidden => "Forbidden",
            StorageErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(path) = &self.path {
            write!(f, " (path: {})", path.display())?;
        }

        Ok(())
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_with_path() {
        let err = StorageError::not_found("Desserts/Cake");
        assert_eq!(err.to_string(), "Not found (path: Desserts/Cake)");
    }

    #[test]
    fn test_display_with_source() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err = StorageError::io(io, "/recipes");

        assert_eq!(err.kind, StorageErrorKind::Other);
        assert_eq!(err.to_string(), "Error: denied (path: /recipes)");
    }

    #[test]
    fn test_io_not_found_maps_kind() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        assert!(StorageError::io(io, "/recipes").is_not_found());
    }

    #[test]
    fn test_forbidden() {
        let err = StorageError::forbidden("..");
        assert!(err.is_forbidden());
        assert!(!err.is_not_found());
    }

    #[test]
    fn test_storage_error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<StorageError>();
    }
}
