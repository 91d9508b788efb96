//! CLI error types.

use cookbook_config::ConfigError;
use cookbook_recipe::ParseError;
use cookbook_storage::StorageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Io(#[from] std::io::Error),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Parse(#[from] ParseError),

    #[error("{0}")]
    Server(String),
}
