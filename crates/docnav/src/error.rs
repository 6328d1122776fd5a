//! CLI error types.

use docnav_config::ConfigError;
use docnav_site::BuildError;
use docnav_storage::StorageError;

/// CLI error type.
#[derive(Debug, thiserror::Error)]
pub(crate) enum CliError {
    #[error("{0}")]
    Config(#[from] ConfigError),

    #[error("{0}")]
    Storage(#[from] StorageError),

    #[error("{0}")]
    Build(#[from] BuildError),
}
