//! Catalog error types
//!
//! Load failures carry the document path so a failed reload can be traced
//! back to the file that caused it.

use model_registry_core::RegistryError;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for catalog operations
pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// Catalog error types
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Referenced model or source absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed source configuration or list parameters
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A catalog type name was registered twice
    #[error("Catalog type already registered: {0}")]
    AlreadyRegistered(String),

    /// Catalog document unreadable or rejected by strict parsing
    #[error("Failed to load catalog {path}: {reason}")]
    Load { path: PathBuf, reason: String },

    /// The change watch could not be established
    #[error("Watch error: {0}")]
    Watch(String),
}

impl CatalogError {
    /// Create a load error for `path`
    pub fn load(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        CatalogError::Load {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, CatalogError::NotFound(_))
    }
}

impl From<notify::Error> for CatalogError {
    fn from(err: notify::Error) -> Self {
        CatalogError::Watch(err.to_string())
    }
}

impl From<CatalogError> for RegistryError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::NotFound(msg) => RegistryError::NotFound(msg),
            CatalogError::InvalidArgument(msg) => RegistryError::InvalidArgument(msg),
            CatalogError::AlreadyRegistered(name) => RegistryError::AlreadyRegistered(name),
            load @ CatalogError::Load { .. } => RegistryError::Load(load.to_string()),
            CatalogError::Watch(msg) => RegistryError::Load(format!("watch failed: {}", msg)),
        }
    }
}
