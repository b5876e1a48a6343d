//! Error types for the model registry
//!
//! Every layer has its own error enum; all of them fold into
//! [`RegistryError`], which is what a transport boundary inspects to choose
//! between "not found", "bad request" and "internal" responses.

use thiserror::Error;

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, RegistryError>;

/// Top-level error taxonomy shared by repositories and catalog providers
#[derive(Error, Debug)]
pub enum RegistryError {
    /// Referenced entity, model or identity is absent
    #[error("Not found: {0}")]
    NotFound(String),

    /// Malformed filter, sort, pagination or source configuration
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A catalog source type was registered twice
    #[error("Catalog source type already registered: {0}")]
    AlreadyRegistered(String),

    /// Underlying persistence failure
    #[error("Storage error: {0}")]
    Storage(String),

    /// Catalog document unreadable or rejected by strict parsing
    #[error("Load error: {0}")]
    Load(String),
}

impl RegistryError {
    /// Check if this error is a not-found error
    pub fn is_not_found(&self) -> bool {
        matches!(self, RegistryError::NotFound(_))
    }

    /// Check if this error was caused by caller input
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, RegistryError::InvalidArgument(_))
    }
}

impl From<serde_json::Error> for RegistryError {
    fn from(err: serde_json::Error) -> Self {
        RegistryError::InvalidArgument(format!("invalid structured value: {}", err))
    }
}
