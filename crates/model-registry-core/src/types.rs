//! Core type definitions

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;

/// Numeric identity of a persisted entity, assigned by the store on first save
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityId(i64);

impl EntityId {
    /// Wrap a raw row id
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw row id
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for EntityId {
    fn from(id: i64) -> Self {
        Self(id)
    }
}

impl FromStr for EntityId {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<i64>()
            .map(Self)
            .map_err(|e| RegistryError::InvalidArgument(format!("invalid entity id {:?}: {}", s, e)))
    }
}

/// Identity of a Type row (the immutable schema descriptor an entity belongs to)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EntityTypeId(i64);

impl EntityTypeId {
    /// Wrap a raw type id
    pub fn new(id: i64) -> Self {
        Self(id)
    }

    /// Get the raw type id
    pub fn get(&self) -> i64 {
        self.0
    }
}

impl fmt::Display for EntityTypeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle state of an artifact
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ArtifactState {
    Unknown,
    Pending,
    Live,
    MarkedForDeletion,
    Deleted,
    Abandoned,
    Reference,
}

impl Default for ArtifactState {
    fn default() -> Self {
        Self::Unknown
    }
}

impl ArtifactState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::Pending => "PENDING",
            Self::Live => "LIVE",
            Self::MarkedForDeletion => "MARKED_FOR_DELETION",
            Self::Deleted => "DELETED",
            Self::Abandoned => "ABANDONED",
            Self::Reference => "REFERENCE",
        }
    }
}

impl fmt::Display for ArtifactState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ArtifactState {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNKNOWN" => Ok(Self::Unknown),
            "PENDING" => Ok(Self::Pending),
            "LIVE" => Ok(Self::Live),
            "MARKED_FOR_DELETION" => Ok(Self::MarkedForDeletion),
            "DELETED" => Ok(Self::Deleted),
            "ABANDONED" => Ok(Self::Abandoned),
            "REFERENCE" => Ok(Self::Reference),
            _ => Err(RegistryError::InvalidArgument(format!(
                "Invalid artifact state: {}",
                s
            ))),
        }
    }
}

/// Last known state of an execution
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExecutionState {
    Unknown,
    New,
    Running,
    Complete,
    Failed,
    Cached,
    Canceled,
}

impl Default for ExecutionState {
    fn default() -> Self {
        Self::Unknown
    }
}

impl ExecutionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Unknown => "UNKNOWN",
            Self::New => "NEW",
            Self::Running => "RUNNING",
            Self::Complete => "COMPLETE",
            Self::Failed => "FAILED",
            Self::Cached => "CACHED",
            Self::Canceled => "CANCELED",
        }
    }
}

impl fmt::Display for ExecutionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExecutionState {
    type Err = RegistryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "UNKNOWN" => Ok(Self::Unknown),
            "NEW" => Ok(Self::New),
            "RUNNING" => Ok(Self::Running),
            "COMPLETE" => Ok(Self::Complete),
            "FAILED" => Ok(Self::Failed),
            "CACHED" => Ok(Self::Cached),
            "CANCELED" => Ok(Self::Canceled),
            _ => Err(RegistryError::InvalidArgument(format!(
                "Invalid execution state: {}",
                s
            ))),
        }
    }
}
