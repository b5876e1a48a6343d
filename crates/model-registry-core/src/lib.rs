//! Core domain models and types for the model registry
//!
//! This crate contains the entity types persisted by the metadata store,
//! their typed properties, the shared error taxonomy, and the filter/sort/
//! pagination primitives used by both repositories and catalog providers.

pub mod entity;
pub mod error;
pub mod models;
pub mod property;
pub mod query;
pub mod types;

// Re-exports for convenience
pub use entity::{Entity, EntityKind, EntityRecord};
pub use error::{RegistryError, Result};
pub use models::{
    ArtifactAttributes, ContextAttributes, ExecutionAttributes, ModelArtifact, ModelVersion,
    RegisteredModel, ServeModel,
};
pub use property::{Partition, Property, PropertySet, PropertyValue};
pub use query::{parse_epoch_lenient, Page, Pagination, SortOrder, TextQuery};
pub use types::{ArtifactState, EntityId, EntityTypeId, ExecutionState};
