//! Mapping between strongly-typed domain objects and the generic entity shape
//!
//! The store only knows three storage kinds (contexts, artifacts and
//! executions). Every domain type is one of those kinds plus a Type name, and
//! converts to and from an [`EntityRecord`] so a single generic repository can
//! persist all of them.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::Result;
use crate::property::{Property, PropertySet};
use crate::types::{EntityId, EntityTypeId};

/// Storage kind backing a domain type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    /// Grouping entities (registered models, model versions)
    Context,
    /// Data entities with a URI (model artifacts)
    Artifact,
    /// Run entities with a lifecycle state (serve models)
    Execution,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntityKind::Context => write!(f, "Context"),
            EntityKind::Artifact => write!(f, "Artifact"),
            EntityKind::Execution => write!(f, "Execution"),
        }
    }
}

/// Kind-agnostic form of an entity as the repository persists it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EntityRecord {
    pub id: Option<EntityId>,
    pub type_id: Option<EntityTypeId>,
    pub name: String,
    pub external_id: Option<String>,
    /// Artifact URI; ignored for other kinds
    pub uri: Option<String>,
    /// Artifact state or execution last-known state; ignored for contexts
    pub state: Option<String>,
    pub create_time_since_epoch: Option<i64>,
    pub last_update_time_since_epoch: Option<i64>,
    pub properties: Vec<Property>,
    pub custom_properties: Vec<Property>,
}

impl EntityRecord {
    /// Replace both property collections with the ones from a stored set
    pub fn with_property_set(mut self, set: PropertySet) -> Self {
        self.properties = set.properties;
        self.custom_properties = set.custom_properties;
        self
    }
}

/// A domain type the generic repository can persist
pub trait Entity: Clone + Send + Sync + 'static {
    /// Storage kind holding rows of this type
    const KIND: EntityKind;

    /// Name of the Type row describing this domain type
    const TYPE_NAME: &'static str;

    /// Identity, if the entity has been persisted
    fn id(&self) -> Option<EntityId>;

    /// Convert into the generic persisted shape
    fn into_record(self) -> EntityRecord;

    /// Rebuild from a persisted record
    fn from_record(record: EntityRecord) -> Result<Self>;
}
