//! Registry domain types
//!
//! Registered models and model versions are contexts, model artifacts are
//! artifacts and serve models are executions. Timestamps on the attribute
//! structs are populated by the repository; values supplied by callers are
//! ignored on save.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, EntityKind, EntityRecord};
use crate::error::Result;
use crate::property::{Property, PropertyValue};
use crate::types::{ArtifactState, EntityId, EntityTypeId, ExecutionState};

/// Type name of registered models
pub const REGISTERED_MODEL_TYPE_NAME: &str = "kf.RegisteredModel";
/// Type name of model versions
pub const MODEL_VERSION_TYPE_NAME: &str = "kf.ModelVersion";
/// Type name of model artifacts
pub const MODEL_ARTIFACT_TYPE_NAME: &str = "kf.ModelArtifact";
/// Type name of serve models
pub const SERVE_MODEL_TYPE_NAME: &str = "kf.ServeModel";

/// First-class attributes of context-kind entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContextAttributes {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time_since_epoch: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_time_since_epoch: Option<i64>,
}

impl ContextAttributes {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }
}

/// First-class attributes of artifact-kind entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ArtifactAttributes {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uri: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ArtifactState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time_since_epoch: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_time_since_epoch: Option<i64>,
}

/// First-class attributes of execution-kind entities
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExecutionAttributes {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_known_state: Option<ExecutionState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub create_time_since_epoch: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_update_time_since_epoch: Option<i64>,
}

/// A named model under which versions are registered
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisteredModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<EntityTypeId>,
    pub attributes: ContextAttributes,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub custom_properties: Vec<Property>,
}

impl RegisteredModel {
    /// Create an unsaved registered model
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            attributes: ContextAttributes::new(name),
            ..Default::default()
        }
    }

    /// Set the external id
    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.attributes.external_id = Some(external_id.into());
        self
    }

    /// Add a standard property
    pub fn property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }

    /// Add a custom property
    pub fn custom_property(
        mut self,
        name: impl Into<String>,
        value: impl Into<PropertyValue>,
    ) -> Self {
        self.custom_properties.push(Property::new(name, value));
        self
    }
}

impl Entity for RegisteredModel {
    const KIND: EntityKind = EntityKind::Context;
    const TYPE_NAME: &'static str = REGISTERED_MODEL_TYPE_NAME;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn into_record(self) -> EntityRecord {
        context_record(
            self.id,
            self.type_id,
            self.attributes,
            self.properties,
            self.custom_properties,
        )
    }

    fn from_record(record: EntityRecord) -> Result<Self> {
        let (id, type_id, attributes, properties, custom_properties) = context_parts(record);
        Ok(Self {
            id,
            type_id,
            attributes,
            properties,
            custom_properties,
        })
    }
}

/// One version of a registered model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelVersion {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<EntityTypeId>,
    pub attributes: ContextAttributes,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub custom_properties: Vec<Property>,
}

impl ModelVersion {
    /// Create an unsaved model version
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            attributes: ContextAttributes::new(name),
            ..Default::default()
        }
    }

    /// Add a standard property
    pub fn property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }
}

impl Entity for ModelVersion {
    const KIND: EntityKind = EntityKind::Context;
    const TYPE_NAME: &'static str = MODEL_VERSION_TYPE_NAME;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn into_record(self) -> EntityRecord {
        context_record(
            self.id,
            self.type_id,
            self.attributes,
            self.properties,
            self.custom_properties,
        )
    }

    fn from_record(record: EntityRecord) -> Result<Self> {
        let (id, type_id, attributes, properties, custom_properties) = context_parts(record);
        Ok(Self {
            id,
            type_id,
            attributes,
            properties,
            custom_properties,
        })
    }
}

/// The stored model files of a model version
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelArtifact {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<EntityTypeId>,
    pub attributes: ArtifactAttributes,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub custom_properties: Vec<Property>,
}

impl ModelArtifact {
    /// Create an unsaved model artifact pointing at `uri`
    pub fn new(name: impl Into<String>, uri: impl Into<String>) -> Self {
        Self {
            attributes: ArtifactAttributes {
                name: name.into(),
                uri: Some(uri.into()),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Set the lifecycle state
    pub fn state(mut self, state: ArtifactState) -> Self {
        self.attributes.state = Some(state);
        self
    }

    /// Add a standard property
    pub fn property(mut self, name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        self.properties.push(Property::new(name, value));
        self
    }
}

impl Entity for ModelArtifact {
    const KIND: EntityKind = EntityKind::Artifact;
    const TYPE_NAME: &'static str = MODEL_ARTIFACT_TYPE_NAME;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn into_record(self) -> EntityRecord {
        let attributes = self.attributes;
        EntityRecord {
            id: self.id,
            type_id: self.type_id,
            name: attributes.name,
            external_id: attributes.external_id,
            uri: attributes.uri,
            state: attributes.state.map(|s| s.as_str().to_string()),
            create_time_since_epoch: attributes.create_time_since_epoch,
            last_update_time_since_epoch: attributes.last_update_time_since_epoch,
            properties: self.properties,
            custom_properties: self.custom_properties,
        }
    }

    fn from_record(record: EntityRecord) -> Result<Self> {
        let state: Option<ArtifactState> = record.state.as_deref().map(str::parse).transpose()?;
        Ok(Self {
            id: record.id,
            type_id: record.type_id,
            attributes: ArtifactAttributes {
                name: record.name,
                external_id: record.external_id,
                uri: record.uri,
                state,
                create_time_since_epoch: record.create_time_since_epoch,
                last_update_time_since_epoch: record.last_update_time_since_epoch,
            },
            properties: record.properties,
            custom_properties: record.custom_properties,
        })
    }
}

/// A deployment of a model version inside a serving environment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ServeModel {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<EntityId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub type_id: Option<EntityTypeId>,
    pub attributes: ExecutionAttributes,
    #[serde(default)]
    pub properties: Vec<Property>,
    #[serde(default)]
    pub custom_properties: Vec<Property>,
}

impl ServeModel {
    /// Create an unsaved serve model
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            attributes: ExecutionAttributes {
                name: name.into(),
                ..Default::default()
            },
            ..Default::default()
        }
    }

    /// Set the last known state
    pub fn last_known_state(mut self, state: ExecutionState) -> Self {
        self.attributes.last_known_state = Some(state);
        self
    }
}

impl Entity for ServeModel {
    const KIND: EntityKind = EntityKind::Execution;
    const TYPE_NAME: &'static str = SERVE_MODEL_TYPE_NAME;

    fn id(&self) -> Option<EntityId> {
        self.id
    }

    fn into_record(self) -> EntityRecord {
        let attributes = self.attributes;
        EntityRecord {
            id: self.id,
            type_id: self.type_id,
            name: attributes.name,
            external_id: attributes.external_id,
            uri: None,
            state: attributes.last_known_state.map(|s| s.as_str().to_string()),
            create_time_since_epoch: attributes.create_time_since_epoch,
            last_update_time_since_epoch: attributes.last_update_time_since_epoch,
            properties: self.properties,
            custom_properties: self.custom_properties,
        }
    }

    fn from_record(record: EntityRecord) -> Result<Self> {
        let last_known_state: Option<ExecutionState> =
            record.state.as_deref().map(str::parse).transpose()?;
        Ok(Self {
            id: record.id,
            type_id: record.type_id,
            attributes: ExecutionAttributes {
                name: record.name,
                external_id: record.external_id,
                last_known_state,
                create_time_since_epoch: record.create_time_since_epoch,
                last_update_time_since_epoch: record.last_update_time_since_epoch,
            },
            properties: record.properties,
            custom_properties: record.custom_properties,
        })
    }
}

fn context_record(
    id: Option<EntityId>,
    type_id: Option<EntityTypeId>,
    attributes: ContextAttributes,
    properties: Vec<Property>,
    custom_properties: Vec<Property>,
) -> EntityRecord {
    EntityRecord {
        id,
        type_id,
        name: attributes.name,
        external_id: attributes.external_id,
        uri: None,
        state: None,
        create_time_since_epoch: attributes.create_time_since_epoch,
        last_update_time_since_epoch: attributes.last_update_time_since_epoch,
        properties,
        custom_properties,
    }
}

type ContextParts = (
    Option<EntityId>,
    Option<EntityTypeId>,
    ContextAttributes,
    Vec<Property>,
    Vec<Property>,
);

fn context_parts(record: EntityRecord) -> ContextParts {
    (
        record.id,
        record.type_id,
        ContextAttributes {
            name: record.name,
            external_id: record.external_id,
            create_time_since_epoch: record.create_time_since_epoch,
            last_update_time_since_epoch: record.last_update_time_since_epoch,
        },
        record.properties,
        record.custom_properties,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_registered_model_builder() {
        let model = RegisteredModel::new("fraud-detector")
            .external_id("ext-1")
            .property("description", "detects fraud")
            .custom_property("team", "risk");

        assert_eq!(model.attributes.name, "fraud-detector");
        assert_eq!(model.attributes.external_id.as_deref(), Some("ext-1"));
        assert_eq!(model.properties.len(), 1);
        assert_eq!(model.custom_properties.len(), 1);
        assert!(model.id().is_none());
    }

    #[test]
    fn test_registered_model_record_mapping() {
        let mut model = RegisteredModel::new("m").custom_property("priority", 5i64);
        model.id = Some(EntityId::new(3));

        let record = model.clone().into_record();
        assert_eq!(record.name, "m");
        assert!(record.uri.is_none());

        let back = RegisteredModel::from_record(record).unwrap();
        assert_eq!(back, model);
    }

    #[test]
    fn test_model_artifact_state_mapping() {
        let artifact = ModelArtifact::new("weights", "s3://bucket/weights.bin")
            .state(ArtifactState::Live);

        let record = artifact.into_record();
        assert_eq!(record.state.as_deref(), Some("LIVE"));
        assert_eq!(record.uri.as_deref(), Some("s3://bucket/weights.bin"));

        let back = ModelArtifact::from_record(record).unwrap();
        assert_eq!(back.attributes.state, Some(ArtifactState::Live));
    }

    #[test]
    fn test_unknown_stored_state_is_rejected() {
        let record = EntityRecord {
            name: "serve".to_string(),
            state: Some("EXPLODED".to_string()),
            ..Default::default()
        };
        assert!(ServeModel::from_record(record).is_err());
    }

    #[test]
    fn test_entity_kinds() {
        assert_eq!(RegisteredModel::KIND, EntityKind::Context);
        assert_eq!(ModelVersion::KIND, EntityKind::Context);
        assert_eq!(ModelArtifact::KIND, EntityKind::Artifact);
        assert_eq!(ServeModel::KIND, EntityKind::Execution);
        assert_ne!(RegisteredModel::TYPE_NAME, ModelVersion::TYPE_NAME);
    }
}
