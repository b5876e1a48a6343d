//! Catalog model and artifact records
//!
//! These are the read-only records a catalog source serves. Field names use
//! camelCase on the wire; unknown fields are rejected so a typo in a
//! hand-authored catalog fails the load instead of being dropped.

use model_registry_core::parse_epoch_lenient;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A typed custom property value, tagged by `metadataType`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "metadataType")]
pub enum MetadataValue {
    MetadataStringValue(StringValue),
    MetadataIntValue(IntValue),
    MetadataDoubleValue(DoubleValue),
    MetadataBoolValue(BoolValue),
    MetadataStructValue(StructValue),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StringValue {
    pub string_value: String,
}

/// Integer value; string-encoded so 64-bit values survive JSON consumers
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IntValue {
    pub int_value: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DoubleValue {
    pub double_value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct BoolValue {
    pub bool_value: bool,
}

/// Base64-encoded JSON struct value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StructValue {
    pub struct_value: String,
}

impl MetadataValue {
    pub fn string(value: impl Into<String>) -> Self {
        MetadataValue::MetadataStringValue(StringValue {
            string_value: value.into(),
        })
    }

    pub fn int(value: i64) -> Self {
        MetadataValue::MetadataIntValue(IntValue {
            int_value: value.to_string(),
        })
    }

    pub fn double(value: f64) -> Self {
        MetadataValue::MetadataDoubleValue(DoubleValue {
            double_value: value,
        })
    }

    pub fn bool(value: bool) -> Self {
        MetadataValue::MetadataBoolValue(BoolValue { bool_value: value })
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MetadataValue::MetadataStringValue(v) => Some(&v.string_value),
            _ => None,
        }
    }
}

/// Custom properties keyed by name
pub type CustomProperties = BTreeMap<String, MetadataValue>;

/// A model offered by a catalog source
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CatalogModel {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub readme: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub maturity: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub language: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tasks: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub license_link: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub library_name: Option<String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_properties: CustomProperties,
    /// Milliseconds since epoch, string-encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time_since_epoch: Option<String>,
    /// Milliseconds since epoch, string-encoded
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time_since_epoch: Option<String>,
}

impl CatalogModel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    /// Creation time, zero when absent or unparsable
    pub fn create_time(&self) -> i64 {
        parse_epoch_lenient(self.create_time_since_epoch.as_deref())
    }

    /// Last update time, zero when absent or unparsable
    pub fn last_update_time(&self) -> i64 {
        parse_epoch_lenient(self.last_update_time_since_epoch.as_deref())
    }
}

/// A downloadable artifact of a catalog model
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CatalogModelArtifact {
    pub uri: String,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub custom_properties: CustomProperties,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub create_time_since_epoch: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_update_time_since_epoch: Option<String>,
}
