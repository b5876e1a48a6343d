//! Catalog source configuration
//!
//! A source names its catalog type and carries an open property bag. Values
//! in the bag are YAML values, so each catalog type checks the kind of the
//! properties it reads and rejects mismatches with a typed error.

use serde::{Deserialize, Serialize};
use serde_yaml::Value;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{CatalogError, CatalogResult};

/// Property naming the catalog document of a `yaml` source
pub const YAML_CATALOG_PATH_PROPERTY: &str = "yamlCatalogPath";

/// One configured catalog source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSourceConfig {
    /// Display name
    pub name: String,

    /// Unique id among the configured sources
    pub id: String,

    /// Registered catalog type constructing this source
    #[serde(rename = "type")]
    pub source_type: String,

    /// Type-specific settings
    #[serde(default)]
    pub properties: HashMap<String, Value>,
}

impl CatalogSourceConfig {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        source_type: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            source_type: source_type.into(),
            properties: HashMap::new(),
        }
    }

    /// Add a property
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.properties.insert(key.into(), value.into());
        self
    }

    /// Read a required, non-empty string property
    pub fn string_property(&self, key: &str) -> CatalogResult<&str> {
        match self.properties.get(key) {
            None => Err(CatalogError::InvalidArgument(format!(
                "source {:?}: missing {} string property",
                self.id, key
            ))),
            Some(Value::String(value)) if !value.is_empty() => Ok(value),
            Some(Value::String(_)) => Err(CatalogError::InvalidArgument(format!(
                "source {:?}: {} must not be empty",
                self.id, key
            ))),
            Some(other) => Err(CatalogError::InvalidArgument(format!(
                "source {:?}: {} must be a string, found {}",
                self.id,
                key,
                value_kind(other)
            ))),
        }
    }
}

fn value_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

/// Typed settings of a `yaml` catalog source
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YamlCatalogConfig {
    /// Absolute path of the catalog document
    pub path: PathBuf,
}

impl YamlCatalogConfig {
    /// Extract the settings from a source, resolving a relative path against
    /// the working directory
    pub fn from_source(source: &CatalogSourceConfig) -> CatalogResult<Self> {
        let path = PathBuf::from(source.string_property(YAML_CATALOG_PATH_PROPERTY)?);
        if path.is_absolute() {
            return Ok(Self { path });
        }

        let cwd = std::env::current_dir().map_err(|e| {
            CatalogError::InvalidArgument(format!(
                "cannot resolve {}: working directory unavailable: {}",
                path.display(),
                e
            ))
        })?;
        Ok(Self {
            path: cwd.join(path),
        })
    }
}
