//! Typed properties attached to entities
//!
//! A property is a named value of exactly one kind. Whether it is a
//! standard (schema-defined) or custom (user extension) property is not part
//! of the value; it is decided by which collection on the entity holds it,
//! and recorded in storage as a [`Partition`].

use serde::{Deserialize, Serialize};
use std::fmt;

/// A property value. The enum makes "exactly one populated kind" structural.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum PropertyValue {
    String(String),
    Int(i64),
    Double(f64),
    Bool(bool),
    /// Structured value, persisted as a JSON blob
    Struct(serde_json::Value),
}

impl PropertyValue {
    /// Name of the value kind, used in diagnostics
    pub fn kind(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "string",
            PropertyValue::Int(_) => "int",
            PropertyValue::Double(_) => "double",
            PropertyValue::Bool(_) => "bool",
            PropertyValue::Struct(_) => "struct",
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            PropertyValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl From<&str> for PropertyValue {
    fn from(value: &str) -> Self {
        PropertyValue::String(value.to_string())
    }
}

impl From<String> for PropertyValue {
    fn from(value: String) -> Self {
        PropertyValue::String(value)
    }
}

impl From<i64> for PropertyValue {
    fn from(value: i64) -> Self {
        PropertyValue::Int(value)
    }
}

impl From<f64> for PropertyValue {
    fn from(value: f64) -> Self {
        PropertyValue::Double(value)
    }
}

impl From<bool> for PropertyValue {
    fn from(value: bool) -> Self {
        PropertyValue::Bool(value)
    }
}

impl From<serde_json::Value> for PropertyValue {
    fn from(value: serde_json::Value) -> Self {
        PropertyValue::Struct(value)
    }
}

/// A named, typed value owned by one entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Property {
    pub name: String,
    pub value: PropertyValue,
}

impl Property {
    pub fn new(name: impl Into<String>, value: impl Into<PropertyValue>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// Which of an entity's two property collections a stored row belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Partition {
    Standard,
    Custom,
}

impl Partition {
    /// Value of the `is_custom_property` flag for this partition
    pub fn is_custom(&self) -> bool {
        matches!(self, Partition::Custom)
    }

    pub fn from_flag(is_custom: bool) -> Self {
        if is_custom {
            Partition::Custom
        } else {
            Partition::Standard
        }
    }
}

impl fmt::Display for Partition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Partition::Standard => write!(f, "standard"),
            Partition::Custom => write!(f, "custom"),
        }
    }
}

/// Both property collections of one entity, each sorted by name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertySet {
    pub properties: Vec<Property>,
    pub custom_properties: Vec<Property>,
}

impl PropertySet {
    /// Route a stored property into the collection its partition names
    pub fn push(&mut self, partition: Partition, property: Property) {
        match partition {
            Partition::Standard => self.properties.push(property),
            Partition::Custom => self.custom_properties.push(property),
        }
    }

    /// Sort both collections by name so equality is order-independent
    pub fn sorted(mut self) -> Self {
        self.properties.sort_by(|a, b| a.name.cmp(&b.name));
        self.custom_properties.sort_by(|a, b| a.name.cmp(&b.name));
        self
    }
}
