//! Catalog type registry
//!
//! Maps a catalog type name to the constructor building a provider from a
//! source configuration. The registry is filled while the process starts
//! and only read afterwards; share it behind an `Arc` once populated.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, instrument};

use crate::config::CatalogSourceConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::provider::CatalogSourceProvider;
use crate::yaml::{new_yaml_catalog, YAML_CATALOG_TYPE};

/// Builds a provider from its source configuration
pub type CatalogConstructor =
    fn(&CatalogSourceConfig) -> CatalogResult<Arc<dyn CatalogSourceProvider>>;

/// Named catalog constructors
#[derive(Default, Clone)]
pub struct CatalogTypeRegistry {
    constructors: HashMap<String, CatalogConstructor>,
}

impl fmt::Debug for CatalogTypeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogTypeRegistry")
            .field("types", &self.type_names())
            .finish()
    }
}

impl CatalogTypeRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding every catalog type this crate provides
    pub fn builtin() -> CatalogResult<Self> {
        let mut registry = Self::new();
        registry.register(YAML_CATALOG_TYPE, new_yaml_catalog)?;
        Ok(registry)
    }

    /// Register a constructor under `name`.
    ///
    /// Fails with `AlreadyRegistered` if the name is taken; the existing
    /// constructor stays in place.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        constructor: CatalogConstructor,
    ) -> CatalogResult<()> {
        let name = name.into();
        if self.constructors.contains_key(&name) {
            return Err(CatalogError::AlreadyRegistered(name));
        }
        debug!(catalog_type = %name, "Registered catalog type");
        self.constructors.insert(name, constructor);
        Ok(())
    }

    /// Check if a catalog type is registered
    pub fn contains(&self, name: &str) -> bool {
        self.constructors.contains_key(name)
    }

    /// Registered type names, sorted
    pub fn type_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.constructors.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Build the provider for a source
    #[instrument(skip(self, source), fields(source_id = %source.id, catalog_type = %source.source_type))]
    pub fn create(
        &self,
        source: &CatalogSourceConfig,
    ) -> CatalogResult<Arc<dyn CatalogSourceProvider>> {
        let constructor = self.constructors.get(&source.source_type).ok_or_else(|| {
            CatalogError::InvalidArgument(format!(
                "source {:?}: unknown catalog type {:?}",
                source.id, source.source_type
            ))
        })?;
        constructor(source)
    }
}
