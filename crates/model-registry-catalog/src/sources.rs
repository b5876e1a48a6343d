//! Catalog sources file
//!
//! ```yaml
//! catalogs:
//!   - name: Sample catalog
//!     id: sample
//!     type: yaml
//!     properties:
//!       yamlCatalogPath: catalogs/sample.yaml
//! ```

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::config::CatalogSourceConfig;
use crate::error::{CatalogError, CatalogResult};
use crate::provider::CatalogSourceProvider;
use crate::registry::CatalogTypeRegistry;

/// Parsed catalog sources file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogSourcesConfig {
    #[serde(default)]
    pub catalogs: Vec<CatalogSourceConfig>,
}

impl CatalogSourcesConfig {
    /// Parse a sources document
    pub fn from_yaml(path: &Path, contents: &str) -> CatalogResult<Self> {
        serde_yaml::from_str(contents).map_err(|e| CatalogError::load(path, e))
    }

    /// Read and parse a sources file
    pub fn from_path(path: &Path) -> CatalogResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|e| CatalogError::load(path, e))?;
        Self::from_yaml(path, &contents)
    }
}

/// A configured source together with its provider
#[derive(Clone)]
pub struct CatalogSource {
    pub config: CatalogSourceConfig,
    pub provider: Arc<dyn CatalogSourceProvider>,
}

impl fmt::Debug for CatalogSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CatalogSource")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

/// Constructed catalog sources, in file order, addressable by id
#[derive(Debug, Clone, Default)]
pub struct CatalogSources {
    sources: Vec<CatalogSource>,
    by_id: HashMap<String, usize>,
}

impl CatalogSources {
    /// Construct a provider for every configured source
    pub fn build(
        config: CatalogSourcesConfig,
        registry: &CatalogTypeRegistry,
    ) -> CatalogResult<Self> {
        let mut sources = Self::default();
        for source in config.catalogs {
            if source.id.is_empty() {
                return Err(CatalogError::InvalidArgument(format!(
                    "catalog source {:?} has an empty id",
                    source.name
                )));
            }
            if sources.by_id.contains_key(&source.id) {
                return Err(CatalogError::InvalidArgument(format!(
                    "duplicate catalog source id {:?}",
                    source.id
                )));
            }

            let provider = registry.create(&source)?;
            info!(source_id = %source.id, catalog_type = %source.source_type, "Catalog source ready");
            sources.by_id.insert(source.id.clone(), sources.sources.len());
            sources.sources.push(CatalogSource {
                config: source,
                provider,
            });
        }
        Ok(sources)
    }

    /// Get a source by id
    pub fn get(&self, id: &str) -> Option<&CatalogSource> {
        self.by_id.get(id).map(|&index| &self.sources[index])
    }

    /// Iterate sources in file order
    pub fn iter(&self) -> impl Iterator<Item = &CatalogSource> {
        self.sources.iter()
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }
}

/// Read a sources file and construct every source it lists
#[instrument(skip(registry), fields(path = %path.display()))]
pub fn load_catalog_sources(
    path: &Path,
    registry: &CatalogTypeRegistry,
) -> CatalogResult<CatalogSources> {
    let config = CatalogSourcesConfig::from_path(path)?;
    let sources = CatalogSources::build(config, registry)?;
    info!(sources = sources.len(), "Loaded catalog sources");
    Ok(sources)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::MockCatalogSourceProvider;

    fn mock_provider(_: &CatalogSourceConfig) -> CatalogResult<Arc<dyn CatalogSourceProvider>> {
        Ok(Arc::new(MockCatalogSourceProvider::new()))
    }

    fn registry() -> CatalogTypeRegistry {
        let mut registry = CatalogTypeRegistry::new();
        registry.register("mock", mock_provider).unwrap();
        registry
    }

    fn parse(contents: &str) -> CatalogSourcesConfig {
        CatalogSourcesConfig::from_yaml(Path::new("sources.yaml"), contents).unwrap()
    }

    #[test]
    fn test_build_keeps_file_order() {
        let config = parse(
            "catalogs:\n  - {name: B, id: b, type: mock}\n  - {name: A, id: a, type: mock}\n",
        );
        let sources = CatalogSources::build(config, &registry()).unwrap();

        let ids: Vec<_> = sources.iter().map(|s| s.config.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a"]);
        assert_eq!(sources.get("a").unwrap().config.name, "A");
        assert!(sources.get("c").is_none());
    }

    #[test]
    fn test_duplicate_id_rejected() {
        let config = parse(
            "catalogs:\n  - {name: One, id: x, type: mock}\n  - {name: Two, id: x, type: mock}\n",
        );
        let err = CatalogSources::build(config, &registry()).unwrap_err();
        assert!(matches!(err, CatalogError::InvalidArgument(_)));
    }

    #[test]
    fn test_unknown_type_rejected() {
        let config = parse("catalogs:\n  - {name: R, id: r, type: rest}\n");
        assert!(CatalogSources::build(config, &registry()).is_err());
    }

    #[test]
    fn test_unknown_key_rejected() {
        let result =
            CatalogSourcesConfig::from_yaml(Path::new("sources.yaml"), "catalog: []\n");
        assert!(matches!(result, Err(CatalogError::Load { .. })));
    }

    #[test]
    fn test_load_from_file_with_yaml_catalog() {
        let dir = tempfile::tempdir().unwrap();
        let catalog_path = dir.path().join("models.yaml");
        std::fs::write(&catalog_path, "source: Local\nmodels:\n  - name: m\n").unwrap();
        let sources_path = dir.path().join("sources.yaml");
        std::fs::write(
            &sources_path,
            format!(
                "catalogs:\n  - name: Local\n    id: local\n    type: yaml\n    properties:\n      yamlCatalogPath: {}\n",
                catalog_path.display()
            ),
        )
        .unwrap();

        let registry = CatalogTypeRegistry::builtin().unwrap();
        let sources = load_catalog_sources(&sources_path, &registry).unwrap();
        assert_eq!(sources.len(), 1);
        assert!(sources.get("local").is_some());
    }
}
