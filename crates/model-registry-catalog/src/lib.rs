//! Read-only model catalogs for the model registry
//!
//! A catalog source serves browsable model metadata that the registry does
//! not own. This crate provides:
//!
//! - **CatalogSourceProvider**: the capability every source implements
//! - **CatalogTypeRegistry**: named constructors turning a source
//!   configuration into a provider
//! - **YamlCatalog**: a source backed by a YAML document, reloaded when the
//!   file changes
//! - **PathMonitor**: one shared filesystem watcher for every followed file
//! - **load_catalog_sources**: construction of every source listed in a
//!   sources file
//!
//! # Example
//!
//! ```rust,no_run
//! use model_registry_catalog::{load_catalog_sources, CatalogTypeRegistry, ListModelsParams};
//! use std::path::Path;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let registry = CatalogTypeRegistry::builtin()?;
//! let sources = load_catalog_sources(Path::new("catalog-sources.yaml"), &registry)?;
//!
//! for source in sources.iter() {
//!     let page = source.provider.list_models(&ListModelsParams::new().query("nlp")).await?;
//!     println!("{}: {} models", source.config.name, page.total);
//! }
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod model;
pub mod monitor;
pub mod provider;
pub mod query;
pub mod registry;
pub mod sources;
pub mod yaml;

// Re-export main types for convenience
pub use config::{CatalogSourceConfig, YamlCatalogConfig, YAML_CATALOG_PATH_PROPERTY};
pub use error::{CatalogError, CatalogResult};
pub use model::{CatalogModel, CatalogModelArtifact, CustomProperties, MetadataValue};
pub use monitor::{PathChanges, PathMonitor};
pub use provider::{CatalogOrderBy, CatalogSourceProvider, ListModelsParams};
pub use registry::{CatalogConstructor, CatalogTypeRegistry};
pub use sources::{load_catalog_sources, CatalogSource, CatalogSources, CatalogSourcesConfig};
pub use yaml::{new_yaml_catalog, YamlCatalog, YAML_CATALOG_TYPE};
