//! Catalog served from a YAML document on disk
//!
//! The document is parsed strictly into a private snapshot which then
//! replaces the served one in a single swap, so readers see either the old
//! or the new catalog in full. A document that fails to load never replaces
//! a good snapshot.

use async_trait::async_trait;
use model_registry_core::{Page, Pagination};
use parking_lot::RwLock;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Weak};
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use crate::config::{CatalogSourceConfig, YamlCatalogConfig};
use crate::error::{CatalogError, CatalogResult};
use crate::model::{CatalogModel, CatalogModelArtifact, CustomProperties};
use crate::monitor::{PathChanges, PathMonitor};
use crate::provider::{CatalogSourceProvider, ListModelsParams};
use crate::query;

/// Catalog type name of YAML file catalogs
pub const YAML_CATALOG_TYPE: &str = "yaml";

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct CatalogDocument {
    #[serde(default)]
    source: String,
    models: Vec<DocumentModel>,
}

/// A model entry: the model attributes inline plus its artifacts
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
struct DocumentModel {
    name: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    readme: Option<String>,
    #[serde(default)]
    maturity: Option<String>,
    #[serde(default)]
    language: Vec<String>,
    #[serde(default)]
    tasks: Vec<String>,
    #[serde(default)]
    provider: Option<String>,
    #[serde(default)]
    logo: Option<String>,
    #[serde(default)]
    license: Option<String>,
    #[serde(default)]
    license_link: Option<String>,
    #[serde(default)]
    library_name: Option<String>,
    #[serde(default)]
    custom_properties: CustomProperties,
    #[serde(default)]
    create_time_since_epoch: Option<String>,
    #[serde(default)]
    last_update_time_since_epoch: Option<String>,
    #[serde(default)]
    artifacts: Vec<CatalogModelArtifact>,
}

impl DocumentModel {
    fn into_entry(self) -> CatalogEntry {
        let model = CatalogModel {
            name: self.name,
            description: self.description,
            readme: self.readme,
            maturity: self.maturity,
            language: self.language,
            tasks: self.tasks,
            provider: self.provider,
            logo: self.logo,
            license: self.license,
            license_link: self.license_link,
            library_name: self.library_name,
            custom_properties: self.custom_properties,
            create_time_since_epoch: self.create_time_since_epoch,
            last_update_time_since_epoch: self.last_update_time_since_epoch,
        };
        CatalogEntry {
            model,
            artifacts: self.artifacts,
        }
    }
}

#[derive(Debug)]
struct CatalogEntry {
    model: CatalogModel,
    artifacts: Vec<CatalogModelArtifact>,
}

/// Parsed contents of one document version
#[derive(Debug, Default)]
struct Snapshot {
    source: String,
    models: BTreeMap<String, CatalogEntry>,
}

impl Snapshot {
    fn parse(path: &Path, bytes: &[u8]) -> CatalogResult<Self> {
        // A truncated write must not read as a catalog with no models
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Err(CatalogError::load(path, "document is empty"));
        }
        let document: CatalogDocument =
            serde_yaml::from_slice(bytes).map_err(|e| CatalogError::load(path, e))?;

        // Later entries with the same name replace earlier ones
        let mut models = BTreeMap::new();
        for model in document.models {
            let entry = model.into_entry();
            models.insert(entry.model.name.clone(), entry);
        }

        Ok(Self {
            source: document.source,
            models,
        })
    }
}

struct Shared {
    path: PathBuf,
    snapshot: RwLock<Arc<Snapshot>>,
    // Closed when the last catalog handle goes away
    alive: watch::Sender<()>,
}

impl Shared {
    fn current(&self) -> Arc<Snapshot> {
        Arc::clone(&self.snapshot.read())
    }

    async fn reload(&self) -> CatalogResult<()> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| CatalogError::load(&self.path, e))?;
        let snapshot = Snapshot::parse(&self.path, &bytes)?;
        let models = snapshot.models.len();

        *self.snapshot.write() = Arc::new(snapshot);

        info!(path = %self.path.display(), models, "Reloaded YAML catalog");
        Ok(())
    }
}

/// Catalog source backed by a YAML file, reloaded when the file changes
#[derive(Clone)]
pub struct YamlCatalog {
    shared: Arc<Shared>,
}

impl YamlCatalog {
    /// Load the document and start following changes to it.
    ///
    /// A failed initial load is an error. Failing to follow the file is not:
    /// the catalog then serves the initial load for its whole lifetime.
    pub fn open(config: YamlCatalogConfig) -> CatalogResult<Self> {
        let catalog = Self::load(config)?;
        match catalog.follow_changes() {
            Ok(()) => debug!(path = %catalog.path().display(), "Following YAML catalog changes"),
            Err(e) => warn!(
                path = %catalog.path().display(),
                error = %e,
                "Unable to watch YAML catalog; it will not reload automatically"
            ),
        }
        Ok(catalog)
    }

    /// Load the document once without following changes
    pub fn load(config: YamlCatalogConfig) -> CatalogResult<Self> {
        let path = config.path;
        let bytes = std::fs::read(&path).map_err(|e| CatalogError::load(&path, e))?;
        let snapshot = Snapshot::parse(&path, &bytes)?;

        info!(
            path = %path.display(),
            source = %snapshot.source,
            models = snapshot.models.len(),
            "Loaded YAML catalog"
        );

        Ok(Self {
            shared: Arc::new(Shared {
                path,
                snapshot: RwLock::new(Arc::new(snapshot)),
                alive: watch::channel(()).0,
            }),
        })
    }

    /// Re-read the document, keeping the served snapshot if it fails to load
    pub async fn reload(&self) -> CatalogResult<()> {
        self.shared.reload().await
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.shared.path
    }

    /// Source label of the served snapshot
    pub fn source(&self) -> String {
        self.shared.current().source.clone()
    }

    /// Number of models in the served snapshot
    pub fn model_count(&self) -> usize {
        self.shared.current().models.len()
    }

    fn follow_changes(&self) -> CatalogResult<()> {
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| CatalogError::Watch(format!("no async runtime: {}", e)))?;
        let changes = PathMonitor::global()?.watch(self.path())?;
        let dropped = self.shared.alive.subscribe();
        runtime.spawn(reload_on_change(
            Arc::downgrade(&self.shared),
            changes,
            dropped,
        ));
        Ok(())
    }
}

/// Reload for every change until the catalog is dropped
async fn reload_on_change(
    shared: Weak<Shared>,
    mut changes: PathChanges,
    mut dropped: watch::Receiver<()>,
) {
    loop {
        tokio::select! {
            change = changes.changed() => {
                if change.is_none() {
                    break;
                }
            }
            // Nothing is ever sent; this only resolves once the sender is gone
            _ = dropped.changed() => break,
        }
        let Some(shared) = shared.upgrade() else {
            break;
        };
        info!(path = %shared.path.display(), "Reloading YAML catalog");
        if let Err(e) = shared.reload().await {
            error!(error = %e, "Unable to reload YAML catalog; keeping previous contents");
        }
    }
    debug!("YAML catalog reload task finished");
}

#[async_trait]
impl CatalogSourceProvider for YamlCatalog {
    async fn get_model(&self, name: &str) -> CatalogResult<Option<CatalogModel>> {
        let snapshot = self.shared.current();
        Ok(snapshot.models.get(name).map(|entry| entry.model.clone()))
    }

    async fn list_models(&self, params: &ListModelsParams) -> CatalogResult<Page<CatalogModel>> {
        let snapshot = self.shared.current();
        query::list_models(snapshot.models.values().map(|entry| &entry.model), params)
    }

    async fn get_artifacts(
        &self,
        name: &str,
    ) -> CatalogResult<Option<Page<CatalogModelArtifact>>> {
        let snapshot = self.shared.current();
        Ok(snapshot
            .models
            .get(name)
            .map(|entry| Pagination::default().paginate(entry.artifacts.clone())))
    }
}

/// Catalog constructor registered under [`YAML_CATALOG_TYPE`]
pub fn new_yaml_catalog(
    source: &CatalogSourceConfig,
) -> CatalogResult<Arc<dyn CatalogSourceProvider>> {
    let config = YamlCatalogConfig::from_source(source)?;
    Ok(Arc::new(YamlCatalog::open(config)?))
}
