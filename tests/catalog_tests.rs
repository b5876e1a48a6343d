//! Catalog integration tests
//!
//! Sources files, the type registry and YAML catalogs working together.

mod common;

use common::fixtures::{sources_document, SAMPLE_CATALOG};
use common::write_file;
use model_registry_catalog::{
    load_catalog_sources, CatalogError, CatalogOrderBy, CatalogResult, CatalogSourceConfig,
    CatalogSourceProvider, CatalogTypeRegistry, ListModelsParams, MetadataValue, PathMonitor,
    YamlCatalog, YamlCatalogConfig, YAML_CATALOG_TYPE,
};
use model_registry_core::{RegistryError, SortOrder};
use std::sync::Arc;
use std::time::Duration;

fn names(page: &model_registry_core::Page<model_registry_catalog::CatalogModel>) -> Vec<&str> {
    page.items.iter().map(|m| m.name.as_str()).collect()
}

async fn sample_provider(dir: &tempfile::TempDir) -> Arc<dyn CatalogSourceProvider> {
    let catalog = write_file(dir.path(), "sample.yaml", SAMPLE_CATALOG);
    let sources = write_file(
        dir.path(),
        "sources.yaml",
        &sources_document("sample", &catalog),
    );
    let registry = CatalogTypeRegistry::builtin().unwrap();
    let loaded = load_catalog_sources(&sources, &registry).unwrap();
    loaded.get("sample").unwrap().provider.clone()
}

#[tokio::test]
async fn test_list_sorted_by_name_both_directions() {
    let dir = tempfile::tempdir().unwrap();
    let provider = sample_provider(&dir).await;

    let ascending = provider.list_models(&ListModelsParams::new()).await.unwrap();
    assert_eq!(names(&ascending), vec!["a", "b", "c"]);
    assert_eq!(ascending.total, 3);

    let descending = provider
        .list_models(&ListModelsParams::new().sort_order(SortOrder::Descending))
        .await
        .unwrap();
    assert_eq!(names(&descending), vec!["c", "b", "a"]);
}

#[tokio::test]
async fn test_list_sorted_by_times() {
    let dir = tempfile::tempdir().unwrap();
    let provider = sample_provider(&dir).await;

    let by_create = provider
        .list_models(&ListModelsParams::new().order_by(CatalogOrderBy::CreateTime))
        .await
        .unwrap();
    assert_eq!(names(&by_create), vec!["a", "b", "c"]);

    let by_update = provider
        .list_models(
            &ListModelsParams::new()
                .order_by(CatalogOrderBy::LastUpdateTime)
                .sort_order(SortOrder::Descending),
        )
        .await
        .unwrap();
    assert_eq!(names(&by_update), vec!["b", "c", "a"]);
}

#[tokio::test]
async fn test_query_matches_tasks() {
    let dir = tempfile::tempdir().unwrap();
    let provider = sample_provider(&dir).await;

    let nlp = provider
        .list_models(&ListModelsParams::new().query("NLP"))
        .await
        .unwrap();
    assert_eq!(names(&nlp), vec!["b", "c"]);

    let nothing = provider
        .list_models(&ListModelsParams::new().query("speech"))
        .await
        .unwrap();
    assert!(nothing.items.is_empty());
    assert_eq!(nothing.total, 0);
}

#[tokio::test]
async fn test_pagination_past_end_keeps_total() {
    let dir = tempfile::tempdir().unwrap();
    let provider = sample_provider(&dir).await;

    let page = provider
        .list_models(&ListModelsParams::new().page_size(2).offset(5))
        .await
        .unwrap();
    assert!(page.items.is_empty());
    assert_eq!(page.total, 3);
    assert!(!page.has_more());
}

#[tokio::test]
async fn test_get_model_and_artifacts() {
    let dir = tempfile::tempdir().unwrap();
    let provider = sample_provider(&dir).await;

    let bert = provider.get_model("b").await.unwrap().unwrap();
    assert_eq!(bert.provider.as_deref(), Some("Google"));
    assert_eq!(
        bert.custom_properties.get("size"),
        Some(&MetadataValue::int(110_000_000))
    );

    let artifacts = provider.get_artifacts("b").await.unwrap().unwrap();
    assert_eq!(artifacts.total, 1);
    assert_eq!(artifacts.items[0].uri, "oci://registry/b:1");

    assert!(provider.get_model("missing").await.unwrap().is_none());
    assert!(provider.get_artifacts("missing").await.unwrap().is_none());
}

#[tokio::test]
async fn test_failed_reload_keeps_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "catalog.yaml",
        "source: Hub\nmodels:\n  - name: first\n",
    );
    let catalog = YamlCatalog::load(YamlCatalogConfig { path: path.clone() }).unwrap();

    std::fs::write(&path, "models:\n  - name: second\n    weights: 12\n").unwrap();
    let err = catalog.reload().await.unwrap_err();
    assert!(matches!(err, CatalogError::Load { .. }));

    assert!(catalog.get_model("first").await.unwrap().is_some());
    assert!(catalog.get_model("second").await.unwrap().is_none());
}

#[tokio::test]
async fn test_duplicate_names_keep_later_entry() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "catalog.yaml",
        "models:\n  - name: m\n    description: old\n  - name: m\n    description: new\n",
    );
    let catalog = YamlCatalog::load(YamlCatalogConfig { path }).unwrap();

    assert_eq!(catalog.model_count(), 1);
    let model = catalog.get_model("m").await.unwrap().unwrap();
    assert_eq!(model.description.as_deref(), Some("new"));
}

#[tokio::test]
async fn test_file_change_is_picked_up() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "live.yaml", "models:\n  - name: before\n");
    let source = CatalogSourceConfig::new("live", "Live", YAML_CATALOG_TYPE)
        .property("yamlCatalogPath", path.display().to_string());
    let provider = CatalogTypeRegistry::builtin()
        .unwrap()
        .create(&source)
        .unwrap();

    std::fs::write(&path, "models:\n  - name: after\n").unwrap();

    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        if provider.get_model("after").await.unwrap().is_some() {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "catalog was not reloaded after the file changed"
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(provider.get_model("before").await.unwrap().is_none());
}

#[tokio::test]
async fn test_watched_invalid_document_keeps_previous_document() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(
        dir.path(),
        "watched.yaml",
        "source: Hub\nmodels:\n  - name: first\n",
    );
    let source = CatalogSourceConfig::new("watched", "Watched", YAML_CATALOG_TYPE)
        .property("yamlCatalogPath", path.display().to_string());
    let provider = CatalogTypeRegistry::builtin()
        .unwrap()
        .create(&source)
        .unwrap();

    // Same event stream the catalog's reload task is fed from
    let mut changes = PathMonitor::global().unwrap().watch(&path).unwrap();

    std::fs::write(&path, "models:\n  - name: second\n    weights: 12\n").unwrap();
    tokio::time::timeout(Duration::from_secs(10), changes.changed())
        .await
        .expect("no change event for the invalid document")
        .expect("monitor stopped delivering");
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert!(provider.get_model("first").await.unwrap().is_some());
    assert!(provider.get_model("second").await.unwrap().is_none());
    let page = provider.list_models(&ListModelsParams::new()).await.unwrap();
    assert_eq!(names(&page), vec!["first"]);

    // The reload task survived the failure and still follows the file
    std::fs::write(&path, "models:\n  - name: third\n").unwrap();
    let deadline = tokio::time::Instant::now() + Duration::from_secs(10);
    loop {
        if provider.get_model("third").await.unwrap().is_some() {
            break;
        }
        assert!(
            tokio::time::Instant::now() < deadline,
            "catalog stopped reloading after an invalid document"
        );
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
    assert!(provider.get_model("first").await.unwrap().is_none());
}

fn failing_constructor(_: &CatalogSourceConfig) -> CatalogResult<Arc<dyn CatalogSourceProvider>> {
    Err(CatalogError::InvalidArgument("not used".to_string()))
}

#[test]
fn test_duplicate_type_registration_rejected() {
    let mut registry = CatalogTypeRegistry::builtin().unwrap();

    let err = registry
        .register(YAML_CATALOG_TYPE, failing_constructor)
        .unwrap_err();
    assert!(matches!(RegistryError::from(err), RegistryError::AlreadyRegistered(_)));
    assert_eq!(registry.type_names(), vec![YAML_CATALOG_TYPE]);
}

#[test]
fn test_sources_with_missing_catalog_file_fail() {
    let dir = tempfile::tempdir().unwrap();
    let sources = write_file(
        dir.path(),
        "sources.yaml",
        &sources_document("gone", &dir.path().join("absent.yaml")),
    );

    let err = load_catalog_sources(&sources, &CatalogTypeRegistry::builtin().unwrap()).unwrap_err();
    assert!(matches!(err, CatalogError::Load { .. }));
}
