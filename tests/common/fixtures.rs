//! Test fixtures
//!
//! Domain entities and catalog documents shared by integration tests.

use model_registry_core::{ArtifactState, ModelArtifact, ModelVersion, RegisteredModel};

/// A registered model with one standard and one custom property
pub fn registered_model(name: &str) -> RegisteredModel {
    RegisteredModel::new(name)
        .external_id(format!("ext-{}", name))
        .property("description", format!("{} model", name))
        .custom_property("owner", "ml-platform")
}

/// A model version tagged with its version string
pub fn model_version(name: &str, version: &str) -> ModelVersion {
    ModelVersion::new(name).property("version", version)
}

/// A live model artifact stored under a test bucket
pub fn model_artifact(name: &str) -> ModelArtifact {
    ModelArtifact::new(name, format!("s3://models/{}", name)).state(ArtifactState::Live)
}

/// Catalog document with three models whose names and times sort differently
pub const SAMPLE_CATALOG: &str = r#"
source: Sample Hub
models:
  - name: b
    description: BERT base
    provider: Google
    tasks: [nlp, fill-mask]
    createTimeSinceEpoch: "2000"
    lastUpdateTimeSinceEpoch: "3000"
    customProperties:
      size:
        metadataType: MetadataIntValue
        int_value: "110000000"
    artifacts:
      - uri: oci://registry/b:1
  - name: a
    description: Image classifier
    provider: Acme
    tasks: [vision]
    createTimeSinceEpoch: "1000"
    lastUpdateTimeSinceEpoch: "1000"
  - name: c
    description: Sentiment model
    provider: Acme
    tasks: [nlp-classification]
    createTimeSinceEpoch: "3000"
    lastUpdateTimeSinceEpoch: "2000"
"#;

/// Sources file listing one yaml catalog at `catalog_path`
pub fn sources_document(id: &str, catalog_path: &std::path::Path) -> String {
    format!(
        "catalogs:\n  - name: {id} catalog\n    id: {id}\n    type: yaml\n    properties:\n      yamlCatalogPath: {path}\n",
        id = id,
        path = catalog_path.display()
    )
}
