//! The capability every catalog source implements

use async_trait::async_trait;
use model_registry_core::{Page, Pagination, SortOrder};
use std::fmt;

use crate::error::CatalogResult;
use crate::model::{CatalogModel, CatalogModelArtifact};

/// Sort field for catalog listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CatalogOrderBy {
    /// Sort by model name
    #[default]
    Name,
    /// Sort by creation time
    CreateTime,
    /// Sort by last update time
    LastUpdateTime,
}

impl CatalogOrderBy {
    /// Parse a sort field; unknown or empty values fall back to name
    pub fn parse_lenient(value: &str) -> Self {
        match value.to_ascii_uppercase().as_str() {
            "CREATE_TIME" => CatalogOrderBy::CreateTime,
            "LAST_UPDATE_TIME" => CatalogOrderBy::LastUpdateTime,
            _ => CatalogOrderBy::Name,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CatalogOrderBy::Name => "NAME",
            CatalogOrderBy::CreateTime => "CREATE_TIME",
            CatalogOrderBy::LastUpdateTime => "LAST_UPDATE_TIME",
        }
    }
}

impl fmt::Display for CatalogOrderBy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parameters of a catalog model listing
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ListModelsParams {
    /// Case-insensitive substring matched against name, description,
    /// provider, library name and tasks
    pub query: Option<String>,

    /// Sort field
    pub order_by: CatalogOrderBy,

    /// Sort order
    pub sort_order: SortOrder,

    /// Page size and offset
    pub pagination: Pagination,
}

impl ListModelsParams {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set free-text filter
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Set sort field
    pub fn order_by(mut self, order_by: CatalogOrderBy) -> Self {
        self.order_by = order_by;
        self
    }

    /// Set sort order
    pub fn sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    /// Set page size
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.pagination.page_size = Some(page_size);
        self
    }

    /// Set offset into the matching models
    pub fn offset(mut self, offset: u32) -> Self {
        self.pagination.offset = offset;
        self
    }
}

/// A read-only source of catalog models
///
/// Implementations must be thread-safe (Send + Sync); reads may run
/// concurrently with each other and with a background reload.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CatalogSourceProvider: Send + Sync {
    /// Get a model by name
    ///
    /// # Returns
    /// * `Ok(None)` - If the source has no model with that name
    async fn get_model(&self, name: &str) -> CatalogResult<Option<CatalogModel>>;

    /// List models matching `params`, filtered, sorted and paginated
    async fn list_models(&self, params: &ListModelsParams) -> CatalogResult<Page<CatalogModel>>;

    /// Get the artifacts of a model
    ///
    /// # Returns
    /// * `Ok(None)` - If the source has no model with that name
    async fn get_artifacts(
        &self,
        name: &str,
    ) -> CatalogResult<Option<Page<CatalogModelArtifact>>>;
}
