//! Repository trait abstractions for typed entity persistence
//!
//! This module defines the EntityRepository trait that abstracts database
//! operations for one domain type, allowing for different implementations
//! (SQLite, in-memory, etc.).

use async_trait::async_trait;
use model_registry_core::{Entity, EntityId, Page, Pagination, SortOrder};
use std::fmt;
use std::str::FromStr;

use crate::error::{DbError, DbResult};

/// List parameters for a typed entity repository
#[derive(Debug, Clone, Default)]
pub struct ListOptions {
    /// Exact name filter
    pub name: Option<String>,

    /// Exact external id filter
    pub external_id: Option<String>,

    /// Case-insensitive substring filter over name and external id
    pub query: Option<String>,

    /// Only entities linked to this parent context
    pub parent_resource_id: Option<EntityId>,

    /// Sort field
    pub order_by: OrderByField,

    /// Sort order
    pub sort_order: SortOrder,

    /// Page size and offset
    pub pagination: Pagination,
}

impl ListOptions {
    /// Options matching every entity, ordered by id ascending
    pub fn new() -> Self {
        Self::default()
    }

    /// Set exact name filter
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set exact external id filter
    pub fn external_id(mut self, external_id: impl Into<String>) -> Self {
        self.external_id = Some(external_id.into());
        self
    }

    /// Set free-text filter
    pub fn query(mut self, query: impl Into<String>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Restrict to children of a context
    pub fn parent_resource_id(mut self, parent: EntityId) -> Self {
        self.parent_resource_id = Some(parent);
        self
    }

    /// Set sort field
    pub fn order_by(mut self, field: OrderByField) -> Self {
        self.order_by = field;
        self
    }

    /// Set sort order
    pub fn sort_order(mut self, order: SortOrder) -> Self {
        self.sort_order = order;
        self
    }

    /// Set page size
    pub fn page_size(mut self, page_size: u32) -> Self {
        self.pagination.page_size = Some(page_size);
        self
    }

    /// Set offset into the matching rows
    pub fn offset(mut self, offset: u32) -> Self {
        self.pagination.offset = offset;
        self
    }

    /// Reject malformed pagination
    pub fn validate(&self) -> DbResult<()> {
        self.pagination.validate()?;
        Ok(())
    }
}

/// Fields that can be used for sorting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderByField {
    /// Sort by identity
    #[default]
    Id,
    /// Sort by name
    Name,
    /// Sort by creation timestamp
    CreateTime,
    /// Sort by last update timestamp
    LastUpdateTime,
}

impl OrderByField {
    /// Column of the entity table holding this field
    pub fn column(&self) -> &'static str {
        match self {
            OrderByField::Id => "id",
            OrderByField::Name => "name",
            OrderByField::CreateTime => "create_time_since_epoch",
            OrderByField::LastUpdateTime => "last_update_time_since_epoch",
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderByField::Id => "ID",
            OrderByField::Name => "NAME",
            OrderByField::CreateTime => "CREATE_TIME",
            OrderByField::LastUpdateTime => "LAST_UPDATE_TIME",
        }
    }
}

impl fmt::Display for OrderByField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderByField {
    type Err = DbError;

    fn from_str(s: &str) -> DbResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ID" => Ok(OrderByField::Id),
            "NAME" => Ok(OrderByField::Name),
            "CREATE_TIME" => Ok(OrderByField::CreateTime),
            "LAST_UPDATE_TIME" => Ok(OrderByField::LastUpdateTime),
            _ => Err(DbError::InvalidArgument(format!(
                "Invalid order by field: {}",
                s
            ))),
        }
    }
}

/// Repository trait for one domain type
///
/// Implementations are scoped to a single Type: they only read and write
/// rows whose Type id matches their own. Implementations must be thread-safe
/// (Send + Sync) for use in async contexts.
#[async_trait]
pub trait EntityRepository<E: Entity>: Send + Sync {
    /// Find an entity by id
    ///
    /// # Returns
    /// * `Ok(E)` - The entity with both property collections loaded
    /// * `Err(DbError::NotFound)` - If no entity of this Type has that id
    /// * `Err(DbError)` - For other database errors
    async fn get_by_id(&self, id: EntityId) -> DbResult<E>;

    /// Insert or update an entity
    ///
    /// An entity without an id is inserted. An entity with an id updates the
    /// stored row, replacing both property collections with exactly the ones
    /// given.
    ///
    /// # Returns
    /// * `Ok(E)` - The entity as stored, with id and timestamps assigned
    /// * `Err(DbError::NotFound)` - If the id does not exist for this Type
    /// * `Err(DbError::InvalidArgument)` - If the entity is malformed
    async fn save(&self, entity: E) -> DbResult<E> {
        self.save_with_parent(entity, None).await
    }

    /// Save an entity and link it to a parent context in one transaction
    ///
    /// # Returns
    /// * `Err(DbError::NotFound)` - If the parent context does not exist
    async fn save_with_parent(&self, entity: E, parent: Option<EntityId>) -> DbResult<E>;

    /// List entities of this Type
    ///
    /// # Arguments
    /// * `options` - Filters, sort field, direction and pagination
    ///
    /// # Returns
    /// * A page of matching entities plus the total match count
    async fn list(&self, options: &ListOptions) -> DbResult<Page<E>>;
}
