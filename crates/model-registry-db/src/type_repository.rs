//! Lookup of Type descriptors
//!
//! Types are seeded by migration and never change afterwards, so this is a
//! read-only view.

use model_registry_core::{EntityKind, EntityTypeId};
use sqlx::SqlitePool;
use tracing::{debug, instrument};

use crate::error::{storage, DbError, DbResult};
use crate::schema::layout;

/// A stored Type descriptor
#[derive(Debug, Clone, PartialEq, Eq, sqlx::FromRow)]
pub struct TypeRecord {
    pub id: i64,
    pub name: String,
    pub version: Option<String>,
    pub type_kind: i64,
    pub description: Option<String>,
}

impl TypeRecord {
    pub fn type_id(&self) -> EntityTypeId {
        EntityTypeId::new(self.id)
    }
}

/// Read access to the Type table
#[derive(Debug, Clone)]
pub struct TypeRepository {
    pool: SqlitePool,
}

impl TypeRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a Type by name
    #[instrument(skip(self))]
    pub async fn find_by_name(&self, name: &str) -> DbResult<TypeRecord> {
        debug!("Looking up type");

        sqlx::query_as::<_, TypeRecord>(
            "SELECT id, name, version, type_kind, description FROM \"Type\" WHERE name = ?",
        )
        .bind(name)
        .fetch_optional(&self.pool)
        .await
        .map_err(storage(format!("looking up type {:?}", name)))?
        .ok_or_else(|| DbError::NotFound(format!("type {:?}", name)))
    }

    /// Resolve the id of a Type and check that it describes `kind` entities
    pub async fn find_type_id(&self, name: &str, kind: EntityKind) -> DbResult<EntityTypeId> {
        let record = self.find_by_name(name).await?;
        if record.type_kind != layout(kind).type_kind {
            return Err(DbError::InvalidArgument(format!(
                "type {:?} is not a {} type",
                name, kind
            )));
        }
        Ok(record.type_id())
    }

    /// List every Type, ordered by id
    #[instrument(skip(self))]
    pub async fn list(&self) -> DbResult<Vec<TypeRecord>> {
        sqlx::query_as::<_, TypeRecord>(
            "SELECT id, name, version, type_kind, description FROM \"Type\" ORDER BY id",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(storage("listing types"))
    }
}
