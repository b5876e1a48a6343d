//! SQLite implementation of the typed entity repository
//!
//! One generic implementation serves every domain type: the entity's storage
//! kind picks the tables, and its Type id scopes every statement.

use async_trait::async_trait;
use chrono::Utc;
use model_registry_core::{
    Entity, EntityId, EntityKind, EntityRecord, EntityTypeId, Page, Partition, TextQuery,
};
use sqlx::sqlite::SqliteRow;
use sqlx::{QueryBuilder, Row, Sqlite, SqliteConnection, SqlitePool};
use std::marker::PhantomData;
use tracing::{debug, instrument};

use crate::error::{storage, DbError, DbResult};
use crate::property_store::PropertyStore;
use crate::repository::{EntityRepository, ListOptions, OrderByField};
use crate::schema::{layout, TableLayout};
use crate::type_repository::TypeRepository;

/// SQLite-backed repository for one domain type
pub struct SqliteEntityRepository<E> {
    pool: SqlitePool,
    type_id: EntityTypeId,
    layout: &'static TableLayout,
    properties: PropertyStore,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for SqliteEntityRepository<E> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            type_id: self.type_id,
            layout: self.layout,
            properties: self.properties,
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> SqliteEntityRepository<E> {
    /// Create a repository for an already resolved Type id
    pub fn new(pool: SqlitePool, type_id: EntityTypeId) -> Self {
        Self {
            pool,
            type_id,
            layout: layout(E::KIND),
            properties: PropertyStore::new(E::KIND),
            _entity: PhantomData,
        }
    }

    /// Create a repository by resolving `E::TYPE_NAME` in the Type table
    pub async fn for_type(pool: SqlitePool) -> DbResult<Self> {
        let type_id = TypeRepository::new(pool.clone())
            .find_type_id(E::TYPE_NAME, E::KIND)
            .await?;
        debug!(type_name = E::TYPE_NAME, type_id = %type_id, "Resolved repository type");
        Ok(Self::new(pool, type_id))
    }

    /// Type id every statement is scoped to
    pub fn type_id(&self) -> EntityTypeId {
        self.type_id
    }

    /// Get a reference to the connection pool
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    fn record_from_row(&self, row: &SqliteRow) -> Result<EntityRecord, sqlx::Error> {
        let mut record = EntityRecord {
            id: Some(EntityId::new(row.try_get(0)?)),
            type_id: Some(EntityTypeId::new(row.try_get(1)?)),
            name: row.try_get(2)?,
            external_id: row.try_get(3)?,
            create_time_since_epoch: Some(row.try_get(4)?),
            last_update_time_since_epoch: Some(row.try_get(5)?),
            ..Default::default()
        };
        let mut next = 6;
        if self.layout.uri_column.is_some() {
            record.uri = row.try_get(next)?;
            next += 1;
        }
        if self.layout.state_column.is_some() {
            record.state = row.try_get(next)?;
        }
        Ok(record)
    }

    /// Load an entity row of this Type together with its properties
    async fn load(
        &self,
        conn: &mut SqliteConnection,
        id: EntityId,
    ) -> DbResult<Option<EntityRecord>> {
        let sql = format!(
            "SELECT {} FROM {} e WHERE e.id = ? AND e.type_id = ?",
            self.layout.select_columns(),
            self.layout.table
        );
        let row = sqlx::query(&sql)
            .bind(id.get())
            .bind(self.type_id.get())
            .fetch_optional(&mut *conn)
            .await
            .map_err(storage(format!("loading {} {}", E::TYPE_NAME, id)))?;

        let Some(row) = row else {
            return Ok(None);
        };
        let record = self
            .record_from_row(&row)
            .map_err(storage(format!("decoding {} {}", E::TYPE_NAME, id)))?;
        let properties = self.properties.read(conn, id).await?;
        Ok(Some(record.with_property_set(properties)))
    }

    async fn insert(&self, conn: &mut SqliteConnection, record: &EntityRecord) -> DbResult<EntityId> {
        let now = Utc::now().timestamp_millis();

        let mut columns = vec![
            "type_id",
            "name",
            "external_id",
            "create_time_since_epoch",
            "last_update_time_since_epoch",
        ];
        columns.extend(self.layout.uri_column);
        columns.extend(self.layout.state_column);
        let placeholders = vec!["?"; columns.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({}) RETURNING id",
            self.layout.table,
            columns.join(", "),
            placeholders
        );

        let mut query = sqlx::query_scalar::<_, i64>(&sql)
            .bind(self.type_id.get())
            .bind(&record.name)
            .bind(&record.external_id)
            .bind(now)
            .bind(now);
        if self.layout.uri_column.is_some() {
            query = query.bind(&record.uri);
        }
        if self.layout.state_column.is_some() {
            query = query.bind(&record.state);
        }

        let id = query
            .fetch_one(&mut *conn)
            .await
            .map_err(storage(format!("inserting {} {:?}", E::TYPE_NAME, record.name)))?;
        Ok(EntityId::new(id))
    }

    async fn update(
        &self,
        conn: &mut SqliteConnection,
        id: EntityId,
        record: &EntityRecord,
    ) -> DbResult<()> {
        let previous: Option<i64> = sqlx::query_scalar(&format!(
            "SELECT last_update_time_since_epoch FROM {} WHERE id = ? AND type_id = ?",
            self.layout.table
        ))
        .bind(id.get())
        .bind(self.type_id.get())
        .fetch_optional(&mut *conn)
        .await
        .map_err(storage(format!("checking {} {}", E::TYPE_NAME, id)))?;

        let Some(previous) = previous else {
            return Err(DbError::NotFound(format!("{} {}", E::TYPE_NAME, id)));
        };
        // Update time strictly advances even when two saves share a millisecond
        let updated_at = Utc::now().timestamp_millis().max(previous + 1);

        let mut assignments = vec![
            "name = ?".to_string(),
            "external_id = ?".to_string(),
            "last_update_time_since_epoch = ?".to_string(),
        ];
        assignments.extend(self.layout.uri_column.map(|c| format!("{} = ?", c)));
        assignments.extend(self.layout.state_column.map(|c| format!("{} = ?", c)));
        let sql = format!(
            "UPDATE {} SET {} WHERE id = ? AND type_id = ?",
            self.layout.table,
            assignments.join(", ")
        );

        let mut query = sqlx::query(&sql)
            .bind(&record.name)
            .bind(&record.external_id)
            .bind(updated_at);
        if self.layout.uri_column.is_some() {
            query = query.bind(&record.uri);
        }
        if self.layout.state_column.is_some() {
            query = query.bind(&record.state);
        }
        query
            .bind(id.get())
            .bind(self.type_id.get())
            .execute(&mut *conn)
            .await
            .map_err(storage(format!("updating {} {}", E::TYPE_NAME, id)))?;
        Ok(())
    }

    async fn link_parent(
        &self,
        conn: &mut SqliteConnection,
        id: EntityId,
        parent: EntityId,
    ) -> DbResult<()> {
        let link = self.layout.parent_link;
        if E::KIND == EntityKind::Context && id == parent {
            return Err(DbError::InvalidArgument(format!(
                "context {} cannot be its own parent",
                id
            )));
        }

        let parent_exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM Context WHERE id = ?")
            .bind(parent.get())
            .fetch_one(&mut *conn)
            .await
            .map_err(storage(format!("checking parent context {}", parent)))?;
        if parent_exists == 0 {
            return Err(DbError::NotFound(format!("parent context {}", parent)));
        }

        sqlx::query(&format!(
            "INSERT OR IGNORE INTO {} ({}, {}) VALUES (?, ?)",
            link.table, link.child_column, link.parent_column
        ))
        .bind(id.get())
        .bind(parent.get())
        .execute(&mut *conn)
        .await
        .map_err(storage(format!("linking {} {} to {}", E::TYPE_NAME, id, parent)))?;
        Ok(())
    }

    /// Append the FROM-side join and WHERE clause shared by page and count queries
    fn push_filters(&self, builder: &mut QueryBuilder<'_, Sqlite>, options: &ListOptions) {
        if let Some(parent) = options.parent_resource_id {
            let link = self.layout.parent_link;
            builder.push(format!(
                " JOIN {} p ON p.{} = e.id AND p.{} = ",
                link.table, link.child_column, link.parent_column
            ));
            builder.push_bind(parent.get());
        }

        builder.push(" WHERE e.type_id = ");
        builder.push_bind(self.type_id.get());

        if let Some(name) = &options.name {
            builder.push(" AND e.name = ");
            builder.push_bind(name.clone());
        }
        if let Some(external_id) = &options.external_id {
            builder.push(" AND e.external_id = ");
            builder.push_bind(external_id.clone());
        }
    }

    /// Append ORDER BY for the requested sort
    fn push_order(&self, builder: &mut QueryBuilder<'_, Sqlite>, options: &ListOptions) {
        let direction = options.sort_order.as_sql();
        match options.order_by {
            OrderByField::Id => {
                builder.push(format!(" ORDER BY e.id {}", direction));
            }
            field => {
                // Identity ascending breaks ties between equal sort keys
                builder.push(format!(
                    " ORDER BY e.{} {}, e.id ASC",
                    field.column(),
                    direction
                ));
            }
        }
    }

    /// Ids of every row passing the free-text query, in list order.
    ///
    /// SQLite's LOWER only folds ASCII, so the text match runs here with the
    /// same Unicode folding the catalog uses.
    async fn matching_ids(
        &self,
        conn: &mut SqliteConnection,
        options: &ListOptions,
        text: &TextQuery,
    ) -> DbResult<Vec<EntityId>> {
        let mut select = QueryBuilder::<Sqlite>::new(format!(
            "SELECT e.id, e.name, e.external_id FROM {} e",
            self.layout.table
        ));
        self.push_filters(&mut select, options);
        self.push_order(&mut select, options);

        let candidates: Vec<(i64, String, Option<String>)> = select
            .build_query_as()
            .fetch_all(&mut *conn)
            .await
            .map_err(storage(format!("searching {}", E::TYPE_NAME)))?;

        Ok(candidates
            .into_iter()
            .filter(|(_, name, external_id)| {
                text.matches_any([name.as_str(), external_id.as_deref().unwrap_or("")])
            })
            .map(|(id, _, _)| EntityId::new(id))
            .collect())
    }

    async fn list_matching(
        &self,
        conn: &mut SqliteConnection,
        options: &ListOptions,
        text: &TextQuery,
    ) -> DbResult<Page<E>> {
        let ids = self.matching_ids(conn, options, text).await?;
        let page = options.pagination.paginate(ids);

        let mut items = Vec::with_capacity(page.items.len());
        for id in page.items {
            let record = self
                .load(conn, id)
                .await?
                .ok_or_else(|| DbError::NotFound(format!("{} {}", E::TYPE_NAME, id)))?;
            items.push(E::from_record(record)?);
        }

        debug!(returned = items.len(), total = page.total, "Listed matching entities");
        Ok(Page::new(
            items,
            options.pagination.page_size,
            page.total,
            options.pagination.offset,
        ))
    }
}

#[async_trait]
impl<E: Entity> EntityRepository<E> for SqliteEntityRepository<E> {
    #[instrument(skip(self), fields(entity_type = E::TYPE_NAME, entity_id = %id))]
    async fn get_by_id(&self, id: EntityId) -> DbResult<E> {
        debug!("Finding entity by ID");

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(storage("acquiring connection"))?;
        let record = self
            .load(&mut conn, id)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("{} {}", E::TYPE_NAME, id)))?;
        Ok(E::from_record(record)?)
    }

    #[instrument(skip(self, entity), fields(entity_type = E::TYPE_NAME, entity_id = ?entity.id()))]
    async fn save_with_parent(&self, entity: E, parent: Option<EntityId>) -> DbResult<E> {
        let record = entity.into_record();
        if record.name.is_empty() {
            return Err(DbError::InvalidArgument(format!(
                "{} name cannot be empty",
                E::TYPE_NAME
            )));
        }
        if let Some(type_id) = record.type_id {
            if type_id != self.type_id {
                return Err(DbError::InvalidArgument(format!(
                    "entity has type id {}, repository serves {} ({})",
                    type_id,
                    E::TYPE_NAME,
                    self.type_id
                )));
            }
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(storage("beginning save transaction"))?;

        let id = match record.id {
            None => {
                debug!("Inserting entity");
                self.insert(&mut tx, &record).await?
            }
            Some(id) => {
                debug!("Updating entity");
                self.update(&mut tx, id, &record).await?;
                id
            }
        };

        self.properties
            .write(&mut tx, id, &record.properties, Partition::Standard)
            .await?;
        self.properties
            .write(&mut tx, id, &record.custom_properties, Partition::Custom)
            .await?;

        if let Some(parent) = parent {
            self.link_parent(&mut tx, id, parent).await?;
        }

        let stored = self
            .load(&mut tx, id)
            .await?
            .ok_or_else(|| DbError::NotFound(format!("{} {}", E::TYPE_NAME, id)))?;

        tx.commit()
            .await
            .map_err(storage(format!("committing {} {}", E::TYPE_NAME, id)))?;

        debug!(entity_id = %id, "Entity saved");
        Ok(E::from_record(stored)?)
    }

    #[instrument(skip(self, options), fields(entity_type = E::TYPE_NAME, order_by = %options.order_by))]
    async fn list(&self, options: &ListOptions) -> DbResult<Page<E>> {
        debug!("Listing entities");
        options.validate()?;

        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(storage("acquiring connection"))?;

        let text = TextQuery::new(options.query.as_deref());
        if text.needle().is_some() {
            return self.list_matching(&mut conn, options, &text).await;
        }

        let mut count = QueryBuilder::<Sqlite>::new(format!(
            "SELECT COUNT(*) FROM {} e",
            self.layout.table
        ));
        self.push_filters(&mut count, options);
        let total: i64 = count
            .build_query_scalar()
            .fetch_one(&mut *conn)
            .await
            .map_err(storage(format!("counting {}", E::TYPE_NAME)))?;

        let mut select = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM {} e",
            self.layout.select_columns(),
            self.layout.table
        ));
        self.push_filters(&mut select, options);
        self.push_order(&mut select, options);

        let limit = options
            .pagination
            .page_size
            .map(i64::from)
            .unwrap_or(-1);
        select.push(" LIMIT ");
        select.push_bind(limit);
        select.push(" OFFSET ");
        select.push_bind(i64::from(options.pagination.offset));

        let rows = select
            .build()
            .fetch_all(&mut *conn)
            .await
            .map_err(storage(format!("listing {}", E::TYPE_NAME)))?;

        let mut items = Vec::with_capacity(rows.len());
        for row in &rows {
            let record = self
                .record_from_row(row)
                .map_err(storage(format!("decoding {}", E::TYPE_NAME)))?;
            let id = record
                .id
                .ok_or_else(|| DbError::InvalidData("row without id".to_string()))?;
            let properties = self.properties.read(&mut conn, id).await?;
            items.push(E::from_record(record.with_property_set(properties))?);
        }

        debug!(returned = items.len(), total, "Listed entities");
        Ok(Page::new(
            items,
            options.pagination.page_size,
            u64::try_from(total).unwrap_or(0),
            options.pagination.offset,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{create_pool, PoolConfig};
    use model_registry_core::{
        ArtifactState, ModelArtifact, ModelVersion, Property, RegisteredModel, SortOrder,
    };

    async fn repositories() -> (
        SqliteEntityRepository<RegisteredModel>,
        SqliteEntityRepository<ModelVersion>,
        SqliteEntityRepository<ModelArtifact>,
    ) {
        let pool = create_pool(&PoolConfig::in_memory()).await.unwrap();
        (
            SqliteEntityRepository::for_type(pool.clone()).await.unwrap(),
            SqliteEntityRepository::for_type(pool.clone()).await.unwrap(),
            SqliteEntityRepository::for_type(pool).await.unwrap(),
        )
    }

    #[tokio::test]
    async fn test_insert_assigns_identity_and_times() {
        let (models, _, _) = repositories().await;

        let saved = models
            .save(RegisteredModel::new("fraud-detector").property("description", "v1"))
            .await
            .unwrap();

        assert!(saved.id.is_some());
        assert_eq!(saved.type_id, Some(models.type_id()));
        let created = saved.attributes.create_time_since_epoch.unwrap();
        assert!(created > 0);
        assert_eq!(saved.attributes.last_update_time_since_epoch, Some(created));
    }

    #[tokio::test]
    async fn test_update_keeps_create_time_and_advances_update_time() {
        let (models, _, _) = repositories().await;
        let saved = models.save(RegisteredModel::new("m")).await.unwrap();
        let created = saved.attributes.create_time_since_epoch;
        let first_update = saved.attributes.last_update_time_since_epoch.unwrap();

        let mut changed = saved.clone();
        changed.attributes.create_time_since_epoch = Some(1);
        changed.attributes.external_id = Some("ext".to_string());
        let updated = models.save(changed).await.unwrap();

        assert_eq!(updated.id, saved.id);
        assert_eq!(updated.attributes.create_time_since_epoch, created);
        assert!(updated.attributes.last_update_time_since_epoch.unwrap() > first_update);
        assert_eq!(updated.attributes.external_id.as_deref(), Some("ext"));
    }

    #[tokio::test]
    async fn test_update_of_unknown_id_is_not_found() {
        let (models, _, _) = repositories().await;
        let mut ghost = RegisteredModel::new("ghost");
        ghost.id = Some(EntityId::new(404));

        let err = models.save(ghost).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_repositories_are_type_scoped() {
        let (models, versions, _) = repositories().await;
        let model = models.save(RegisteredModel::new("shared")).await.unwrap();
        let id = model.id.unwrap();

        // Same storage kind, different Type
        assert!(versions.get_by_id(id).await.unwrap_err().is_not_found());
        assert_eq!(versions.list(&ListOptions::new()).await.unwrap().total, 0);

        let mut foreign = ModelVersion::new("v1");
        foreign.type_id = Some(models.type_id());
        let err = versions.save(foreign).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_empty_name_is_invalid() {
        let (models, _, _) = repositories().await;
        let err = models.save(RegisteredModel::new("")).await.unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)));
    }

    #[tokio::test]
    async fn test_artifact_attributes_round_trip() {
        let (_, _, artifacts) = repositories().await;
        let saved = artifacts
            .save(
                ModelArtifact::new("weights", "s3://bucket/model.onnx")
                    .state(ArtifactState::Live)
                    .property("model_format_name", "onnx"),
            )
            .await
            .unwrap();

        let loaded = artifacts.get_by_id(saved.id.unwrap()).await.unwrap();
        assert_eq!(loaded, saved);
        assert_eq!(loaded.attributes.uri.as_deref(), Some("s3://bucket/model.onnx"));
        assert_eq!(loaded.attributes.state, Some(ArtifactState::Live));
        assert_eq!(loaded.properties, vec![Property::new("model_format_name", "onnx")]);
    }

    #[tokio::test]
    async fn test_parent_filter() {
        let (models, versions, _) = repositories().await;
        let a = models.save(RegisteredModel::new("a")).await.unwrap().id.unwrap();
        let b = models.save(RegisteredModel::new("b")).await.unwrap().id.unwrap();

        versions.save_with_parent(ModelVersion::new("a-v1"), Some(a)).await.unwrap();
        versions.save_with_parent(ModelVersion::new("a-v2"), Some(a)).await.unwrap();
        versions.save_with_parent(ModelVersion::new("b-v1"), Some(b)).await.unwrap();

        let page = versions
            .list(&ListOptions::new().parent_resource_id(a))
            .await
            .unwrap();
        let names: Vec<_> = page.items.iter().map(|v| v.attributes.name.as_str()).collect();
        assert_eq!(names, vec!["a-v1", "a-v2"]);
        assert_eq!(page.total, 2);
    }

    #[tokio::test]
    async fn test_missing_parent_rolls_back_save() {
        let (_, versions, _) = repositories().await;
        let err = versions
            .save_with_parent(ModelVersion::new("orphan"), Some(EntityId::new(99)))
            .await
            .unwrap_err();
        assert!(err.is_not_found());
        assert_eq!(versions.list(&ListOptions::new()).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_time_sort_breaks_ties_by_id() {
        let (models, _, _) = repositories().await;
        let mut ids = Vec::new();
        for name in ["x", "y", "z"] {
            ids.push(models.save(RegisteredModel::new(name)).await.unwrap().id.unwrap());
        }
        // Force identical create times
        sqlx::query("UPDATE Context SET create_time_since_epoch = 5")
            .execute(models.pool())
            .await
            .unwrap();

        for order in [SortOrder::Ascending, SortOrder::Descending] {
            let page = models
                .list(&ListOptions::new().order_by(OrderByField::CreateTime).sort_order(order))
                .await
                .unwrap();
            let listed: Vec<_> = page.items.iter().map(|m| m.id.unwrap()).collect();
            assert_eq!(listed, ids);
        }
    }

    #[tokio::test]
    async fn test_query_filter_matches_name_or_external_id() {
        let (models, _, _) = repositories().await;
        models.save(RegisteredModel::new("Sentiment-BERT")).await.unwrap();
        models
            .save(RegisteredModel::new("other").external_id("hub/bert-large"))
            .await
            .unwrap();
        models.save(RegisteredModel::new("resnet")).await.unwrap();
        models.save(RegisteredModel::new("100%_sure")).await.unwrap();

        let page = models.list(&ListOptions::new().query("bert")).await.unwrap();
        assert_eq!(page.total, 2);

        let page = models.list(&ListOptions::new().query("0%_")).await.unwrap();
        assert_eq!(page.total, 1);
        let page = models.list(&ListOptions::new().query("_")).await.unwrap();
        assert_eq!(page.total, 1);
    }

    #[tokio::test]
    async fn test_query_folds_non_ascii_case() {
        let (models, _, _) = repositories().await;
        models.save(RegisteredModel::new("École-classifier")).await.unwrap();
        models
            .save(RegisteredModel::new("other").external_id("ÜBER-embeddings"))
            .await
            .unwrap();

        for query in ["école", "ÉCOLE", "École"] {
            let page = models.list(&ListOptions::new().query(query)).await.unwrap();
            assert_eq!(page.total, 1, "query {:?}", query);
            assert_eq!(page.items[0].attributes.name, "École-classifier");
        }

        let page = models.list(&ListOptions::new().query("über")).await.unwrap();
        assert_eq!(page.total, 1);
        assert_eq!(page.items[0].attributes.name, "other");
    }

    #[tokio::test]
    async fn test_query_results_are_sorted_and_paged() {
        let (models, _, _) = repositories().await;
        for name in ["bert-c", "resnet", "bert-a", "bert-b"] {
            models
                .save(RegisteredModel::new(name).property("family", "demo"))
                .await
                .unwrap();
        }

        let options = ListOptions::new()
            .query("BERT")
            .order_by(OrderByField::Name)
            .sort_order(SortOrder::Descending)
            .page_size(2);
        let first = models.list(&options).await.unwrap();
        let names: Vec<_> = first.items.iter().map(|m| m.attributes.name.as_str()).collect();
        assert_eq!(names, vec!["bert-c", "bert-b"]);
        assert_eq!(first.total, 3);
        assert!(first.has_more());
        assert_eq!(first.items[0].properties, vec![Property::new("family", "demo")]);

        let rest = models.list(&options.offset(2)).await.unwrap();
        assert_eq!(rest.items.len(), 1);
        assert_eq!(rest.items[0].attributes.name, "bert-a");
        assert_eq!(rest.total, 3);
    }

    #[tokio::test]
    async fn test_save_rejects_nan_property_without_writing() {
        let (models, _, _) = repositories().await;
        let err = models
            .save(RegisteredModel::new("scored").property("score", f64::NAN))
            .await
            .unwrap_err();
        assert!(matches!(err, DbError::InvalidArgument(_)), "{:?}", err);
        assert_eq!(models.list(&ListOptions::new()).await.unwrap().total, 0);
    }

    #[tokio::test]
    async fn test_pagination_past_end_keeps_total() {
        let (models, _, _) = repositories().await;
        for name in ["a", "b", "c"] {
            models.save(RegisteredModel::new(name)).await.unwrap();
        }

        let page = models
            .list(&ListOptions::new().page_size(2).offset(1))
            .await
            .unwrap();
        assert_eq!(page.size, 2);
        assert_eq!(page.total, 3);
        assert!(!page.has_more());

        let page = models
            .list(&ListOptions::new().page_size(2).offset(10))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total, 3);
    }
}
