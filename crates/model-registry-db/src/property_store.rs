//! Property store: typed values in a per-kind side table
//!
//! Rows are keyed by (owning entity id, property name, custom flag). The store
//! is a pure mapping; checking that the owning entity exists and has the
//! right Type is the repository's job.

use model_registry_core::{EntityId, EntityKind, Partition, Property, PropertySet, PropertyValue};
use sqlx::SqliteConnection;
use std::collections::HashSet;
use tracing::{debug, instrument};

use crate::error::{storage, DbError, DbResult};
use crate::schema::{layout, TableLayout};

/// Reads and reconciles the property rows of one entity kind
#[derive(Debug, Clone, Copy)]
pub struct PropertyStore {
    layout: &'static TableLayout,
}

#[derive(Debug, sqlx::FromRow)]
struct PropertyRow {
    name: String,
    is_custom_property: bool,
    int_value: Option<i64>,
    double_value: Option<f64>,
    string_value: Option<String>,
    bool_value: Option<bool>,
    byte_value: Option<Vec<u8>>,
}

/// Value columns of a property row; exactly one is populated
#[derive(Debug, Default, PartialEq)]
struct ValueColumns {
    int_value: Option<i64>,
    double_value: Option<f64>,
    string_value: Option<String>,
    bool_value: Option<bool>,
    byte_value: Option<Vec<u8>>,
}

impl ValueColumns {
    fn from_value(value: &PropertyValue) -> DbResult<Self> {
        let mut columns = ValueColumns::default();
        match value {
            PropertyValue::String(v) => columns.string_value = Some(v.clone()),
            PropertyValue::Int(v) => columns.int_value = Some(*v),
            PropertyValue::Double(v) if !v.is_finite() => {
                return Err(DbError::InvalidArgument(format!(
                    "double property must be finite, got {}",
                    v
                )));
            }
            PropertyValue::Double(v) => columns.double_value = Some(*v),
            PropertyValue::Bool(v) => columns.bool_value = Some(*v),
            PropertyValue::Struct(v) => {
                let bytes = serde_json::to_vec(v).map_err(|e| {
                    DbError::InvalidArgument(format!("unencodable struct property: {}", e))
                })?;
                columns.byte_value = Some(bytes);
            }
        }
        Ok(columns)
    }
}

impl PropertyRow {
    fn into_property(self) -> DbResult<(Partition, Property)> {
        let partition = Partition::from_flag(self.is_custom_property);
        let mut values = Vec::with_capacity(1);
        if let Some(v) = self.int_value {
            values.push(PropertyValue::Int(v));
        }
        if let Some(v) = self.double_value {
            values.push(PropertyValue::Double(v));
        }
        if let Some(v) = self.string_value {
            values.push(PropertyValue::String(v));
        }
        if let Some(v) = self.bool_value {
            values.push(PropertyValue::Bool(v));
        }
        if let Some(bytes) = self.byte_value {
            let value = serde_json::from_slice(&bytes).map_err(|e| {
                DbError::InvalidData(format!("property {:?} holds invalid JSON: {}", self.name, e))
            })?;
            values.push(PropertyValue::Struct(value));
        }

        if values.len() != 1 {
            return Err(DbError::InvalidData(format!(
                "property {:?} has {} populated value columns",
                self.name,
                values.len()
            )));
        }
        let value = values.remove(0);
        Ok((partition, Property { name: self.name, value }))
    }
}

impl PropertyStore {
    /// Property store for the side table of `kind`
    pub fn new(kind: EntityKind) -> Self {
        Self {
            layout: layout(kind),
        }
    }

    /// Make the stored rows of one partition exactly equal `properties`.
    ///
    /// Rows whose name is absent from `properties` are deleted; the rest are
    /// inserted or overwritten. If a name repeats, the later entry wins.
    #[instrument(skip(self, conn, properties), fields(table = self.layout.property_table, entity_id = %entity_id, partition = %partition))]
    pub async fn write(
        &self,
        conn: &mut SqliteConnection,
        entity_id: EntityId,
        properties: &[Property],
        partition: Partition,
    ) -> DbResult<()> {
        let layout = self.layout;
        let is_custom = partition.is_custom();

        let values = properties
            .iter()
            .map(|p| {
                ValueColumns::from_value(&p.value).map_err(|e| match e {
                    DbError::InvalidArgument(reason) => {
                        DbError::InvalidArgument(format!("property {:?}: {}", p.name, reason))
                    }
                    other => other,
                })
            })
            .collect::<DbResult<Vec<_>>>()?;

        let existing: Vec<String> = sqlx::query_scalar(&format!(
            "SELECT name FROM {} WHERE {} = ? AND is_custom_property = ?",
            layout.property_table, layout.property_owner_column
        ))
        .bind(entity_id.get())
        .bind(is_custom)
        .fetch_all(&mut *conn)
        .await
        .map_err(storage(format!("reading {} property names of {}", partition, entity_id)))?;

        let wanted: HashSet<&str> = properties.iter().map(|p| p.name.as_str()).collect();
        let stale: Vec<&String> = existing
            .iter()
            .filter(|name| !wanted.contains(name.as_str()))
            .collect();

        for name in &stale {
            sqlx::query(&format!(
                "DELETE FROM {} WHERE {} = ? AND name = ? AND is_custom_property = ?",
                layout.property_table, layout.property_owner_column
            ))
            .bind(entity_id.get())
            .bind(name.as_str())
            .bind(is_custom)
            .execute(&mut *conn)
            .await
            .map_err(storage(format!("deleting property {:?} of {}", name, entity_id)))?;
        }

        let upsert = format!(
            "INSERT INTO {table} ({owner}, name, is_custom_property, \
                 int_value, double_value, string_value, bool_value, byte_value) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?) \
             ON CONFLICT ({owner}, name, is_custom_property) DO UPDATE SET \
                 int_value = excluded.int_value, \
                 double_value = excluded.double_value, \
                 string_value = excluded.string_value, \
                 bool_value = excluded.bool_value, \
                 byte_value = excluded.byte_value",
            table = layout.property_table,
            owner = layout.property_owner_column,
        );

        for (property, columns) in properties.iter().zip(values) {
            sqlx::query(&upsert)
                .bind(entity_id.get())
                .bind(&property.name)
                .bind(is_custom)
                .bind(columns.int_value)
                .bind(columns.double_value)
                .bind(columns.string_value)
                .bind(columns.bool_value)
                .bind(columns.byte_value)
                .execute(&mut *conn)
                .await
                .map_err(storage(format!(
                    "writing property {:?} of {}",
                    property.name, entity_id
                )))?;
        }

        debug!(
            written = properties.len(),
            removed = stale.len(),
            "Reconciled property rows"
        );
        Ok(())
    }

    /// Read every property row of an entity, both partitions, sorted by name
    #[instrument(skip(self, conn), fields(table = self.layout.property_table, entity_id = %entity_id))]
    pub async fn read(
        &self,
        conn: &mut SqliteConnection,
        entity_id: EntityId,
    ) -> DbResult<PropertySet> {
        let layout = self.layout;
        let rows: Vec<PropertyRow> = sqlx::query_as(&format!(
            "SELECT name, is_custom_property, int_value, double_value, string_value, \
                 bool_value, byte_value \
             FROM {} WHERE {} = ? ORDER BY name",
            layout.property_table, layout.property_owner_column
        ))
        .bind(entity_id.get())
        .fetch_all(&mut *conn)
        .await
        .map_err(storage(format!("reading properties of {}", entity_id)))?;

        let mut set = PropertySet::default();
        for row in rows {
            let (partition, property) = row.into_property()?;
            set.push(partition, property);
        }
        Ok(set)
    }
}
