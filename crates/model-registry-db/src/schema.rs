//! Table layout for each entity storage kind
//!
//! Table and column names come from this closed set only; they are the one
//! part of the SQL that is formatted rather than bound.

use model_registry_core::EntityKind;

/// Tables and columns backing one entity kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableLayout {
    /// Entity table
    pub table: &'static str,
    /// Property side table
    pub property_table: &'static str,
    /// Column of the property table referencing the entity
    pub property_owner_column: &'static str,
    /// Column holding the URI, if the kind has one
    pub uri_column: Option<&'static str>,
    /// Column holding the lifecycle state, if the kind has one
    pub state_column: Option<&'static str>,
    /// Value stored in `Type.type_kind` for types of this kind
    pub type_kind: i64,
    /// Edge table linking an entity of this kind to a parent context
    pub parent_link: ParentLink,
}

/// Edge table and columns linking a child entity to its parent context
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParentLink {
    pub table: &'static str,
    pub child_column: &'static str,
    pub parent_column: &'static str,
}

const CONTEXT_LAYOUT: TableLayout = TableLayout {
    table: "Context",
    property_table: "ContextProperty",
    property_owner_column: "context_id",
    uri_column: None,
    state_column: None,
    type_kind: 2,
    parent_link: ParentLink {
        table: "ParentContext",
        child_column: "context_id",
        parent_column: "parent_context_id",
    },
};

const ARTIFACT_LAYOUT: TableLayout = TableLayout {
    table: "Artifact",
    property_table: "ArtifactProperty",
    property_owner_column: "artifact_id",
    uri_column: Some("uri"),
    state_column: Some("state"),
    type_kind: 1,
    parent_link: ParentLink {
        table: "Attribution",
        child_column: "artifact_id",
        parent_column: "context_id",
    },
};

const EXECUTION_LAYOUT: TableLayout = TableLayout {
    table: "Execution",
    property_table: "ExecutionProperty",
    property_owner_column: "execution_id",
    uri_column: None,
    state_column: Some("last_known_state"),
    type_kind: 0,
    parent_link: ParentLink {
        table: "Association",
        child_column: "execution_id",
        parent_column: "context_id",
    },
};

/// Layout of the tables backing `kind`
pub fn layout(kind: EntityKind) -> &'static TableLayout {
    match kind {
        EntityKind::Context => &CONTEXT_LAYOUT,
        EntityKind::Artifact => &ARTIFACT_LAYOUT,
        EntityKind::Execution => &EXECUTION_LAYOUT,
    }
}

impl TableLayout {
    /// Select list for the entity table aliased as `e`
    pub fn select_columns(&self) -> String {
        let mut columns = String::from(
            "e.id, e.type_id, e.name, e.external_id, \
             e.create_time_since_epoch, e.last_update_time_since_epoch",
        );
        if let Some(uri) = self.uri_column {
            columns.push_str(", e.");
            columns.push_str(uri);
        }
        if let Some(state) = self.state_column {
            columns.push_str(", e.");
            columns.push_str(state);
        }
        columns
    }
}
