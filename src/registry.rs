//! Immutable catalog of the `public` schema.
//!
//! Built once (normally at startup) and handed to whatever needs to
//! enumerate or introspect the schema; there is no global instance and
//! nothing mutates a registry after construction, so sharing one behind an
//! `Arc` across threads is safe.

use std::sync::Arc;

use crate::row::{Column, ColumnType, SequenceDef, TableSchema};

/// Sequence backing `Integration.id`.
pub const INTEGRATIONS_ID_SEQ: &str = "integrations_id_seq";

/// Every table, function row shape and sequence in the `public` schema.
#[derive(Clone, Debug)]
pub struct SchemaRegistry {
    tables: Vec<Arc<TableSchema>>,
    sequences: Vec<SequenceDef>,
}

impl SchemaRegistry {
    /// Catalog of the `public` schema as migrated by Flyway.
    pub fn public_schema() -> Self {
        let tables = vec![
            Arc::new(flyway_schema_history()),
            Arc::new(integration()),
            Arc::new(pgp_armor_headers()),
            Arc::new(project()),
            Arc::new(user()),
            Arc::new(viewer()),
        ];
        let sequences = vec![SequenceDef::new(INTEGRATIONS_ID_SEQ)];
        SchemaRegistry { tables, sequences }
    }

    /// All table and function row shapes, in catalog order.
    pub fn tables(&self) -> &[Arc<TableSchema>] {
        &self.tables
    }

    /// All sequences, in catalog order.
    pub fn sequences(&self) -> &[SequenceDef] {
        &self.sequences
    }

    /// Look up a table by its declared name.
    pub fn table(&self, name: &str) -> Option<Arc<TableSchema>> {
        self.tables.iter().find(|t| t.name() == name).cloned()
    }

    pub fn flyway_schema_history(&self) -> Arc<TableSchema> {
        self.tables[0].clone()
    }

    pub fn integration(&self) -> Arc<TableSchema> {
        self.tables[1].clone()
    }

    pub fn pgp_armor_headers(&self) -> Arc<TableSchema> {
        self.tables[2].clone()
    }

    pub fn project(&self) -> Arc<TableSchema> {
        self.tables[3].clone()
    }

    pub fn user(&self) -> Arc<TableSchema> {
        self.tables[4].clone()
    }

    pub fn viewer(&self) -> Arc<TableSchema> {
        self.tables[5].clone()
    }
}

fn integration() -> TableSchema {
    TableSchema::new(
        "Integration",
        vec![
            Column::new("id", ColumnType::Integer),
            Column::new("user_id", ColumnType::Uuid),
            Column::new("type", ColumnType::Text),
            Column::new("token", ColumnType::Text),
            Column::new("created_at", ColumnType::TimestampTz),
            Column::new("updated_at", ColumnType::TimestampTz),
        ],
        vec![1],
    )
}

fn project() -> TableSchema {
    TableSchema::new(
        "Project",
        vec![
            Column::new("id", ColumnType::Uuid),
            Column::new("owner_id", ColumnType::Uuid),
            Column::new("name", ColumnType::Text),
            Column::new("type", ColumnType::Text),
            Column::new("metadata", ColumnType::Json),
        ],
        vec![1],
    )
}

fn user() -> TableSchema {
    TableSchema::new(
        "User",
        vec![
            Column::new("id", ColumnType::Uuid),
            Column::new("email", ColumnType::Text),
            Column::new("password", ColumnType::Text),
            Column::new("first_name", ColumnType::Text),
            Column::new("last_name", ColumnType::Text),
        ],
        vec![1],
    )
}

// Row shape of the viewer(hasura_session jsonb) function; no stored table,
// so no primary key.
fn viewer() -> TableSchema {
    TableSchema::new(
        "viewer",
        vec![
            Column::new("id", ColumnType::Uuid),
            Column::new("email", ColumnType::Text),
            Column::new("first_name", ColumnType::Text),
            Column::new("last_name", ColumnType::Text),
        ],
        vec![],
    )
}

// Row shape of the pgp_armor_headers(text) function.
fn pgp_armor_headers() -> TableSchema {
    TableSchema::new(
        "pgp_armor_headers",
        vec![
            Column::new("key", ColumnType::Text),
            Column::new("value", ColumnType::Text),
        ],
        vec![],
    )
}

fn flyway_schema_history() -> TableSchema {
    TableSchema::new(
        "flyway_schema_history",
        vec![
            Column::new("installed_rank", ColumnType::Integer),
            Column::new("version", ColumnType::Text),
            Column::new("description", ColumnType::Text),
            Column::new("type", ColumnType::Text),
            Column::new("script", ColumnType::Text),
            Column::new("checksum", ColumnType::Integer),
            Column::new("installed_by", ColumnType::Text),
            Column::new("installed_on", ColumnType::Timestamp),
            Column::new("execution_time", ColumnType::Integer),
            Column::new("success", ColumnType::Bool),
        ],
        vec![1],
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catalog_lists_every_table_and_sequence() {
        let registry = SchemaRegistry::public_schema();
        let names: Vec<&str> = registry.tables().iter().map(|t| t.name()).collect();
        assert_eq!(
            names,
            vec![
                "flyway_schema_history",
                "Integration",
                "pgp_armor_headers",
                "Project",
                "User",
                "viewer",
            ]
        );
        let sequences: Vec<&str> = registry.sequences().iter().map(|s| s.name()).collect();
        assert_eq!(sequences, vec![INTEGRATIONS_ID_SEQ]);
    }

    #[test]
    fn named_accessors_agree_with_lookup() {
        let registry = SchemaRegistry::public_schema();
        assert_eq!(registry.table("Project"), Some(registry.project()));
        assert_eq!(registry.table("viewer"), Some(registry.viewer()));
        assert_eq!(registry.table("nope"), None);
    }

    #[test]
    fn updatable_tables_declare_their_key() {
        let registry = SchemaRegistry::public_schema();
        assert_eq!(registry.integration().key_positions(), &[1]);
        assert_eq!(registry.project().key_positions(), &[1]);
        assert_eq!(registry.user().key_positions(), &[1]);
        assert!(registry.viewer().key_positions().is_empty());
        assert!(registry.pgp_armor_headers().key_positions().is_empty());
    }
}
