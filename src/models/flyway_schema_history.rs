use crate::models::schema::flyway_schema_history;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlywaySchemaHistoryError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
}

/// Flyway's migration ledger. Read-only: the migration tool owns writes.
#[derive(Queryable, Identifiable, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = flyway_schema_history, primary_key(installed_rank))]
pub struct FlywaySchemaHistory {
    pub installed_rank: i32,
    pub version: Option<String>,
    pub description: String,
    #[diesel(column_name = type_)]
    pub kind: String,
    pub script: String,
    pub checksum: Option<i32>,
    pub installed_by: String,
    pub installed_on: NaiveDateTime,
    pub execution_time: i32,
    pub success: bool,
}

impl FlywaySchemaHistory {
    pub fn get_all(conn: &mut PgConnection) -> Result<Vec<FlywaySchemaHistory>, FlywaySchemaHistoryError> {
        flyway_schema_history::table
            .order(flyway_schema_history::installed_rank.asc())
            .load::<FlywaySchemaHistory>(conn)
            .map_err(FlywaySchemaHistoryError::DatabaseError)
    }

    pub fn get_latest(
        conn: &mut PgConnection,
    ) -> Result<Option<FlywaySchemaHistory>, FlywaySchemaHistoryError> {
        flyway_schema_history::table
            .order(flyway_schema_history::installed_rank.desc())
            .first::<FlywaySchemaHistory>(conn)
            .optional()
            .map_err(FlywaySchemaHistoryError::DatabaseError)
    }
}
