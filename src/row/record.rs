use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::schema::TableSchema;
use super::value::{ColumnType, Value};

#[derive(Error, Debug, PartialEq)]
pub enum RecordError {
    #[error("wrong number of values for {table}: expected {expected}, got {supplied}")]
    ArityMismatch {
        table: &'static str,
        expected: usize,
        supplied: usize,
    },
    #[error("value for column {column} has type {supplied}, expected {expected}")]
    TypeMismatch {
        column: &'static str,
        expected: ColumnType,
        supplied: ColumnType,
    },
    #[error("unknown column {0}")]
    UnknownColumn(String),
    #[error("position {position} out of range for {table} ({columns} columns)")]
    PositionOutOfRange {
        table: &'static str,
        position: usize,
        columns: usize,
    },
}

/// A mutable, in-memory representation of one table row.
///
/// A record starts detached with every field unset, is populated through
/// the positional or named setters, and is then handed to whatever performs
/// the actual write-back. It carries no connection state and does no I/O.
///
/// Records are plain value holders: share one instance across threads only
/// behind external synchronisation. Distinct instances are independent.
#[derive(Clone, Debug, PartialEq)]
pub struct Record {
    schema: Arc<TableSchema>,
    fields: Vec<Option<Value>>,
}

impl Record {
    /// A detached record with all fields unset.
    pub fn new(schema: Arc<TableSchema>) -> Self {
        let fields = vec![None; schema.column_count()];
        Record { schema, fields }
    }

    /// A detached record populated with one value per declared column, in
    /// declared order. Arity and per-column types are checked up front.
    pub fn from_values(schema: Arc<TableSchema>, values: Vec<Value>) -> Result<Self, RecordError> {
        let mut record = Record::new(schema);
        record.set_values(values)?;
        Ok(record)
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    /// Field at a 1-based position. `Ok(None)` means the field is unset.
    pub fn get(&self, position: usize) -> Result<Option<&Value>, RecordError> {
        let index = self.index_of(position)?;
        Ok(self.fields[index].as_ref())
    }

    /// Field by declared column name.
    pub fn get_named(&self, name: &str) -> Result<Option<&Value>, RecordError> {
        let position = self
            .schema
            .position_of(name)
            .ok_or_else(|| RecordError::UnknownColumn(name.to_string()))?;
        self.get(position)
    }

    /// Set the field at a 1-based position. The value must match the
    /// column's declared type.
    pub fn set(&mut self, position: usize, value: impl Into<Value>) -> Result<&mut Self, RecordError> {
        let index = self.index_of(position)?;
        let value = value.into();
        let column = &self.schema.columns()[index];
        let (name, expected) = (column.name(), column.column_type());
        if value.column_type() != expected {
            return Err(RecordError::TypeMismatch {
                column: name,
                expected,
                supplied: value.column_type(),
            });
        }
        self.fields[index] = Some(value);
        Ok(self)
    }

    /// Set a field by declared column name.
    pub fn set_named(&mut self, name: &str, value: impl Into<Value>) -> Result<&mut Self, RecordError> {
        let position = self
            .schema
            .position_of(name)
            .ok_or_else(|| RecordError::UnknownColumn(name.to_string()))?;
        self.set(position, value)
    }

    /// Set every field in one call, in declared column order. Equivalent to
    /// calling [`Record::set`] for each position in sequence; no field is
    /// modified if any value is rejected.
    pub fn set_values(&mut self, values: Vec<Value>) -> Result<&mut Self, RecordError> {
        if values.len() != self.schema.column_count() {
            return Err(RecordError::ArityMismatch {
                table: self.schema.name(),
                expected: self.schema.column_count(),
                supplied: values.len(),
            });
        }
        for (column, value) in self.schema.columns().iter().zip(&values) {
            if value.column_type() != column.column_type() {
                return Err(RecordError::TypeMismatch {
                    column: column.name(),
                    expected: column.column_type(),
                    supplied: value.column_type(),
                });
            }
        }
        self.fields = values.into_iter().map(Some).collect();
        Ok(self)
    }

    /// The primary-key fields as a smaller positional tuple, in key order.
    /// Unset key fields come back as `None`.
    pub fn key(&self) -> Vec<Option<Value>> {
        self.schema
            .key_positions()
            .iter()
            .map(|&p| self.fields[p - 1].clone())
            .collect()
    }

    fn index_of(&self, position: usize) -> Result<usize, RecordError> {
        if position == 0 || position > self.schema.column_count() {
            return Err(RecordError::PositionOutOfRange {
                table: self.schema.name(),
                position,
                columns: self.schema.column_count(),
            });
        }
        Ok(position - 1)
    }
}

impl fmt::Display for Record {
    /// Deterministic debug rendering: `name (v1, v2, ..., vN)` in declared
    /// column order, unset fields shown as `null`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (", self.schema.name())?;
        for (i, field) in self.fields.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match field {
                Some(value) => write!(f, "{}", value)?,
                None => f.write_str("null")?,
            }
        }
        f.write_str(")")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::SchemaRegistry;
    use chrono::{NaiveDate, TimeZone, Utc};
    use uuid::Uuid;

    fn registry() -> SchemaRegistry {
        SchemaRegistry::public_schema()
    }

    #[test]
    fn set_then_get_round_trips_by_position_and_name() {
        let mut record = Record::new(registry().integration());
        record.set(1, 42).unwrap();
        record.set_named("token", "tok-abc").unwrap();

        assert_eq!(record.get_named("id").unwrap(), Some(&Value::Integer(42)));
        assert_eq!(record.get(1).unwrap(), Some(&Value::Integer(42)));
        assert_eq!(
            record.get(4).unwrap(),
            Some(&Value::Text("tok-abc".to_string()))
        );
    }

    #[test]
    fn setting_id_leaves_other_fields_untouched() {
        let mut record = Record::new(registry().integration());
        record.set_named("id", 42).unwrap();
        assert_eq!(record.get_named("id").unwrap(), Some(&Value::Integer(42)));
        for position in 2..=6 {
            assert_eq!(record.get(position).unwrap(), None);
        }
    }

    #[test]
    fn bulk_construction_matches_individual_reads() {
        let owner = Uuid::new_v4();
        let id = Uuid::new_v4();
        let values = vec![
            Value::from(id),
            Value::from(owner),
            Value::from("Demo"),
            Value::from("web"),
            Value::from(serde_json::json!({})),
        ];
        let record = Record::from_values(registry().project(), values.clone()).unwrap();
        for (i, expected) in values.iter().enumerate() {
            assert_eq!(record.get(i + 1).unwrap(), Some(expected));
        }
        assert_eq!(
            record.get_named("name").unwrap(),
            Some(&Value::Text("Demo".to_string()))
        );
        assert_eq!(record.key(), vec![Some(Value::Uuid(id))]);
    }

    #[test]
    fn round_trip_covers_every_semantic_type() {
        // flyway_schema_history carries integer, text, timestamp and bool
        // columns in one row.
        let installed_on = NaiveDate::from_ymd_opt(2020, 4, 1)
            .unwrap()
            .and_hms_opt(9, 30, 0)
            .unwrap();
        let values = vec![
            Value::from(1),
            Value::from("1.0"),
            Value::from("init"),
            Value::from("SQL"),
            Value::from("V1.0__init.sql"),
            Value::from(-2004210353),
            Value::from("crylic"),
            Value::from(installed_on),
            Value::from(57),
            Value::from(true),
        ];
        let record =
            Record::from_values(registry().flyway_schema_history(), values.clone()).unwrap();
        for (i, expected) in values.iter().enumerate() {
            assert_eq!(record.get(i + 1).unwrap(), Some(expected));
        }
        assert_eq!(
            record.get_named("success").unwrap(),
            Some(&Value::Bool(true))
        );
        assert_eq!(
            record.get_named("installed_on").unwrap(),
            Some(&Value::Timestamp(installed_on))
        );

        // Integration covers timestamptz.
        let created_at = Utc.with_ymd_and_hms(2020, 4, 1, 9, 30, 0).unwrap();
        let mut integration = Record::new(registry().integration());
        integration.set_named("created_at", created_at).unwrap();
        assert_eq!(
            integration.get(5).unwrap(),
            Some(&Value::TimestampTz(created_at))
        );
        assert_eq!(
            integration
                .set(5, "not-a-timestamp")
                .unwrap_err(),
            RecordError::TypeMismatch {
                column: "created_at",
                expected: ColumnType::TimestampTz,
                supplied: ColumnType::Text,
            }
        );
    }

    #[test]
    fn key_ignores_non_key_fields() {
        let mut record = Record::new(registry().integration());
        record.set_named("token", "tok").unwrap();
        assert_eq!(record.key(), vec![None]);
        record.set_named("id", 7).unwrap();
        assert_eq!(record.key(), vec![Some(Value::Integer(7))]);
    }

    #[test]
    fn wrong_arity_is_rejected() {
        let err = Record::from_values(
            registry().project(),
            vec![Value::from(Uuid::new_v4()), Value::from("Demo")],
        )
        .unwrap_err();
        assert_eq!(
            err,
            RecordError::ArityMismatch {
                table: "Project",
                expected: 5,
                supplied: 2,
            }
        );
    }

    #[test]
    fn wrong_type_is_rejected_and_nothing_is_set() {
        let mut record = Record::new(registry().integration());
        let err = record.set_named("id", "not-an-integer").unwrap_err();
        assert_eq!(
            err,
            RecordError::TypeMismatch {
                column: "id",
                expected: ColumnType::Integer,
                supplied: ColumnType::Text,
            }
        );
        assert_eq!(record.get(1).unwrap(), None);
    }

    #[test]
    fn unknown_column_and_position_are_rejected() {
        let mut record = Record::new(registry().user());
        assert_eq!(
            record.get_named("nope").unwrap_err(),
            RecordError::UnknownColumn("nope".to_string())
        );
        assert!(matches!(
            record.set(0, 1).unwrap_err(),
            RecordError::PositionOutOfRange { position: 0, .. }
        ));
        assert!(matches!(
            record.get(9).unwrap_err(),
            RecordError::PositionOutOfRange { position: 9, .. }
        ));
    }

    #[test]
    fn rendering_is_deterministic_and_ordered() {
        let id = Uuid::parse_str("a5b6c7d8-0000-0000-0000-000000000001").unwrap();
        let owner = Uuid::parse_str("a5b6c7d8-0000-0000-0000-000000000002").unwrap();
        let values = vec![
            Value::from(id),
            Value::from(owner),
            Value::from("Demo"),
            Value::from("web"),
            Value::from(serde_json::json!({})),
        ];
        let a = Record::from_values(registry().project(), values.clone()).unwrap();
        let b = Record::from_values(registry().project(), values).unwrap();
        assert_eq!(a.to_string(), b.to_string());
        assert_eq!(
            a.to_string(),
            "Project (a5b6c7d8-0000-0000-0000-000000000001, \
             a5b6c7d8-0000-0000-0000-000000000002, Demo, web, {})"
        );
    }

    #[test]
    fn unset_fields_render_as_null() {
        let mut record = Record::new(registry().integration());
        record.set_named("id", 1).unwrap();
        assert_eq!(
            record.to_string(),
            "Integration (1, null, null, null, null, null)"
        );
    }
}
