//! Schema-driven row records.
//!
//! One generic [`Record`] replaces a per-table family of generated record
//! classes: the shape of a row lives in a [`TableSchema`] and every record
//! instance validates field access against it.

mod record;
mod schema;
mod value;

pub use record::{Record, RecordError};
pub use schema::{Column, SequenceDef, TableSchema};
pub use value::{ColumnType, Value};
