//! Typed data-access layer for the Crylic backend's PostgreSQL schema.
//!
//! The crate has three pieces:
//!
//! - [`row`]: a schema-driven record abstraction. A [`row::Record`] is a
//!   mutable staging buffer for one table row, with positional (1-based)
//!   and named field access checked against a [`row::TableSchema`].
//! - [`registry`]: an immutable catalog of every table, function row shape
//!   and sequence in the `public` schema, built once and passed around by
//!   value rather than looked up globally.
//! - [`models`] and [`db`]: Diesel-backed typed models for the real tables
//!   plus deferred calls for the `pgp_armor_headers` and `viewer` SQL
//!   functions, behind a [`db::DbConnection`] trait.

pub mod db;
pub mod models;
pub mod registry;
pub mod row;

pub use db::{setup_db, DbConnection, DbError};
pub use registry::SchemaRegistry;
pub use row::{Record, RecordError, TableSchema, Value};
