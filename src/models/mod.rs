pub mod flyway_schema_history;
pub mod functions;
pub mod integrations;
pub mod projects;
mod schema;
pub mod users;
