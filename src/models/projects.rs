use crate::models::schema::projects;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum ProjectError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
}

/// A project owned by exactly one user. `metadata` is opaque structured
/// data whose shape depends on the project type (e.g. the GitHub URL for
/// `type = "github"`).
#[derive(Queryable, Identifiable, AsChangeset, Serialize, Deserialize, Clone, Debug, PartialEq)]
#[diesel(table_name = projects)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub name: String,
    #[diesel(column_name = type_)]
    pub kind: String,
    pub metadata: serde_json::Value,
}

impl Project {
    pub fn get_by_id(
        conn: &mut PgConnection,
        lookup_id: Uuid,
    ) -> Result<Option<Project>, ProjectError> {
        projects::table
            .filter(projects::id.eq(lookup_id))
            .first::<Project>(conn)
            .optional()
            .map_err(ProjectError::DatabaseError)
    }

    pub fn get_by_name_and_owner(
        conn: &mut PgConnection,
        lookup_name: &str,
        lookup_owner_id: Uuid,
    ) -> Result<Option<Project>, ProjectError> {
        projects::table
            .filter(projects::name.eq(lookup_name))
            .filter(projects::owner_id.eq(lookup_owner_id))
            .first::<Project>(conn)
            .optional()
            .map_err(ProjectError::DatabaseError)
    }

    pub fn get_all_for_owner(
        conn: &mut PgConnection,
        lookup_owner_id: Uuid,
    ) -> Result<Vec<Project>, ProjectError> {
        projects::table
            .filter(projects::owner_id.eq(lookup_owner_id))
            .load::<Project>(conn)
            .map_err(ProjectError::DatabaseError)
    }

    pub fn update(&self, conn: &mut PgConnection) -> Result<(), ProjectError> {
        diesel::update(projects::table)
            .filter(projects::id.eq(self.id))
            .set((
                projects::name.eq(&self.name),
                projects::type_.eq(&self.kind),
                projects::metadata.eq(&self.metadata),
            ))
            .execute(conn)
            .map(|_| ())
            .map_err(ProjectError::DatabaseError)
    }

    pub fn delete(&self, conn: &mut PgConnection) -> Result<(), ProjectError> {
        diesel::delete(projects::table)
            .filter(projects::id.eq(self.id))
            .execute(conn)
            .map(|_| ())
            .map_err(ProjectError::DatabaseError)
    }
}

/// Pre-insert row: the id defaults server-side.
#[derive(Insertable, Debug)]
#[diesel(table_name = projects)]
pub struct NewProject {
    pub owner_id: Uuid,
    pub name: String,
    #[diesel(column_name = type_)]
    pub kind: String,
    pub metadata: serde_json::Value,
}

impl NewProject {
    pub fn new(owner_id: Uuid, name: String, kind: String) -> Self {
        NewProject {
            owner_id,
            name,
            kind,
            metadata: serde_json::json!({}),
        }
    }

    /// Convenience for the GitHub-import path: records the source URL in
    /// the project metadata.
    pub fn github(owner_id: Uuid, name: String, github_url: String) -> Self {
        NewProject {
            owner_id,
            name,
            kind: "github".to_string(),
            metadata: serde_json::json!({ "url": github_url }),
        }
    }

    pub fn with_metadata(mut self, metadata: serde_json::Value) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn insert(&self, conn: &mut PgConnection) -> Result<Project, ProjectError> {
        diesel::insert_into(projects::table)
            .values(self)
            .get_result::<Project>(conn)
            .map_err(ProjectError::DatabaseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn github_projects_record_their_source_url() {
        let owner = Uuid::new_v4();
        let new = NewProject::github(
            owner,
            "demo".to_string(),
            "https://github.com/acme/demo".to_string(),
        );
        assert_eq!(new.kind, "github");
        assert_eq!(
            new.metadata,
            serde_json::json!({ "url": "https://github.com/acme/demo" })
        );
    }

    #[test]
    fn metadata_defaults_to_an_empty_object() {
        let new = NewProject::new(Uuid::new_v4(), "demo".to_string(), "web".to_string());
        assert_eq!(new.metadata, serde_json::json!({}));
    }

    #[test]
    fn with_metadata_overrides_the_default() {
        let metadata = serde_json::json!({ "template": "react" });
        let new = NewProject::new(Uuid::new_v4(), "demo".to_string(), "web".to_string())
            .with_metadata(metadata.clone());
        assert_eq!(new.metadata, metadata);
    }
}
