use crate::models::schema::integrations;
use chrono::{DateTime, Utc};
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum IntegrationError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
}

/// One external-service credential owned by a user. `id` is assigned by the
/// `integrations_id_seq` sequence on insert.
#[derive(Queryable, Identifiable, AsChangeset, Serialize, Deserialize, Clone, PartialEq)]
#[diesel(table_name = integrations)]
pub struct Integration {
    pub id: i32,
    pub user_id: Uuid,
    #[diesel(column_name = type_)]
    pub kind: String,
    pub token: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Integration {
    pub fn get_by_id(
        conn: &mut PgConnection,
        lookup_id: i32,
    ) -> Result<Option<Integration>, IntegrationError> {
        integrations::table
            .filter(integrations::id.eq(lookup_id))
            .first::<Integration>(conn)
            .optional()
            .map_err(IntegrationError::DatabaseError)
    }

    pub fn get_by_user(
        conn: &mut PgConnection,
        lookup_user_id: Uuid,
    ) -> Result<Option<Integration>, IntegrationError> {
        integrations::table
            .filter(integrations::user_id.eq(lookup_user_id))
            .first::<Integration>(conn)
            .optional()
            .map_err(IntegrationError::DatabaseError)
    }

    pub fn get_by_user_and_kind(
        conn: &mut PgConnection,
        lookup_user_id: Uuid,
        lookup_kind: &str,
    ) -> Result<Option<Integration>, IntegrationError> {
        integrations::table
            .filter(integrations::user_id.eq(lookup_user_id))
            .filter(integrations::type_.eq(lookup_kind))
            .first::<Integration>(conn)
            .optional()
            .map_err(IntegrationError::DatabaseError)
    }

    pub fn get_all_for_user(
        conn: &mut PgConnection,
        lookup_user_id: Uuid,
    ) -> Result<Vec<Integration>, IntegrationError> {
        integrations::table
            .filter(integrations::user_id.eq(lookup_user_id))
            .load::<Integration>(conn)
            .map_err(IntegrationError::DatabaseError)
    }

    pub fn update(&self, conn: &mut PgConnection) -> Result<(), IntegrationError> {
        diesel::update(integrations::table)
            .filter(integrations::id.eq(self.id))
            .set((
                integrations::type_.eq(&self.kind),
                integrations::token.eq(&self.token),
                integrations::updated_at.eq(diesel::dsl::now),
            ))
            .execute(conn)
            .map(|_| ())
            .map_err(IntegrationError::DatabaseError)
    }

    pub fn delete(&self, conn: &mut PgConnection) -> Result<(), IntegrationError> {
        diesel::delete(integrations::table)
            .filter(integrations::id.eq(self.id))
            .execute(conn)
            .map(|_| ())
            .map_err(IntegrationError::DatabaseError)
    }
}

// `Debug` is implemented by hand to keep the service token out of logs.
impl std::fmt::Debug for Integration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Integration")
            .field("id", &self.id)
            .field("user_id", &self.user_id)
            .field("kind", &self.kind)
            .field("token", &"[redacted]")
            .field("created_at", &self.created_at)
            .field("updated_at", &self.updated_at)
            .finish()
    }
}

/// Pre-insert row: the id and timestamps are filled in by the database.
#[derive(Insertable)]
#[diesel(table_name = integrations)]
pub struct NewIntegration {
    pub user_id: Uuid,
    #[diesel(column_name = type_)]
    pub kind: String,
    pub token: String,
}

impl NewIntegration {
    pub fn new(user_id: Uuid, kind: String, token: String) -> Self {
        NewIntegration {
            user_id,
            kind,
            token,
        }
    }

    pub fn insert(&self, conn: &mut PgConnection) -> Result<Integration, IntegrationError> {
        diesel::insert_into(integrations::table)
            .values(self)
            .get_result::<Integration>(conn)
            .map_err(IntegrationError::DatabaseError)
    }
}

impl std::fmt::Debug for NewIntegration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewIntegration")
            .field("user_id", &self.user_id)
            .field("kind", &self.kind)
            .field("token", &"[redacted]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_integration_never_carries_an_id() {
        let user_id = Uuid::new_v4();
        let new = NewIntegration::new(user_id, "github".to_string(), "tok".to_string());
        assert_eq!(new.user_id, user_id);
        assert_eq!(new.kind, "github");
        assert_eq!(new.token, "tok");
    }

    #[test]
    fn debug_redacts_the_token() {
        let new = NewIntegration::new(Uuid::nil(), "github".to_string(), "secret".to_string());
        let rendered = format!("{:?}", new);
        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("secret"));
    }
}
