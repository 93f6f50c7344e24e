use crate::models::schema::users;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum UserError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
}

#[derive(Queryable, Identifiable, AsChangeset, Serialize, Deserialize, Clone, PartialEq)]
#[diesel(table_name = users)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    password: String,
    pub first_name: String,
    pub last_name: String,
}

impl User {
    pub fn get_by_id(
        conn: &mut PgConnection,
        lookup_id: Uuid,
    ) -> Result<Option<User>, UserError> {
        users::table
            .filter(users::id.eq(lookup_id))
            .first::<User>(conn)
            .optional()
            .map_err(UserError::DatabaseError)
    }

    pub fn get_by_email(
        conn: &mut PgConnection,
        lookup_email: &str,
    ) -> Result<Option<User>, UserError> {
        users::table
            .filter(users::email.eq(lookup_email))
            .first::<User>(conn)
            .optional()
            .map_err(UserError::DatabaseError)
    }

    /// The stored password hash, for verification by the caller.
    pub fn password_hash(&self) -> &str {
        &self.password
    }

    pub fn update_password(
        &self,
        conn: &mut PgConnection,
        new_password: String,
    ) -> Result<(), UserError> {
        diesel::update(users::table)
            .filter(users::id.eq(self.id))
            .set(users::password.eq(new_password))
            .execute(conn)
            .map(|_| ())
            .map_err(UserError::DatabaseError)
    }

    pub fn update(&self, conn: &mut PgConnection) -> Result<(), UserError> {
        diesel::update(users::table)
            .filter(users::id.eq(self.id))
            .set((
                users::email.eq(&self.email),
                users::first_name.eq(&self.first_name),
                users::last_name.eq(&self.last_name),
            ))
            .execute(conn)
            .map(|_| ())
            .map_err(UserError::DatabaseError)
    }
}

// `Debug` is implemented by hand to avoid accidentally logging the
// password hash.
impl std::fmt::Debug for User {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser {
    pub email: String,
    pub password: String,
    pub first_name: String,
    pub last_name: String,
}

impl NewUser {
    /// `password` is expected to be hashed already; this layer stores it
    /// verbatim.
    pub fn new(email: String, password: String, first_name: String, last_name: String) -> Self {
        NewUser {
            email,
            password,
            first_name,
            last_name,
        }
    }

    pub fn insert(&self, conn: &mut PgConnection) -> Result<User, UserError> {
        diesel::insert_into(users::table)
            .values(self)
            .get_result::<User>(conn)
            .map_err(UserError::DatabaseError)
    }
}

impl std::fmt::Debug for NewUser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewUser")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .field("first_name", &self.first_name)
            .field("last_name", &self.last_name)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_redacts_the_password() {
        let new = NewUser::new(
            "a@example.com".to_string(),
            "bcrypt-hash".to_string(),
            "Ada".to_string(),
            "Lovelace".to_string(),
        );
        let rendered = format!("{:?}", new);
        assert!(rendered.contains("[redacted]"));
        assert!(!rendered.contains("bcrypt-hash"));
    }
}
