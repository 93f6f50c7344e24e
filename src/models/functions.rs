//! Deferred calls to the table-valued SQL functions.
//!
//! Building a call holds the arguments only; nothing touches the database
//! until `load` runs it against a connection and fetches the rows.

use diesel::prelude::*;
use diesel::sql_types::{Jsonb, Text, Uuid as SqlUuid};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum FunctionError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
}

/// One key/value header from a PGP armored block, as returned by
/// `pgp_armor_headers(text)`.
#[derive(QueryableByName, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct PgpArmorHeader {
    #[diesel(sql_type = Text)]
    pub key: String,
    #[diesel(sql_type = Text)]
    pub value: String,
}

/// Deferred `pgp_armor_headers(text)` invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct PgpArmorHeadersCall {
    armored: String,
}

impl PgpArmorHeadersCall {
    pub fn new(armored: impl Into<String>) -> Self {
        PgpArmorHeadersCall {
            armored: armored.into(),
        }
    }

    pub fn armored(&self) -> &str {
        &self.armored
    }

    /// Run the call, yielding zero or more header rows.
    pub fn load(&self, conn: &mut PgConnection) -> Result<Vec<PgpArmorHeader>, FunctionError> {
        diesel::sql_query("SELECT key, value FROM pgp_armor_headers($1)")
            .bind::<Text, _>(self.armored.clone())
            .load::<PgpArmorHeader>(conn)
            .map_err(FunctionError::DatabaseError)
    }
}

/// The current viewer as derived by the `viewer(hasura_session jsonb)`
/// function from a Hasura session blob.
#[derive(QueryableByName, Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct Viewer {
    #[diesel(sql_type = SqlUuid)]
    pub id: Uuid,
    #[diesel(sql_type = Text)]
    pub email: String,
    #[diesel(sql_type = Text)]
    pub first_name: String,
    #[diesel(sql_type = Text)]
    pub last_name: String,
}

/// Deferred `viewer(hasura_session jsonb)` invocation.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewerCall {
    hasura_session: serde_json::Value,
}

impl ViewerCall {
    pub fn new(hasura_session: serde_json::Value) -> Self {
        ViewerCall { hasura_session }
    }

    pub fn hasura_session(&self) -> &serde_json::Value {
        &self.hasura_session
    }

    /// Run the call. An unresolvable session yields no rows.
    pub fn load(&self, conn: &mut PgConnection) -> Result<Vec<Viewer>, FunctionError> {
        diesel::sql_query(
            "SELECT id, email, first_name, last_name FROM viewer($1)",
        )
        .bind::<Jsonb, _>(self.hasura_session.clone())
        .load::<Viewer>(conn)
        .map_err(FunctionError::DatabaseError)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn building_a_call_keeps_its_arguments() {
        let call = PgpArmorHeadersCall::new("-----BEGIN PGP MESSAGE-----");
        assert_eq!(call.armored(), "-----BEGIN PGP MESSAGE-----");

        let session = serde_json::json!({ "x-hasura-user-id": "u-1" });
        let call = ViewerCall::new(session.clone());
        assert_eq!(call.hasura_session(), &session);
    }
}
