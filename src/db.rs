use crate::models::flyway_schema_history::{FlywaySchemaHistory, FlywaySchemaHistoryError};
use crate::models::functions::{
    FunctionError, PgpArmorHeader, PgpArmorHeadersCall, Viewer, ViewerCall,
};
use crate::models::integrations::{Integration, IntegrationError, NewIntegration};
use crate::models::projects::{NewProject, Project, ProjectError};
use crate::models::users::{NewUser, User, UserError};
use diesel::{
    pg::PgConnection,
    r2d2::{ConnectionManager, Pool},
};
use std::sync::Arc;
use tracing::{debug, error, info};
use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error("Database connection error")]
    ConnectionError,
    #[error("Database query error: {0}")]
    QueryError(#[from] diesel::result::Error),
    #[error("User error: {0}")]
    UserError(#[from] UserError),
    #[error("User not found")]
    UserNotFound,
    #[error("Integration error: {0}")]
    IntegrationError(#[from] IntegrationError),
    #[error("Integration not found")]
    IntegrationNotFound,
    #[error("Project error: {0}")]
    ProjectError(#[from] ProjectError),
    #[error("Project not found")]
    ProjectNotFound,
    #[error("Schema history error: {0}")]
    SchemaHistoryError(#[from] FlywaySchemaHistoryError),
    #[error("Function call error: {0}")]
    FunctionError(#[from] FunctionError),
}

/// Everything the rest of the application needs from the database. Row
/// shaping lives in the models; this trait owns connection checkout and
/// `Option`-to-`NotFound` mapping at the primary-key lookups.
pub trait DbConnection {
    fn create_user(&self, new_user: NewUser) -> Result<User, DbError>;
    fn get_user_by_id(&self, id: Uuid) -> Result<User, DbError>;
    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError>;
    fn update_user(&self, user: &User) -> Result<(), DbError>;
    fn update_user_password(&self, user: &User, new_password: String) -> Result<(), DbError>;

    fn create_integration(&self, new_integration: NewIntegration)
        -> Result<Integration, DbError>;
    fn get_integration_by_id(&self, id: i32) -> Result<Integration, DbError>;
    fn get_integration_for_user(&self, user_id: Uuid) -> Result<Option<Integration>, DbError>;
    fn get_integration_for_user_and_kind(
        &self,
        user_id: Uuid,
        kind: &str,
    ) -> Result<Option<Integration>, DbError>;
    fn get_all_integrations_for_user(&self, user_id: Uuid) -> Result<Vec<Integration>, DbError>;
    fn update_integration(&self, integration: &Integration) -> Result<(), DbError>;
    fn delete_integration(&self, integration: &Integration) -> Result<(), DbError>;

    fn create_project(&self, new_project: NewProject) -> Result<Project, DbError>;
    fn get_project_by_id(&self, id: Uuid) -> Result<Project, DbError>;
    fn get_project_by_name_and_owner(
        &self,
        name: &str,
        owner_id: Uuid,
    ) -> Result<Option<Project>, DbError>;
    fn get_all_projects_for_owner(&self, owner_id: Uuid) -> Result<Vec<Project>, DbError>;
    fn update_project(&self, project: &Project) -> Result<(), DbError>;
    fn delete_project(&self, project: &Project) -> Result<(), DbError>;

    fn get_schema_history(&self) -> Result<Vec<FlywaySchemaHistory>, DbError>;
    fn get_latest_migration(&self) -> Result<Option<FlywaySchemaHistory>, DbError>;

    /// Execute a [`PgpArmorHeadersCall`] and fetch its rows.
    fn pgp_armor_headers(&self, call: PgpArmorHeadersCall)
        -> Result<Vec<PgpArmorHeader>, DbError>;
    /// Execute a [`ViewerCall`]; `None` when the session resolves to no user.
    fn viewer(&self, call: ViewerCall) -> Result<Option<Viewer>, DbError>;

    fn get_pool(&self) -> &Pool<ConnectionManager<PgConnection>>;
}

pub(crate) struct PostgresConnection {
    db: Pool<ConnectionManager<PgConnection>>,
}

impl DbConnection for PostgresConnection {
    fn create_user(&self, new_user: NewUser) -> Result<User, DbError> {
        debug!("Creating new user");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = new_user.insert(conn).map_err(DbError::from);
        if let Err(ref e) = result {
            error!("Failed to create user: {:?}", e);
        }
        result
    }

    fn get_user_by_id(&self, id: Uuid) -> Result<User, DbError> {
        debug!("Getting user by id");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = User::get_by_id(conn, id)?.ok_or(DbError::UserNotFound);
        if let Err(ref e) = result {
            error!("Failed to get user by id: {:?}", e);
        }
        result
    }

    fn get_user_by_email(&self, email: &str) -> Result<Option<User>, DbError> {
        debug!("Getting user by email");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        User::get_by_email(conn, email).map_err(DbError::from)
    }

    fn update_user(&self, user: &User) -> Result<(), DbError> {
        debug!("Updating user");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = user.update(conn).map_err(DbError::from);
        if let Err(ref e) = result {
            error!("Failed to update user: {:?}", e);
        }
        result
    }

    fn update_user_password(&self, user: &User, new_password: String) -> Result<(), DbError> {
        debug!("Updating user password");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = user
            .update_password(conn, new_password)
            .map_err(DbError::from);
        if let Err(ref e) = result {
            error!("Failed to update user password: {:?}", e);
        }
        result
    }

    fn create_integration(
        &self,
        new_integration: NewIntegration,
    ) -> Result<Integration, DbError> {
        debug!("Creating new integration");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = new_integration.insert(conn).map_err(DbError::from);
        if let Err(ref e) = result {
            error!("Failed to create integration: {:?}", e);
        }
        result
    }

    fn get_integration_by_id(&self, id: i32) -> Result<Integration, DbError> {
        debug!("Getting integration by id");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = Integration::get_by_id(conn, id)?.ok_or(DbError::IntegrationNotFound);
        if let Err(ref e) = result {
            error!("Failed to get integration by id: {:?}", e);
        }
        result
    }

    fn get_integration_for_user(&self, user_id: Uuid) -> Result<Option<Integration>, DbError> {
        debug!("Getting integration for user");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        Integration::get_by_user(conn, user_id).map_err(DbError::from)
    }

    fn get_integration_for_user_and_kind(
        &self,
        user_id: Uuid,
        kind: &str,
    ) -> Result<Option<Integration>, DbError> {
        debug!("Getting integration for user and kind");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        Integration::get_by_user_and_kind(conn, user_id, kind).map_err(DbError::from)
    }

    fn get_all_integrations_for_user(&self, user_id: Uuid) -> Result<Vec<Integration>, DbError> {
        debug!("Getting all integrations for user");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        Integration::get_all_for_user(conn, user_id).map_err(DbError::from)
    }

    fn update_integration(&self, integration: &Integration) -> Result<(), DbError> {
        debug!("Updating integration");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = integration.update(conn).map_err(DbError::from);
        if let Err(ref e) = result {
            error!("Failed to update integration: {:?}", e);
        }
        result
    }

    fn delete_integration(&self, integration: &Integration) -> Result<(), DbError> {
        debug!("Deleting integration");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = integration.delete(conn).map_err(DbError::from);
        if let Err(ref e) = result {
            error!("Failed to delete integration: {:?}", e);
        }
        result
    }

    fn create_project(&self, new_project: NewProject) -> Result<Project, DbError> {
        debug!("Creating new project");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = new_project.insert(conn).map_err(DbError::from);
        if let Err(ref e) = result {
            error!("Failed to create project: {:?}", e);
        }
        result
    }

    fn get_project_by_id(&self, id: Uuid) -> Result<Project, DbError> {
        debug!("Getting project by id");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = Project::get_by_id(conn, id)?.ok_or(DbError::ProjectNotFound);
        if let Err(ref e) = result {
            error!("Failed to get project by id: {:?}", e);
        }
        result
    }

    fn get_project_by_name_and_owner(
        &self,
        name: &str,
        owner_id: Uuid,
    ) -> Result<Option<Project>, DbError> {
        debug!("Getting project by name and owner");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        Project::get_by_name_and_owner(conn, name, owner_id).map_err(DbError::from)
    }

    fn get_all_projects_for_owner(&self, owner_id: Uuid) -> Result<Vec<Project>, DbError> {
        debug!("Getting all projects for owner");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        Project::get_all_for_owner(conn, owner_id).map_err(DbError::from)
    }

    fn update_project(&self, project: &Project) -> Result<(), DbError> {
        debug!("Updating project");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = project.update(conn).map_err(DbError::from);
        if let Err(ref e) = result {
            error!("Failed to update project: {:?}", e);
        }
        result
    }

    fn delete_project(&self, project: &Project) -> Result<(), DbError> {
        debug!("Deleting project");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = project.delete(conn).map_err(DbError::from);
        if let Err(ref e) = result {
            error!("Failed to delete project: {:?}", e);
        }
        result
    }

    fn get_schema_history(&self) -> Result<Vec<FlywaySchemaHistory>, DbError> {
        debug!("Getting schema history");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        FlywaySchemaHistory::get_all(conn).map_err(DbError::from)
    }

    fn get_latest_migration(&self) -> Result<Option<FlywaySchemaHistory>, DbError> {
        debug!("Getting latest applied migration");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        FlywaySchemaHistory::get_latest(conn).map_err(DbError::from)
    }

    fn pgp_armor_headers(
        &self,
        call: PgpArmorHeadersCall,
    ) -> Result<Vec<PgpArmorHeader>, DbError> {
        debug!("Calling pgp_armor_headers");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = call.load(conn).map_err(DbError::from);
        if let Err(ref e) = result {
            error!("Failed to call pgp_armor_headers: {:?}", e);
        }
        result
    }

    fn viewer(&self, call: ViewerCall) -> Result<Option<Viewer>, DbError> {
        debug!("Calling viewer");
        let conn = &mut self.db.get().map_err(|_| DbError::ConnectionError)?;
        let result = call
            .load(conn)
            .map(|rows| rows.into_iter().next())
            .map_err(DbError::from);
        if let Err(ref e) = result {
            error!("Failed to call viewer: {:?}", e);
        }
        result
    }

    fn get_pool(&self) -> &Pool<ConnectionManager<PgConnection>> {
        &self.db
    }
}

pub fn setup_db(url: String) -> Arc<dyn DbConnection + Send + Sync> {
    info!("Connecting to database...");
    let manager = ConnectionManager::<PgConnection>::new(url);
    let pool = Pool::builder()
        .test_on_check_out(true)
        .build(manager)
        .expect("Unable to build DB connection pool");
    info!("Connected to database");
    Arc::new(PostgresConnection { db: pool })
}
