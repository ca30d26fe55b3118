//! Database module providing connection management, migrations, and queries.
//!
//! [`DbPool`] is the session manager: it owns the SeaORM connection pool and
//! runs each entity operation in its own short-lived transaction that is
//! committed before the call returns.

pub mod batches;
pub mod files;
pub mod schema;

use sea_orm::{
    ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DatabaseTransaction, DbErr,
    TransactionTrait,
};
use sea_orm_migration::MigratorTrait;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::migration::Migrator;

/// Database connection pool wrapper.
#[derive(Clone, Debug)]
pub struct DbPool {
    conn: DatabaseConnection,
    schema: Option<String>,
}

impl DbPool {
    /// Create a new database pool from configuration.
    pub async fn new(config: &Config) -> AppResult<Self> {
        let db = &config.database;

        let mut options = ConnectOptions::new(db.connection_url());
        options
            .max_connections(db.max_connections)
            .min_connections(db.min_connections)
            .connect_timeout(db.connect_timeout)
            .sqlx_logging(false);

        if let Some(ref schema) = db.schema {
            options.set_schema_search_path(schema.clone());
        }

        let conn = Database::connect(options).await.map_err(|e| {
            AppError::Database(format!(
                "Failed to connect to {}: {}",
                db.redacted_url(),
                e
            ))
        })?;

        info!(
            url = %db.redacted_url(),
            schema = db.schema.as_deref().unwrap_or("public"),
            max_connections = db.max_connections,
            "Database connection established"
        );

        Ok(Self {
            conn,
            schema: db.schema.clone(),
        })
    }

    /// Wrap an existing connection (no schema override).
    pub fn from_connection(conn: DatabaseConnection) -> Self {
        Self { conn, schema: None }
    }

    /// Connect, run `f` against the pool, and close the pool afterwards.
    ///
    /// The pool is closed whether or not `f` succeeds.
    pub async fn with_pool<T>(
        config: &Config,
        f: impl AsyncFnOnce(&DbPool) -> AppResult<T>,
    ) -> AppResult<T> {
        Self::new(config).await?.scoped(f).await
    }

    /// Run `f` against this pool, then close it.
    ///
    /// An error from `f` takes precedence over a failure to close.
    pub async fn scoped<T>(self, f: impl AsyncFnOnce(&DbPool) -> AppResult<T>) -> AppResult<T> {
        let result = f(&self).await;

        match self.close().await {
            Ok(()) => result,
            Err(close_err) => match result {
                Ok(_) => Err(close_err),
                Err(e) => {
                    warn!("Failed to close database pool: {}", close_err);
                    Err(e)
                }
            },
        }
    }

    /// Get access to the underlying connection.
    pub fn connection(&self) -> &DatabaseConnection {
        &self.conn
    }

    /// Schema used as the search path, if overridden.
    pub fn schema(&self) -> Option<&str> {
        self.schema.as_deref()
    }

    /// Close every connection in the pool.
    pub async fn close(self) -> AppResult<()> {
        self.conn
            .close()
            .await
            .map_err(|e| AppError::Database(format!("Failed to close database pool: {}", e)))?;
        debug!("Database pool closed");
        Ok(())
    }

    /// Apply all pending migrations.
    pub async fn run_migrations(&self) -> AppResult<()> {
        self.ensure_schema().await?;

        Migrator::up(&self.conn, None)
            .await
            .map_err(|e| AppError::Migration(e.to_string()))?;

        info!("Database migrations complete");
        Ok(())
    }

    /// Create the status type and both tables if they do not exist.
    pub async fn create_all_tables(&self) -> AppResult<()> {
        self.ensure_schema().await?;

        self.conn
            .execute_unprepared(schema::CREATE_ALL)
            .await
            .map_err(|e| AppError::Database(format!("Failed to create tables: {}", e)))?;

        info!("Created file and batch tables");
        Ok(())
    }

    /// Drop both tables, the status type and the migration history.
    pub async fn drop_all_tables(&self) -> AppResult<()> {
        self.conn
            .execute_unprepared(schema::DROP_ALL)
            .await
            .map_err(|e| AppError::Database(format!("Failed to drop tables: {}", e)))?;

        self.conn
            .execute_unprepared(schema::DROP_MIGRATION_HISTORY)
            .await
            .map_err(|e| {
                AppError::Database(format!("Failed to drop migration history: {}", e))
            })?;

        info!("Dropped file and batch tables");
        Ok(())
    }

    async fn ensure_schema(&self) -> AppResult<()> {
        if let Some(ref name) = self.schema {
            self.conn
                .execute_unprepared(&schema::create_schema(name))
                .await
                .map_err(|e| {
                    AppError::Database(format!("Failed to create schema {}: {}", name, e))
                })?;
        }
        Ok(())
    }

    /// Open the short-lived transaction backing a single operation.
    async fn begin(&self) -> AppResult<DatabaseTransaction> {
        self.conn
            .begin()
            .await
            .map_err(|e| AppError::Database(format!("Failed to begin transaction: {}", e)))
    }
}

/// Map a failed UPDATE, treating a row that vanished after the lookup as missing.
fn update_error(entity: &str, id: &str, err: DbErr) -> AppError {
    match err {
        DbErr::RecordNotUpdated => AppError::NotFound(format!("{} {}", entity, id)),
        e => AppError::Database(format!(
            "Failed to update {} {}: {}",
            entity.to_lowercase(),
            id,
            e
        )),
    }
}

async fn commit(txn: DatabaseTransaction) -> AppResult<()> {
    txn.commit()
        .await
        .map_err(|e| AppError::Database(format!("Failed to commit transaction: {}", e)))
}
