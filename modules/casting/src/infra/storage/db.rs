//! Connection bootstrap and database error conversion.

use std::fmt::Display;
use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, DbErr, SqlErr};
use sea_orm_migration::MigratorTrait;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::domain::error::DomainError;
use crate::infra::storage::migrations::Migrator;

/// Database section of the server configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DatabaseConfig {
    /// `sqlite://...` or `postgres://...`
    pub url: String,
    pub max_connections: u32,
    pub connect_timeout_secs: u64,
    /// Apply pending migrations right after connecting.
    pub run_migrations: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://casting.db?mode=rwc".to_owned(),
            max_connections: 10,
            connect_timeout_secs: 10,
            run_migrations: true,
        }
    }
}

impl DatabaseConfig {
    /// Config for a private in-memory `SQLite` database.
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            url: "sqlite::memory:".to_owned(),
            max_connections: 1,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}

/// Open the connection pool and, if configured, run migrations.
///
/// An in-memory `SQLite` database lives inside a single connection, so the
/// pool is pinned to exactly one connection in that case.
///
/// # Errors
/// Returns `DbErr` if the connection cannot be established or a migration fails.
pub async fn connect(cfg: &DatabaseConfig) -> Result<DatabaseConnection, DbErr> {
    let mut opts = ConnectOptions::new(cfg.url.clone());
    opts.connect_timeout(Duration::from_secs(cfg.connect_timeout_secs))
        .sqlx_logging(false);

    if cfg.is_in_memory() {
        opts.max_connections(1).min_connections(1);
    } else {
        opts.max_connections(cfg.max_connections.max(1));
    }

    let db = Database::connect(opts).await?;
    debug!(backend = ?db.get_database_backend(), "Database connected");

    if cfg.run_migrations {
        migrate(&db).await?;
    }

    Ok(db)
}

/// Apply all pending migrations.
///
/// # Errors
/// Returns `DbErr` if a migration fails.
pub async fn migrate(db: &DatabaseConnection) -> Result<(), DbErr> {
    Migrator::up(db, None).await?;
    info!("Database migrations applied");
    Ok(())
}

/// Convert any displayable error into a `DomainError::Database`.
pub fn db_err(e: impl Display) -> DomainError {
    DomainError::database(e.to_string())
}

/// True when the error comes from a unique or primary key violation.
pub fn is_unique_violation(e: &DbErr) -> bool {
    matches!(e.sql_err(), Some(SqlErr::UniqueConstraintViolation(_)))
}
