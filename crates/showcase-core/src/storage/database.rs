//! SQLite connection pool
//!
//! File databases run in WAL mode; the in-memory variant used by tests keeps
//! a single connection alive for the lifetime of the pool, since every
//! SQLite memory connection is its own database.

use crate::config::DatabaseSettings;
use crate::storage::migrations;
use anyhow::{Context, Result};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use std::path::{Path, PathBuf};
use std::str::FromStr;

const MEMORY_PATH: &str = ":memory:";

/// Where and how to open the store
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    pub path: PathBuf,
    pub max_connections: u32,
    /// Apply pending migrations on open
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        DatabaseConfig::from(&DatabaseSettings::default())
    }
}

impl From<&DatabaseSettings> for DatabaseConfig {
    fn from(settings: &DatabaseSettings) -> Self {
        Self::with_path(&settings.path).max_connections(settings.max_connections)
    }
}

impl DatabaseConfig {
    /// Open the SQLite file at `path`, creating it if needed
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            max_connections: 5,
            auto_migrate: true,
        }
    }

    /// Private in-memory store
    pub fn in_memory() -> Self {
        Self {
            path: PathBuf::from(MEMORY_PATH),
            max_connections: 1,
            auto_migrate: true,
        }
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    /// Leave the schema as found; read-only checks open the store this way
    pub fn auto_migrate(mut self, enabled: bool) -> Self {
        self.auto_migrate = enabled;
        self
    }

    pub fn is_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_PATH
    }
}

/// `<data dir>/showcase/showcase.db`, or `showcase.db` when no data dir exists
pub fn default_database_path() -> PathBuf {
    match dirs::data_dir() {
        Some(dir) => dir.join("showcase").join("showcase.db"),
        None => PathBuf::from("showcase.db"),
    }
}

/// Handle to the store; cheap to clone
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
    path: PathBuf,
}

impl Database {
    /// Open the store described by `config` and bring its schema up to date
    pub async fn new(config: DatabaseConfig) -> Result<Self> {
        let (options, pool_options) = if config.is_memory() {
            let options = SqliteConnectOptions::from_str("sqlite::memory:")?
                .journal_mode(SqliteJournalMode::Memory);
            let pool_options = SqlitePoolOptions::new()
                .max_connections(1)
                .idle_timeout(None)
                .max_lifetime(None);
            (options, pool_options)
        } else {
            if let Some(parent) = config.path.parent().filter(|p| !p.as_os_str().is_empty()) {
                std::fs::create_dir_all(parent)
                    .with_context(|| format!("Failed to create {}", parent.display()))?;
            }
            let options = SqliteConnectOptions::new()
                .filename(&config.path)
                .create_if_missing(true)
                .journal_mode(SqliteJournalMode::Wal);
            let pool_options = SqlitePoolOptions::new().max_connections(config.max_connections);
            (options, pool_options)
        };

        let options = options
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true);

        let pool = pool_options
            .connect_with(options)
            .await
            .with_context(|| format!("Failed to open database {}", config.path.display()))?;

        let db = Self {
            pool,
            path: config.path,
        };
        if config.auto_migrate {
            db.migrate().await?;
        }

        tracing::debug!(path = %db.path.display(), "Database ready");
        Ok(db)
    }

    pub async fn in_memory() -> Result<Self> {
        Self::new(DatabaseConfig::in_memory()).await
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn migrate(&self) -> Result<()> {
        migrations::run_migrations(&self.pool)
            .await
            .context("Failed to migrate database")
    }

    pub async fn migration_status(&self) -> Result<migrations::MigrationStatus> {
        migrations::migration_status(&self.pool)
            .await
            .context("Failed to read schema version")
    }

    /// Round-trip a trivial query
    pub async fn health_check(&self) -> Result<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .context("Database unreachable")?;
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }
}
