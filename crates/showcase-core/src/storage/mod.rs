//! Persistent store
//!
//! - `database`: the SQLite pool and how it is opened
//! - `migrations`: numbered schema steps recorded in `_migrations`
//!
//! ```ignore
//! use showcase_core::storage::{Database, DatabaseConfig};
//!
//! let db = Database::new(DatabaseConfig::from(&config.database)).await?;
//! ```

pub mod database;
pub mod migrations;

pub use database::{Database, DatabaseConfig};
pub use migrations::{CURRENT_VERSION, MigrationStatus, migration_status, run_migrations};
