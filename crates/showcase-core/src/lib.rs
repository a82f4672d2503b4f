//! Showcase Core Library
//!
//! This crate provides the core functionality for Showcase, including:
//! - Feed selection (deterministic, hour-rotating shuffle of all projects)
//! - Storage (SQLite with versioned migrations)
//! - Repositories for users, sessions, projects, follows, comments and chat
//! - Configuration loading and validation

pub mod commands;
pub mod config;
pub mod error;
pub mod feed;
pub mod storage;

pub use error::{Error, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::config::Config;
    pub use crate::error::{Error, Result};
    pub use crate::feed::{FeedSelector, SeedStrategy};
    pub use crate::storage::Database;
}
