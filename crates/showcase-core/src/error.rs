//! Error types for Showcase

use thiserror::Error;

/// Result type alias using Showcase's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Showcase error types
#[derive(Error, Debug)]
pub enum Error {
    // Entity errors (E001-E099)
    #[error("Project {0} not found")]
    ProjectNotFound(i64),

    #[error("User not found")]
    UserNotFound,

    // Auth errors (E100-E199)
    #[error("Incorrect password")]
    IncorrectPassword,

    #[error("Username or email already taken")]
    UsernameTaken,

    #[error("Only the owner may modify project {0}")]
    NotOwner(i64),

    #[error("Password hashing failed: {0}")]
    PasswordHash(String),

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Generic errors
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::ProjectNotFound(_) => "E001",
            Self::UserNotFound => "E002",
            Self::IncorrectPassword => "E100",
            Self::UsernameTaken => "E101",
            Self::NotOwner(_) => "E103",
            Self::PasswordHash(_) => "E104",
            Self::DatabaseError(_) => "E400",
            Self::Other(_) => "E9999",
        }
    }

    /// True when the error came from a unique constraint in the store
    pub fn is_unique_violation(&self) -> bool {
        match self {
            Self::DatabaseError(sqlx::Error::Database(db)) => db.is_unique_violation(),
            _ => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes_are_stable() {
        assert_eq!(Error::ProjectNotFound(7).code(), "E001");
        assert_eq!(Error::UsernameTaken.code(), "E101");
        assert_eq!(Error::Other("x".into()).code(), "E9999");
    }

    #[test]
    fn test_error_messages() {
        assert_eq!(Error::ProjectNotFound(3).to_string(), "Project 3 not found");
        assert_eq!(Error::NotOwner(3).to_string(), "Only the owner may modify project 3");
    }

    #[test]
    fn test_non_database_error_is_not_unique_violation() {
        assert!(!Error::UsernameTaken.is_unique_violation());
    }
}
