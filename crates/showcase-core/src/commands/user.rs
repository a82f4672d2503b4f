//! User accounts
//!
//! Passwords are stored as argon2 PHC strings.

use crate::storage::Database;
use crate::{Error, Result};
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::SaltString;
use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier};
use chrono::{DateTime, Utc};
use sqlx::Row;

/// A registered user
#[derive(Debug, Clone)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Hash a password with argon2 and a fresh salt
pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| Error::PasswordHash(e.to_string()))
}

/// Check a password against a stored PHC string
pub fn verify_password(password: &str, stored: &str) -> Result<bool> {
    let parsed = PasswordHash::new(stored).map_err(|e| Error::PasswordHash(e.to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .is_ok())
}

/// User repository for database operations
pub struct UserRepository<'a> {
    db: &'a Database,
}

impl<'a> UserRepository<'a> {
    /// Create a new user repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Register a user, returning the new id
    pub async fn create(&self, username: &str, email: &str, password: &str) -> Result<i64> {
        let password_hash = hash_password(password)?;

        let result = sqlx::query(
            "INSERT INTO users (username, email, password_hash, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(username)
        .bind(email)
        .bind(&password_hash)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await
        .map_err(Error::from)
        .map_err(|e| {
            if e.is_unique_violation() {
                Error::UsernameTaken
            } else {
                e
            }
        })?;

        let id = result.last_insert_rowid();
        tracing::info!(user_id = id, username, "User registered");
        Ok(id)
    }

    /// Get a user by ID
    pub async fn get(&self, id: i64) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE id = ?",
        )
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| self.row_to_user(r)))
    }

    /// Get a user by username
    pub async fn get_by_username(&self, username: &str) -> Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, email, password_hash, created_at FROM users WHERE username = ?",
        )
        .bind(username)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| self.row_to_user(r)))
    }

    /// Look up `username` and check `password`
    pub async fn verify_credentials(&self, username: &str, password: &str) -> Result<User> {
        let user = self
            .get_by_username(username)
            .await?
            .ok_or(Error::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            tracing::debug!(username, "Rejected login with wrong password");
            return Err(Error::IncorrectPassword);
        }

        Ok(user)
    }

    /// Convert a database row to a User
    fn row_to_user(&self, row: sqlx::sqlite::SqliteRow) -> User {
        User {
            id: row.get("id"),
            username: row.get("username"),
            email: row.get("email"),
            password_hash: row.get("password_hash"),
            created_at: row.get("created_at"),
        }
    }
}
