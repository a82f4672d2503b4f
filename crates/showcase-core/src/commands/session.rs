//! Login sessions
//!
//! A session is an opaque random token mapped to a user. Tokens expire after
//! the configured TTL; expired tokens resolve to nothing and are deleted on
//! sight.

use crate::storage::Database;
use crate::{Error, Result};
use chrono::{DateTime, Duration, Utc};
use sqlx::Row;
use uuid::Uuid;

/// An authenticated session
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    pub token: String,
    pub user_id: i64,
    pub username: String,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    /// Whether the session is past its expiry at `now`
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

/// Session repository for database operations
pub struct SessionRepository<'a> {
    db: &'a Database,
}

impl<'a> SessionRepository<'a> {
    /// Create a new session repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Open a session for a user
    pub async fn create(&self, user_id: i64, username: &str, ttl: Duration) -> Result<Session> {
        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(ttl)
            .ok_or_else(|| Error::Other(format!("Session lifetime out of range: {ttl}")))?;
        let session = Session {
            token: Uuid::new_v4().to_string(),
            user_id,
            username: username.to_string(),
            created_at: now,
            expires_at,
        };

        sqlx::query(
            "INSERT INTO sessions (token, user_id, username, created_at, expires_at) VALUES (?, ?, ?, ?, ?)",
        )
        .bind(&session.token)
        .bind(session.user_id)
        .bind(&session.username)
        .bind(session.created_at)
        .bind(session.expires_at)
        .execute(self.db.pool())
        .await?;

        tracing::debug!(user_id, "Session created");
        Ok(session)
    }

    /// Resolve a token to a live session
    pub async fn resolve(&self, token: &str) -> Result<Option<Session>> {
        let row = sqlx::query(
            "SELECT token, user_id, username, created_at, expires_at FROM sessions WHERE token = ?",
        )
        .bind(token)
        .fetch_optional(self.db.pool())
        .await?;

        let Some(session) = row.map(|r| self.row_to_session(r)) else {
            return Ok(None);
        };

        if session.is_expired_at(Utc::now()) {
            self.delete(token).await?;
            return Ok(None);
        }

        Ok(Some(session))
    }

    /// End a session; unknown tokens are ignored
    pub async fn delete(&self, token: &str) -> Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = ?")
            .bind(token)
            .execute(self.db.pool())
            .await?;

        Ok(())
    }

    /// Remove every expired session, returning how many were dropped
    pub async fn purge_expired(&self) -> Result<u64> {
        let purged = sqlx::query("DELETE FROM sessions WHERE expires_at <= ?")
            .bind(Utc::now())
            .execute(self.db.pool())
            .await?
            .rows_affected();

        if purged > 0 {
            tracing::info!(purged, "Purged expired sessions");
        }
        Ok(purged)
    }

    /// Convert a database row to a Session
    fn row_to_session(&self, row: sqlx::sqlite::SqliteRow) -> Session {
        Session {
            token: row.get("token"),
            user_id: row.get("user_id"),
            username: row.get("username"),
            created_at: row.get("created_at"),
            expires_at: row.get("expires_at"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::user::UserRepository;

    async fn setup() -> (Database, i64) {
        let db = Database::in_memory()
            .await
            .expect("Failed to create test database");
        let user_id = UserRepository::new(&db)
            .create("ada", "ada@example.com", "secret")
            .await
            .expect("Failed to create user");
        (db, user_id)
    }

    #[tokio::test]
    async fn test_create_and_resolve() {
        let (db, user_id) = setup().await;
        let repo = SessionRepository::new(&db);

        let session = repo.create(user_id, "ada", Duration::hours(1)).await.unwrap();
        assert!(Uuid::parse_str(&session.token).is_ok());

        let resolved = repo.resolve(&session.token).await.unwrap().expect("live session");
        assert_eq!(resolved.user_id, user_id);
        assert_eq!(resolved.username, "ada");
    }

    #[tokio::test]
    async fn test_lifetime_past_calendar_range_is_an_error() {
        let (db, user_id) = setup().await;
        let repo = SessionRepository::new(&db);

        let result = repo.create(user_id, "ada", Duration::MAX).await;
        assert!(matches!(result, Err(Error::Other(_))));

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_unknown_token() {
        let (db, _) = setup().await;
        let repo = SessionRepository::new(&db);
        assert!(repo.resolve("no-such-token").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_expired_session_is_rejected_and_removed() {
        let (db, user_id) = setup().await;
        let repo = SessionRepository::new(&db);

        let session = repo.create(user_id, "ada", Duration::seconds(-5)).await.unwrap();
        assert!(repo.resolve(&session.token).await.unwrap().is_none());

        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sessions")
            .fetch_one(db.pool())
            .await
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_delete_session() {
        let (db, user_id) = setup().await;
        let repo = SessionRepository::new(&db);

        let session = repo.create(user_id, "ada", Duration::hours(1)).await.unwrap();
        repo.delete(&session.token).await.unwrap();
        assert!(repo.resolve(&session.token).await.unwrap().is_none());

        // Deleting twice is harmless
        repo.delete(&session.token).await.unwrap();
    }

    #[tokio::test]
    async fn test_purge_expired() {
        let (db, user_id) = setup().await;
        let repo = SessionRepository::new(&db);

        repo.create(user_id, "ada", Duration::seconds(-1)).await.unwrap();
        repo.create(user_id, "ada", Duration::seconds(-1)).await.unwrap();
        let live = repo.create(user_id, "ada", Duration::hours(1)).await.unwrap();

        assert_eq!(repo.purge_expired().await.unwrap(), 2);
        assert!(repo.resolve(&live.token).await.unwrap().is_some());
    }
}
