//! Community chat
//!
//! A single shared room. The author's username is copied onto each message
//! when it is posted.

use crate::storage::Database;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// A message in the shared chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: i64,
    pub user_id: Option<i64>,
    pub username: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Chat repository for database operations
pub struct ChatRepository<'a> {
    db: &'a Database,
}

impl<'a> ChatRepository<'a> {
    /// Create a new chat repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Post a message, returning its id
    pub async fn post(&self, user_id: i64, username: &str, content: &str) -> Result<i64> {
        let result = sqlx::query(
            "INSERT INTO chat_messages (user_id, username, content, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(user_id)
        .bind(username)
        .bind(content)
        .bind(Utc::now())
        .execute(self.db.pool())
        .await?;

        Ok(result.last_insert_rowid())
    }

    /// The newest `limit` messages in chronological order
    pub async fn list_recent(&self, limit: usize) -> Result<Vec<ChatMessage>> {
        let rows = sqlx::query(
            r#"
            SELECT id, user_id, username, content, created_at
            FROM chat_messages
            ORDER BY created_at DESC, id DESC
            LIMIT ?
            "#,
        )
        .bind(limit as i64)
        .fetch_all(self.db.pool())
        .await?;

        let mut messages: Vec<ChatMessage> =
            rows.into_iter().map(|r| self.row_to_message(r)).collect();
        messages.reverse();
        Ok(messages)
    }

    fn row_to_message(&self, row: sqlx::sqlite::SqliteRow) -> ChatMessage {
        ChatMessage {
            id: row.get("id"),
            user_id: row.get("user_id"),
            username: row.get("username"),
            content: row.get("content"),
            created_at: row.get("created_at"),
        }
    }
}
