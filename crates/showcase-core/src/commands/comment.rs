//! Project comments

use crate::storage::Database;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// A comment left on a project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub project_id: i64,
    pub user_id: Option<i64>,
    /// Author's username; `None` once the author is gone
    pub username: Option<String>,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

/// Comment repository for database operations
pub struct CommentRepository<'a> {
    db: &'a Database,
}

impl<'a> CommentRepository<'a> {
    /// Create a new comment repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Add a comment to an existing project
    pub async fn create(&self, project_id: i64, user_id: i64, content: &str) -> Result<i64> {
        let result = sqlx::query(
            r#"
            INSERT INTO project_comments (project_id, user_id, content, created_at)
            SELECT id, ?, ?, ? FROM projects WHERE id = ?
            "#,
        )
        .bind(user_id)
        .bind(content)
        .bind(Utc::now())
        .bind(project_id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::ProjectNotFound(project_id));
        }
        Ok(result.last_insert_rowid())
    }

    /// Comments on a project, newest first
    pub async fn list_by_project(&self, project_id: i64) -> Result<Vec<Comment>> {
        let rows = sqlx::query(
            r#"
            SELECT c.id, c.project_id, c.user_id, u.username, c.content, c.created_at
            FROM project_comments c
            LEFT JOIN users u ON c.user_id = u.id
            WHERE c.project_id = ?
            ORDER BY c.created_at DESC, c.id DESC
            "#,
        )
        .bind(project_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(|r| self.row_to_comment(r)).collect())
    }

    fn row_to_comment(&self, row: sqlx::sqlite::SqliteRow) -> Comment {
        Comment {
            id: row.get("id"),
            project_id: row.get("project_id"),
            user_id: row.get("user_id"),
            username: row.get("username"),
            content: row.get("content"),
            created_at: row.get("created_at"),
        }
    }
}
