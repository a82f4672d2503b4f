//! Project follows
//!
//! "Like" and "follow" are the same relation. Each mutation runs in a single
//! transaction that also rewrites `projects.followers_count` from the relation
//! itself, so the counter can never drift from the row count.

use crate::storage::Database;
use crate::{Error, Result};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use sqlx::{Row, SqliteConnection};

/// A user following a project
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Follower {
    pub id: i64,
    pub username: String,
}

/// Follow repository for database operations
pub struct FollowRepository<'a> {
    db: &'a Database,
}

impl<'a> FollowRepository<'a> {
    /// Create a new follow repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Flip the follow state; returns true when the user now follows
    pub async fn toggle(&self, user_id: i64, project_id: i64) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;
        ensure_project(&mut tx, project_id).await?;

        let following = if remove(&mut tx, user_id, project_id).await? {
            false
        } else {
            insert(&mut tx, user_id, project_id).await?;
            true
        };

        recount(&mut tx, project_id).await?;
        tx.commit().await?;

        tracing::debug!(user_id, project_id, following, "Follow toggled");
        Ok(following)
    }

    /// Follow a project; returns false when already following
    pub async fn follow(&self, user_id: i64, project_id: i64) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;
        ensure_project(&mut tx, project_id).await?;

        let added = insert(&mut tx, user_id, project_id).await?;
        recount(&mut tx, project_id).await?;
        tx.commit().await?;

        if added {
            tracing::debug!(user_id, project_id, "Project followed");
        }
        Ok(added)
    }

    /// Stop following a project; returns false when there was nothing to remove
    pub async fn unfollow(&self, user_id: i64, project_id: i64) -> Result<bool> {
        let mut tx = self.db.pool().begin().await?;
        ensure_project(&mut tx, project_id).await?;

        let removed = remove(&mut tx, user_id, project_id).await?;
        recount(&mut tx, project_id).await?;
        tx.commit().await?;

        if removed {
            tracing::debug!(user_id, project_id, "Project unfollowed");
        }
        Ok(removed)
    }

    /// Check whether a user follows a project
    pub async fn is_following(&self, user_id: i64, project_id: i64) -> Result<bool> {
        let row: Option<(i32,)> =
            sqlx::query_as("SELECT 1 FROM project_likes WHERE user_id = ? AND project_id = ?")
                .bind(user_id)
                .bind(project_id)
                .fetch_optional(self.db.pool())
                .await?;

        Ok(row.is_some())
    }

    /// Number of followers, counted from the relation
    pub async fn count(&self, project_id: i64) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM project_likes WHERE project_id = ?")
                .bind(project_id)
                .fetch_one(self.db.pool())
                .await?;

        Ok(count)
    }

    /// Users following a project, oldest follow first
    pub async fn followers(&self, project_id: i64) -> Result<Vec<Follower>> {
        let rows = sqlx::query(
            r#"
            SELECT u.id, u.username
            FROM project_likes pl
            JOIN users u ON pl.user_id = u.id
            WHERE pl.project_id = ?
            ORDER BY pl.created_at, u.id
            "#,
        )
        .bind(project_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| Follower {
                id: row.get("id"),
                username: row.get("username"),
            })
            .collect())
    }
}

async fn ensure_project(conn: &mut SqliteConnection, project_id: i64) -> Result<()> {
    let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM projects WHERE id = ?")
        .bind(project_id)
        .fetch_optional(&mut *conn)
        .await?;

    row.map(|_| ()).ok_or(Error::ProjectNotFound(project_id))
}

async fn insert(conn: &mut SqliteConnection, user_id: i64, project_id: i64) -> Result<bool> {
    let result = sqlx::query(
        "INSERT OR IGNORE INTO project_likes (user_id, project_id, created_at) VALUES (?, ?, ?)",
    )
    .bind(user_id)
    .bind(project_id)
    .bind(Utc::now())
    .execute(&mut *conn)
    .await?;

    Ok(result.rows_affected() > 0)
}

async fn remove(conn: &mut SqliteConnection, user_id: i64, project_id: i64) -> Result<bool> {
    let result = sqlx::query("DELETE FROM project_likes WHERE user_id = ? AND project_id = ?")
        .bind(user_id)
        .bind(project_id)
        .execute(&mut *conn)
        .await?;

    Ok(result.rows_affected() > 0)
}

async fn recount(conn: &mut SqliteConnection, project_id: i64) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE projects
        SET followers_count = (SELECT COUNT(*) FROM project_likes WHERE project_id = ?)
        WHERE id = ?
        "#,
    )
    .bind(project_id)
    .bind(project_id)
    .execute(&mut *conn)
    .await?;

    Ok(())
}
