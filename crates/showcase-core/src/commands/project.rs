//! Project management
//!
//! Provides CRUD operations for community projects. Every read joins the
//! owner's username so callers never issue a second lookup.

use crate::storage::Database;
use crate::{Error, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::Row;

/// Columns selected for every project read
const PROJECT_COLUMNS: &str = "p.id, p.title, p.description, p.owner_id, u.username AS owner, \
     p.created_at, p.updated_at, p.followers_count";

/// A community project
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    /// Unique project identifier
    pub id: i64,
    pub title: String,
    pub description: String,
    /// Owning user; `None` once the owner account is gone
    pub owner_id: Option<i64>,
    /// Owner's username
    pub owner: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    /// Number of users following the project
    pub followers_count: i64,
}

/// Project repository for database operations
pub struct ProjectRepository<'a> {
    db: &'a Database,
}

impl<'a> ProjectRepository<'a> {
    /// Create a new project repository
    pub fn new(db: &'a Database) -> Self {
        Self { db }
    }

    /// Create a new project, returning its id
    pub async fn create(&self, owner_id: i64, title: &str, description: &str) -> Result<i64> {
        let now = Utc::now();
        let result = sqlx::query(
            r#"
            INSERT INTO projects (title, description, owner_id, created_at, updated_at, followers_count)
            VALUES (?, ?, ?, ?, ?, 0)
            "#,
        )
        .bind(title)
        .bind(description)
        .bind(owner_id)
        .bind(now)
        .bind(now)
        .execute(self.db.pool())
        .await?;

        let id = result.last_insert_rowid();
        tracing::info!(project_id = id, owner_id, "Project created");
        Ok(id)
    }

    /// Get a project by ID
    pub async fn get(&self, id: i64) -> Result<Option<Project>> {
        let row = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p LEFT JOIN users u ON p.owner_id = u.id WHERE p.id = ?"
        ))
        .bind(id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|r| self.row_to_project(r)))
    }

    /// List every project in id order
    ///
    /// The feed shuffle is only reproducible for a fixed input order, so the
    /// order here is part of the feed's contract.
    pub async fn list_all(&self) -> Result<Vec<Project>> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p LEFT JOIN users u ON p.owner_id = u.id ORDER BY p.id"
        ))
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(|r| self.row_to_project(r)).collect())
    }

    /// List projects owned by a user
    pub async fn list_by_owner(&self, owner_id: i64) -> Result<Vec<Project>> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM projects p LEFT JOIN users u ON p.owner_id = u.id \
             WHERE p.owner_id = ? ORDER BY p.id"
        ))
        .bind(owner_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(|r| self.row_to_project(r)).collect())
    }

    /// List projects a user follows
    pub async fn list_followed_by(&self, user_id: i64) -> Result<Vec<Project>> {
        let rows = sqlx::query(&format!(
            "SELECT {PROJECT_COLUMNS} FROM project_likes pl \
             JOIN projects p ON pl.project_id = p.id \
             LEFT JOIN users u ON p.owner_id = u.id \
             WHERE pl.user_id = ? ORDER BY p.id"
        ))
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        Ok(rows.into_iter().map(|r| self.row_to_project(r)).collect())
    }

    /// Replace title and description
    pub async fn update(&self, id: i64, title: &str, description: &str) -> Result<()> {
        let result = sqlx::query(
            "UPDATE projects SET title = ?, description = ?, updated_at = ? WHERE id = ?",
        )
        .bind(title)
        .bind(description)
        .bind(Utc::now())
        .bind(id)
        .execute(self.db.pool())
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::ProjectNotFound(id));
        }
        Ok(())
    }

    /// Permanently delete a project with its follows and comments
    pub async fn delete(&self, id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM projects WHERE id = ?")
            .bind(id)
            .execute(self.db.pool())
            .await?;

        if result.rows_affected() == 0 {
            return Err(Error::ProjectNotFound(id));
        }
        tracing::info!(project_id = id, "Project deleted");
        Ok(())
    }

    /// Check if a project exists
    pub async fn exists(&self, id: i64) -> Result<bool> {
        let row: Option<(i32,)> = sqlx::query_as("SELECT 1 FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.is_some())
    }

    /// Owner of a project; errors when the project does not exist
    pub async fn owner_of(&self, id: i64) -> Result<Option<i64>> {
        let row: Option<(Option<i64>,)> = sqlx::query_as("SELECT owner_id FROM projects WHERE id = ?")
            .bind(id)
            .fetch_optional(self.db.pool())
            .await?;

        row.map(|(owner,)| owner).ok_or(Error::ProjectNotFound(id))
    }

    /// Fail unless `user_id` owns the project
    pub async fn ensure_owner(&self, id: i64, user_id: i64) -> Result<()> {
        match self.owner_of(id).await? {
            Some(owner) if owner == user_id => Ok(()),
            _ => Err(Error::NotOwner(id)),
        }
    }

    /// Convert a database row to a Project
    fn row_to_project(&self, row: sqlx::sqlite::SqliteRow) -> Project {
        Project {
            id: row.get("id"),
            title: row.get("title"),
            description: row.get("description"),
            owner_id: row.get("owner_id"),
            owner: row.get("owner"),
            created_at: row.get("created_at"),
            updated_at: row.get("updated_at"),
            followers_count: row.get("followers_count"),
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
            .expect("Failed to create database");
        let user_id = UserRepository::new(&db)
            .create("ada", "ada@example.com", "secret")
            .await
            .expect("Failed to create user");
        (db, user_id)
    }

    #[tokio::test]
    async fn test_create_and_get_project() {
        let (db, owner) = setup().await;
        let repo = ProjectRepository::new(&db);

        let id = repo.create(owner, "Loom", "A weaving tool").await.expect("create");
        let project = repo.get(id).await.unwrap().expect("project should exist");

        assert_eq!(project.title, "Loom");
        assert_eq!(project.description, "A weaving tool");
        assert_eq!(project.owner_id, Some(owner));
        assert_eq!(project.owner.as_deref(), Some("ada"));
        assert_eq!(project.followers_count, 0);
        assert_eq!(project.created_at, project.updated_at);
    }

    #[tokio::test]
    async fn test_list_all_in_id_order() {
        let (db, owner) = setup().await;
        let repo = ProjectRepository::new(&db);

        for title in ["c", "a", "b"] {
            repo.create(owner, title, "d").await.unwrap();
        }

        let projects = repo.list_all().await.unwrap();
        let ids: Vec<i64> = projects.iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
        assert_eq!(projects[0].title, "c");
    }

    #[tokio::test]
    async fn test_list_by_owner() {
        let (db, ada) = setup().await;
        let grace = UserRepository::new(&db)
            .create("grace", "grace@example.com", "pw")
            .await
            .unwrap();
        let repo = ProjectRepository::new(&db);

        repo.create(ada, "a1", "d").await.unwrap();
        repo.create(grace, "g1", "d").await.unwrap();
        repo.create(ada, "a2", "d").await.unwrap();

        let mine = repo.list_by_owner(ada).await.unwrap();
        let titles: Vec<&str> = mine.iter().map(|p| p.title.as_str()).collect();
        assert_eq!(titles, vec!["a1", "a2"]);
    }

    #[tokio::test]
    async fn test_update_bumps_updated_at() {
        let (db, owner) = setup().await;
        let repo = ProjectRepository::new(&db);
        let id = repo.create(owner, "old", "old desc").await.unwrap();
        let before = repo.get(id).await.unwrap().unwrap();

        tokio::time::sleep(std::time::Duration::from_millis(10)).await;
        repo.update(id, "new", "new desc").await.expect("update");

        let after = repo.get(id).await.unwrap().unwrap();
        assert_eq!(after.title, "new");
        assert_eq!(after.description, "new desc");
        assert_eq!(after.created_at, before.created_at);
        assert!(after.updated_at > before.updated_at);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_project() {
        let (db, _) = setup().await;
        let repo = ProjectRepository::new(&db);

        assert!(matches!(repo.update(99, "t", "d").await, Err(Error::ProjectNotFound(99))));
        assert!(matches!(repo.delete(99).await, Err(Error::ProjectNotFound(99))));
    }

    #[tokio::test]
    async fn test_delete_project() {
        let (db, owner) = setup().await;
        let repo = ProjectRepository::new(&db);
        let id = repo.create(owner, "t", "d").await.unwrap();

        assert!(repo.exists(id).await.unwrap());
        repo.delete(id).await.expect("delete");
        assert!(!repo.exists(id).await.unwrap());
        assert!(repo.get(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_ownership_checks() {
        let (db, ada) = setup().await;
        let grace = UserRepository::new(&db)
            .create("grace", "grace@example.com", "pw")
            .await
            .unwrap();
        let repo = ProjectRepository::new(&db);
        let id = repo.create(ada, "t", "d").await.unwrap();

        assert_eq!(repo.owner_of(id).await.unwrap(), Some(ada));
        assert!(repo.ensure_owner(id, ada).await.is_ok());
        assert!(matches!(repo.ensure_owner(id, grace).await, Err(Error::NotOwner(_))));
        assert!(matches!(repo.owner_of(42).await, Err(Error::ProjectNotFound(42))));
    }

    #[tokio::test]
    async fn test_project_survives_owner_deletion() {
        let (db, owner) = setup().await;
        let repo = ProjectRepository::new(&db);
        let id = repo.create(owner, "orphan", "d").await.unwrap();

        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(owner)
            .execute(db.pool())
            .await
            .unwrap();

        let project = repo.get(id).await.unwrap().unwrap();
        assert_eq!(project.owner_id, None);
        assert_eq!(project.owner, None);
    }
}
