//! Schema migrations
//!
//! Each step runs once, in order, and is recorded in `_migrations`.

use sqlx::SqlitePool;

/// Latest schema version
pub const CURRENT_VERSION: i32 = 2;

const CREATE_MIGRATIONS_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS _migrations (
        version INTEGER PRIMARY KEY NOT NULL,
        applied_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );
"#;

/// Migration 1: Users, projects, follows, comments, chat
const MIGRATION_V1: &str = r#"
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        username TEXT NOT NULL UNIQUE,
        email TEXT NOT NULL UNIQUE,
        password_hash TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE TABLE IF NOT EXISTS projects (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        title TEXT NOT NULL,
        description TEXT NOT NULL,
        owner_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        updated_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        followers_count INTEGER NOT NULL DEFAULT 0 CHECK (followers_count >= 0)
    );

    CREATE INDEX IF NOT EXISTS idx_projects_owner_id ON projects(owner_id);

    -- Follow relation; "like" and "follow" both write here
    CREATE TABLE IF NOT EXISTS project_likes (
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        PRIMARY KEY (user_id, project_id)
    );

    CREATE INDEX IF NOT EXISTS idx_project_likes_project_id ON project_likes(project_id);

    CREATE TABLE IF NOT EXISTS project_comments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        project_id INTEGER NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
        user_id INTEGER REFERENCES users(id) ON DELETE SET NULL,
        content TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_project_comments_project_id ON project_comments(project_id);

    -- Username is a snapshot taken when the message was posted
    CREATE TABLE IF NOT EXISTS chat_messages (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER,
        username TEXT,
        content TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
    );

    CREATE INDEX IF NOT EXISTS idx_chat_messages_created_at ON chat_messages(created_at);
"#;

/// Migration 2: Login sessions
const MIGRATION_V2: &str = r#"
    CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY NOT NULL,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        username TEXT NOT NULL,
        created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP,
        expires_at TIMESTAMP NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_sessions_user_id ON sessions(user_id);
    CREATE INDEX IF NOT EXISTS idx_sessions_expires_at ON sessions(expires_at);
"#;

/// Ordered schema steps, ending at [`CURRENT_VERSION`]
const MIGRATIONS: &[(i32, &str, &str)] = &[
    (1, "users, projects, follows, comments, chat", MIGRATION_V1),
    (2, "login sessions", MIGRATION_V2),
];

async fn applied_version(pool: &SqlitePool) -> anyhow::Result<i32> {
    let (tracked,): (i64,) = sqlx::query_as(
        "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = '_migrations'",
    )
    .fetch_one(pool)
    .await?;
    if tracked == 0 {
        return Ok(0);
    }

    let (version,): (Option<i32>,) = sqlx::query_as("SELECT MAX(version) FROM _migrations")
        .fetch_one(pool)
        .await?;

    Ok(version.unwrap_or(0))
}

/// Apply every step newer than the recorded version, each in its own transaction
pub async fn run_migrations(pool: &SqlitePool) -> anyhow::Result<()> {
    sqlx::raw_sql(CREATE_MIGRATIONS_TABLE).execute(pool).await?;
    let from = applied_version(pool).await?;
    if from >= CURRENT_VERSION {
        tracing::debug!(version = from, "Schema up to date");
        return Ok(());
    }

    for &(version, summary, sql) in MIGRATIONS.iter().filter(|(v, _, _)| *v > from) {
        tracing::info!(version, summary, "Applying migration");

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(sql).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO _migrations (version) VALUES (?)")
            .bind(version)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
    }

    tracing::info!(from, to = CURRENT_VERSION, "Schema migrated");
    Ok(())
}

/// Read the recorded version without writing to the store
pub async fn migration_status(pool: &SqlitePool) -> anyhow::Result<MigrationStatus> {
    let current_version = applied_version(pool).await?;
    Ok(MigrationStatus {
        current_version,
        target_version: CURRENT_VERSION,
        needs_migration: current_version < CURRENT_VERSION,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationStatus {
    pub current_version: i32,
    pub target_version: i32,
    pub needs_migration: bool,
}
