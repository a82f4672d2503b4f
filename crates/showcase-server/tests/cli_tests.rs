//! CLI integration tests for showcase
//!
//! Every test points the binary at its own config directory and database
//! file so nothing touches the user's real data.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use showcase_core::commands::{ProjectRepository, UserRepository};
use showcase_core::storage::{Database, DatabaseConfig};
use tempfile::TempDir;

struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        Self {
            dir: TempDir::new().expect("Failed to create temp dir"),
        }
    }

    fn db_path(&self) -> std::path::PathBuf {
        self.dir.path().join("data").join("showcase.db")
    }

    #[allow(deprecated)]
    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("showcase").unwrap();
        cmd.env("SHOWCASE_CONFIG_DIR", self.dir.path())
            .env("SHOWCASE_DATABASE_PATH", self.db_path())
            .env("SHOWCASE_PUBLIC_DIR", self.dir.path())
            .env_remove("PORT")
            .env("RUST_LOG", "error");
        cmd
    }

    fn write_config(&self, contents: &str) {
        std::fs::write(self.dir.path().join("config.toml"), contents)
            .expect("Failed to write config");
    }

    async fn open_store(&self) -> Database {
        Database::new(DatabaseConfig::with_path(self.db_path()))
            .await
            .expect("Failed to open database")
    }

    async fn seed_projects(&self, count: usize) {
        let db = self.open_store().await;
        let owner = UserRepository::new(&db)
            .create("ada", "ada@example.com", "pw")
            .await
            .expect("Failed to create user");
        let repo = ProjectRepository::new(&db);
        for n in 1..=count {
            repo.create(owner, &format!("Project {n}"), "d")
                .await
                .expect("Failed to create project");
        }
        db.close().await;
    }

    fn feed_ids(&self, args: &[&str]) -> (i64, Vec<i64>) {
        let output = self.cmd().arg("feed").args(args).output().unwrap();
        assert!(output.status.success(), "feed failed: {:?}", output);

        let json: Value = serde_json::from_slice(&output.stdout).expect("feed prints JSON");
        let ids = json["projects"]
            .as_array()
            .unwrap()
            .iter()
            .map(|p| p["id"].as_i64().unwrap())
            .collect();
        (json["seed"].as_i64().unwrap(), ids)
    }
}

#[test]
fn test_help() {
    Sandbox::new()
        .cmd()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("serve"))
        .stdout(predicate::str::contains("feed"));
}

#[test]
fn test_config_get_defaults() {
    let sandbox = Sandbox::new();

    sandbox
        .cmd()
        .args(["config", "get", "feed.page_size"])
        .assert()
        .success()
        .stdout("20\n");

    sandbox
        .cmd()
        .args(["config", "get", "feed.strategy"])
        .assert()
        .success()
        .stdout("hourly\n");
}

#[test]
fn test_config_get_unknown_key() {
    Sandbox::new()
        .cmd()
        .args(["config", "get", "feed.colour"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown configuration key"));
}

#[test]
fn test_config_file_and_env_overrides() {
    let sandbox = Sandbox::new();
    sandbox.write_config("[feed]\npage_size = 10\n\n[server]\nport = 8080\n");

    sandbox
        .cmd()
        .args(["config", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("feed.page_size = 10"))
        .stdout(predicate::str::contains("server.port = 8080"));

    sandbox
        .cmd()
        .env("PORT", "9090")
        .args(["config", "get", "server.port"])
        .assert()
        .success()
        .stdout("9090\n");
}

#[test]
fn test_invalid_config_is_rejected() {
    let sandbox = Sandbox::new();
    sandbox.write_config("[feed]\npage_size = 0\n");

    sandbox
        .cmd()
        .args(["config", "list"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("feed.page_size"));
}

#[test]
fn test_config_path() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .args(["config", "path"])
        .assert()
        .success()
        .stdout(predicate::str::contains("config.toml"));
}

#[test]
fn test_feed_on_empty_database() {
    let sandbox = Sandbox::new();
    let (seed, ids) = sandbox.feed_ids(&["--seed", "2024030110"]);
    assert_eq!(seed, 2_024_030_110);
    assert!(ids.is_empty());
}

#[tokio::test]
async fn test_feed_golden_order() {
    let sandbox = Sandbox::new();
    sandbox.seed_projects(5).await;

    let (_, ids) = sandbox.feed_ids(&["--seed", "2024030110"]);
    assert_eq!(ids, vec![3, 4, 5, 1, 2]);

    let (_, limited) = sandbox.feed_ids(&["--seed", "2024030110", "--limit", "2"]);
    assert_eq!(limited, vec![3, 4]);
}

#[tokio::test]
async fn test_feed_at_instant() {
    let sandbox = Sandbox::new();
    sandbox.seed_projects(10).await;

    let (seed, ids) = sandbox.feed_ids(&["--at", "2024-03-01T10:00:00Z"]);
    assert_eq!(seed, 20_240_311);
    assert_eq!(ids, vec![2, 1, 9, 3, 8, 5, 6, 10, 7, 4]);
}

#[tokio::test]
async fn test_feed_fixed_strategy() {
    let sandbox = Sandbox::new();
    sandbox.write_config("[feed]\nstrategy = \"fixed\"\n");
    sandbox.seed_projects(5).await;

    let (seed, ids) = sandbox.feed_ids(&["--at", "2030-12-31T23:00:00Z"]);
    assert_eq!(seed, 42);
    assert_eq!(ids, vec![4, 2, 1, 3, 5]);
}

#[tokio::test]
async fn test_doctor() {
    let sandbox = Sandbox::new();
    sandbox.open_store().await.close().await;

    sandbox
        .cmd()
        .arg("doctor")
        .assert()
        .success()
        .stdout(predicate::str::contains("[OK] Database: Connected"))
        .stdout(predicate::str::contains("[OK] Public directory"))
        .stdout(predicate::str::contains("[OK] Database: Schema v2"));
}

#[tokio::test]
async fn test_doctor_reports_pending_migrations_without_applying_them() {
    let sandbox = Sandbox::new();
    let db = sandbox.open_store().await;
    sqlx::raw_sql("DROP TABLE sessions; DELETE FROM _migrations WHERE version = 2;")
        .execute(db.pool())
        .await
        .expect("Failed to roll store back to v1");
    db.close().await;

    sandbox
        .cmd()
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains(
            "[!!] Database: Migrations pending (v1 -> v2)",
        ));

    let db = Database::new(DatabaseConfig::with_path(sandbox.db_path()).auto_migrate(false))
        .await
        .unwrap();
    assert_eq!(db.migration_status().await.unwrap().current_version, 1);
    db.close().await;
}

#[test]
fn test_doctor_reports_missing_database() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[!!] Database:"))
        .stdout(predicate::str::contains("not found"));

    assert!(!sandbox.db_path().exists());
}

#[test]
fn test_doctor_reports_missing_public_dir() {
    let sandbox = Sandbox::new();
    sandbox
        .cmd()
        .env("SHOWCASE_PUBLIC_DIR", sandbox.dir.path().join("nope"))
        .arg("doctor")
        .assert()
        .failure()
        .stdout(predicate::str::contains("[!!] Public directory"));
}
