//! Showcase - community project showcase with a rotating front page

use anyhow::Context;
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use showcase_core::commands::{SessionRepository, front_page};
use showcase_core::config::Config;
use showcase_core::storage::{Database, DatabaseConfig};
use showcase_server::AppState;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "showcase")]
#[command(author, version, about = "Community project showcase", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Quiet mode (minimal output)
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP server
    Serve {
        /// Address to bind (overrides server.host)
        #[arg(long)]
        host: Option<String>,
        /// Port to bind (overrides server.port)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Print the front-page feed as JSON
    Feed {
        /// Explicit seed
        #[arg(long, conflicts_with = "at")]
        seed: Option<i64>,
        /// Derive the seed from this instant (RFC 3339)
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        /// Override feed.page_size
        #[arg(short, long)]
        limit: Option<usize>,
    },

    /// Configuration management
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Run health check
    Doctor,
}

#[derive(Subcommand)]
enum ConfigAction {
    /// Get a config value
    Get { key: String },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("showcase=info".parse()?)
                .add_directive("showcase_server=info".parse()?)
                .add_directive("showcase_core=info".parse()?),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { host, port } => cmd_serve(host, port).await,
        Commands::Feed { seed, at, limit } => cmd_feed(seed, at, limit).await,
        Commands::Config { action } => cmd_config(action),
        Commands::Doctor => cmd_doctor(cli.quiet).await,
    }
}

async fn open_database(config: &Config) -> anyhow::Result<Database> {
    Database::new(DatabaseConfig::from(&config.database)).await
}

async fn cmd_serve(host: Option<String>, port: Option<u16>) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let db = open_database(&config).await?;
    SessionRepository::new(&db).purge_expired().await?;

    if !config.server.public_dir.is_dir() {
        warn!(
            path = %config.server.public_dir.display(),
            "Public directory not found; pages will return 404"
        );
    }

    info!(
        database = %db.path().display(),
        strategy = config.feed.strategy.as_str(),
        page_size = config.feed.page_size,
        "Starting server"
    );
    showcase_server::serve(AppState::new(db, config)).await
}

async fn cmd_feed(
    seed: Option<i64>,
    at: Option<DateTime<Utc>>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let mut config = Config::load()?;
    if let Some(limit) = limit {
        config.feed.page_size = limit;
        config.validate()?;
    }

    let selector = config.feed.selector();
    let seed = seed.unwrap_or_else(|| selector.seed_at(at.unwrap_or_else(Utc::now)));

    let db = open_database(&config).await?;
    let page = front_page(&db, &selector, seed).await?;
    db.close().await;

    let output = serde_json::json!({
        "seed": seed,
        "strategy": selector.strategy().as_str(),
        "projects": page,
    });
    println!(
        "{}",
        serde_json::to_string_pretty(&output).context("Failed to encode feed")?
    );
    Ok(())
}

fn cmd_config(action: ConfigAction) -> anyhow::Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = Config::load()?;
            let value = config.get(&key)?;
            println!("{}", value);
        }
        ConfigAction::List => {
            let config = Config::load()?;
            for (key, value) in config.list()? {
                println!("{} = {}", key, value);
            }
        }
        ConfigAction::Path => {
            let path = Config::config_path()?;
            println!("{}", path.display());
        }
    }
    Ok(())
}

async fn cmd_doctor(quiet: bool) -> anyhow::Result<()> {
    if !quiet {
        println!("Showcase Health Check");
        println!("=====================");
        println!();
    }

    let mut all_ok = true;

    let config = match Config::load() {
        Ok(config) => {
            if !quiet {
                println!("[OK] Configuration: Valid");
            }
            config
        }
        Err(e) => {
            if !quiet {
                println!("[!!] Configuration: Error - {:#}", e);
            }
            anyhow::bail!("Health check failed");
        }
    };

    if !quiet {
        match Config::config_path() {
            Ok(path) if path.exists() => println!("[OK] Config file: {}", path.display()),
            Ok(path) => println!("[--] Config file: {} (using defaults)", path.display()),
            Err(e) => println!("[!!] Config file: Error - {}", e),
        }
    }

    let public_dir = &config.server.public_dir;
    if public_dir.is_dir() {
        if !quiet {
            println!("[OK] Public directory: {}", public_dir.display());
        }
    } else {
        all_ok = false;
        if !quiet {
            println!("[!!] Public directory: {} (missing)", public_dir.display());
        }
    }

    let db_config = DatabaseConfig::from(&config.database).auto_migrate(false);
    let opened = if !db_config.is_memory() && !db_config.path.exists() {
        Err(anyhow::anyhow!(
            "{} not found (run `showcase serve` to create it)",
            db_config.path.display()
        ))
    } else {
        Database::new(db_config).await
    };

    match opened {
        Ok(db) => {
            match db.health_check().await {
                Ok(()) => {
                    if !quiet {
                        println!("[OK] Database: Connected");
                        println!("     Path: {}", db.path().display());
                    }
                }
                Err(e) => {
                    all_ok = false;
                    if !quiet {
                        println!("[!!] Database: Error - {:#}", e);
                    }
                }
            }

            match db.migration_status().await {
                Ok(status) if status.needs_migration => {
                    all_ok = false;
                    if !quiet {
                        println!(
                            "[!!] Database: Migrations pending (v{} -> v{})",
                            status.current_version, status.target_version
                        );
                    }
                }
                Ok(status) => {
                    if !quiet {
                        println!("[OK] Database: Schema v{}", status.current_version);
                    }
                }
                Err(e) => {
                    all_ok = false;
                    if !quiet {
                        println!("[!!] Database: Migration check failed - {:#}", e);
                    }
                }
            }
            db.close().await;
        }
        Err(e) => {
            all_ok = false;
            if !quiet {
                println!("[!!] Database: Error - {:#}", e);
            }
        }
    }

    if !quiet {
        println!();
        if all_ok {
            println!("All checks passed.");
        } else {
            println!("Some checks failed.");
        }
    }

    if all_ok {
        Ok(())
    } else {
        anyhow::bail!("Health check failed")
    }
}
