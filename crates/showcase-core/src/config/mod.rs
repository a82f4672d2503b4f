//! Configuration management with file persistence

use anyhow::{Context, anyhow};
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::PathBuf;

use crate::feed::{FeedSelector, SeedStrategy};

/// Longest session lifetime `validate` accepts (ten years)
pub const MAX_SESSION_TTL_HOURS: i64 = 24 * 365 * 10;

/// Showcase configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseSettings,
    pub feed: FeedConfig,
    pub chat: ChatConfig,
    pub session: SessionConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub public_dir: PathBuf,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub path: PathBuf,
    pub max_connections: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FeedConfig {
    pub page_size: usize,
    pub strategy: SeedStrategy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ChatConfig {
    pub history_limit: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub cookie_name: String,
    pub ttl_hours: i64,
    pub secure_cookie: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            public_dir: PathBuf::from("public"),
        }
    }
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            path: crate::storage::database::default_database_path(),
            max_connections: 5,
        }
    }
}

impl Default for FeedConfig {
    fn default() -> Self {
        Self {
            page_size: crate::feed::DEFAULT_PAGE_SIZE,
            strategy: SeedStrategy::Hourly,
        }
    }
}

impl Default for ChatConfig {
    fn default() -> Self {
        Self { history_limit: 20 }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            cookie_name: "showcase_session".to_string(),
            ttl_hours: 24 * 7,
            secure_cookie: false,
        }
    }
}

impl FeedConfig {
    /// Build the selector described by this section
    pub fn selector(&self) -> FeedSelector {
        FeedSelector::new(self.page_size, self.strategy)
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> anyhow::Result<PathBuf> {
        let dir = if let Ok(custom_dir) = env::var("SHOWCASE_CONFIG_DIR") {
            PathBuf::from(custom_dir)
        } else {
            dirs::config_dir()
                .ok_or_else(|| anyhow!("Could not determine config directory"))?
                .join("showcase")
        };
        Ok(dir)
    }

    /// Get the config file path
    pub fn config_path() -> anyhow::Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Load configuration from file (or defaults) and apply environment overrides
    pub fn load() -> anyhow::Result<Self> {
        let path = Self::config_path()?;

        let mut config = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            Config::default()
        };

        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from TOML text without touching the environment
    pub fn from_toml(contents: &str) -> anyhow::Result<Self> {
        let config: Config = toml::from_str(contents)?;
        Ok(config)
    }

    /// Apply `PORT`, `SHOWCASE_DATABASE_PATH` and `SHOWCASE_PUBLIC_DIR`
    pub fn apply_env_overrides(&mut self) -> anyhow::Result<()> {
        if let Ok(port) = env::var("PORT") {
            self.set("server.port", &port)?;
        }
        if let Ok(path) = env::var("SHOWCASE_DATABASE_PATH") {
            self.set("database.path", &path)?;
        }
        if let Ok(dir) = env::var("SHOWCASE_PUBLIC_DIR") {
            self.set("server.public_dir", &dir)?;
        }
        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> anyhow::Result<()> {
        if !(1..=100).contains(&self.feed.page_size) {
            return Err(anyhow!("feed.page_size must be between 1 and 100"));
        }
        if !(1..=500).contains(&self.chat.history_limit) {
            return Err(anyhow!("chat.history_limit must be between 1 and 500"));
        }
        if !(1..=MAX_SESSION_TTL_HOURS).contains(&self.session.ttl_hours) {
            return Err(anyhow!(
                "session.ttl_hours must be between 1 and {}",
                MAX_SESSION_TTL_HOURS
            ));
        }
        if self.session.cookie_name.trim().is_empty() {
            return Err(anyhow!("session.cookie_name must not be empty"));
        }
        if self.database.max_connections == 0 {
            return Err(anyhow!("database.max_connections must be at least 1"));
        }
        Ok(())
    }

    /// Address the server binds to
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }

    /// Get a configuration value by key
    pub fn get(&self, key: &str) -> anyhow::Result<String> {
        match key {
            "server.host" => Ok(self.server.host.clone()),
            "server.port" => Ok(self.server.port.to_string()),
            "server.public_dir" => Ok(self.server.public_dir.display().to_string()),

            "database.path" => Ok(self.database.path.display().to_string()),
            "database.max_connections" => Ok(self.database.max_connections.to_string()),

            "feed.page_size" => Ok(self.feed.page_size.to_string()),
            "feed.strategy" => Ok(self.feed.strategy.as_str().to_string()),

            "chat.history_limit" => Ok(self.chat.history_limit.to_string()),

            "session.cookie_name" => Ok(self.session.cookie_name.clone()),
            "session.ttl_hours" => Ok(self.session.ttl_hours.to_string()),
            "session.secure_cookie" => Ok(self.session.secure_cookie.to_string()),

            _ => Err(anyhow!(
                "Unknown configuration key: {}. Use `showcase config list` to see available keys.",
                key
            )),
        }
    }

    /// Set a configuration value by key
    pub fn set(&mut self, key: &str, value: &str) -> anyhow::Result<()> {
        match key {
            "server.host" => self.server.host = value.to_string(),
            "server.port" => {
                self.server.port = value
                    .parse()
                    .with_context(|| format!("Invalid server.port value: {}", value))?;
            }
            "server.public_dir" => self.server.public_dir = PathBuf::from(value),

            "database.path" => self.database.path = PathBuf::from(value),
            "database.max_connections" => {
                self.database.max_connections = value
                    .parse()
                    .with_context(|| format!("Invalid database.max_connections value: {}", value))?;
            }

            "feed.page_size" => {
                self.feed.page_size = value
                    .parse()
                    .with_context(|| format!("Invalid feed.page_size value: {}", value))?;
            }
            "feed.strategy" => {
                self.feed.strategy = SeedStrategy::parse(value).ok_or_else(|| {
                    anyhow!("Invalid feed strategy: {}. Valid options: hourly, fixed", value)
                })?;
            }

            "chat.history_limit" => {
                self.chat.history_limit = value
                    .parse()
                    .with_context(|| format!("Invalid chat.history_limit value: {}", value))?;
            }

            "session.cookie_name" => self.session.cookie_name = value.to_string(),
            "session.ttl_hours" => {
                self.session.ttl_hours = value
                    .parse()
                    .with_context(|| format!("Invalid session.ttl_hours value: {}", value))?;
            }
            "session.secure_cookie" => {
                self.session.secure_cookie = value
                    .parse()
                    .with_context(|| format!("Invalid session.secure_cookie value: {}", value))?;
            }

            _ => {
                return Err(anyhow!(
                    "Unknown configuration key: {}. Use `showcase config list` to see available keys.",
                    key
                ));
            }
        }
        Ok(())
    }

    /// List all configuration keys and their values
    pub fn list(&self) -> anyhow::Result<Vec<(String, String)>> {
        let keys = [
            "server.host",
            "server.port",
            "server.public_dir",
            "database.path",
            "database.max_connections",
            "feed.page_size",
            "feed.strategy",
            "chat.history_limit",
            "session.cookie_name",
            "session.ttl_hours",
            "session.secure_cookie",
        ];

        keys.into_iter()
            .map(|key| {
                let value = self.get(key)?;
                Ok((key.to_string(), value))
            })
            .collect()
    }
}
