//! Layered configuration for the `taskledger` server.
//!
//! Values are resolved with the following priority (highest first):
//! 1. CLI arguments
//! 2. Environment variables (via clap `env` attributes)
//! 3. TOML config file (`<config_dir>/taskledger/config.toml`)
//! 4. Compiled defaults

use serde::Deserialize;
use std::path::{Path, PathBuf};
use thiserror::Error;

const DEFAULT_BIND_ADDR: &str = "0.0.0.0:5000";
const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_MAX_POOL_SIZE: u32 = 10;

/// Errors raised while loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The configuration file is not valid TOML for this schema.
    #[error("failed to parse config file: {0}")]
    ParseToml(#[from] toml::de::Error),

    /// The database pool was configured with no connections.
    #[error("max_pool_size must be at least 1")]
    ZeroPoolSize,
}

/// Top-level TOML file layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    server: ServerSection,
    database: DatabaseSection,
}

/// `[server]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ServerSection {
    bind_addr: Option<String>,
    log_level: Option<String>,
    cors_allowed_origins: Option<Vec<String>>,
}

/// `[database]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct DatabaseSection {
    url: Option<String>,
    max_pool_size: Option<u32>,
}

/// CLI arguments for the server binary.
#[derive(clap::Parser, Debug, Default)]
#[command(version, about = "Task tracking service with an activity audit trail")]
pub struct ServerCliArgs {
    /// Address to bind the HTTP server to.
    #[arg(short, long, env = "TASKLEDGER_BIND")]
    pub bind: Option<String>,

    /// Path to the config file (default: `<config_dir>/taskledger/config.toml`).
    #[arg(short, long, env = "TASKLEDGER_CONFIG")]
    pub config: Option<PathBuf>,

    /// `PostgreSQL` connection URL. Storage is in-memory when unset.
    #[arg(long, env = "TASKLEDGER_DATABASE_URL")]
    pub database_url: Option<String>,

    /// Maximum number of pooled database connections.
    #[arg(long, env = "TASKLEDGER_MAX_POOL_SIZE")]
    pub max_pool_size: Option<u32>,

    /// Log level filter (trace, debug, info, warn, error).
    #[arg(long, env = "TASKLEDGER_LOG")]
    pub log_level: Option<String>,

    /// Origin allowed to make cross-origin requests. Repeatable.
    #[arg(long = "cors-origin", env = "TASKLEDGER_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Vec<String>,
}

/// `PostgreSQL` connection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseConfig {
    /// Connection URL.
    pub url: String,
    /// Maximum pool size.
    pub max_pool_size: u32,
}

/// Fully resolved server configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    /// Address to bind the server to.
    pub bind_addr: String,
    /// Log level filter string.
    pub log_level: String,
    /// Database settings; `None` selects in-memory storage.
    pub database: Option<DatabaseConfig>,
    /// Origins allowed by CORS; empty disables CORS.
    pub cors_allowed_origins: Vec<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_addr: DEFAULT_BIND_ADDR.to_owned(),
            log_level: DEFAULT_LOG_LEVEL.to_owned(),
            database: None,
            cors_allowed_origins: Vec::new(),
        }
    }
}

impl ServerConfig {
    /// Loads configuration by merging CLI args, env vars, and a TOML file.
    ///
    /// An explicit `--config` path that cannot be read is an error. Without
    /// one, the default path is tried and a missing file counts as empty.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the config file cannot be read or parsed,
    /// or if a database is selected with a pool size of zero.
    pub fn load(cli: &ServerCliArgs) -> Result<Self, ConfigError> {
        let file = load_config_file(cli.config.as_deref())?;
        Self::resolve(cli, file)
    }

    fn resolve(cli: &ServerCliArgs, file: ConfigFile) -> Result<Self, ConfigError> {
        let defaults = Self::default();
        let ConfigFile {
            server,
            database: database_section,
        } = file;

        let database = resolve_database(cli, database_section)?;
        let cors_allowed_origins = if cli.cors_origins.is_empty() {
            server
                .cors_allowed_origins
                .unwrap_or(defaults.cors_allowed_origins)
        } else {
            cli.cors_origins.clone()
        };

        Ok(Self {
            bind_addr: cli
                .bind
                .clone()
                .or(server.bind_addr)
                .unwrap_or(defaults.bind_addr),
            log_level: cli
                .log_level
                .clone()
                .or(server.log_level)
                .unwrap_or(defaults.log_level),
            database,
            cors_allowed_origins,
        })
    }
}

fn resolve_database(
    cli: &ServerCliArgs,
    section: DatabaseSection,
) -> Result<Option<DatabaseConfig>, ConfigError> {
    let Some(url) = cli.database_url.clone().or(section.url) else {
        return Ok(None);
    };
    let max_pool_size = cli
        .max_pool_size
        .or(section.max_pool_size)
        .unwrap_or(DEFAULT_MAX_POOL_SIZE);
    // r2d2 panics on a zero-sized pool.
    if max_pool_size == 0 {
        return Err(ConfigError::ZeroPoolSize);
    }
    Ok(Some(DatabaseConfig { url, max_pool_size }))
}

fn load_config_file(explicit_path: Option<&Path>) -> Result<ConfigFile, ConfigError> {
    if let Some(path) = explicit_path {
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        return Ok(toml::from_str(&contents)?);
    }

    let Some(config_dir) = dirs::config_dir() else {
        return Ok(ConfigFile::default());
    };
    let path = config_dir.join("taskledger").join("config.toml");
    match std::fs::read_to_string(&path) {
        Ok(contents) => Ok(toml::from_str(&contents)?),
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(ConfigFile::default()),
        Err(source) => Err(ConfigError::ReadFile { path, source }),
    }
}
