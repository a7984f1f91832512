use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::utils::file::expand_path;

use super::cli::CliConfig;
use super::constants::{
    APP_DOT_FOLDER, CONFIG_FILE_NAME, DEFAULT_HOST, DEFAULT_PORT, DEFAULT_SEED_RESTAURANTS_URL,
    DEFAULT_SEED_USERS_URL, SQLITE_BUSY_TIMEOUT_SECS, SQLITE_MAX_CONNECTIONS,
};

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// Server configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct ServerFileConfig {
    pub host: Option<String>,
    pub port: Option<u16>,
}

/// Database configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct DatabaseFileConfig {
    /// SQLite connection URL (`sqlite://...`)
    pub url: Option<String>,
    pub max_connections: Option<u32>,
    pub busy_timeout_secs: Option<u64>,
}

/// Seed data configuration section
#[derive(Debug, Default, Clone, Deserialize)]
pub struct SeedFileConfig {
    pub restaurants_url: Option<String>,
    pub users_url: Option<String>,
}

/// Configuration file contents (all sections optional)
#[derive(Debug, Default, Clone, Deserialize)]
pub struct FileConfig {
    pub server: Option<ServerFileConfig>,
    pub database: Option<DatabaseFileConfig>,
    pub seed: Option<SeedFileConfig>,
    pub debug: Option<bool>,
    #[serde(flatten)]
    pub extra: serde_json::Value,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let serde_json::Value::Object(map) = &self.extra
            && !map.is_empty()
        {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .collect::<Vec<_>>()
                .join(", ");
            tracing::warn!(
                fields = %keys_str,
                "Unknown fields in config file (possible typos)"
            );
        }
    }

    /// Merge another FileConfig into this one (other takes precedence)
    fn merge(&mut self, other: FileConfig) {
        if let Some(server) = other.server {
            let current = self.server.get_or_insert_with(ServerFileConfig::default);
            if server.host.is_some() {
                tracing::trace!(host = ?server.host, "Merging server.host");
                current.host = server.host;
            }
            if server.port.is_some() {
                tracing::trace!(port = ?server.port, "Merging server.port");
                current.port = server.port;
            }
        }

        if let Some(database) = other.database {
            let current = self
                .database
                .get_or_insert_with(DatabaseFileConfig::default);
            if database.url.is_some() {
                tracing::trace!("Merging database.url");
                current.url = database.url;
            }
            if database.max_connections.is_some() {
                tracing::trace!(max_connections = ?database.max_connections, "Merging database.max_connections");
                current.max_connections = database.max_connections;
            }
            if database.busy_timeout_secs.is_some() {
                tracing::trace!(busy_timeout_secs = ?database.busy_timeout_secs, "Merging database.busy_timeout_secs");
                current.busy_timeout_secs = database.busy_timeout_secs;
            }
        }

        if let Some(seed) = other.seed {
            let current = self.seed.get_or_insert_with(SeedFileConfig::default);
            if seed.restaurants_url.is_some() {
                tracing::trace!(url = ?seed.restaurants_url, "Merging seed.restaurants_url");
                current.restaurants_url = seed.restaurants_url;
            }
            if seed.users_url.is_some() {
                tracing::trace!(url = ?seed.users_url, "Merging seed.users_url");
                current.users_url = seed.users_url;
            }
        }

        if other.debug.is_some() {
            self.debug = other.debug;
        }
    }
}

// =============================================================================
// Runtime Config Structs (final merged configuration)
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// SQLite configuration (final/runtime)
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Explicit connection URL; `None` uses the data directory
    pub url: Option<String>,
    pub max_connections: u32,
    pub busy_timeout_secs: u64,
}

/// Seed data sources (final/runtime)
#[derive(Debug, Clone)]
pub struct SeedConfig {
    pub restaurants_url: String,
    pub users_url: String,
}

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub seed: SeedConfig,
    pub debug: bool,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Profile directory config (~/.frenzy/frenzy.json)
    /// 3. Local directory config OR CLI-specified config path
    /// 4. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let mut file_config = FileConfig::default();
        let mut found_configs: Vec<String> = Vec::new();

        if let Some(profile_path) = get_profile_config_path()
            && profile_path.exists()
        {
            let profile_config = FileConfig::load_from_file(&profile_path)?;
            profile_config.warn_unknown_fields();
            file_config.merge(profile_config);
            found_configs.push(profile_path.display().to_string());
        }

        let overlay_path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        if let Some(path) = overlay_path {
            let overlay_config = FileConfig::load_from_file(&path)?;
            overlay_config.warn_unknown_fields();
            file_config.merge(overlay_config);
            found_configs.push(path.display().to_string());
        }

        tracing::debug!(configs = ?found_configs, "Config files loaded");

        let file_server = file_config.server.unwrap_or_default();
        let file_database = file_config.database.unwrap_or_default();
        let file_seed = file_config.seed.unwrap_or_default();

        let host = cli
            .host
            .clone()
            .or(file_server.host)
            .unwrap_or_else(|| DEFAULT_HOST.to_string());
        let port = cli.port.or(file_server.port).unwrap_or(DEFAULT_PORT);

        let database = DatabaseConfig {
            url: cli.database_url.clone().or(file_database.url),
            max_connections: cli
                .database_max_connections
                .or(file_database.max_connections)
                .unwrap_or(SQLITE_MAX_CONNECTIONS),
            busy_timeout_secs: file_database
                .busy_timeout_secs
                .unwrap_or(SQLITE_BUSY_TIMEOUT_SECS),
        };

        let seed = SeedConfig {
            restaurants_url: cli
                .seed_restaurants_url
                .clone()
                .or(file_seed.restaurants_url)
                .unwrap_or_else(|| DEFAULT_SEED_RESTAURANTS_URL.to_string()),
            users_url: cli
                .seed_users_url
                .clone()
                .or(file_seed.users_url)
                .unwrap_or_else(|| DEFAULT_SEED_USERS_URL.to_string()),
        };

        let debug = cli.debug || file_config.debug.unwrap_or(false);

        let config = Self {
            server: ServerConfig { host, port },
            database,
            seed,
            debug,
        };
        config.validate()?;

        tracing::debug!(
            host = %config.server.host,
            port = config.server.port,
            max_connections = config.database.max_connections,
            debug = config.debug,
            "Configuration loaded"
        );
        Ok(config)
    }

    /// Validate the configuration for consistency and correctness
    fn validate(&self) -> Result<()> {
        if self.server.host.is_empty() {
            anyhow::bail!("Configuration error: server.host must not be empty");
        }

        if self.server.port == 0 {
            anyhow::bail!("Configuration error: server.port must be greater than 0");
        }

        if self.database.max_connections == 0 {
            anyhow::bail!("Configuration error: database.max_connections must be greater than 0");
        }

        if let Some(ref url) = self.database.url
            && !url.starts_with("sqlite:")
        {
            anyhow::bail!(
                "Configuration error: database.url must be a sqlite: URL. Got: {}",
                url
            );
        }

        for (field, url) in [
            ("seed.restaurants_url", &self.seed.restaurants_url),
            ("seed.users_url", &self.seed.users_url),
        ] {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                anyhow::bail!(
                    "Configuration error: {} must start with http:// or https://. Got: {}",
                    field,
                    url
                );
            }
        }

        if is_all_interfaces(&self.server.host) {
            tracing::warn!(
                host = %self.server.host,
                "Binding to all network interfaces"
            );
        }

        Ok(())
    }
}

/// Get the profile config path (~/.frenzy/frenzy.json)
fn get_profile_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|h| h.join(APP_DOT_FOLDER).join(CONFIG_FILE_NAME))
}

/// Check if host binds to all network interfaces
pub(crate) fn is_all_interfaces(host: &str) -> bool {
    matches!(host, "0.0.0.0" | "::" | "[::]")
}
