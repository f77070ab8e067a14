//! Process configuration: built-in defaults, then an optional TOML file named by
//! `KEEVIQO_CONFIG`, then individual environment variable overrides.

use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use super::catalog::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

pub const CONFIG_PATH_ENV: &str = "KEEVIQO_CONFIG";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config file: {0}")]
    Toml(#[from] toml::de::Error),
    #[error("invalid value for {key}: {value:?}")]
    InvalidEnv { key: &'static str, value: String },
}

/// Admin login. `password_hash` is an Argon2 PHC string, never a plain password.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AdminCredentials {
    pub username: String,
    pub password_hash: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    pub host: String,
    pub port: u16,
    pub database_url: String,
    /// Catalog files tried in order at startup
    pub catalog_paths: Vec<PathBuf>,
    pub upload_dir: PathBuf,
    pub default_page_size: usize,
    pub max_page_size: usize,
    pub max_upload_bytes: usize,
    pub admin: Option<AdminCredentials>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3000,
            database_url: "sqlite://keeviqo.db".to_string(),
            catalog_paths: vec![
                PathBuf::from("data/categories.json"),
                PathBuf::from("data/keeviqo_categories.json"),
                PathBuf::from("public/data/categories.json"),
            ],
            upload_dir: PathBuf::from("uploads"),
            default_page_size: DEFAULT_PAGE_SIZE,
            max_page_size: MAX_PAGE_SIZE,
            max_upload_bytes: 10 * 1024 * 1024,
            admin: None,
        }
    }
}

impl Config {
    /// Load from the process environment
    pub fn load() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(toml::from_str(&raw)?)
    }

    /// Build a config from an environment-like lookup function
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut config = match lookup(CONFIG_PATH_ENV) {
            Some(path) => {
                info!(path = %path, "Reading config file");
                Self::from_file(Path::new(&path))?
            }
            None => Self::default(),
        };
        config.apply_overrides(lookup)?;
        Ok(config)
    }

    fn apply_overrides(
        &mut self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<(), ConfigError> {
        if let Some(host) = lookup("HOST") {
            self.host = host;
        }
        if let Some(port) = parse_var(&lookup, "PORT")? {
            self.port = port;
        }
        if let Some(url) = lookup("DATABASE_URL") {
            self.database_url = url;
        }
        if let Some(paths) = lookup("KEEVIQO_CATALOG_PATHS") {
            self.catalog_paths = std::env::split_paths(&paths).collect();
        }
        if let Some(dir) = lookup("KEEVIQO_UPLOAD_DIR") {
            self.upload_dir = PathBuf::from(dir);
        }
        if let Some(size) = parse_var(&lookup, "KEEVIQO_DEFAULT_PAGE_SIZE")? {
            self.default_page_size = size;
        }
        if let Some(size) = parse_var(&lookup, "KEEVIQO_MAX_PAGE_SIZE")? {
            self.max_page_size = size;
        }
        if let Some(bytes) = parse_var(&lookup, "KEEVIQO_MAX_UPLOAD_BYTES")? {
            self.max_upload_bytes = bytes;
        }
        if let (Some(username), Some(password_hash)) = (
            lookup("KEEVIQO_ADMIN_USER"),
            lookup("KEEVIQO_ADMIN_PASSWORD_HASH"),
        ) {
            self.admin = Some(AdminCredentials {
                username,
                password_hash,
            });
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &'static str,
) -> Result<Option<T>, ConfigError> {
    lookup(key)
        .map(|value| {
            value
                .trim()
                .parse()
                .map_err(|_| ConfigError::InvalidEnv { key, value })
        })
        .transpose()
}
