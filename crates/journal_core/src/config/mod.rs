//! Startup configuration.
//!
//! # Responsibility
//! - Resolve backend, logging and display settings from an ordered provider chain.
//! - Fail fast, before any request is served, when required keys are missing.
//!
//! # Invariants
//! - Resolution happens once; the result is an immutable `AppConfig`.
//! - An absent secrets file is not an error; a malformed one is.

use crate::display::{parse_utc_offset, DisplaySettings};
use crate::logging::{default_log_level, normalize_level};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

mod provider;

pub use provider::{
    ConfigChain, ConfigProvider, EnvProvider, MapProvider, SecretsFileProvider, ENV_PREFIX,
};

/// Default secrets file location, relative to the working directory.
pub const DEFAULT_SECRETS_PATH: &str = ".journal/secrets.toml";

pub const KEY_BACKEND: &str = "backend";
pub const KEY_DBNAME: &str = "dbname";
pub const KEY_LOG_LEVEL: &str = "log_level";
pub const KEY_LOG_DIR: &str = "log_dir";
pub const KEY_DISPLAY_OFFSET: &str = "display_offset";

/// Fatal startup configuration problem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    MissingKey(&'static str),
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    SecretsFile {
        path: PathBuf,
        message: String,
    },
}

impl Display for ConfigError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingKey(key) => write!(
                f,
                "missing required configuration `{key}` (set it in the secrets file or {ENV_PREFIX}{})",
                key.to_ascii_uppercase()
            ),
            Self::InvalidValue { key, value, reason } => {
                write!(f, "invalid configuration `{key}` = `{value}`: {reason}")
            }
            Self::SecretsFile { path, message } => {
                write!(f, "cannot read secrets file `{}`: {message}", path.display())
            }
        }
    }
}

impl Error for ConfigError {}

/// Where entries are persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreBackend {
    /// Durable relational storage in a SQLite file.
    Sqlite { path: PathBuf },
    /// Volatile, process-lifetime storage. Entries vanish on exit.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub backend: StoreBackend,
    pub log_level: &'static str,
    /// File logging is enabled only when set.
    pub log_dir: Option<PathBuf>,
    pub display: DisplaySettings,
}

impl AppConfig {
    /// Resolves the standard chain: secrets file first, then environment.
    pub fn load(secrets_path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let chain = ConfigChain::new()
            .push(SecretsFileProvider::load(secrets_path)?)
            .push(EnvProvider::new());
        Self::resolve(&chain)
    }

    /// Resolves settings from an arbitrary provider chain.
    ///
    /// # Errors
    /// - `MissingKey("dbname")` for the sqlite backend without a database path.
    /// - `InvalidValue` for an unknown backend, log level, relative log dir or bad offset.
    pub fn resolve(chain: &ConfigChain) -> Result<Self, ConfigError> {
        let backend = match chain.get(KEY_BACKEND) {
            None => resolve_sqlite(chain)?,
            Some(value) => match value.to_ascii_lowercase().as_str() {
                "sqlite" => resolve_sqlite(chain)?,
                "memory" => StoreBackend::Memory,
                _ => {
                    return Err(ConfigError::InvalidValue {
                        key: KEY_BACKEND,
                        value,
                        reason: "expected `sqlite` or `memory`".to_string(),
                    })
                }
            },
        };

        let log_level = match chain.get(KEY_LOG_LEVEL) {
            Some(value) => normalize_level(&value).map_err(|err| ConfigError::InvalidValue {
                key: KEY_LOG_LEVEL,
                value,
                reason: err.to_string(),
            })?,
            None => default_log_level(),
        };

        let log_dir = match chain.get(KEY_LOG_DIR) {
            Some(value) if !Path::new(&value).is_absolute() => {
                return Err(ConfigError::InvalidValue {
                    key: KEY_LOG_DIR,
                    value,
                    reason: "must be an absolute path".to_string(),
                })
            }
            Some(value) => Some(PathBuf::from(value)),
            None => None,
        };

        let display = match chain.get(KEY_DISPLAY_OFFSET) {
            Some(value) => DisplaySettings {
                offset: parse_utc_offset(&value).map_err(|err| ConfigError::InvalidValue {
                    key: KEY_DISPLAY_OFFSET,
                    value,
                    reason: err.to_string(),
                })?,
            },
            None => DisplaySettings::default(),
        };

        Ok(Self {
            backend,
            log_level,
            log_dir,
            display,
        })
    }
}

fn resolve_sqlite(chain: &ConfigChain) -> Result<StoreBackend, ConfigError> {
    let path = chain
        .get(KEY_DBNAME)
        .ok_or(ConfigError::MissingKey(KEY_DBNAME))?;
    Ok(StoreBackend::Sqlite {
        path: PathBuf::from(path),
    })
}
