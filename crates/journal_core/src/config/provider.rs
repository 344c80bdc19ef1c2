//! Configuration value providers.
//!
//! # Responsibility
//! - Expose key lookups over the secrets file, environment and in-memory maps.
//! - Combine providers into an ordered chain where the first non-empty value wins.

use super::ConfigError;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Prefix applied to keys when reading environment variables.
pub const ENV_PREFIX: &str = "JOURNAL_";

/// Optional table inside the secrets file holding journal keys.
const SECRETS_SECTION: &str = "journal";

/// One source of raw configuration values.
pub trait ConfigProvider {
    /// Short source label used in diagnostics.
    fn name(&self) -> &str;

    /// Raw value for `key`, if this source defines one.
    fn get(&self, key: &str) -> Option<String>;
}

/// Values read from a TOML secrets file.
///
/// Top-level scalars are read first; scalars under `[journal]` fill in keys
/// the top level does not define.
#[derive(Debug, Clone, Default)]
pub struct SecretsFileProvider {
    path: PathBuf,
    values: BTreeMap<String, String>,
}

impl SecretsFileProvider {
    /// Loads `path`. A missing file yields an empty provider so that the
    /// environment can still supply every key.
    ///
    /// # Errors
    /// - `SecretsFile` when the file exists but cannot be read or parsed.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref().to_path_buf();
        if !path.exists() {
            return Ok(Self {
                path,
                values: BTreeMap::new(),
            });
        }

        let raw = std::fs::read_to_string(&path).map_err(|err| ConfigError::SecretsFile {
            path: path.clone(),
            message: err.to_string(),
        })?;
        Self::from_toml_str(path, &raw)
    }

    /// Parses secrets already held in memory; `path` is kept for diagnostics.
    pub fn from_toml_str(path: impl Into<PathBuf>, raw: &str) -> Result<Self, ConfigError> {
        let path = path.into();
        let root: toml::Table = toml::from_str(raw).map_err(|err| ConfigError::SecretsFile {
            path: path.clone(),
            message: err.to_string(),
        })?;

        let mut values = BTreeMap::new();
        collect_scalars(&root, &mut values);
        if let Some(toml::Value::Table(section)) = root.get(SECRETS_SECTION) {
            let mut nested = BTreeMap::new();
            collect_scalars(section, &mut nested);
            for (key, value) in nested {
                values.entry(key).or_insert(value);
            }
        }

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ConfigProvider for SecretsFileProvider {
    fn name(&self) -> &str {
        "secrets"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

fn collect_scalars(table: &toml::Table, out: &mut BTreeMap<String, String>) {
    for (key, value) in table {
        let text = match value {
            toml::Value::String(text) => text.clone(),
            toml::Value::Integer(number) => number.to_string(),
            toml::Value::Float(number) => number.to_string(),
            toml::Value::Boolean(flag) => flag.to_string(),
            _ => continue,
        };
        out.insert(key.clone(), text);
    }
}

/// Values read from `<prefix><KEY>` environment variables.
#[derive(Debug, Clone)]
pub struct EnvProvider {
    prefix: String,
}

impl EnvProvider {
    pub fn new() -> Self {
        Self::with_prefix(ENV_PREFIX)
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }

    fn variable_name(&self, key: &str) -> String {
        format!("{}{}", self.prefix, key.to_ascii_uppercase())
    }
}

impl Default for EnvProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl ConfigProvider for EnvProvider {
    fn name(&self) -> &str {
        "env"
    }

    fn get(&self, key: &str) -> Option<String> {
        std::env::var(self.variable_name(key)).ok()
    }
}

/// Fixed in-memory values, for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct MapProvider {
    values: BTreeMap<String, String>,
}

impl MapProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(key.into(), value.into());
        self
    }
}

impl ConfigProvider for MapProvider {
    fn name(&self) -> &str {
        "map"
    }

    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }
}

/// Ordered provider list; earlier providers take precedence.
#[derive(Default)]
pub struct ConfigChain {
    providers: Vec<Box<dyn ConfigProvider>>,
}

impl ConfigChain {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, provider: impl ConfigProvider + 'static) -> Self {
        self.providers.push(Box::new(provider));
        self
    }

    pub fn len(&self) -> usize {
        self.providers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }

    /// Trimmed value from the first provider holding a non-empty one,
    /// with that provider's name.
    pub fn lookup(&self, key: &str) -> Option<(String, &str)> {
        self.providers.iter().find_map(|provider| {
            let value = provider.get(key)?;
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some((trimmed.to_string(), provider.name()))
            }
        })
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lookup(key).map(|(value, _)| value)
    }
}
