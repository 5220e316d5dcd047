//! Merged configuration and where it came from.
//!
//! Every layer is a [`Value`] merged with [`mixin`], so config files follow
//! the same precedence rules as any other merge.

use chrono::{DateTime, Utc};
use deepmix_core::{mixin, Value};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

use super::defaults::BuiltinDefaults;
use crate::input::parse_toml;
use crate::namespace::{Namespace, NamespaceNames};
use crate::output::OutputSettings;

pub const SCHEMA_VERSION: u32 = 1;

/// Schema identifier
pub const SCHEMA_ID: &str = "deepmix/effective_config@1";

/// Project config path, relative to the working directory
pub const REPO_CONFIG_PATH: &str = ".deepmix.toml";

/// Config-file spellings of namespace keys and the key they stand for.
const NAMESPACE_KEY_ALIASES: &[(&str, &str)] = &[
    ("isObject", "is_object"),
    ("classifyIsObject", "is_object"),
    ("getType", "classify"),
];

/// Which layer a source belongs to
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Builtin,
    Host,
    Repo,
    Cli,
}

/// One layer that took part in the merge
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// Set for file layers only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    /// Hex SHA-256 of the file as read
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

impl ConfigSource {
    fn inline(origin: ConfigOrigin) -> Self {
        Self {
            origin,
            path: None,
            digest: None,
        }
    }
}

/// Typed view of the merged configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub namespace: NamespaceNames,

    #[serde(default)]
    pub output: OutputSettings,
}

/// Result of merging every config layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectiveConfig {
    /// Schema version
    pub schema_version: u32,

    /// Schema identifier
    pub schema_id: String,

    pub created_at: DateTime<Utc>,

    /// Merged layers as JSON
    pub config: serde_json::Value,

    /// Lowest precedence first
    pub sources: Vec<ConfigSource>,

    /// Typed settings derived from `config`
    #[serde(skip)]
    pub settings: Settings,
}

/// Host config location: `$HOME/.config/deepmix/config.toml`
pub fn default_host_config_path() -> Option<PathBuf> {
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config/deepmix/config.toml"))
}

impl EffectiveConfig {
    /// Merge builtin defaults, host file, repo file and CLI overrides.
    ///
    /// Missing files are skipped. Later layers win field by field.
    pub fn build(
        host_config_path: Option<&Path>,
        repo_config_path: Option<&Path>,
        cli_overrides: Option<Value>,
    ) -> Result<Self, ConfigError> {
        let mut layers = vec![BuiltinDefaults::default().to_value()];
        let mut sources = vec![ConfigSource::inline(ConfigOrigin::Builtin)];

        for (origin, path) in [
            (ConfigOrigin::Host, host_config_path),
            (ConfigOrigin::Repo, repo_config_path),
        ] {
            let Some(path) = path.filter(|p| p.exists()) else {
                continue;
            };
            let (value, digest) = read_layer(path)?;
            layers.push(value);
            sources.push(ConfigSource {
                origin,
                path: Some(path.display().to_string()),
                digest: Some(digest),
            });
        }

        if let Some(cli) = cli_overrides {
            layers.push(cli);
            sources.push(ConfigSource::inline(ConfigOrigin::Cli));
        }

        layers.iter_mut().for_each(normalize_namespace_keys);
        let config = mixin(&layers[0], &layers[1..])?.to_json();

        let settings: Settings = serde_json::from_value(config.clone())
            .map_err(|e| ConfigError::Parse(format!("invalid settings: {}", e)))?;
        Self::validate_settings(&settings)?;

        log::debug!("effective config built from {} source(s)", sources.len());

        Ok(Self {
            schema_version: SCHEMA_VERSION,
            schema_id: SCHEMA_ID.to_string(),
            created_at: Utc::now(),
            config,
            sources,
            settings,
        })
    }

    fn validate_settings(settings: &Settings) -> Result<(), ConfigError> {
        Namespace::with_names(&settings.namespace)
            .map(|_| ())
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    /// Namespace built from the configured names
    pub fn namespace(&self) -> Result<Namespace, ConfigError> {
        Namespace::with_names(&self.settings.namespace)
            .map_err(|e| ConfigError::Validation(e.to_string()))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Look up a dotted path such as `namespace.mixin`
    pub fn get(&self, path: &str) -> Option<&serde_json::Value> {
        let mut current = &self.config;
        for part in path.split('.') {
            current = current.get(part)?;
        }
        Some(current)
    }

    pub fn get_str(&self, path: &str) -> Option<&str> {
        self.get(path).and_then(|v| v.as_str())
    }

    pub fn get_bool(&self, path: &str) -> Option<bool> {
        self.get(path).and_then(|v| v.as_bool())
    }
}

/// Read one TOML layer and the SHA-256 of its raw bytes
fn read_layer(path: &Path) -> Result<(Value, String), ConfigError> {
    let bytes = fs::read(path).map_err(|e| ConfigError::Io(format!("{}: {}", path.display(), e)))?;
    let digest = hex::encode(Sha256::digest(&bytes));

    let text = std::str::from_utf8(&bytes)
        .map_err(|e| ConfigError::Parse(format!("{} is not UTF-8: {}", path.display(), e)))?;
    let value = parse_toml(text)
        .map_err(|e| ConfigError::Parse(format!("{}: {}", path.display(), e)))?;

    Ok((value, digest))
}

/// Rewrite alias spellings under `namespace` to their canonical keys
fn normalize_namespace_keys(layer: &mut Value) {
    let Value::Map(root) = layer else {
        return;
    };
    let Some(Value::Map(namespace)) = root.get_mut("namespace") else {
        return;
    };
    for (alias, canonical) in NAMESPACE_KEY_ALIASES {
        if let Some(value) = namespace.shift_remove(*alias) {
            namespace.insert(canonical.to_string(), value);
        }
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Merge error: {0}")]
    Merge(#[from] deepmix_core::Error),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::namespace::OperationKind;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_builtin_layer_only() {
        let config = EffectiveConfig::build(None, None, None).unwrap();

        assert_eq!(config.schema_version, SCHEMA_VERSION);
        assert_eq!(config.get_str("namespace.classify"), Some("getType"));
        assert_eq!(config.get_bool("output.pretty"), Some(true));
        assert_eq!(config.settings.output, OutputSettings::default());
    }

    #[test]
    fn test_cli_layer_overrides_single_field() {
        let cli = Value::from(json!({"output": {"canonical": true}}));

        let config = EffectiveConfig::build(None, None, Some(cli)).unwrap();

        assert!(config.settings.output.canonical);
        // untouched sibling keeps its default
        assert!(config.settings.output.pretty);
    }

    #[test]
    fn test_host_layer_from_toml() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[namespace]").unwrap();
        writeln!(temp, "getType = \"typeOf\"").unwrap();
        writeln!(temp, "[output]").unwrap();
        writeln!(temp, "pretty = false").unwrap();

        let config = EffectiveConfig::build(Some(temp.path()), None, None).unwrap();

        assert_eq!(config.get_str("namespace.classify"), Some("typeOf"));
        assert!(!config.settings.output.pretty);
        let namespace = config.namespace().unwrap();
        assert_eq!(namespace.resolve("typeOf"), Some(OperationKind::Classify));
        assert_eq!(namespace.resolve("getType"), None);
    }

    #[test]
    fn test_repo_layer_overrides_host_layer() {
        let mut host = NamedTempFile::new().unwrap();
        writeln!(host, "[namespace]\nclone = \"copy\"\nmixin = \"merge\"").unwrap();
        let mut repo = NamedTempFile::new().unwrap();
        writeln!(repo, "[namespace]\nmixin = \"blend\"").unwrap();

        let config = EffectiveConfig::build(Some(host.path()), Some(repo.path()), None).unwrap();

        assert_eq!(config.get_str("namespace.clone"), Some("copy"));
        assert_eq!(config.get_str("namespace.mixin"), Some("blend"));
        assert_eq!(config.sources.len(), 3);
        assert_eq!(config.sources[1].origin, ConfigOrigin::Host);
        assert_eq!(config.sources[2].origin, ConfigOrigin::Repo);
        assert_eq!(config.sources[2].digest.as_ref().map(String::len), Some(64));
    }

    #[test]
    fn test_validation_rejects_bad_identifier() {
        let cli = Value::from(json!({"namespace": {"mixin": "9lives"}}));

        let result = EffectiveConfig::build(None, None, Some(cli));
        assert!(matches!(result, Err(ConfigError::Validation(_))));
        assert!(result.unwrap_err().to_string().contains("9lives"));
    }

    #[test]
    fn test_missing_files_are_skipped() {
        let config = EffectiveConfig::build(
            Some(Path::new("/nonexistent/deepmix/config.toml")),
            Some(Path::new("/nonexistent/.deepmix.toml")),
            None,
        )
        .unwrap();

        assert_eq!(config.sources.len(), 1);
        assert_eq!(config.sources[0].origin, ConfigOrigin::Builtin);
    }

    #[test]
    fn test_parse_error() {
        let mut temp = NamedTempFile::new().unwrap();
        writeln!(temp, "[namespace").unwrap();

        let result = EffectiveConfig::build(Some(temp.path()), None, None);
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_normalize_namespace_keys() {
        let mut layer = Value::from(json!({"namespace": {"classifyIsObject": "isObj"}}));
        normalize_namespace_keys(&mut layer);
        assert_eq!(layer.pointer("namespace.is_object"), Some(&Value::from("isObj")));
        assert_eq!(layer.pointer("namespace.classifyIsObject"), None);
    }
}
