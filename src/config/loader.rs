//! Config file loading with source provenance
//!
//! A config document is an ordered array of entries. Each entry is either
//! a bundle reference (`"bundle:<name>"`) or a layer object. TOML documents
//! hold the array under a top-level `config` key, since TOML has no
//! top-level arrays.

use lint_layers_resolver::{ConfigLayer, ConfigSet};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use super::bundles::BundleRegistry;
use super::ConfigError;

/// Prefix marking a string entry as a bundle reference
pub const BUNDLE_PREFIX: &str = "bundle:";

/// One entry of a config document, before bundle expansion.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigEntry {
    Bundle(String),
    Layer(ConfigLayer),
}

impl ConfigEntry {
    fn from_value(index: usize, value: Value) -> Result<Self, ConfigError> {
        match value {
            Value::String(s) => match s.strip_prefix(BUNDLE_PREFIX) {
                Some(name) if !name.is_empty() => Ok(ConfigEntry::Bundle(name.to_string())),
                _ => Err(ConfigError::ValidationError(format!(
                    "entry {}: string entries must be \"{}<name>\", got \"{}\"",
                    index, BUNDLE_PREFIX, s
                ))),
            },
            object @ Value::Object(_) => serde_json::from_value(object)
                .map(ConfigEntry::Layer)
                .map_err(|e| ConfigError::ParseError(format!("entry {}: {}", index, e))),
            other => Err(ConfigError::ParseError(format!(
                "entry {}: expected a layer object or bundle reference, got {}",
                index, other
            ))),
        }
    }
}

/// Document syntax, picked from the file extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Json,
    Toml,
}

impl ConfigFormat {
    /// `.toml` is TOML; anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("toml") => ConfigFormat::Toml,
            _ => ConfigFormat::Json,
        }
    }
}

/// Where a configuration set came from
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum ConfigOrigin {
    Preset,
    File,
}

/// Provenance of a loaded configuration set
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigSource {
    pub origin: ConfigOrigin,

    /// Preset name or file path
    pub name: String,

    /// SHA-256 digest of raw file bytes (None for presets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub digest: Option<String>,
}

/// A compiled configuration set plus where it came from
#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub set: ConfigSet,
    pub source: ConfigSource,

    /// Bundles expanded into the set, in reference order
    pub bundles: Vec<String>,
}

impl LoadedConfig {
    pub fn with_base_path(mut self, base: impl Into<PathBuf>) -> Self {
        self.set = self.set.with_base_path(base);
        self
    }
}

/// Parse a config document into entries, without expanding bundles.
pub fn parse_document(contents: &str, format: ConfigFormat) -> Result<Vec<ConfigEntry>, ConfigError> {
    let document = match format {
        ConfigFormat::Json => serde_json::from_str::<Value>(contents)
            .map_err(|e| ConfigError::ParseError(format!("JSON parse error: {}", e)))?,
        ConfigFormat::Toml => {
            let mut table: toml::Table = toml::from_str(contents)
                .map_err(|e| ConfigError::ParseError(format!("TOML parse error: {}", e)))?;
            let config = table.remove("config").ok_or_else(|| {
                ConfigError::ParseError("TOML config needs a top-level `config` array".into())
            })?;
            toml_to_json(config)
        }
    };

    let items = match document {
        Value::Array(items) => items,
        _ => {
            return Err(ConfigError::ParseError(
                "config must be an array of entries".to_string(),
            ))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| ConfigEntry::from_value(i, item))
        .collect()
}

/// Expand bundle references in place, returning the flat layer list and
/// the bundle names used.
pub fn expand_entries(
    entries: Vec<ConfigEntry>,
    registry: &BundleRegistry,
) -> Result<(Vec<ConfigLayer>, Vec<String>), ConfigError> {
    let mut layers = Vec::new();
    let mut bundles = Vec::new();

    for entry in entries {
        match entry {
            ConfigEntry::Bundle(name) => {
                layers.extend(registry.expand(&name)?);
                bundles.push(name);
            }
            ConfigEntry::Layer(layer) => layers.push(layer),
        }
    }

    Ok((layers, bundles))
}

/// Load a config file, expand its bundles and compile the set.
///
/// The set's base path is the file's directory, made absolute, so `files`
/// patterns are relative to where the config lives.
pub fn load_file(path: &Path, registry: &BundleRegistry) -> Result<LoadedConfig, ConfigError> {
    let bytes = fs::read(path)?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    let digest = hex::encode(hasher.finalize());

    let contents = String::from_utf8(bytes)
        .map_err(|e| ConfigError::ParseError(format!("Invalid UTF-8: {}", e)))?;

    let entries = parse_document(&contents, ConfigFormat::from_path(path))?;
    let (layers, bundles) = expand_entries(entries, registry)?;

    let set = ConfigSet::new(layers)?.with_base_path(config_dir(path)?);

    tracing::debug!(
        path = %path.display(),
        layers = set.len(),
        bundles = bundles.len(),
        digest = %digest,
        "Loaded config file"
    );

    Ok(LoadedConfig {
        set,
        source: ConfigSource {
            origin: ConfigOrigin::File,
            name: path.to_string_lossy().to_string(),
            digest: Some(digest),
        },
        bundles,
    })
}

/// Absolute directory holding the config file; relative paths are anchored
/// at the working directory.
fn config_dir(path: &Path) -> Result<PathBuf, ConfigError> {
    let cwd = env::current_dir()?;
    Ok(match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => cwd.join(parent),
        _ => cwd,
    })
}

/// Convert TOML Value to JSON Value
fn toml_to_json(toml: toml::Value) -> Value {
    match toml {
        toml::Value::String(s) => Value::String(s),
        toml::Value::Integer(i) => Value::Number(i.into()),
        toml::Value::Float(f) => serde_json::Number::from_f64(f)
            .map(Value::Number)
            .unwrap_or(Value::Null),
        toml::Value::Boolean(b) => Value::Bool(b),
        toml::Value::Datetime(dt) => Value::String(dt.to_string()),
        toml::Value::Array(arr) => Value::Array(arr.into_iter().map(toml_to_json).collect()),
        toml::Value::Table(table) => Value::Object(
            table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect(),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use lint_layers_resolver::{EcmaVersion, Severity, SourceType};
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_json_entries() {
        let entries = parse_document(
            r#"["bundle:js/recommended", {"files": ["**/*.js"], "rules": {"no-undef": "off"}}]"#,
            ConfigFormat::Json,
        )
        .unwrap();

        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0], ConfigEntry::Bundle("js/recommended".to_string()));
        match &entries[1] {
            ConfigEntry::Layer(layer) => {
                assert_eq!(layer.rules["no-undef"].severity, Severity::Off)
            }
            other => panic!("expected layer, got {other:?}"),
        }
    }

    #[test]
    fn test_parse_toml_entries() {
        let toml = r#"
config = [
  "bundle:js/recommended",
  { files = ["**/*.js"], languageOptions = { sourceType = "commonjs", ecmaVersion = 2021 } },
]
"#;
        let entries = parse_document(toml, ConfigFormat::Toml).unwrap();
        assert_eq!(entries.len(), 2);
        match &entries[1] {
            ConfigEntry::Layer(layer) => {
                assert_eq!(layer.language_options.source_type, Some(SourceType::Commonjs));
                assert_eq!(layer.language_options.ecma_version, Some(EcmaVersion::Year(2021)));
            }
            other => panic!("expected layer, got {other:?}"),
        }
    }

    #[test]
    fn test_toml_requires_config_key() {
        let err = parse_document("layers = []", ConfigFormat::Toml).unwrap_err();
        assert!(err.to_string().contains("config"));
    }

    #[test]
    fn test_non_array_rejected() {
        let err = parse_document(r#"{"rules": {}}"#, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError(_)));
    }

    #[test]
    fn test_bad_string_entry() {
        let err = parse_document(r#"["js/recommended"]"#, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));

        let err = parse_document(r#"["bundle:"]"#, ConfigFormat::Json).unwrap_err();
        assert!(matches!(err, ConfigError::ValidationError(_)));
    }

    #[test]
    fn test_bad_layer_reports_index() {
        let err = parse_document(r#"[{}, {"rules": {"a": "loud"}}]"#, ConfigFormat::Json)
            .unwrap_err();
        assert!(err.to_string().contains("entry 1"));
    }

    #[test]
    fn test_expand_in_place() {
        let registry = BundleRegistry::empty().with_bundle(
            "two",
            vec![ConfigLayer::new(), ConfigLayer::new().with_files(&["*.vue"])],
        );
        let entries = vec![
            ConfigEntry::Layer(ConfigLayer::new().with_name("first")),
            ConfigEntry::Bundle("two".to_string()),
            ConfigEntry::Layer(ConfigLayer::new().with_name("last")),
        ];

        let (layers, bundles) = expand_entries(entries, &registry).unwrap();
        let names: Vec<_> = layers.iter().map(|l| l.name.clone().unwrap()).collect();
        assert_eq!(names, vec!["first", "two[0]", "two[1]", "last"]);
        assert_eq!(bundles, vec!["two".to_string()]);
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(ConfigFormat::from_path(Path::new("a/lint.toml")), ConfigFormat::Toml);
        assert_eq!(ConfigFormat::from_path(Path::new("a/lint.json")), ConfigFormat::Json);
        assert_eq!(ConfigFormat::from_path(Path::new("lint")), ConfigFormat::Json);
    }

    #[test]
    fn test_load_file_records_digest() {
        let mut temp = NamedTempFile::new().unwrap();
        write!(temp, r#"["bundle:js/recommended", {{"rules": {{"eqeqeq": "error"}}}}]"#).unwrap();

        let loaded = load_file(temp.path(), &BundleRegistry::default()).unwrap();

        assert_eq!(loaded.set.len(), 2);
        assert_eq!(loaded.bundles, vec!["js/recommended".to_string()]);
        assert_eq!(loaded.source.origin, ConfigOrigin::File);
        let digest = loaded.source.digest.unwrap();
        assert_eq!(digest.len(), 64);
        assert_eq!(loaded.set.base_path(), temp.path().parent());
    }

    #[test]
    fn test_load_file_missing() {
        let err = load_file(Path::new("/nonexistent/lint.json"), &BundleRegistry::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::IoError(_)));
    }
}
