//! Named, pre-expanded layer bundles.
//!
//! A bundle stands for a shared rule set (a "recommended" config) that
//! a config set imports by name. Contents are supplied by the host, either
//! in code or from a directory of JSON files; the registry itself only
//! knows the names the built-in presets refer to.

use lint_layers_resolver::ConfigLayer;
use serde_json::Value;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use walkdir::WalkDir;

use super::ConfigError;

/// Core recommended rules, imported by both presets.
pub const JS_RECOMMENDED: &str = "js/recommended";

/// Vue framework recommended rules, imported by the frontend preset.
pub const VUE_FLAT_RECOMMENDED: &str = "vue/flat/recommended";

/// Registry of bundle name -> ordered layers
#[derive(Debug, Clone)]
pub struct BundleRegistry {
    bundles: BTreeMap<String, Vec<ConfigLayer>>,
}

impl Default for BundleRegistry {
    /// Registry with an empty placeholder layer for each preset bundle.
    fn default() -> Self {
        let mut registry = Self::empty();
        for name in [JS_RECOMMENDED, VUE_FLAT_RECOMMENDED] {
            registry.register(name, vec![ConfigLayer::new().with_name(name)]);
        }
        registry
    }
}

impl BundleRegistry {
    /// Registry with no bundles at all
    pub fn empty() -> Self {
        Self {
            bundles: BTreeMap::new(),
        }
    }

    /// Register (or replace) a bundle, returning the previous layers.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        layers: Vec<ConfigLayer>,
    ) -> Option<Vec<ConfigLayer>> {
        self.bundles.insert(name.into(), layers)
    }

    pub fn with_bundle(mut self, name: impl Into<String>, layers: Vec<ConfigLayer>) -> Self {
        self.register(name, layers);
        self
    }

    pub fn get(&self, name: &str) -> Option<&[ConfigLayer]> {
        self.bundles.get(name).map(|l| l.as_slice())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.bundles.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.bundles.keys().map(|k| k.as_str())
    }

    /// Layers of a bundle, ready to splice into a set.
    ///
    /// Unnamed layers are labelled after the bundle (`name` for a
    /// single-layer bundle, `name[i]` otherwise).
    pub fn expand(&self, name: &str) -> Result<Vec<ConfigLayer>, ConfigError> {
        let layers = self
            .get(name)
            .ok_or_else(|| ConfigError::UnknownBundle(name.to_string()))?;

        let single = layers.len() == 1;
        Ok(layers
            .iter()
            .enumerate()
            .map(|(i, layer)| {
                let mut layer = layer.clone();
                if layer.name.is_none() {
                    layer.name = Some(if single {
                        name.to_string()
                    } else {
                        format!("{}[{}]", name, i)
                    });
                }
                layer
            })
            .collect())
    }

    /// Load every `*.json` file under `dir` as a bundle.
    ///
    /// The bundle name is the file's path relative to `dir`, without the
    /// extension and with `/` separators: `vue/flat/recommended.json`
    /// registers `vue/flat/recommended`. A file holds either one layer
    /// object or an array of them.
    pub fn load_dir(mut self, dir: &Path) -> Result<Self, ConfigError> {
        for entry in WalkDir::new(dir).sort_by_file_name() {
            let entry = entry.map_err(|e| ConfigError::IoError(e.into()))?;
            let path = entry.path();
            if !entry.file_type().is_file()
                || path.extension().and_then(|e| e.to_str()) != Some("json")
            {
                continue;
            }

            let name = bundle_name(dir, path)?;
            let layers = load_bundle_file(path)?;
            tracing::debug!(bundle = %name, layers = layers.len(), "Loaded bundle");
            self.register(name, layers);
        }
        Ok(self)
    }
}

fn bundle_name(dir: &Path, path: &Path) -> Result<String, ConfigError> {
    let relative = path
        .strip_prefix(dir)
        .map_err(|e| ConfigError::ValidationError(format!("{}: {}", path.display(), e)))?
        .with_extension("");
    Ok(relative.to_string_lossy().replace('\\', "/"))
}

fn load_bundle_file(path: &Path) -> Result<Vec<ConfigLayer>, ConfigError> {
    let contents = fs::read_to_string(path)?;
    let value: Value = serde_json::from_str(&contents)
        .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;

    let items = match value {
        Value::Array(items) => items,
        object @ Value::Object(_) => vec![object],
        _ => {
            return Err(ConfigError::ParseError(format!(
                "{}: bundle must be a layer object or an array of layers",
                path.display()
            )))
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            serde_json::from_value(item).map_err(|e| {
                ConfigError::ParseError(format!("{}: layer {}: {}", path.display(), i, e))
            })
        })
        .collect()
}
