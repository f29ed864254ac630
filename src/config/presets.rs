//! Built-in configuration sets.
//!
//! The two sets a project ships with: a CommonJS backend and a Vue
//! frontend. Both import the core recommended bundle first; the frontend
//! also imports the Vue recommended bundle.

use lint_layers_resolver::{ConfigLayer, ConfigSet, EcmaVersion, GlobalAccess, Severity, SourceType};
use std::fmt;
use std::str::FromStr;

use super::bundles::{BundleRegistry, JS_RECOMMENDED, VUE_FLAT_RECOMMENDED};
use super::loader::{expand_entries, ConfigEntry, ConfigOrigin, ConfigSource, LoadedConfig};
use super::ConfigError;

/// Runtime globals the backend declares read-only for `.js` files.
pub const BACKEND_GLOBALS: &[&str] = &[
    "console",
    "process",
    "module",
    "__dirname",
    "__filename",
    "require",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    Backend,
    Frontend,
}

impl Preset {
    pub const ALL: [Preset; 2] = [Preset::Backend, Preset::Frontend];

    pub fn as_str(&self) -> &'static str {
        match self {
            Preset::Backend => "backend",
            Preset::Frontend => "frontend",
        }
    }

    /// The preset's document, with bundles still unexpanded.
    pub fn entries(&self) -> Vec<ConfigEntry> {
        match self {
            Preset::Backend => {
                let mut scoped = ConfigLayer::new()
                    .with_name("backend/commonjs")
                    .with_files(&["**/*.js"])
                    .with_source_type(SourceType::Commonjs)
                    .with_ecma_version(EcmaVersion::Year(2021))
                    .with_rule("no-unused-vars", Severity::Warn)
                    .with_rule("no-undef", Severity::Off);
                for global in BACKEND_GLOBALS {
                    scoped = scoped.with_global(*global, GlobalAccess::Readonly);
                }

                vec![
                    ConfigEntry::Bundle(JS_RECOMMENDED.to_string()),
                    ConfigEntry::Layer(scoped),
                ]
            }
            Preset::Frontend => vec![
                ConfigEntry::Bundle(JS_RECOMMENDED.to_string()),
                ConfigEntry::Bundle(VUE_FLAT_RECOMMENDED.to_string()),
                ConfigEntry::Layer(
                    ConfigLayer::new()
                        .with_name("frontend/components")
                        .with_files(&["src/**/*.{js,vue}"])
                        .with_rule("vue/multi-word-component-names", Severity::Off),
                ),
            ],
        }
    }

    /// Expand and compile the preset.
    pub fn build(&self, registry: &BundleRegistry) -> Result<LoadedConfig, ConfigError> {
        let (layers, bundles) = expand_entries(self.entries(), registry)?;
        let set = ConfigSet::new(layers)?;

        tracing::debug!(preset = self.as_str(), layers = set.len(), "Built preset");

        Ok(LoadedConfig {
            set,
            source: ConfigSource {
                origin: ConfigOrigin::Preset,
                name: self.as_str().to_string(),
                digest: None,
            },
            bundles,
        })
    }
}

impl fmt::Display for Preset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Preset {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Preset::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| format!("unknown preset '{}', expected backend or frontend", s))
    }
}
