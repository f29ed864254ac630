//! lint-layers - layered flat lint configuration
//!
//! Loads lint configuration sets from presets or config files, expands
//! bundle references through a registry, and resolves the effective
//! configuration for individual files.

pub mod config;
pub mod explain;
pub mod logging;

pub use config::{BundleRegistry, ConfigError, LoadedConfig, Preset};
pub use explain::ExplainOutput;
pub use lint_layers_resolver::{
    resolve, ConfigLayer, ConfigSet, EcmaVersion, EffectiveConfig, GlobalAccess, ResolveError,
    RuleEntry, Severity, SourceType,
};
