//! Configuration sources
//!
//! A configuration set comes from one of two places:
//! 1. A built-in preset (backend, frontend)
//! 2. A config file (JSON, or TOML with a top-level `config` array)
//!
//! Either way, bundle references are expanded in place through a
//! [`BundleRegistry`] before the set is compiled.

mod bundles;
mod loader;
mod presets;

pub use bundles::{BundleRegistry, JS_RECOMMENDED, VUE_FLAT_RECOMMENDED};
pub use loader::{
    expand_entries, load_file, parse_document, ConfigEntry, ConfigFormat, ConfigOrigin,
    ConfigSource, LoadedConfig, BUNDLE_PREFIX,
};
pub use presets::{Preset, BACKEND_GLOBALS};

use lint_layers_resolver::BuildError;
use std::io;

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Unknown bundle: {0}")]
    UnknownBundle(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Invalid configuration set: {0}")]
    BuildError(#[from] BuildError),
}
