//! Per-file resolution of layered lint configuration.
//!
//! A [`ConfigSet`] is an ordered list of [`ConfigLayer`]s. Each layer may be
//! scoped to files by glob patterns and contributes language options,
//! globals and rule severities. Resolving a path folds every matching layer
//! left to right, later layers overriding earlier ones key by key.

mod effective;
mod layer;
mod matcher;
mod merge;
mod set;
mod severity;

pub use effective::{EffectiveConfig, LayerRef};
pub use layer::{ConfigLayer, EcmaVersion, GlobalAccess, LanguageOptions, SourceType};
pub use matcher::normalize_path;
pub use set::{resolve, ConfigSet};
pub use severity::{RuleEntry, Severity};

/// Errors raised while resolving a path.
#[derive(Debug, thiserror::Error)]
pub enum ResolveError {
    #[error("configuration set has no layers")]
    NoApplicableLayer,
}

/// Errors raised while compiling a configuration set.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("layer {layer}: invalid glob '{pattern}': {source}")]
    InvalidGlob {
        layer: usize,
        pattern: String,
        #[source]
        source: globset::Error,
    },

    #[error("layer {layer}: `files` must not be empty")]
    EmptyFiles { layer: usize },
}
