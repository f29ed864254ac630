//! Ordered, immutable configuration sets and per-file resolution.

use std::path::{Path, PathBuf};

use crate::effective::EffectiveConfig;
use crate::layer::ConfigLayer;
use crate::matcher::{normalize_path, FileMatcher};
use crate::{BuildError, ResolveError};

#[derive(Debug, Clone)]
struct CompiledLayer {
    layer: ConfigLayer,
    matcher: FileMatcher,
}

/// An ordered sequence of layers with their `files` patterns compiled.
///
/// Built once and never mutated afterwards; `resolve` only reads it.
#[derive(Debug, Clone, Default)]
pub struct ConfigSet {
    layers: Vec<CompiledLayer>,
    base_path: Option<PathBuf>,
}

impl ConfigSet {
    /// Compile a set of layers. Fails on the first bad `files` list.
    pub fn new(layers: Vec<ConfigLayer>) -> Result<Self, BuildError> {
        let layers = layers
            .into_iter()
            .enumerate()
            .map(|(index, layer)| {
                let matcher = FileMatcher::compile(index, layer.files.as_deref())?;
                Ok(CompiledLayer { layer, matcher })
            })
            .collect::<Result<Vec<_>, BuildError>>()?;

        Ok(Self {
            layers,
            base_path: None,
        })
    }

    /// Anchor `files` patterns at a directory. Absolute file paths are made
    /// relative to it before matching.
    pub fn with_base_path(mut self, base: impl Into<PathBuf>) -> Self {
        self.base_path = Some(base.into());
        self
    }

    pub fn base_path(&self) -> Option<&Path> {
        self.base_path.as_deref()
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub fn layer(&self, index: usize) -> Option<&ConfigLayer> {
        self.layers.get(index).map(|c| &c.layer)
    }

    pub fn layers(&self) -> impl Iterator<Item = &ConfigLayer> {
        self.layers.iter().map(|c| &c.layer)
    }

    /// Indices of the layers that apply to `path`, in set order.
    pub fn matching_layers(&self, path: impl AsRef<Path>) -> Vec<usize> {
        let normalized = normalize_path(path.as_ref(), self.base_path());
        self.layers
            .iter()
            .enumerate()
            .filter(|(_, c)| c.matcher.is_match(normalized.as_deref()))
            .map(|(index, _)| index)
            .collect()
    }

    /// Fold every layer that applies to `path`, left to right.
    pub fn resolve(&self, path: impl AsRef<Path>) -> Result<EffectiveConfig, ResolveError> {
        let path = path.as_ref();
        if self.layers.is_empty() {
            return Err(ResolveError::NoApplicableLayer);
        }

        let mut effective = EffectiveConfig::default();
        for index in self.matching_layers(path) {
            effective.apply(index, &self.layers[index].layer);
        }

        tracing::debug!(
            path = %path.display(),
            matched = effective.matched_layers.len(),
            layers = self.layers.len(),
            "Resolved effective config"
        );
        Ok(effective)
    }
}

/// Free-function form of [`ConfigSet::resolve`].
pub fn resolve(set: &ConfigSet, path: impl AsRef<Path>) -> Result<EffectiveConfig, ResolveError> {
    set.resolve(path)
}
