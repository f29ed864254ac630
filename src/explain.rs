//! Explain output for a resolution
//!
//! Shows every layer of the set, whether it matched the file, and the
//! effective config that the matching layers fold into.

use lint_layers_resolver::{normalize_path, ConfigSet, EffectiveConfig, ResolveError};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// One layer's part in the resolution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LayerMatch {
    pub index: usize,

    /// Layer name, or `#<index>` when unnamed
    pub label: String,

    /// `files` patterns (None for unconditional layers)
    pub files: Option<Vec<String>>,

    pub matched: bool,

    /// Number of rules the layer configures
    pub rule_count: usize,
}

/// Explanation of how a file's config was resolved
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExplainOutput {
    /// The path as given
    pub path: String,

    /// The path the globs were matched against (None when outside the base)
    pub match_path: Option<String>,

    pub layers: Vec<LayerMatch>,

    pub effective: EffectiveConfig,
}

impl ExplainOutput {
    pub fn build(set: &ConfigSet, path: &Path) -> Result<Self, ResolveError> {
        let effective = set.resolve(path)?;
        let matched = set.matching_layers(path);

        let layers = set
            .layers()
            .enumerate()
            .map(|(index, layer)| LayerMatch {
                index,
                label: layer.label(index),
                files: layer.files.clone(),
                matched: matched.contains(&index),
                rule_count: layer.rules.len(),
            })
            .collect();

        Ok(Self {
            path: path.to_string_lossy().to_string(),
            match_path: normalize_path(path, set.base_path()),
            layers,
            effective,
        })
    }

    /// Format as JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Format as human-readable text
    pub fn to_human(&self) -> String {
        let mut lines = Vec::new();

        lines.push(format!("File: {}", self.path));
        match &self.match_path {
            Some(p) if p != &self.path => lines.push(format!("Matched as: {}", p)),
            Some(_) => {}
            None => lines.push("Matched as: (outside config base, scoped layers skipped)".into()),
        }
        lines.push(String::new());

        lines.push("Layers:".to_string());
        for layer in &self.layers {
            let mark = if layer.matched { "x" } else { " " };
            let scope = match &layer.files {
                Some(files) => files.join(", "),
                None => "all files".to_string(),
            };
            lines.push(format!(
                "  [{}] {} ({}; {} rules)",
                mark, layer.label, scope, layer.rule_count
            ));
        }

        lines.push(String::new());
        lines.push(effective_to_human(&self.effective));
        lines.join("\n")
    }
}

/// Render an effective config as text.
pub fn effective_to_human(effective: &EffectiveConfig) -> String {
    let mut lines = vec!["--- Effective Config ---".to_string()];

    let unset = || "(unset)".to_string();
    lines.push(format!(
        "sourceType: {}",
        effective
            .source_type
            .map(|s| s.to_string())
            .unwrap_or_else(unset)
    ));
    lines.push(format!(
        "ecmaVersion: {}",
        effective
            .ecma_version
            .map(|v| v.to_string())
            .unwrap_or_else(unset)
    ));

    if effective.globals.is_empty() {
        lines.push("globals: (none)".to_string());
    } else {
        lines.push("globals:".to_string());
        for (name, access) in &effective.globals {
            lines.push(format!("  {}: {}", name, access));
        }
    }

    if effective.rules.is_empty() {
        lines.push("rules: (none)".to_string());
    } else {
        lines.push("rules:".to_string());
        for (name, entry) in &effective.rules {
            if entry.options.is_empty() {
                lines.push(format!("  {}: {}", name, entry.severity));
            } else {
                let options: Vec<String> = entry.options.iter().map(|o| o.to_string()).collect();
                lines.push(format!("  {}: {} {}", name, entry.severity, options.join(" ")));
            }
        }
    }

    lines.join("\n")
}
