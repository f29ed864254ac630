//! Effective configuration for a single file, with layer provenance.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::layer::{ConfigLayer, EcmaVersion, GlobalAccess, LanguageOptions, SourceType};
use crate::merge::{merge_language_options, merge_rules};
use crate::severity::{RuleEntry, Severity};

/// A layer that contributed to an effective config.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayerRef {
    /// Position in the configuration set
    pub index: usize,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// The result of folding every matching layer for one file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EffectiveConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecma_version: Option<EcmaVersion>,

    #[serde(default)]
    pub globals: BTreeMap<String, GlobalAccess>,

    #[serde(default)]
    pub rules: BTreeMap<String, RuleEntry>,

    /// Contributing layers in fold order
    #[serde(default)]
    pub matched_layers: Vec<LayerRef>,
}

impl EffectiveConfig {
    /// Fold one more layer on top of the current values.
    pub fn apply(&mut self, index: usize, layer: &ConfigLayer) {
        let mut options = LanguageOptions {
            source_type: self.source_type,
            ecma_version: self.ecma_version,
            globals: std::mem::take(&mut self.globals),
        };
        merge_language_options(&mut options, &layer.language_options);
        self.source_type = options.source_type;
        self.ecma_version = options.ecma_version;
        self.globals = options.globals;

        merge_rules(&mut self.rules, &layer.rules);

        self.matched_layers.push(LayerRef {
            index,
            name: layer.name.clone(),
        });
    }

    /// Severity of a rule, if any layer configured it.
    pub fn rule_severity(&self, rule: &str) -> Option<Severity> {
        self.rules.get(rule).map(|entry| entry.severity)
    }

    pub fn is_rule_enabled(&self, rule: &str) -> bool {
        self.rule_severity(rule).is_some_and(|s| s.is_enabled())
    }

    pub fn global(&self, name: &str) -> Option<GlobalAccess> {
        self.globals.get(name).copied()
    }

    /// Rules that end up at warn or error.
    pub fn enabled_rules(&self) -> impl Iterator<Item = (&str, Severity)> {
        self.rules
            .iter()
            .filter(|(_, entry)| entry.severity.is_enabled())
            .map(|(name, entry)| (name.as_str(), entry.severity))
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
