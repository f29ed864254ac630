//! Layer merge logic
//!
//! Folding is per key and shallow:
//! - Scalars (`sourceType`, `ecmaVersion`): a set value overrides, unset keeps
//! - Maps (`globals`, `rules`): entries add or override, unnamed keys survive
//! - Rule entries: severity overrides, options survive a severity-only entry

use std::collections::BTreeMap;

use crate::layer::LanguageOptions;
use crate::severity::RuleEntry;

/// Overlay one language-options block onto another.
pub(crate) fn merge_language_options(base: &mut LanguageOptions, overlay: &LanguageOptions) {
    if let Some(source_type) = overlay.source_type {
        base.source_type = Some(source_type);
    }
    if let Some(version) = overlay.ecma_version {
        base.ecma_version = Some(version);
    }
    for (name, access) in &overlay.globals {
        base.globals.insert(name.clone(), *access);
    }
}

/// Overlay one rule map onto another.
pub(crate) fn merge_rules(base: &mut BTreeMap<String, RuleEntry>, overlay: &BTreeMap<String, RuleEntry>) {
    for (name, entry) in overlay {
        let merged = match base.get(name) {
            Some(existing) => existing.overridden_by(entry),
            None => entry.clone(),
        };
        base.insert(name.clone(), merged);
    }
}
