//! Test fixtures for resolution assertions
//!
//! This module provides:
//! - Stand-in bundle definitions (tests/fixtures/bundles)
//! - Config files mirroring the built-in presets (backend.json, frontend.toml)
//! - A resolution corpus of (preset, path, expected effective config) cases

#![allow(dead_code)]

use lint_layers::{BundleRegistry, EffectiveConfig};
use serde_json::Value;
use std::path::{Path, PathBuf};

pub fn fixture_path(name: &str) -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

/// Registry loaded with the fixture bundles
pub fn fixture_registry() -> BundleRegistry {
    BundleRegistry::default()
        .load_dir(&fixture_path("bundles"))
        .expect("Failed to load fixture bundles")
}

/// Resolution test case from resolution_corpus.json
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ResolutionCase {
    pub id: String,
    pub preset: String,
    pub path: String,
    pub expected: Value,
}

/// Full resolution corpus
#[derive(Debug, Clone, serde::Deserialize)]
pub struct ResolutionCorpus {
    pub schema_version: u32,
    pub description: String,
    pub cases: Vec<ResolutionCase>,
}

impl ResolutionCorpus {
    /// Load corpus from the fixture file
    pub fn load() -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(fixture_path("resolution_corpus.json"))?;
        let corpus: ResolutionCorpus = serde_json::from_str(&content)?;
        Ok(corpus)
    }
}

/// Compare an effective config against a case's expectations, returning
/// one message per mismatch.
///
/// `sourceType` / `ecmaVersion` compare exactly (null means unset).
/// `rules` / `globals` compare the listed keys only, except that an empty
/// object requires the effective map to be empty.
pub fn check_expectations(effective: &EffectiveConfig, expected: &Value) -> Vec<String> {
    let actual = serde_json::to_value(effective).expect("EffectiveConfig serializes");
    let mut failures = Vec::new();

    for key in ["sourceType", "ecmaVersion"] {
        if let Some(want) = expected.get(key) {
            let got = actual.get(key).unwrap_or(&Value::Null);
            if got != want {
                failures.push(format!("{}: expected {}, got {}", key, want, got));
            }
        }
    }

    for key in ["rules", "globals"] {
        let Some(want) = expected.get(key).and_then(Value::as_object) else {
            continue;
        };
        let got = actual[key].as_object().cloned().unwrap_or_default();
        if want.is_empty() && !got.is_empty() {
            failures.push(format!("{}: expected none, got {}", key, Value::Object(got)));
            continue;
        }
        for (name, want_value) in want {
            let got_value = got.get(name).unwrap_or(&Value::Null);
            if got_value != want_value {
                failures.push(format!(
                    "{}[{}]: expected {}, got {}",
                    key, name, want_value, got_value
                ));
            }
        }
    }

    if let Some(want) = expected.get("matched_layers").and_then(Value::as_u64) {
        let got = effective.matched_layers.len() as u64;
        if got != want {
            failures.push(format!("matched_layers: expected {}, got {}", want, got));
        }
    }

    failures
}
