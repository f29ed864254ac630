//! Configuration layer types.

use serde::de::{self, Deserializer};
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::fmt;

use crate::severity::RuleEntry;

/// Module system a file is parsed with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    Module,
    Commonjs,
    Script,
}

impl SourceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceType::Module => "module",
            SourceType::Commonjs => "commonjs",
            SourceType::Script => "script",
        }
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// ECMAScript language version.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EcmaVersion {
    Latest,
    Year(u16),
}

impl EcmaVersion {
    /// Normalize a numeric version. Editions 6 through 17 become years
    /// (6 -> 2015); 3 and 5 stay as they are.
    pub fn from_number(n: u64) -> Option<Self> {
        match n {
            3 | 5 => Some(EcmaVersion::Year(n as u16)),
            6..=17 => Some(EcmaVersion::Year(n as u16 + 2009)),
            2015..=2026 => Some(EcmaVersion::Year(n as u16)),
            _ => None,
        }
    }
}

impl fmt::Display for EcmaVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EcmaVersion::Latest => f.write_str("latest"),
            EcmaVersion::Year(y) => write!(f, "{}", y),
        }
    }
}

impl Serialize for EcmaVersion {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            EcmaVersion::Latest => serializer.serialize_str("latest"),
            EcmaVersion::Year(y) => serializer.serialize_u16(*y),
        }
    }
}

impl<'de> Deserialize<'de> for EcmaVersion {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) if s == "latest" => Ok(EcmaVersion::Latest),
            Value::Number(n) => n
                .as_u64()
                .and_then(EcmaVersion::from_number)
                .ok_or_else(|| de::Error::custom(format!("unsupported ecmaVersion {}", n))),
            other => Err(de::Error::custom(format!(
                "invalid ecmaVersion {}, expected \"latest\" or a version number",
                other
            ))),
        }
    }
}

/// Access mode of a pre-declared global identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum GlobalAccess {
    Readonly,
    Writable,
    Off,
}

impl GlobalAccess {
    pub fn as_str(&self) -> &'static str {
        match self {
            GlobalAccess::Readonly => "readonly",
            GlobalAccess::Writable => "writable",
            GlobalAccess::Off => "off",
        }
    }
}

impl fmt::Display for GlobalAccess {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for GlobalAccess {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::String(s) => match s.as_str() {
                "readonly" | "readable" | "false" => Ok(GlobalAccess::Readonly),
                "writable" | "writeable" | "true" => Ok(GlobalAccess::Writable),
                "off" => Ok(GlobalAccess::Off),
                other => Err(de::Error::custom(format!(
                    "invalid global access '{}', expected readonly, writable or off",
                    other
                ))),
            },
            Value::Bool(true) => Ok(GlobalAccess::Writable),
            Value::Bool(false) | Value::Null => Ok(GlobalAccess::Readonly),
            other => Err(de::Error::custom(format!("invalid global access {}", other))),
        }
    }
}

/// Parser-facing options of a layer. Every field is optional; unset fields
/// leave earlier layers' values in place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct LanguageOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_type: Option<SourceType>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ecma_version: Option<EcmaVersion>,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub globals: BTreeMap<String, GlobalAccess>,
}

impl LanguageOptions {
    pub fn is_empty(&self) -> bool {
        self.source_type.is_none() && self.ecma_version.is_none() && self.globals.is_empty()
    }
}

/// One entry of a configuration set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ConfigLayer {
    /// Diagnostic name, shown in explain output.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Glob patterns selecting the files this layer applies to.
    /// None means every file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub files: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "LanguageOptions::is_empty")]
    pub language_options: LanguageOptions,

    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub rules: BTreeMap<String, RuleEntry>,
}

impl ConfigLayer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_files(mut self, patterns: &[&str]) -> Self {
        self.files = Some(patterns.iter().map(|p| p.to_string()).collect());
        self
    }

    pub fn with_source_type(mut self, source_type: SourceType) -> Self {
        self.language_options.source_type = Some(source_type);
        self
    }

    pub fn with_ecma_version(mut self, version: EcmaVersion) -> Self {
        self.language_options.ecma_version = Some(version);
        self
    }

    pub fn with_global(mut self, name: impl Into<String>, access: GlobalAccess) -> Self {
        self.language_options.globals.insert(name.into(), access);
        self
    }

    pub fn with_rule(mut self, name: impl Into<String>, entry: impl Into<RuleEntry>) -> Self {
        self.rules.insert(name.into(), entry.into());
        self
    }

    /// True when the layer has no `files` and applies everywhere.
    pub fn is_unconditional(&self) -> bool {
        self.files.is_none()
    }

    /// Label for diagnostics: the name, or `#<index>`.
    pub fn label(&self, index: usize) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => format!("#{}", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::severity::Severity;
    use serde_json::json;

    #[test]
    fn test_parse_backend_layer() {
        let layer: ConfigLayer = serde_json::from_value(json!({
            "files": ["**/*.js"],
            "languageOptions": {
                "sourceType": "commonjs",
                "ecmaVersion": 2021,
                "globals": {"process": "readonly", "require": "readonly"}
            },
            "rules": {"no-unused-vars": "warn", "no-undef": "off"}
        }))
        .unwrap();

        assert_eq!(layer.files, Some(vec!["**/*.js".to_string()]));
        assert_eq!(layer.language_options.source_type, Some(SourceType::Commonjs));
        assert_eq!(layer.language_options.ecma_version, Some(EcmaVersion::Year(2021)));
        assert_eq!(layer.language_options.globals["process"], GlobalAccess::Readonly);
        assert_eq!(layer.rules["no-undef"].severity, Severity::Off);
    }

    #[test]
    fn test_unknown_field_rejected() {
        let result = serde_json::from_value::<ConfigLayer>(json!({"rulez": {}}));
        assert!(result.is_err());
    }

    #[test]
    fn test_ecma_version_normalization() {
        let v: EcmaVersion = serde_json::from_value(json!(6)).unwrap();
        assert_eq!(v, EcmaVersion::Year(2015));
        let v: EcmaVersion = serde_json::from_value(json!(12)).unwrap();
        assert_eq!(v, EcmaVersion::Year(2021));
        let v: EcmaVersion = serde_json::from_value(json!(5)).unwrap();
        assert_eq!(v, EcmaVersion::Year(5));
        let v: EcmaVersion = serde_json::from_value(json!("latest")).unwrap();
        assert_eq!(v, EcmaVersion::Latest);
        assert!(serde_json::from_value::<EcmaVersion>(json!(4)).is_err());
        assert!(serde_json::from_value::<EcmaVersion>(json!("next")).is_err());
    }

    #[test]
    fn test_global_access_aliases() {
        let parse = |v| serde_json::from_value::<GlobalAccess>(v).unwrap();
        assert_eq!(parse(json!("readable")), GlobalAccess::Readonly);
        assert_eq!(parse(json!("writeable")), GlobalAccess::Writable);
        assert_eq!(parse(json!(true)), GlobalAccess::Writable);
        assert_eq!(parse(json!(false)), GlobalAccess::Readonly);
        assert_eq!(parse(json!("true")), GlobalAccess::Writable);
        assert_eq!(parse(json!("false")), GlobalAccess::Readonly);
        assert_eq!(parse(json!(null)), GlobalAccess::Readonly);
        assert_eq!(parse(json!("off")), GlobalAccess::Off);
        assert!(serde_json::from_value::<GlobalAccess>(json!("maybe")).is_err());
    }

    #[test]
    fn test_builder_and_serialization() {
        let layer = ConfigLayer::new()
            .with_name("scoped")
            .with_files(&["src/**/*.{js,vue}"])
            .with_rule("vue/multi-word-component-names", Severity::Off);

        let value = serde_json::to_value(&layer).unwrap();
        assert_eq!(
            value,
            json!({
                "name": "scoped",
                "files": ["src/**/*.{js,vue}"],
                "rules": {"vue/multi-word-component-names": "off"}
            })
        );
    }

    #[test]
    fn test_label_and_scope() {
        let layer = ConfigLayer::new().with_rule("b", Severity::Error);
        assert_eq!(layer.label(3), "#3");
        assert!(layer.is_unconditional());

        let scoped = layer.with_name("server").with_files(&["**/*.js"]);
        assert_eq!(scoped.label(3), "server");
        assert!(!scoped.is_unconditional());
    }

    #[test]
    fn test_display_matches_serialized_form() {
        for st in [SourceType::Module, SourceType::Commonjs, SourceType::Script] {
            assert_eq!(json!(st.to_string()), serde_json::to_value(st).unwrap());
        }
        for access in [GlobalAccess::Readonly, GlobalAccess::Writable, GlobalAccess::Off] {
            assert_eq!(json!(access.to_string()), serde_json::to_value(access).unwrap());
        }
        assert_eq!(SourceType::Commonjs.to_string(), "commonjs");
    }
}
