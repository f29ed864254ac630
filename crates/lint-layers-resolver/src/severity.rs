//! Rule severities and rule entries.

use serde::de::{self, Deserializer};
use serde::ser::{SerializeSeq, Serializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// How a rule reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Off,
    Warn,
    Error,
}

impl Severity {
    /// Map a numeric level (0, 1, 2) to a severity.
    pub fn from_level(level: u64) -> Option<Self> {
        match level {
            0 => Some(Severity::Off),
            1 => Some(Severity::Warn),
            2 => Some(Severity::Error),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Off => "off",
            Severity::Warn => "warn",
            Severity::Error => "error",
        }
    }

    /// Whether the rule runs at all.
    pub fn is_enabled(&self) -> bool {
        *self != Severity::Off
    }

    fn from_value(value: &Value) -> Result<Self, String> {
        match value {
            Value::String(s) => s.parse(),
            Value::Number(n) => n
                .as_u64()
                .and_then(Severity::from_level)
                .ok_or_else(|| format!("invalid severity level {}, expected 0, 1 or 2", n)),
            other => Err(format!("invalid severity {}, expected a string or 0-2", other)),
        }
    }
}

impl FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "off" => Ok(Severity::Off),
            "warn" => Ok(Severity::Warn),
            "error" => Ok(Severity::Error),
            other => Err(format!(
                "invalid severity '{}', expected off, warn or error",
                other
            )),
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Severity::from_value(&value).map_err(de::Error::custom)
    }
}

/// A configured rule: a severity plus any rule-specific options.
///
/// Written either as a bare severity (`"warn"`, `1`) or as an array whose
/// first element is the severity (`["error", "always"]`).
#[derive(Debug, Clone, PartialEq)]
pub struct RuleEntry {
    pub severity: Severity,
    pub options: Vec<Value>,
}

impl RuleEntry {
    pub fn new(severity: Severity) -> Self {
        Self {
            severity,
            options: Vec::new(),
        }
    }

    pub fn with_options(severity: Severity, options: Vec<Value>) -> Self {
        Self { severity, options }
    }

    /// Combine with an entry from a later layer.
    ///
    /// The later severity always wins. Options are replaced only when the
    /// later entry carries its own.
    pub fn overridden_by(&self, later: &RuleEntry) -> RuleEntry {
        let options = if later.options.is_empty() {
            self.options.clone()
        } else {
            later.options.clone()
        };
        RuleEntry {
            severity: later.severity,
            options,
        }
    }
}

impl From<Severity> for RuleEntry {
    fn from(severity: Severity) -> Self {
        RuleEntry::new(severity)
    }
}

impl Serialize for RuleEntry {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if self.options.is_empty() {
            return self.severity.serialize(serializer);
        }
        let mut seq = serializer.serialize_seq(Some(self.options.len() + 1))?;
        seq.serialize_element(&self.severity)?;
        for option in &self.options {
            seq.serialize_element(option)?;
        }
        seq.end()
    }
}

impl<'de> Deserialize<'de> for RuleEntry {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Array(mut items) => {
                if items.is_empty() {
                    return Err(de::Error::custom("rule entry array must start with a severity"));
                }
                let severity = Severity::from_value(&items[0]).map_err(de::Error::custom)?;
                let options = items.split_off(1);
                Ok(RuleEntry { severity, options })
            }
            other => Severity::from_value(&other)
                .map(RuleEntry::new)
                .map_err(de::Error::custom),
        }
    }
}
