//! Action documents: a YAML/JSON description of a builder chain.
//!
//! ```yaml
//! root: app
//! names: [user, load]
//! params:
//!   - key: id
//!     pattern: '(\d+)'
//!     value: 42
//! from_start: true
//! at_end: true
//! ```
//!
//! Documents are untyped input, so every field is checked by hand and a
//! wrong type becomes `BuilderError::InvalidArgument` rather than a serde
//! error.

use anyhow::Context;
use serde_json::{Map, Value};

use crate::builder::PatternBuilder;
use crate::error::{BuilderError, Result};
use crate::value::{ParamValue, json_type_name};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParamEntry {
    pub key: String,
    pub pattern: String,
    pub value: Option<ParamValue>,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ActionDocument {
    pub root: Option<String>,
    pub names: Vec<String>,
    /// Registration order is the order of the sequence.
    pub params: Vec<ParamEntry>,
    pub any_names: bool,
    pub any_params: bool,
    pub from_start: bool,
    pub at_end: bool,
}

const KNOWN_KEYS: &[&str] = &[
    "root",
    "names",
    "params",
    "any_names",
    "any_params",
    "from_start",
    "at_end",
];

impl ActionDocument {
    /// Parse YAML (or JSON, which YAML accepts) text.
    pub fn parse(input: &str) -> anyhow::Result<ActionDocument> {
        if input.trim().is_empty() {
            return Ok(ActionDocument::default());
        }
        let raw: Value = serde_yml::from_str(input).context("failed to parse action document")?;
        Ok(Self::from_value(&raw)?)
    }

    pub fn from_value(raw: &Value) -> Result<ActionDocument> {
        // An empty file parses as null: the empty chain.
        let map = match raw {
            Value::Null => return Ok(ActionDocument::default()),
            Value::Object(map) => map,
            other => {
                return Err(BuilderError::invalid(
                    "Action document",
                    "mapping",
                    json_type_name(other),
                ));
            }
        };

        if let Some(unknown) = map.keys().find(|k| !KNOWN_KEYS.contains(&k.as_str())) {
            return Err(BuilderError::invalid(
                "Action document key",
                "known field",
                unknown.as_str(),
            ));
        }

        let root = match map.get("root") {
            None | Some(Value::Null) => None,
            Some(v) => Some(expect_str(v, "Action name")?),
        };

        let names = match map.get("names") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(|v| expect_str(v, "Action name"))
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(BuilderError::invalid(
                    "Action names",
                    "sequence",
                    json_type_name(other),
                ));
            }
        };

        let params = match map.get("params") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(items)) => items
                .iter()
                .map(parse_param)
                .collect::<Result<Vec<_>>>()?,
            Some(other) => {
                return Err(BuilderError::invalid(
                    "Action params",
                    "sequence",
                    json_type_name(other),
                ));
            }
        };

        Ok(ActionDocument {
            root,
            names,
            params,
            any_names: flag(map, "any_names")?,
            any_params: flag(map, "any_params")?,
            from_start: flag(map, "from_start")?,
            at_end: flag(map, "at_end")?,
        })
    }

    /// Replay the document on top of `builder`.
    pub fn apply(&self, builder: &PatternBuilder) -> Result<PatternBuilder> {
        let mut b = self
            .names
            .iter()
            .fold(builder.clone(), |b, name| b.with_name(name.as_str()));
        if let Some(root) = &self.root {
            b = b.with_root_name(root.as_str());
        }

        for param in &self.params {
            b = b.with_param(param.key.as_str(), param.pattern.as_str());
            if let Some(value) = &param.value {
                b = b.with_param_value(&param.key, value.clone())?;
            }
        }

        if self.any_names {
            b = b.with_any_names();
        }
        if self.any_params {
            b = b.with_any_params();
        }
        if self.from_start {
            b = b.from_start();
        }
        if self.at_end {
            b = b.at_end();
        }
        Ok(b)
    }
}

fn expect_str(value: &Value, what: &'static str) -> Result<String> {
    value
        .as_str()
        .map(str::to_string)
        .ok_or_else(|| BuilderError::invalid(what, "string", json_type_name(value)))
}

fn flag(map: &Map<String, Value>, key: &'static str) -> Result<bool> {
    match map.get(key) {
        None | Some(Value::Null) => Ok(false),
        Some(Value::Bool(b)) => Ok(*b),
        Some(other) => Err(BuilderError::invalid(key, "boolean", json_type_name(other))),
    }
}

fn parse_param(entry: &Value) -> Result<ParamEntry> {
    let Value::Object(map) = entry else {
        return Err(BuilderError::invalid(
            "Action param",
            "mapping",
            json_type_name(entry),
        ));
    };

    let key = match map.get("key") {
        Some(v) => expect_str(v, "Param key")?,
        None => return Err(BuilderError::invalid("Param key", "string", "missing")),
    };
    let pattern = match map.get("pattern") {
        Some(v) => expect_str(v, "Param pattern")?,
        None => return Err(BuilderError::invalid("Param pattern", "string", "missing")),
    };
    let value = match map.get("value") {
        None => None,
        Some(v) => Some(ParamValue::from_json(v)?),
    };

    Ok(ParamEntry { key, pattern, value })
}
