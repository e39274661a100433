//! Immutable builder for action identifiers.
//!
//! An action identifier is a list of name segments followed by a list of
//! parameter values, e.g. `user_load:42:full`. The same builder state can be
//! projected two ways:
//!
//! - [`PatternBuilder::to_matcher`] produces a regular expression matching
//!   every identifier that fits the (possibly partial) description.
//! - [`PatternBuilder::to_identifier`] serializes a concrete identifier once
//!   every parameter has a bound value.
//!
//! Every `with_*` call returns a new builder. The receiver is never touched,
//! so a builder can be forked freely and shared across threads.

use std::collections::HashMap;
use std::sync::Arc;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::error::{BuilderError, Result};
use crate::value::ParamValue;

/// Fragment substituted for an unconstrained name or parameter portion.
pub const WILDCARD: &str = ".*";

/// Separators and ordering, fixed for the lifetime of a builder chain.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuilderOptions {
    pub name_separator: String,
    pub param_separator: String,
    /// Order assigned to the first parameter. Lower slots stay free for
    /// parameters injected by the consumer of the matcher. Narrower than
    /// `Param::order` so the counter cannot overflow from the offset alone.
    pub param_order_offset: i32,
}

impl Default for BuilderOptions {
    fn default() -> Self {
        Self {
            name_separator: "_".to_string(),
            param_separator: ":".to_string(),
            param_order_offset: 1,
        }
    }
}

/// A registered parameter slot.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub key: String,
    /// Regex fragment, normally a capture group like `(\d+)`.
    pub pattern: String,
    /// Position among all parameters in both projections.
    pub order: i64,
    pub value: Option<ParamValue>,
}

/// Hand-seeded params must keep their orders below `i64::MAX`; the next
/// order saturates there instead of wrapping.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuilderState {
    pub names: Vec<String>,
    /// Iteration order is irrelevant; `Param::order` decides output order.
    pub params: HashMap<String, Param>,
    pub is_any_names: bool,
    pub is_any_params: bool,
    pub is_from_start: bool,
    pub is_at_end: bool,
}

impl BuilderState {
    /// Parameters sorted by ascending order.
    fn ordered_params(&self) -> Vec<&Param> {
        let mut params: Vec<&Param> = self.params.values().collect();
        params.sort_by_key(|p| p.order);
        params
    }
}

#[derive(Debug, Clone)]
pub struct PatternBuilder {
    options: Arc<BuilderOptions>,
    state: Arc<BuilderState>,
}

impl Default for PatternBuilder {
    fn default() -> Self {
        Self::new(BuilderOptions::default())
    }
}

impl PatternBuilder {
    pub fn new(options: BuilderOptions) -> Self {
        Self::with_state(options, BuilderState::default())
    }

    /// Start from a pre-populated state instead of an empty one.
    pub fn with_state(options: BuilderOptions, state: BuilderState) -> Self {
        Self {
            options: Arc::new(options),
            state: Arc::new(state),
        }
    }

    pub fn options(&self) -> &BuilderOptions {
        &self.options
    }

    pub fn state(&self) -> &BuilderState {
        &self.state
    }

    /// Wrap a new state, sharing the options with `self`.
    fn derive(&self, state: BuilderState) -> Self {
        Self {
            options: Arc::clone(&self.options),
            state: Arc::new(state),
        }
    }

    /// Copy the current state, apply `f`, and wrap the result.
    fn update(&self, f: impl FnOnce(&mut BuilderState)) -> Self {
        let mut state = BuilderState::clone(&self.state);
        f(&mut state);
        self.derive(state)
    }

    fn next_param_order(&self) -> i64 {
        self.state
            .params
            .values()
            .map(|p| p.order)
            .fold(i64::from(self.options.param_order_offset) - 1, i64::max)
            .saturating_add(1)
    }

    fn known_param(&self, key: &str) -> Result<&Param> {
        self.state
            .params
            .get(key)
            .ok_or_else(|| BuilderError::UnknownParam(key.to_string()))
    }

    /// Append a name segment.
    pub fn with_name(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.update(|s| s.names.push(name))
    }

    /// Prepend a name segment.
    pub fn with_root_name(&self, name: impl Into<String>) -> Self {
        let name = name.into();
        self.update(|s| s.names.insert(0, name))
    }

    pub fn with_any_names(&self) -> Self {
        self.update(|s| s.is_any_names = true)
    }

    /// Register `key` with a fresh order. Re-registering an existing key
    /// moves it to the end and drops its bound value.
    pub fn with_param(&self, key: impl Into<String>, pattern: impl Into<String>) -> Self {
        let key = key.into();
        let param = Param {
            key: key.clone(),
            pattern: pattern.into(),
            order: self.next_param_order(),
            value: None,
        };
        if self.state.params.contains_key(&key) {
            trace!(key = %key, order = param.order, "re-registering param");
        }
        self.update(|s| {
            s.params.insert(key, param);
        })
    }

    pub fn with_param_value(&self, key: &str, value: impl Into<ParamValue>) -> Result<Self> {
        self.known_param(key)?;
        let value = value.into();
        Ok(self.update(|s| {
            if let Some(param) = s.params.get_mut(key) {
                param.value = Some(value);
            }
        }))
    }

    pub fn with_param_pattern(&self, key: &str, pattern: impl Into<String>) -> Result<Self> {
        self.known_param(key)?;
        let pattern = pattern.into();
        Ok(self.update(|s| {
            if let Some(param) = s.params.get_mut(key) {
                param.pattern = pattern;
            }
        }))
    }

    pub fn with_any_params(&self) -> Self {
        self.update(|s| s.is_any_params = true)
    }

    /// Anchor the matcher at the start of the input.
    pub fn from_start(&self) -> Self {
        self.update(|s| s.is_from_start = true)
    }

    /// Anchor the matcher at the end of the input.
    pub fn at_end(&self) -> Self {
        self.update(|s| s.is_at_end = true)
    }

    pub fn param(&self, key: &str) -> Option<&Param> {
        self.state.params.get(key)
    }

    pub fn param_order(&self, key: &str) -> Result<i64> {
        Ok(self.known_param(key)?.order)
    }

    pub fn param_value(&self, key: &str) -> Option<&ParamValue> {
        self.state.params.get(key)?.value.as_ref()
    }

    pub fn has_param(&self, key: &str) -> bool {
        self.state.params.contains_key(key)
    }

    /// The uncompiled matcher pattern.
    ///
    /// An empty name or parameter portion, or one flagged with
    /// `with_any_names`/`with_any_params`, collapses to [`WILDCARD`].
    pub fn matcher_source(&self) -> String {
        let state = &*self.state;
        let opts = &*self.options;

        let names = if state.is_any_names || state.names.is_empty() {
            WILDCARD.to_string()
        } else {
            state.names.join(opts.name_separator.as_str())
        };

        let patterns: Vec<&str> = state
            .ordered_params()
            .into_iter()
            .map(|p| p.pattern.as_str())
            .collect();
        let params = if state.is_any_params || patterns.is_empty() {
            WILDCARD.to_string()
        } else {
            patterns.join(opts.param_separator.as_str())
        };

        format!(
            "{}{}{}{}{}",
            if state.is_from_start { "^" } else { "" },
            names,
            opts.param_separator,
            params,
            if state.is_at_end { "$" } else { "" },
        )
    }

    /// Compile the matcher. Fails only when a caller-supplied parameter
    /// pattern is not valid regex syntax.
    pub fn to_matcher(&self) -> Result<Regex> {
        let pattern = self.matcher_source();
        debug!(pattern = %pattern, "compiling action matcher");
        Regex::new(&pattern).map_err(|source| BuilderError::PatternCompile { pattern, source })
    }

    /// Serialize the concrete identifier. Every registered parameter must
    /// have a value; names are used literally and never collapse to the
    /// wildcard.
    pub fn to_identifier(&self) -> Result<String> {
        let params = self.state.ordered_params();

        let mut values = Vec::with_capacity(params.len());
        for param in params {
            match &param.value {
                Some(value) => values.push(value.to_string()),
                None => return Err(BuilderError::MissingValue(param.key.clone())),
            }
        }

        let opts = &*self.options;
        let identifier = format!(
            "{}{}{}",
            self.state.names.join(opts.name_separator.as_str()),
            opts.param_separator,
            values.join(opts.param_separator.as_str()),
        );
        debug!(identifier = %identifier, "built action identifier");
        Ok(identifier)
    }
}
