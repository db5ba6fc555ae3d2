//! Reactive Converter
//!
//! Walks raw data and produces reactive objects in which every property is a
//! `ReactiveCell`. Conversion is deep and eager: nested composites are
//! converted before the root is handed back, and nothing is converted lazily
//! on a later read.
//!
//! Scalars pass through unchanged. Conversion takes raw
//! `serde_json::Value`s only; a [`Value`] is already reactive by
//! construction, so no slot can ever receive a second set of cells.
//!
//! # Depth
//!
//! The walk is recursive. [`Observer::observe`] rejects input nested deeper
//! than [`DEFAULT_MAX_DEPTH`] unless configured otherwise, the same limit
//! `serde_json` applies when parsing. [`convert`] applies no limit, so
//! callers handing it programmatically built data are responsible for
//! keeping the nesting within what the stack can hold.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::object::{Object, ObjectKind};
use super::value::Value;
use crate::error::{Error, Result};

/// Nesting limit used when none is configured.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Options controlling conversion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObserverConfig {
    /// Deepest composite nesting accepted by [`Observer::observe`].
    /// `None` accepts any depth.
    pub max_depth: Option<usize>,
}

impl Default for ObserverConfig {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
        }
    }
}

impl ObserverConfig {
    /// Load options from a JSON document.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|err| Error::InvalidConfig {
            reason: err.to_string(),
        })
    }
}

/// Converts raw data into reactive values.
#[derive(Debug, Clone, Default)]
pub struct Observer {
    config: ObserverConfig,
}

impl Observer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ObserverConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ObserverConfig {
        &self.config
    }

    /// Convert raw data, enforcing the configured depth limit.
    pub fn observe(&self, raw: serde_json::Value) -> Result<Value> {
        if let Some(limit) = self.config.max_depth {
            if depth(&raw) > limit {
                return Err(Error::DepthExceeded { limit });
            }
        }
        Ok(walk(raw))
    }
}

/// Convert raw data into a reactive value with default options.
///
/// The input is consumed; its storage moves into the new cells.
pub fn convert(raw: serde_json::Value) -> Value {
    walk(raw)
}

fn walk(raw: serde_json::Value) -> Value {
    match raw {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => Value::Number(n.as_f64().unwrap_or(f64::NAN)),
        serde_json::Value::String(s) => Value::String(s),
        serde_json::Value::Array(items) => {
            let values: IndexMap<String, Value> = items
                .into_iter()
                .enumerate()
                .map(|(index, item)| (index.to_string(), walk(item)))
                .collect();
            Value::Object(Object::from_values(ObjectKind::List, values))
        }
        serde_json::Value::Object(map) => {
            let values: IndexMap<String, Value> =
                map.into_iter().map(|(key, item)| (key, walk(item))).collect();
            Value::Object(Object::from_values(ObjectKind::Map, values))
        }
    }
}

/// Composite nesting depth. Scalars are depth 0.
fn depth(raw: &serde_json::Value) -> usize {
    match raw {
        serde_json::Value::Array(items) => 1 + items.iter().map(depth).max().unwrap_or(0),
        serde_json::Value::Object(map) => 1 + map.values().map(depth).max().unwrap_or(0),
        _ => 0,
    }
}
