//! Reactive objects and their property cells.
//!
//! An `Object` is a converted composite. Its set of keys is fixed when it is
//! converted; each key owns a `ReactiveCell` holding the current value and
//! the property's dependency registry.
//!
//! # Reads and Writes
//!
//! - `get` registers the current reader (if any) with the cell's registry and
//!   returns the value.
//! - `set` compares the new value with the current one, stores it when it
//!   differs, and then re-runs every registered subscriber before returning.
//!
//! The value lock is released before notification, so subscribers are free
//! to read or write the same cell again.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::path::PropertyPath;
use super::value::Value;
use crate::error::{Error, Result};
use crate::reactive::{Dependency, ReactiveContext};

/// One tracked property slot.
pub struct ReactiveCell {
    value: RwLock<Value>,
    dependency: Dependency,
}

impl ReactiveCell {
    /// Create a cell holding an already converted value.
    pub fn new(value: Value) -> Self {
        Self {
            value: RwLock::new(value),
            dependency: Dependency::new(),
        }
    }

    /// Read the value, registering the current reader as a dependent.
    pub fn get(&self) -> Value {
        if let Some(subscriber) = ReactiveContext::current_subscriber() {
            if self.dependency.register(&subscriber) {
                ReactiveContext::track_dependency(self.dependency.downgrade());
            }
        }
        self.value.read().clone()
    }

    /// Read the value without tracking.
    pub fn peek(&self) -> Value {
        self.value.read().clone()
    }

    /// Store a new value and notify dependents.
    ///
    /// Raw data is converted before it is stored. Returns `false` without
    /// notifying anyone if the value is the same as the current one.
    pub fn set(&self, value: impl Into<Value>) -> bool {
        let value = value.into();
        {
            let mut current = self.value.write();
            if current.same(&value) {
                tracing::trace!(dependency = %self.dependency.id(), "suppressed write of an equal value");
                return false;
            }
            *current = value;
        }

        self.dependency.notify_all();
        true
    }

    /// The registry of subscribers that read this cell.
    pub fn dependency(&self) -> &Dependency {
        &self.dependency
    }

    /// Get the number of subscribers depending on this cell.
    pub fn subscriber_count(&self) -> usize {
        self.dependency.len()
    }
}

impl std::fmt::Debug for ReactiveCell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReactiveCell")
            .field("value", &*self.value.read())
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

/// Whether a composite came from a mapping or a sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjectKind {
    Map,
    /// Keys are the decimal indices `"0"`, `"1"`, ...
    List,
}

struct ObjectInner {
    kind: ObjectKind,
    slots: IndexMap<String, ReactiveCell>,
}

/// A converted composite value.
///
/// Cloning an `Object` creates a new handle to the same slots.
#[derive(Clone)]
pub struct Object {
    inner: Arc<ObjectInner>,
}

impl Object {
    pub(crate) fn from_values(kind: ObjectKind, values: IndexMap<String, Value>) -> Self {
        let slots = values
            .into_iter()
            .map(|(key, value)| (key, ReactiveCell::new(value)))
            .collect();
        Self {
            inner: Arc::new(ObjectInner { kind, slots }),
        }
    }

    /// Build a mapping object. Raw values are converted as they are added.
    pub fn map<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        let values = entries
            .into_iter()
            .map(|(key, value)| (key.into(), value.into()))
            .collect();
        Self::from_values(ObjectKind::Map, values)
    }

    /// Build a list object.
    pub fn list<I, V>(items: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = items
            .into_iter()
            .enumerate()
            .map(|(index, value)| (index.to_string(), value.into()))
            .collect();
        Self::from_values(ObjectKind::List, values)
    }

    /// Check whether two handles refer to the same object.
    pub fn ptr_eq(a: &Object, b: &Object) -> bool {
        Arc::ptr_eq(&a.inner, &b.inner)
    }

    pub fn kind(&self) -> ObjectKind {
        self.inner.kind
    }

    pub fn len(&self) -> usize {
        self.inner.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.inner.slots.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.inner.slots.contains_key(key)
    }

    /// Property names in conversion order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.inner.slots.keys().map(String::as_str)
    }

    /// Properties and their cells in conversion order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &ReactiveCell)> {
        self.inner.slots.iter().map(|(key, cell)| (key.as_str(), cell))
    }

    pub fn cell(&self, key: &str) -> Option<&ReactiveCell> {
        self.inner.slots.get(key)
    }

    /// Tracked read of a property.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.cell(key).map(ReactiveCell::get)
    }

    /// Untracked read of a property.
    pub fn peek(&self, key: &str) -> Option<Value> {
        self.cell(key).map(ReactiveCell::peek)
    }

    /// Write a property.
    ///
    /// Returns whether subscribers were notified. Properties that did not
    /// exist at conversion time cannot be written.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<bool> {
        let cell = self.cell(key).ok_or_else(|| Error::UnknownProperty {
            key: key.to_owned(),
        })?;
        Ok(cell.set(value))
    }

    /// Write a property using a function of its current value.
    pub fn update<F>(&self, key: &str, f: F) -> Result<bool>
    where
        F: FnOnce(&Value) -> Value,
    {
        let cell = self.cell(key).ok_or_else(|| Error::UnknownProperty {
            key: key.to_owned(),
        })?;
        let next = f(&cell.peek());
        Ok(cell.set(next))
    }

    /// Tracked read along a dotted path.
    ///
    /// Every slot on the way is read, so a subscriber tracking the path also
    /// depends on each intermediate object.
    pub fn get_path(&self, path: impl Into<PropertyPath>) -> Option<Value> {
        super::host::Host::read_path(self, &path.into())
    }

    /// Write the slot at the end of a dotted path.
    pub fn set_path(&self, path: impl Into<PropertyPath>, value: impl Into<Value>) -> Result<bool> {
        super::host::Host::write_path(self, &path.into(), value.into())
    }

    /// Copy the current state into plain JSON without tracking any read.
    pub fn snapshot(&self) -> serde_json::Value {
        match self.inner.kind {
            ObjectKind::List => serde_json::Value::Array(
                self.inner.slots.values().map(|cell| cell.peek().snapshot()).collect(),
            ),
            ObjectKind::Map => serde_json::Value::Object(
                self.inner
                    .slots
                    .iter()
                    .map(|(key, cell)| (key.clone(), cell.peek().snapshot()))
                    .collect(),
            ),
        }
    }
}

impl std::fmt::Debug for Object {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Object")
            .field("kind", &self.inner.kind)
            .field("keys", &self.inner.slots.keys().collect::<Vec<_>>())
            .finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cell_get_and_set() {
        let cell = ReactiveCell::new(Value::from(0));
        assert_eq!(cell.get(), Value::from(0));

        assert!(cell.set(42));
        assert_eq!(cell.get(), Value::from(42));
    }

    #[test]
    fn cell_suppresses_equal_writes() {
        let cell = ReactiveCell::new(Value::from("a"));
        assert!(!cell.set("a"));
        assert!(cell.set("b"));
        assert!(!cell.set("b"));
    }

    #[test]
    fn cell_converts_raw_assignments() {
        let cell = ReactiveCell::new(Value::Null);
        cell.set(json!({"name": "a"}));

        let value = cell.peek();
        let object = value.as_object().map(Object::clone);
        assert_eq!(
            object.and_then(|o| o.cell("name").map(ReactiveCell::peek)),
            Some(Value::from("a"))
        );
    }

    #[test]
    fn object_rejects_unknown_properties() {
        let object = Object::map([("count", 0)]);
        assert_eq!(
            object.set("missing", 1),
            Err(Error::UnknownProperty { key: "missing".into() })
        );
        assert!(object.get("missing").is_none());
    }

    #[test]
    fn object_update_uses_current_value() {
        let object = Object::map([("count", 10)]);
        let changed = object.update("count", |v| Value::from(v.as_f64().unwrap_or(0.0) + 5.0));

        assert_eq!(changed, Ok(true));
        assert_eq!(object.peek("count"), Some(Value::from(15)));
    }

    #[test]
    fn list_objects_are_indexed() {
        let list = Object::list(["x", "y"]);
        assert_eq!(list.kind(), ObjectKind::List);
        assert_eq!(list.keys().collect::<Vec<_>>(), vec!["0", "1"]);
        assert_eq!(list.snapshot(), json!(["x", "y"]));
    }

    #[test]
    fn clone_shares_slots() {
        let a = Object::map([("count", 0)]);
        let b = a.clone();

        assert!(Object::ptr_eq(&a, &b));
        a.set("count", 3).ok();
        assert_eq!(b.peek("count"), Some(Value::from(3)));
    }

    #[test]
    fn path_access_reaches_nested_slots() {
        let root = Object::map([("user", json!({"name": "a"}))]);

        assert_eq!(root.get_path("user.name"), Some(Value::from("a")));
        assert_eq!(root.set_path("user.name", "b"), Ok(true));
        assert_eq!(root.get_path("user.name"), Some(Value::from("b")));
        assert!(root.get_path("user.age").is_none());
    }
}
