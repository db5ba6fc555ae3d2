//! Field-Forwarding Facade
//!
//! A `Facade` exposes the top-level properties of converted data objects as
//! its own, so collaborators can address `host.count` instead of
//! `host.data.count`. Every read and write is forwarded to the data object's
//! slot; the facade has no tracking logic of its own.

use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::RwLock;

use super::host::Host;
use super::object::Object;
use super::value::Value;
use crate::error::{Error, Result};

/// A host whose properties forward to converted data objects.
///
/// Cloning a `Facade` creates a new handle to the same forwarding table.
#[derive(Clone, Default)]
pub struct Facade {
    /// Property name to the object that owns the slot.
    fields: Arc<RwLock<IndexMap<String, Object>>>,
}

impl Facade {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a facade forwarding every top-level property of `data`.
    pub fn over(data: &Object) -> Self {
        let facade = Self::new();
        facade.forward_all(data);
        facade
    }

    /// Forward the named properties of `data`.
    ///
    /// Names that `data` does not have are skipped. A name that was already
    /// forwarded is re-pointed at `data`.
    pub fn forward<I, S>(&self, data: &Object, names: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut fields = self.fields.write();
        for name in names {
            let name = name.into();
            if !data.contains_key(&name) {
                tracing::debug!(field = %name, "not forwarding a property the data object lacks");
                continue;
            }
            if fields.insert(name.clone(), data.clone()).is_some() {
                tracing::debug!(field = %name, "re-pointing forwarded property");
            }
        }
    }

    /// Forward every top-level property of `data`.
    pub fn forward_all(&self, data: &Object) {
        self.forward(data, data.keys());
    }

    /// Names of the forwarded properties, in forwarding order.
    pub fn fields(&self) -> Vec<String> {
        self.fields.read().keys().cloned().collect()
    }

    pub fn is_forwarded(&self, key: &str) -> bool {
        self.fields.read().contains_key(key)
    }

    /// Tracked read of a forwarded property.
    pub fn get(&self, key: &str) -> Option<Value> {
        self.target(key)?.get(key)
    }

    /// Write a forwarded property.
    pub fn set(&self, key: &str, value: impl Into<Value>) -> Result<bool> {
        let target = self.target(key).ok_or_else(|| Error::UnknownProperty {
            key: key.to_owned(),
        })?;
        target.set(key, value)
    }

    /// Look up the owning object, releasing the table lock before any slot is
    /// touched. Writes notify synchronously and may come back through here.
    fn target(&self, key: &str) -> Option<Object> {
        self.fields.read().get(key).cloned()
    }
}

impl Host for Facade {
    fn read(&self, key: &str) -> Option<Value> {
        self.get(key)
    }

    fn write(&self, key: &str, value: Value) -> Result<bool> {
        self.set(key, value)
    }
}

impl std::fmt::Debug for Facade {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Facade")
            .field("fields", &self.fields())
            .finish()
    }
}

/// Forward the named top-level properties of `data` onto `host`.
pub fn forward_fields<I, S>(host: &Facade, data: &Object, names: I)
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    host.forward(data, names);
}
