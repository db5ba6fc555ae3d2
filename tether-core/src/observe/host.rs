//! Hosts are the objects subscriptions read from.
//!
//! Both converted objects and forwarding facades are hosts, which is what
//! lets a subscription bind to `host.count` or `data.count` interchangeably.

use super::object::Object;
use super::path::PropertyPath;
use super::value::Value;
use crate::error::{Error, Result};
use crate::reactive::ReactiveContext;

/// Something with named, readable and writable properties.
pub trait Host: Send + Sync {
    /// Read a top-level property. Tracked when a reader is active.
    fn read(&self, key: &str) -> Option<Value>;

    /// Write a top-level property. Returns whether subscribers were notified.
    fn write(&self, key: &str, value: Value) -> Result<bool>;

    /// Read along a dotted path, tracking every segment.
    fn read_path(&self, path: &PropertyPath) -> Option<Value> {
        let (first, rest) = path.segments().split_first()?;
        let mut current = self.read(first)?;
        for segment in rest {
            current = current.as_object()?.get(segment)?;
        }
        Some(current)
    }

    /// Write the slot at the end of a dotted path.
    ///
    /// Intermediate segments are resolved without tracking.
    fn write_path(&self, path: &PropertyPath, value: Value) -> Result<bool> {
        let segments = path.segments();
        let Some((last, parents)) = segments.split_last() else {
            return Err(Error::UnknownProperty { key: String::new() });
        };
        let Some((first, middle)) = parents.split_first() else {
            return self.write(last, value);
        };

        let parent = ReactiveContext::untracked(|| -> Result<Object> {
            let mut current = self.read(first).ok_or_else(|| Error::UnknownProperty {
                key: first.clone(),
            })?;
            for (depth, segment) in middle.iter().enumerate() {
                let object = current.as_object().ok_or_else(|| Error::NotAnObject {
                    path: path.prefix(depth + 1),
                })?;
                current = object.get(segment).ok_or_else(|| Error::UnknownProperty {
                    key: segment.clone(),
                })?;
            }
            match current {
                Value::Object(object) => Ok(object),
                _ => Err(Error::NotAnObject {
                    path: path.prefix(parents.len()),
                }),
            }
        })?;

        parent.set(last, value)
    }
}

impl Host for Object {
    fn read(&self, key: &str) -> Option<Value> {
        self.get(key)
    }

    fn write(&self, key: &str, value: Value) -> Result<bool> {
        self.set(key, value)
    }
}
