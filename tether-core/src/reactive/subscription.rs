//! Subscription Implementation
//!
//! A Subscription binds one host property to a callback.
//!
//! # How Subscriptions Work
//!
//! 1. When created, the subscription becomes the current reader, reads the
//!    property once, and stops being the current reader. That read is what
//!    registers the subscription with the property's dependency registry
//!    (and, for a dotted path, with every registry along the path).
//!
//! 2. When the property is written with a different value, the registry
//!    re-runs the subscription synchronously.
//!
//! 3. A re-run reads the property again without tracking and always invokes
//!    the callback with what it read, even if that equals the previous
//!    delivery. Dependencies are only ever collected at construction.
//!
//! # Lifetime
//!
//! Registries hold the subscription, so dropping the handle does not stop
//! it. Call [`Subscription::dispose`] to detach it from every registry it
//! joined.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use indexmap::IndexMap;
use parking_lot::{Mutex, RwLock};

use super::context::ReactiveContext;
use super::dependency::{DependencyId, WeakDependency};
use super::subscriber::{Subscriber, SubscriberId};
use crate::observe::{Host, PropertyPath, Value};

type Callback = dyn Fn(&Value) + Send + Sync;

struct SubscriptionInner {
    subscriber_id: SubscriberId,
    host: Arc<dyn Host>,
    path: PropertyPath,
    callback: Box<Callback>,

    /// The value seen by the last read.
    last_value: RwLock<Value>,

    /// Registries joined during the construction read.
    joined: Mutex<Vec<WeakDependency>>,

    disposed: AtomicBool,

    /// Number of times the callback has been invoked.
    run_count: AtomicUsize,
}

impl Subscriber for SubscriptionInner {
    fn id(&self) -> SubscriberId {
        self.subscriber_id
    }

    fn rerun(&self) {
        if self.disposed.load(Ordering::SeqCst) {
            return;
        }

        let value = ReactiveContext::untracked(|| self.host.read_path(&self.path))
            .unwrap_or_default();

        *self.last_value.write() = value.clone();
        self.run_count.fetch_add(1, Ordering::SeqCst);
        (self.callback)(&value);
    }

    fn is_live(&self) -> bool {
        !self.disposed.load(Ordering::SeqCst)
    }
}

/// Handle to a property binding.
///
/// # Example
///
/// ```rust
/// use std::sync::Arc;
/// use parking_lot::Mutex;
/// use tether_core::observe::{Object, Value};
/// use tether_core::reactive::Subscription;
///
/// let data = Object::map([("count", 0)]);
///
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let sink = seen.clone();
/// let _sub = Subscription::new(&data, "count", move |v: &Value| sink.lock().push(v.clone()));
///
/// data.set("count", 5).ok();
/// assert_eq!(*seen.lock(), vec![Value::from(5)]);
/// ```
#[derive(Clone)]
pub struct Subscription {
    inner: Arc<SubscriptionInner>,
}

impl Subscription {
    /// Bind `path` on `host` to `on_change`.
    ///
    /// The callback is not invoked for the initial value, only for changes.
    pub fn new<H, F>(host: &H, path: impl Into<PropertyPath>, on_change: F) -> Self
    where
        H: Host + Clone + 'static,
        F: Fn(&Value) + Send + Sync + 'static,
    {
        let inner = Arc::new(SubscriptionInner {
            subscriber_id: SubscriberId::new(),
            host: Arc::new(host.clone()),
            path: path.into(),
            callback: Box::new(on_change),
            last_value: RwLock::new(Value::Null),
            joined: Mutex::new(Vec::new()),
            disposed: AtomicBool::new(false),
            run_count: AtomicUsize::new(0),
        });

        let (value, dependencies) = {
            let _ctx = ReactiveContext::enter(inner.clone());
            let value = inner.host.read_path(&inner.path);
            (value, ReactiveContext::get_dependencies())
        };

        if value.is_none() {
            tracing::debug!(
                subscriber = %inner.subscriber_id,
                path = %inner.path,
                "subscribed property does not resolve"
            );
        }

        let unique: IndexMap<DependencyId, WeakDependency> = dependencies
            .into_iter()
            .map(|dep| (dep.id(), dep))
            .collect();
        *inner.joined.lock() = unique.into_values().collect();
        *inner.last_value.write() = value.unwrap_or_default();

        Self { inner }
    }

    /// Get the subscriber ID used for dependency tracking.
    pub fn id(&self) -> SubscriberId {
        self.inner.subscriber_id
    }

    pub fn path(&self) -> &PropertyPath {
        &self.inner.path
    }

    /// The value observed by the most recent read.
    pub fn last_value(&self) -> Value {
        self.inner.last_value.read().clone()
    }

    /// Get the number of times the callback has run.
    pub fn run_count(&self) -> usize {
        self.inner.run_count.load(Ordering::SeqCst)
    }

    /// Get the number of registries this subscription belongs to.
    pub fn dependency_count(&self) -> usize {
        self.inner.joined.lock().len()
    }

    /// Detach from every registry joined at construction.
    ///
    /// After disposal the callback never runs again. Disposing twice is a
    /// no-op.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        let joined = std::mem::take(&mut *self.inner.joined.lock());
        let removed = joined
            .iter()
            .filter_map(WeakDependency::upgrade)
            .filter(|dep| dep.remove(self.inner.subscriber_id))
            .count();

        tracing::debug!(
            subscriber = %self.inner.subscriber_id,
            path = %self.inner.path,
            removed,
            "disposed subscription"
        );
    }

    /// Check if the subscription has been disposed.
    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.inner.subscriber_id)
            .field("path", &self.inner.path)
            .field("run_count", &self.run_count())
            .field("dependency_count", &self.dependency_count())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}

/// Bind `path` on `host` to `on_change`. See [`Subscription::new`].
pub fn subscribe<H, F>(host: &H, path: impl Into<PropertyPath>, on_change: F) -> Subscription
where
    H: Host + Clone + 'static,
    F: Fn(&Value) + Send + Sync + 'static,
{
    Subscription::new(host, path, on_change)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observe::{convert, Object};
    use serde_json::json;

    fn object(raw: serde_json::Value) -> Object {
        match convert(raw) {
            Value::Object(object) => object,
            other => panic!("expected an object, got {other:?}"),
        }
    }

    fn recorder() -> (Arc<Mutex<Vec<Value>>>, impl Fn(&Value) + Send + Sync + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = seen.clone();
        (seen, move |v: &Value| sink.lock().push(v.clone()))
    }

    #[test]
    fn construction_registers_without_running() {
        let data = object(json!({"count": 0}));
        let (seen, cb) = recorder();

        let sub = Subscription::new(&data, "count", cb);

        assert!(seen.lock().is_empty());
        assert_eq!(sub.run_count(), 0);
        assert_eq!(sub.dependency_count(), 1);
        assert_eq!(sub.last_value(), Value::from(0));
        assert_eq!(data.cell("count").map(|c| c.subscriber_count()), Some(1));
    }

    #[test]
    fn rerun_delivers_an_unchanged_value() {
        let data = object(json!({"count": 0}));
        let (seen, cb) = recorder();
        let sub = Subscription::new(&data, "count", cb);

        let cell = data.cell("count").expect("count slot");
        cell.dependency().notify_all();
        cell.dependency().notify_all();

        assert_eq!(*seen.lock(), vec![Value::from(0), Value::from(0)]);
        assert_eq!(sub.run_count(), 2);
    }

    #[test]
    fn write_runs_callback_with_new_value() {
        let data = object(json!({"count": 0}));
        let (seen, cb) = recorder();
        let sub = Subscription::new(&data, "count", cb);

        data.set("count", 1).ok();
        data.set("count", 2).ok();

        assert_eq!(*seen.lock(), vec![Value::from(1), Value::from(2)]);
        assert_eq!(sub.run_count(), 2);
    }

    #[test]
    fn rerun_does_not_collect_dependencies() {
        let data = object(json!({"count": 0, "other": 0}));
        let (_, cb) = recorder();
        let sub = Subscription::new(&data, "count", cb);

        data.set("count", 1).ok();
        data.set("count", 2).ok();

        assert_eq!(sub.dependency_count(), 1);
        assert_eq!(data.cell("count").map(|c| c.subscriber_count()), Some(1));
        assert_eq!(data.cell("other").map(|c| c.subscriber_count()), Some(0));
    }

    #[test]
    fn path_subscription_depends_on_every_segment() {
        let data = object(json!({"user": {"name": "a"}}));
        let (seen, cb) = recorder();
        let sub = Subscription::new(&data, "user.name", cb);

        assert_eq!(sub.dependency_count(), 2);

        data.set_path("user.name", "b").ok();
        data.set("user", json!({"name": "c"})).ok();

        assert_eq!(*seen.lock(), vec![Value::from("b"), Value::from("c")]);
    }

    #[test]
    fn unresolved_property_observes_null() {
        let data = object(json!({"count": 0}));
        let (seen, cb) = recorder();
        let sub = Subscription::new(&data, "missing", cb);

        assert_eq!(sub.last_value(), Value::Null);
        assert_eq!(sub.dependency_count(), 0);
        data.set("count", 1).ok();
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn disposed_subscription_does_not_run() {
        let data = object(json!({"count": 0}));
        let (seen, cb) = recorder();
        let sub = Subscription::new(&data, "count", cb);

        sub.dispose();
        assert!(sub.is_disposed());
        assert_eq!(sub.dependency_count(), 0);
        assert_eq!(data.cell("count").map(|c| c.subscriber_count()), Some(0));

        data.set("count", 1).ok();
        assert!(seen.lock().is_empty());

        // Second dispose is harmless
        sub.dispose();
    }

    #[test]
    fn dropping_the_handle_keeps_the_binding() {
        let data = object(json!({"count": 0}));
        let (seen, cb) = recorder();
        drop(subscribe(&data, "count", cb));

        data.set("count", 7).ok();
        assert_eq!(*seen.lock(), vec![Value::from(7)]);
    }

    #[test]
    fn clone_shares_state() {
        let data = object(json!({"count": 0}));
        let (_, cb) = recorder();
        let sub1 = Subscription::new(&data, "count", cb);
        let sub2 = sub1.clone();

        assert_eq!(sub1.id(), sub2.id());

        data.set("count", 1).ok();
        assert_eq!(sub2.run_count(), 1);

        sub1.dispose();
        assert!(sub2.is_disposed());
    }
}
