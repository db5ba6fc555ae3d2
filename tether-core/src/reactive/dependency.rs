//! Dependency Registry
//!
//! Each reactive property owns exactly one `Dependency`: the set of
//! subscribers that read the property during a tracked read and must be
//! re-run when it changes.
//!
//! # Re-entrancy
//!
//! Notification is synchronous, and a subscriber's re-run may write another
//! property, construct new subscriptions, or register into this very
//! registry. `notify_all` therefore snapshots the members and releases the
//! lock before invoking anyone.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use indexmap::IndexMap;
use parking_lot::RwLock;
use smallvec::SmallVec;

use super::subscriber::{Subscriber, SubscriberId};

/// Unique identifier for a dependency registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DependencyId(u64);

impl DependencyId {
    fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for DependencyId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "dep#{}", self.0)
    }
}

struct DependencyInner {
    id: DependencyId,
    /// Members in registration order. Keyed by ID for uniqueness.
    subscribers: RwLock<IndexMap<SubscriberId, Arc<dyn Subscriber>>>,
}

/// Per-property set of subscribers.
///
/// Cloning a `Dependency` yields another handle to the same registry.
#[derive(Clone)]
pub struct Dependency {
    inner: Arc<DependencyInner>,
}

impl Dependency {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(DependencyInner {
                id: DependencyId::new(),
                subscribers: RwLock::new(IndexMap::new()),
            }),
        }
    }

    /// Get the registry's unique ID.
    pub fn id(&self) -> DependencyId {
        self.inner.id
    }

    /// Add a subscriber.
    ///
    /// Returns `true` if the subscriber was newly added. Subscribers that are
    /// no longer live are dropped without error.
    pub fn register(&self, subscriber: &Arc<dyn Subscriber>) -> bool {
        if !subscriber.is_live() {
            tracing::debug!(
                dependency = %self.inner.id,
                subscriber = %subscriber.id(),
                "ignoring registration of a subscriber that cannot re-run"
            );
            return false;
        }

        let mut subscribers = self.inner.subscribers.write();
        if subscribers.contains_key(&subscriber.id()) {
            return false;
        }
        subscribers.insert(subscriber.id(), Arc::clone(subscriber));
        true
    }

    /// Remove a subscriber. Returns `true` if it was a member.
    pub fn remove(&self, subscriber_id: SubscriberId) -> bool {
        self.inner
            .subscribers
            .write()
            .shift_remove(&subscriber_id)
            .is_some()
    }

    /// Re-run every registered subscriber, in registration order.
    ///
    /// Returns the number of subscribers that were invoked.
    pub fn notify_all(&self) -> usize {
        let snapshot: SmallVec<[Arc<dyn Subscriber>; 4]> =
            self.inner.subscribers.read().values().cloned().collect();

        tracing::trace!(
            dependency = %self.inner.id,
            subscribers = snapshot.len(),
            "notifying subscribers"
        );

        let mut invoked = 0;
        for subscriber in snapshot {
            // A re-run earlier in this loop may have disposed a later member.
            if subscriber.is_live() {
                subscriber.rerun();
                invoked += 1;
            }
        }
        invoked
    }

    /// Check whether the subscriber is registered.
    pub fn contains(&self, subscriber_id: SubscriberId) -> bool {
        self.inner.subscribers.read().contains_key(&subscriber_id)
    }

    /// Get the number of registered subscribers.
    pub fn len(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    /// Check whether the registry has no subscribers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Downgrade to a handle that does not keep the registry alive.
    pub fn downgrade(&self) -> WeakDependency {
        WeakDependency {
            id: self.inner.id,
            inner: Arc::downgrade(&self.inner),
        }
    }
}

impl Default for Dependency {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for Dependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dependency")
            .field("id", &self.inner.id)
            .field("subscriber_count", &self.len())
            .finish()
    }
}

/// Non-owning handle to a `Dependency`.
///
/// Subscriptions keep these for every registry they joined so they can leave
/// them again on disposal.
#[derive(Clone)]
pub struct WeakDependency {
    id: DependencyId,
    inner: Weak<DependencyInner>,
}

impl WeakDependency {
    /// Get the ID of the referenced registry.
    pub fn id(&self) -> DependencyId {
        self.id
    }

    /// Recover the registry if it still exists.
    pub fn upgrade(&self) -> Option<Dependency> {
        self.inner.upgrade().map(|inner| Dependency { inner })
    }
}

impl std::fmt::Debug for WeakDependency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("WeakDependency").field(&self.id).finish()
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
