//! Subscriber types for the reactive system.
//!
//! A Subscriber is any computation that depends on reactive values and can be
//! asked to re-run when one of them changes. Subscriptions are the only
//! subscriber shipped by the crate; collaborators may implement the trait for
//! their own bindings.

use std::sync::atomic::{AtomicU64, Ordering};

/// Unique identifier for a subscriber.
///
/// Dependency registries key their members by this ID, which is what makes a
/// subscriber appear at most once per registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriberId(u64);

impl SubscriberId {
    /// Generate a new unique subscriber ID.
    pub fn new() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(0);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl Default for SubscriberId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SubscriberId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "sub#{}", self.0)
    }
}

/// A computation that can be notified when its dependencies change.
pub trait Subscriber: Send + Sync {
    /// Get the subscriber's unique ID.
    fn id(&self) -> SubscriberId;

    /// Re-run the computation after a dependency changed.
    fn rerun(&self);

    /// Whether the subscriber can still be re-run.
    ///
    /// Registries refuse subscribers that report `false` here.
    fn is_live(&self) -> bool {
        true
    }
}
