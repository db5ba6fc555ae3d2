//! Dependency Tracking
//!
//! This module implements the tracking core: who is reading, who depends on
//! what, and who must re-run after a write.
//!
//! # Concepts
//!
//! ## Dependencies
//!
//! A [`Dependency`] is the registry owned by one reactive property. It holds
//! every [`Subscriber`] that read the property during a tracked read, and
//! re-runs them all, in registration order, when the property changes.
//!
//! ## Subscriptions
//!
//! A [`Subscription`] binds a host property to a callback. Its only tracked
//! read happens at construction; every later re-run is a plain read that
//! feeds the callback.
//!
//! # Implementation Notes
//!
//! The current reader lives in a thread-local stack managed by
//! [`ReactiveContext`]. When a cell is read, it checks whether there is an
//! active reader and, if so, registers it.
//!
//! Notification is synchronous. A callback that writes another property runs
//! that property's subscribers before the outer write returns.

mod context;
mod dependency;
mod subscriber;
mod subscription;

pub use context::ReactiveContext;
pub use dependency::{Dependency, DependencyId, WeakDependency};
pub use subscriber::{Subscriber, SubscriberId};
pub use subscription::{subscribe, Subscription};
