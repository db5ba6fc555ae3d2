//! Reactive Context
//!
//! The reactive context tracks which subscriber is currently performing a
//! tracked read. When a reactive cell is read, it asks the context for the
//! current subscriber and, if there is one, registers it.
//!
//! # Implementation
//!
//! We use a thread-local stack. Entering a context pushes an entry and the
//! returned guard pops it on drop, so a tracked read that starts another
//! tracked read (a subscription created from inside a callback) shadows the
//! outer reader and restores it afterwards. Only the innermost entry is ever
//! registered.
//!
//! An entry may also be untracked: reads performed under it register nobody.
//! Re-runs use this so that they never add dependencies.
//!
//! # Limitations
//!
//! Nested tracked reads are not a supported way to compose bindings. The
//! stack only guarantees that an inner read does not clobber the outer one:
//! reads made while the inner entry is on top register the inner subscriber
//! alone, and the outer subscriber is never told about them. Nothing merges
//! inner dependencies into the outer reader.

use std::cell::RefCell;
use std::sync::Arc;

use super::dependency::WeakDependency;
use super::subscriber::{Subscriber, SubscriberId};

thread_local! {
    static CONTEXT_STACK: RefCell<Vec<ContextEntry>> = const { RefCell::new(Vec::new()) };
}

/// An entry in the reactive context stack.
struct ContextEntry {
    /// The reader, or `None` for an untracked section.
    subscriber: Option<Arc<dyn Subscriber>>,
    /// Registries read during this entry, in read order.
    dependencies: Vec<WeakDependency>,
}

/// Guard that pops the context when dropped.
///
/// This keeps the stack balanced even if the read panics.
pub struct ReactiveContext {
    subscriber_id: Option<SubscriberId>,
}

impl ReactiveContext {
    /// Enter a tracked read on behalf of `subscriber`.
    ///
    /// While the guard is alive, every reactive read registers `subscriber`
    /// with the registry of the cell being read.
    pub fn enter(subscriber: Arc<dyn Subscriber>) -> Self {
        let subscriber_id = Some(subscriber.id());
        CONTEXT_STACK.with(|stack| {
            stack.borrow_mut().push(ContextEntry {
                subscriber: Some(subscriber),
                dependencies: Vec::new(),
            });
        });

        Self { subscriber_id }
    }

    /// Enter an untracked section.
    pub fn enter_untracked() -> Self {
        CONTEXT_STACK.with(|stack| {
            stack.borrow_mut().push(ContextEntry {
                subscriber: None,
                dependencies: Vec::new(),
            });
        });

        Self { subscriber_id: None }
    }

    /// Run `f` with tracking suppressed.
    pub fn untracked<R>(f: impl FnOnce() -> R) -> R {
        let _ctx = Self::enter_untracked();
        f()
    }

    /// Check if a tracked read is in progress.
    pub fn is_active() -> bool {
        CONTEXT_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .is_some_and(|entry| entry.subscriber.is_some())
        })
    }

    /// Get the current reader, if any.
    pub fn current_subscriber() -> Option<Arc<dyn Subscriber>> {
        CONTEXT_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .and_then(|entry| entry.subscriber.clone())
        })
    }

    /// Record that the current reader read from `dependency`.
    ///
    /// This is called by cells when they are read. Untracked sections record
    /// nothing.
    pub fn track_dependency(dependency: WeakDependency) {
        CONTEXT_STACK.with(|stack| {
            if let Some(entry) = stack.borrow_mut().last_mut() {
                if entry.subscriber.is_some() {
                    entry.dependencies.push(dependency);
                }
            }
        });
    }

    /// Get the registries recorded in the current entry.
    pub fn get_dependencies() -> Vec<WeakDependency> {
        CONTEXT_STACK.with(|stack| {
            stack
                .borrow()
                .last()
                .map(|entry| entry.dependencies.clone())
                .unwrap_or_default()
        })
    }
}

impl Drop for ReactiveContext {
    fn drop(&mut self) {
        CONTEXT_STACK.with(|stack| {
            let popped = stack.borrow_mut().pop();

            if let Some(entry) = popped {
                debug_assert_eq!(
                    entry.subscriber.as_ref().map(|s| s.id()),
                    self.subscriber_id,
                    "ReactiveContext mismatch"
                );
            }
        });
    }
}
