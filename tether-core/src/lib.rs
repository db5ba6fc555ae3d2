//! Tether Core
//!
//! This crate provides the core runtime for the Tether data binding engine.
//! It implements:
//!
//! - Deep conversion of plain data into reactive objects
//! - Per-property dependency registries
//! - Subscriptions that re-run a callback when a bound property changes
//! - A forwarding facade that exposes data properties on a host
//!
//! Template compilation, DOM patching and event wiring are left to
//! collaborators. They consume the read, write and subscribe primitives here.
//!
//! # Architecture
//!
//! The crate is organized into two modules:
//!
//! - `reactive`: Tracking context, dependency registries and subscriptions
//! - `observe`: Values, reactive objects, conversion and the facade
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use parking_lot::Mutex;
//! use serde_json::json;
//! use tether_core::{convert, subscribe, Facade, Value};
//!
//! // Convert the data once, up front
//! let data = match convert(json!({"count": 0, "user": {"name": "a"}})) {
//!     Value::Object(data) => data,
//!     _ => unreachable!(),
//! };
//!
//! // Expose its properties on a host
//! let host = Facade::over(&data);
//!
//! // Bind an output location
//! let shown = Arc::new(Mutex::new(String::new()));
//! let sink = shown.clone();
//! subscribe(&host, "user.name", move |v| {
//!     *sink.lock() = v.as_str().unwrap_or_default().to_owned();
//! });
//!
//! // Writing the property re-runs the binding
//! data.set_path("user.name", "b").ok();
//! assert_eq!(*shown.lock(), "b");
//! ```

pub mod error;
pub mod observe;
pub mod reactive;

pub use error::{Error, Result};
pub use observe::{convert, forward_fields, Facade, Host, Object, Observer, ObserverConfig, Value};
pub use reactive::{subscribe, Subscription};
