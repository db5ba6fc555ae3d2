//! Observable Data
//!
//! This module turns plain nested data into a graph of reactive objects.
//!
//! # Concepts
//!
//! ## Values and Objects
//!
//! A [`Value`] is a scalar or a converted [`Object`]. Every property of an
//! object is a [`ReactiveCell`]: reading it inside a tracked read records a
//! dependency, writing a different value re-runs the dependents.
//!
//! ## Conversion
//!
//! [`convert`] (or an [`Observer`] with options) walks raw JSON data and
//! converts every nested composite up front. Raw values written later are
//! converted at assignment time.
//!
//! ## Hosts and Facades
//!
//! Subscriptions read from a [`Host`]. Objects are hosts, and a [`Facade`]
//! is a host that forwards its properties to one or more data objects.

mod facade;
mod host;
mod object;
mod observer;
mod path;
mod value;

pub use facade::{forward_fields, Facade};
pub use host::Host;
pub use object::{Object, ObjectKind, ReactiveCell};
pub use observer::{convert, Observer, ObserverConfig, DEFAULT_MAX_DEPTH};
pub use path::PropertyPath;
pub use value::Value;
