//! Error types for the binding engine.
//!
//! Most operations in Tether cannot fail: reads of missing properties yield
//! nothing, equal writes are suppressed, and malformed subscribers are
//! dropped. The errors below cover writes that the engine refuses to perform.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced when a write or conversion cannot be carried out.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The property did not exist when the object was converted.
    ///
    /// Properties added after conversion are not tracked, so writing one is
    /// refused instead of creating an untracked slot.
    #[error("unknown property `{key}`")]
    UnknownProperty { key: String },

    /// A path segment resolved to a value that is not an object.
    #[error("`{path}` does not resolve to an object")]
    NotAnObject { path: String },

    /// The raw input nests deeper than the configured limit.
    #[error("input nesting exceeds the configured limit of {limit}")]
    DepthExceeded { limit: usize },

    /// Converter options could not be parsed.
    #[error("invalid observer configuration: {reason}")]
    InvalidConfig { reason: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_render_the_offending_key() {
        let err = Error::UnknownProperty { key: "count".into() };
        assert_eq!(err.to_string(), "unknown property `count`");

        let err = Error::NotAnObject { path: "user.name".into() };
        assert_eq!(err.to_string(), "`user.name` does not resolve to an object");
    }
}
