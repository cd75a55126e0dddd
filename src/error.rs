//! Error types for vibra.
//!
//! Every store operation is total: `get`, `set`, `subscribe` and unsubscribe
//! cannot fail for well-typed inputs. [`StoreError`] is reserved so that
//! misuse can be signalled later without breaking the public API.

use thiserror::Error;

/// Errors surfaced by a store.
///
/// No current operation returns this type.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum StoreError {
    /// The store could not be constructed from the supplied parts.
    #[error("Invalid store construction: {reason}")]
    InvalidConstruction {
        /// Why construction was rejected
        reason: String,
    },
}

/// Result alias for store operations.
pub type Result<T, E = StoreError> = std::result::Result<T, E>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_reason() {
        let err = StoreError::InvalidConstruction {
            reason: "missing initial value".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Invalid store construction: missing initial value"
        );
    }
}
