//! Error types for the heapcache library.
//!
//! ## Key Components
//!
//! - [`InvariantError`]: Returned when the heap/map bookkeeping is found to be
//!   inconsistent (debug-only `check_invariants` methods).
//!
//! Normal cache operations never fail: absent keys, empty caches, oversized
//! eviction requests and capacity underflow are all clamped or treated as
//! no-ops, so there is no configuration or runtime error type.
//!
//! ## Example Usage
//!
//! ```
//! use heapcache::error::InvariantError;
//!
//! let err = InvariantError::new("map holds 3 keys but heap holds 2");
//! assert!(err.message().contains("heap holds 2"));
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by debug-only `check_invariants` methods
/// (e.g. [`PriorityCore::check_invariants`](crate::policy::priority::PriorityCore::check_invariants)).
/// Carries a human-readable description of which invariant failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvariantError(String);

impl InvariantError {
    /// Creates a new `InvariantError` with the given description.
    #[inline]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }

    /// Returns the error description.
    #[inline]
    pub fn message(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for InvariantError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for InvariantError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
