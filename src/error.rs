//! Error types for forgetkit.
//!
//! ## Key Components
//!
//! - [`CacheError`]: Returned by cache construction and by `write`/`read`
//!   when the caller supplies invalid input or asks for a non-resident key.
//! - [`InvariantError`]: Returned when the map and the recency list disagree
//!   (`check_invariants` methods).
//!
//! ## Example Usage
//!
//! ```
//! use forgetkit::error::CacheError;
//! use forgetkit::ForgettingMap;
//!
//! let bad = ForgettingMap::<u32, u32>::new(0);
//! assert_eq!(bad.unwrap_err(), CacheError::NotInitialized);
//!
//! let cache = ForgettingMap::<u32, u32>::new(2).unwrap();
//! assert_eq!(cache.read(&7).unwrap_err(), CacheError::KeyNotFound);
//! ```

use std::fmt;

// ---------------------------------------------------------------------------
// CacheError
// ---------------------------------------------------------------------------

/// Validation failures surfaced by the cache API.
///
/// Every variant is detected before the cache is mutated, so a failed call
/// leaves the cache exactly as it was.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheError {
    /// Construction was requested with a capacity below 1.
    NotInitialized,
    /// An absent key was passed to a nullable `write` or `read`.
    KeyNull,
    /// An absent value was passed to a nullable `write`.
    ValueNull,
    /// The requested key was never written or has been evicted.
    KeyNotFound,
}

impl fmt::Display for CacheError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let msg = match self {
            CacheError::NotInitialized => "cache capacity must be at least 1",
            CacheError::KeyNull => "key must not be absent",
            CacheError::ValueNull => "value must not be absent",
            CacheError::KeyNotFound => "key not found in cache",
        };
        f.write_str(msg)
    }
}

impl std::error::Error for CacheError {}

// ---------------------------------------------------------------------------
// InvariantError
// ---------------------------------------------------------------------------

/// Error returned when internal cache invariants are violated.
///
/// Produced by [`ForgettingCore::check_invariants`](crate::policy::forgetting::ForgettingCore::check_invariants).
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

#[cfg(test)]
mod tests {
    use super::*;

    // -- CacheError -------------------------------------------------------

    #[test]
    fn cache_error_display_names_the_problem() {
        assert!(CacheError::NotInitialized.to_string().contains("capacity"));
        assert!(CacheError::KeyNull.to_string().contains("key"));
        assert!(CacheError::ValueNull.to_string().contains("value"));
        assert!(CacheError::KeyNotFound.to_string().contains("not found"));
    }

    #[test]
    fn cache_error_variants_are_distinct() {
        let all = [
            CacheError::NotInitialized,
            CacheError::KeyNull,
            CacheError::ValueNull,
            CacheError::KeyNotFound,
        ];
        for (i, a) in all.iter().enumerate() {
            for (j, b) in all.iter().enumerate() {
                assert_eq!(i == j, a == b);
            }
        }
    }

    #[test]
    fn cache_error_implements_std_error() {
        fn assert_error<T: std::error::Error + Send + Sync + 'static>() {}
        assert_error::<CacheError>();
    }

    // -- InvariantError ---------------------------------------------------

    #[test]
    fn invariant_display_shows_message() {
        let err = InvariantError::new("list length mismatch");
        assert_eq!(err.to_string(), "list length mismatch");
    }

    #[test]
    fn invariant_message_accessor() {
        let err = InvariantError::new("test");
        assert_eq!(err.message(), "test");
    }

    #[test]
    fn invariant_clone_and_eq() {
        let a = InvariantError::new("x");
        let b = a.clone();
        assert_eq!(a, b);
    }

    #[test]
    fn invariant_implements_std_error() {
        fn assert_error<T: std::error::Error>() {}
        assert_error::<InvariantError>();
    }
}
