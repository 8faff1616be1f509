//! forgetkit: a fixed-capacity key-value cache that forgets its least
//! recently used entries.
//!
//! [`ForgettingMap`] is the thread-safe entry point; [`ForgettingCore`] is the
//! single-threaded core it wraps. Both reads and writes count as a use, and
//! the only way an entry leaves the cache is by being evicted when a new key
//! arrives at capacity.
//!
//! ```
//! use forgetkit::{CacheError, ForgettingMap};
//!
//! let cache = ForgettingMap::new(3).unwrap();
//! cache.write("a", 1);
//! cache.write("b", 2);
//! cache.write("c", 3);
//! cache.write("d", 5);
//!
//! assert_eq!(cache.read(&"a").unwrap_err(), CacheError::KeyNotFound);
//! assert_eq!(*cache.read(&"d").unwrap(), 5);
//! assert_eq!(cache.size(), 3);
//! ```

pub mod ds;
pub mod error;
pub mod policy;
pub mod prelude;

pub use crate::error::{CacheError, InvariantError};
pub use crate::policy::forgetting::{ForgettingCore, ForgettingMap};
