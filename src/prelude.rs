pub use crate::ds::{IntrusiveList, SlotArena, SlotId};
pub use crate::error::{CacheError, InvariantError};
pub use crate::policy::forgetting::{ForgettingCore, ForgettingMap};
