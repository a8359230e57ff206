//! Graphwire Cache - Entity cache keyed by server id
//!
//! Keeps one in-memory instance per server record so repeated lookups of
//! the same id hand back the same entity.

pub mod error;
pub mod memory;
pub mod traits;

pub use error::{CacheError, CacheResult};
pub use memory::MemoryEntityCache;
pub use traits::{CachedEntity, EntityCache};
