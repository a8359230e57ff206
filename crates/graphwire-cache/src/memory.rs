//! In-memory entity cache

use crate::error::{CacheError, CacheResult};
use crate::traits::{CachedEntity, EntityCache};
use graphwire_core::EntityKind;
use std::collections::HashMap;
use std::sync::RwLock;

/// In-memory entity cache
///
/// Lives as long as the owning client. No eviction.
pub struct MemoryEntityCache {
    entities: RwLock<HashMap<(EntityKind, u64), CachedEntity>>,
}

impl MemoryEntityCache {
    pub fn new() -> Self {
        Self {
            entities: RwLock::new(HashMap::new()),
        }
    }
}

impl Default for MemoryEntityCache {
    fn default() -> Self {
        Self::new()
    }
}

impl EntityCache for MemoryEntityCache {
    fn set_cached(&self, entity: CachedEntity) -> CacheResult<()> {
        let key = entity.key()?;
        let mut entities = self
            .entities
            .write()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        tracing::trace!("Caching {} {}", key.0, key.1);
        entities.insert(key, entity);
        Ok(())
    }

    fn get_cached(&self, kind: EntityKind, id: u64) -> CacheResult<Option<CachedEntity>> {
        let entities = self
            .entities
            .read()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        Ok(entities.get(&(kind, id)).cloned())
    }

    fn remove(&self, kind: EntityKind, id: u64) -> CacheResult<bool> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        Ok(entities.remove(&(kind, id)).is_some())
    }

    fn clear(&self) -> CacheResult<()> {
        let mut entities = self
            .entities
            .write()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        entities.clear();
        Ok(())
    }

    fn len(&self) -> CacheResult<usize> {
        let entities = self
            .entities
            .read()
            .map_err(|e| CacheError::Lock(e.to_string()))?;
        Ok(entities.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use graphwire_core::{Entity, Node, Relationship};
    use std::sync::Arc;

    #[test]
    fn test_memory_cache() {
        let cache = MemoryEntityCache::new();
        assert!(cache.is_empty().unwrap());

        let node = Node::with_id(42);
        cache.set_cached(node.clone().into()).unwrap();

        // Same instance comes back
        let cached = cache.cached_node(42).unwrap().unwrap();
        assert!(cached.ptr_eq(&node));

        // Separate id space for relationships
        assert!(cache.cached_relationship(42).unwrap().is_none());

        let rel = Relationship::with_id(42);
        cache.set_cached(rel.clone().into()).unwrap();
        assert!(cache.cached_relationship(42).unwrap().unwrap().ptr_eq(&rel));
        assert_eq!(cache.len().unwrap(), 2);

        assert!(cache.remove(EntityKind::Node, 42).unwrap());
        assert!(!cache.remove(EntityKind::Node, 42).unwrap());
        assert!(cache.cached_node(42).unwrap().is_none());

        cache.clear().unwrap();
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_rejects_entity_without_id() {
        let cache = MemoryEntityCache::new();
        let err = cache.set_cached(Node::new().into()).unwrap_err();
        assert!(matches!(err, CacheError::MissingId(EntityKind::Node)));

        let core_err: graphwire_core::Error = err.into();
        assert!(core_err.is_validation());
        assert!(cache.is_empty().unwrap());
    }

    #[test]
    fn test_concurrent_inserts() {
        let cache = Arc::new(MemoryEntityCache::new());
        let handles: Vec<_> = (0..8u64)
            .map(|t| {
                let cache = Arc::clone(&cache);
                std::thread::spawn(move || {
                    for i in 0..50 {
                        let node = Node::with_id(t * 50 + i);
                        node.set_property("thread", t);
                        cache.set_cached(node.into()).unwrap();
                    }
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        assert_eq!(cache.len().unwrap(), 400);
        let node = cache.cached_node(399).unwrap().unwrap();
        assert_eq!(node.cached_property("thread"), Some(serde_json::json!(7)));
    }
}
