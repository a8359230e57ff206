//! Entity cache trait definitions

use crate::error::{CacheError, CacheResult};
use graphwire_core::{Entity, EntityKind, Node, Relationship};

/// An entity held by the cache
#[derive(Debug, Clone)]
pub enum CachedEntity {
    Node(Node),
    Relationship(Relationship),
}

impl CachedEntity {
    pub fn kind(&self) -> EntityKind {
        match self {
            Self::Node(_) => EntityKind::Node,
            Self::Relationship(_) => EntityKind::Relationship,
        }
    }

    pub fn id(&self) -> Option<u64> {
        match self {
            Self::Node(n) => n.id(),
            Self::Relationship(r) => r.id(),
        }
    }

    /// Cache key of this entity; fails if it has no id yet
    pub fn key(&self) -> CacheResult<(EntityKind, u64)> {
        let kind = self.kind();
        self.id()
            .map(|id| (kind, id))
            .ok_or(CacheError::MissingId(kind))
    }
}

impl From<Node> for CachedEntity {
    fn from(node: Node) -> Self {
        Self::Node(node)
    }
}

impl From<Relationship> for CachedEntity {
    fn from(rel: Relationship) -> Self {
        Self::Relationship(rel)
    }
}

/// Trait for entity cache implementations.
///
/// Entries are keyed by entity kind and server id; node and relationship
/// ids are separate spaces on the server.
pub trait EntityCache: Send + Sync {
    /// Store an entity under its current id
    fn set_cached(&self, entity: CachedEntity) -> CacheResult<()>;

    /// Look up an entity by kind and id
    fn get_cached(&self, kind: EntityKind, id: u64) -> CacheResult<Option<CachedEntity>>;

    /// Drop an entry; returns whether one was present
    fn remove(&self, kind: EntityKind, id: u64) -> CacheResult<bool>;

    fn clear(&self) -> CacheResult<()>;

    fn len(&self) -> CacheResult<usize>;

    fn is_empty(&self) -> CacheResult<bool> {
        Ok(self.len()? == 0)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Typed helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn cached_node(&self, id: u64) -> CacheResult<Option<Node>> {
        Ok(match self.get_cached(EntityKind::Node, id)? {
            Some(CachedEntity::Node(node)) => Some(node),
            _ => None,
        })
    }

    fn cached_relationship(&self, id: u64) -> CacheResult<Option<Relationship>> {
        Ok(match self.get_cached(EntityKind::Relationship, id)? {
            Some(CachedEntity::Relationship(rel)) => Some(rel),
            _ => None,
        })
    }
}
