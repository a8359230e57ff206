//! Node entities

use std::sync::{Arc, PoisonError, RwLock};

use async_trait::async_trait;

use crate::container::PropertyContainer;
use crate::entity::{Entity, EntityKind};
use crate::error::Result;
use crate::relationship::Relationship;
use crate::session::Session;

/// A node in the remote graph (shared handle)
#[derive(Clone)]
pub struct Node {
    inner: Arc<RwLock<PropertyContainer>>,
}

impl Node {
    /// A new node that does not exist on the server yet
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(PropertyContainer::new(EntityKind::Node))),
        }
    }

    /// A handle for an existing server record; its properties are fetched
    /// on first read.
    pub fn with_id(id: u64) -> Self {
        Self {
            inner: Arc::new(RwLock::new(PropertyContainer::with_id(EntityKind::Node, id))),
        }
    }

    /// Builder-style property setter
    pub fn with_property(self, key: impl Into<String>, value: impl Into<serde_json::Value>) -> Self {
        self.set_property(key, value);
        self
    }

    /// An unsaved relationship from this node to `end`, attached to this
    /// node's session.
    pub fn relate_to(&self, end: &Node, rel_type: impl Into<String>) -> Relationship {
        let rel = Relationship::new();
        rel.set_start_node(self.clone());
        rel.set_end_node(end.clone());
        rel.set_type(rel_type);
        if let Some(session) = self.session() {
            rel.set_session(Arc::downgrade(&session));
        }
        rel
    }

    /// Create or update this node on the server
    pub async fn save(&self) -> Result<()> {
        let session = self.require_session()?;
        session.save_node(self).await?;
        self.use_lazy_load(false);
        Ok(())
    }

    /// Fetch this node's properties, even if already loaded
    pub async fn load(&self) -> Result<()> {
        let session = self.require_session()?;
        session.load_node(self).await
    }

    pub async fn delete(&self) -> Result<()> {
        let session = self.require_session()?;
        session.delete_node(self).await
    }
}

impl Default for Node {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Entity for Node {
    fn kind(&self) -> EntityKind {
        EntityKind::Node
    }

    fn with_container<R>(&self, f: impl FnOnce(&PropertyContainer) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn with_container_mut<R>(&self, f: impl FnOnce(&mut PropertyContainer) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    async fn fetch(&self, session: &dyn Session) -> Result<()> {
        session.load_node(self).await
    }
}

impl std::fmt::Debug for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.with_container(|c| {
            f.debug_struct("Node")
                .field("id", &c.id())
                .field("properties", c.properties())
                .finish()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingSession;
    use serde_json::json;

    #[test]
    fn test_node_identity() {
        let node = Node::new().with_property("name", "Alice");
        let same = node.clone();
        let other = Node::new();

        assert!(node.ptr_eq(&same));
        assert!(!node.ptr_eq(&other));

        same.set_id(3).unwrap();
        assert_eq!(node.id(), Some(3));
        assert_eq!(node.cached_property("name"), Some(json!("Alice")));
    }

    #[tokio::test]
    async fn test_lazy_property_fetches_once() {
        let session = RecordingSession::new();
        let node = Node::with_id(8);
        node.set_session(session.weak());

        session.on_load_node(|n| n.set_property("name", "Bob"));

        assert_eq!(node.property("name").await.unwrap(), Some(json!("Bob")));
        assert_eq!(node.property("name").await.unwrap(), Some(json!("Bob")));
        assert_eq!(session.node_loads(), 1);
    }

    #[tokio::test]
    async fn test_new_node_never_fetches() {
        let session = RecordingSession::new();
        let node = Node::new().with_property("name", "Carol");
        node.set_session(session.weak());

        assert_eq!(node.property("name").await.unwrap(), Some(json!("Carol")));
        assert_eq!(session.node_loads(), 0);
    }

    #[tokio::test]
    async fn test_save_requires_session() {
        let node = Node::new();
        let err = node.save().await.unwrap_err();
        assert!(matches!(err, crate::Error::NoSession(EntityKind::Node)));
    }

    #[tokio::test]
    async fn test_save_disables_lazy_load() {
        let session = RecordingSession::new();
        let node = Node::with_id(4);
        node.set_session(session.weak());

        node.save().await.unwrap();
        assert_eq!(session.node_saves(), 1);

        node.property("anything").await.unwrap();
        assert_eq!(session.node_loads(), 0);
    }

    #[test]
    fn test_relate_to() {
        let session = RecordingSession::new();
        let alice = Node::with_id(1);
        alice.set_session(session.weak());
        let bob = Node::with_id(2);

        let rel = alice.relate_to(&bob, "KNOWS");
        assert!(rel.cached_start_node().unwrap().ptr_eq(&alice));
        assert!(rel.cached_end_node().unwrap().ptr_eq(&bob));
        assert_eq!(rel.cached_type().as_deref(), Some("KNOWS"));
        assert!(rel.has_session());
        assert!(bob.has_session(), "orphaned endpoint adopts the session");
    }
}
