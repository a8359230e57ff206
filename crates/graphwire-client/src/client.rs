//! The client: transport, entity cache and session in one handle

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use graphwire_cache::{EntityCache, MemoryEntityCache};
use graphwire_core::{Entity, Node, Relationship, Result, Session, Transport};

use crate::command::{
    Command, CreateNode, CreateRelationship, DeleteNode, DeleteRelationship, LoadNode,
    LoadRelationship, UpdateNode, UpdateRelationship,
};
use crate::config::ClientConfig;
use crate::transport::HttpTransport;

/// Entry point for talking to a graph database.
///
/// Entities created through a client are attached to it as their session,
/// so `save`, `load`, `delete` and lazy property reads on them go through
/// this client's transport and cache.
///
/// # Example
/// ```no_run
/// # use graphwire_client::{Client, ClientConfig, Entity};
/// # async fn demo() -> graphwire_core::Result<()> {
/// let client = Client::connect(&ClientConfig::default())?;
/// let alice = client.make_node();
/// alice.set_property("name", "Alice");
/// alice.save().await?;
/// # Ok(())
/// # }
/// ```
pub struct Client {
    transport: Arc<dyn Transport>,
    cache: Arc<dyn EntityCache>,
    this: Weak<Client>,
}

impl Client {
    /// Client over the given transport with an in-memory entity cache
    pub fn new(transport: Arc<dyn Transport>) -> Arc<Self> {
        Self::with_cache(transport, Arc::new(MemoryEntityCache::new()))
    }

    pub fn with_cache(transport: Arc<dyn Transport>, cache: Arc<dyn EntityCache>) -> Arc<Self> {
        Arc::new_cyclic(|this| Self {
            transport,
            cache,
            this: this.clone(),
        })
    }

    /// Client speaking HTTP to the configured endpoint
    pub fn connect(config: &ClientConfig) -> Result<Arc<Self>> {
        let transport = HttpTransport::from_config(config)?;
        tracing::debug!("Connecting to {}", config.endpoint);
        Ok(Self::new(Arc::new(transport)))
    }

    pub fn endpoint(&self) -> &str {
        self.transport.endpoint()
    }

    pub fn transport(&self) -> &dyn Transport {
        self.transport.as_ref()
    }

    pub fn cache(&self) -> &dyn EntityCache {
        self.cache.as_ref()
    }

    fn session(&self) -> Weak<dyn Session> {
        let session: Weak<dyn Session> = self.this.clone();
        session
    }

    /// A new unsaved node attached to this client
    pub fn make_node(&self) -> Node {
        let node = Node::new();
        node.set_session(self.session());
        node
    }

    /// A new unsaved relationship attached to this client
    pub fn make_relationship(&self) -> Relationship {
        let rel = Relationship::new();
        rel.set_session(self.session());
        rel
    }

    /// Handle for node `id` without a request. Returns the cached instance if
    /// there is one; otherwise a lazy node that is fetched on first read.
    ///
    /// The lazy node is not cached: only created or loaded entities are.
    pub fn node_ref(&self, id: u64) -> Result<Node> {
        if let Some(node) = self.cache.cached_node(id)? {
            return Ok(node);
        }
        let node = Node::with_id(id);
        node.set_session(self.session());
        Ok(node)
    }

    /// Handle for relationship `id` without a request, like [`Self::node_ref`]
    pub fn relationship_ref(&self, id: u64) -> Result<Relationship> {
        if let Some(rel) = self.cache.cached_relationship(id)? {
            return Ok(rel);
        }
        let rel = Relationship::with_id(id);
        rel.set_session(self.session());
        Ok(rel)
    }

    /// Fetch node `id`, from the cache when possible. `None` if the server
    /// has no such node.
    pub async fn get_node(&self, id: u64) -> Result<Option<Node>> {
        if let Some(node) = self.cache.cached_node(id)? {
            return Ok(Some(node));
        }
        let node = Node::with_id(id);
        node.set_session(self.session());
        match LoadNode::new(self, &node).execute().await {
            Ok(node) => Ok(Some(node)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    /// Fetch relationship `id`, from the cache when possible. `None` if the
    /// server has no such relationship.
    pub async fn get_relationship(&self, id: u64) -> Result<Option<Relationship>> {
        if let Some(rel) = self.cache.cached_relationship(id)? {
            return Ok(Some(rel));
        }
        let rel = Relationship::with_id(id);
        rel.set_session(self.session());
        match LoadRelationship::new(self, &rel).execute().await {
            Ok(rel) => Ok(Some(rel)),
            Err(err) if err.is_not_found() => Ok(None),
            Err(err) => Err(err),
        }
    }

    fn adopt<E: Entity>(&self, entity: &E) {
        if !entity.has_session() {
            entity.set_session(self.session());
        }
    }
}

#[async_trait]
impl Session for Client {
    async fn load_node(&self, node: &Node) -> Result<()> {
        LoadNode::new(self, node).execute().await.map(|_| ())
    }

    async fn save_node(&self, node: &Node) -> Result<()> {
        self.adopt(node);
        if node.has_id() {
            // The PUT replaces every property, so it must carry the server's too
            node.load_properties().await?;
            UpdateNode::new(self, node).execute().await?;
        } else {
            CreateNode::new(self, node).execute().await?;
        }
        Ok(())
    }

    async fn delete_node(&self, node: &Node) -> Result<()> {
        DeleteNode::new(self, node).execute().await.map(|_| ())
    }

    async fn load_relationship(&self, relationship: &Relationship) -> Result<()> {
        LoadRelationship::new(self, relationship)
            .execute()
            .await
            .map(|_| ())
    }

    async fn save_relationship(&self, relationship: &Relationship) -> Result<()> {
        self.adopt(relationship);
        if relationship.has_id() {
            relationship.load_properties().await?;
            UpdateRelationship::new(self, relationship).execute().await?;
        } else {
            CreateRelationship::new(self, relationship).execute().await?;
        }
        Ok(())
    }

    async fn delete_relationship(&self, relationship: &Relationship) -> Result<()> {
        DeleteRelationship::new(self, relationship)
            .execute()
            .await
            .map(|_| ())
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("endpoint", &self.endpoint())
            .finish_non_exhaustive()
    }
}
