//! Session trait: the client an entity is attached to

use async_trait::async_trait;

use crate::error::Result;
use crate::node::Node;
use crate::relationship::Relationship;

/// Runs entity operations against the server.
///
/// Entities hold a weak reference to their session. Lazy getters, `save`,
/// `load` and `delete` on an entity all go through it.
#[async_trait]
pub trait Session: Send + Sync {
    /// Fetch the node's properties from the server
    async fn load_node(&self, node: &Node) -> Result<()>;

    /// Create the node, or update its properties if it already has an id
    async fn save_node(&self, node: &Node) -> Result<()>;

    async fn delete_node(&self, node: &Node) -> Result<()>;

    /// Fetch endpoints, type and properties from the server
    async fn load_relationship(&self, relationship: &Relationship) -> Result<()>;

    /// Create the relationship, or update its properties if it already has an id
    async fn save_relationship(&self, relationship: &Relationship) -> Result<()>;

    async fn delete_relationship(&self, relationship: &Relationship) -> Result<()>;
}
