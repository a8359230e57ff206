//! Behaviour shared by nodes and relationships

use std::sync::{Arc, Weak};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::container::{Properties, PropertyContainer};
use crate::error::{Error, Result};
use crate::session::Session;

/// The two kinds of server-side graph records
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Node,
    Relationship,
}

impl EntityKind {
    /// Path segment used by the REST API (`/node/..`, `/relationship/..`)
    pub fn path_segment(&self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Relationship => "relationship",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.path_segment())
    }
}

/// A shared handle to one server-side record.
///
/// Handles are cheap to clone; clones refer to the same in-memory entity.
#[async_trait]
pub trait Entity: Clone + Send + Sync + 'static {
    fn kind(&self) -> EntityKind;

    fn with_container<R>(&self, f: impl FnOnce(&PropertyContainer) -> R) -> R;

    fn with_container_mut<R>(&self, f: impl FnOnce(&mut PropertyContainer) -> R) -> R;

    /// Whether both handles point at the same in-memory entity
    fn ptr_eq(&self, other: &Self) -> bool;

    /// Fetch this entity through `session`.
    async fn fetch(&self, session: &dyn Session) -> Result<()>;

    fn id(&self) -> Option<u64> {
        self.with_container(|c| c.id())
    }

    fn has_id(&self) -> bool {
        self.with_container(|c| c.has_id())
    }

    fn set_id(&self, id: u64) -> Result<()> {
        self.with_container_mut(|c| c.set_id(id))
    }

    fn clear_id(&self) {
        self.with_container_mut(|c| c.clear_id())
    }

    fn set_property(&self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        self.with_container_mut(|c| c.set_property(key, value))
    }

    fn remove_property(&self, key: &str) -> Option<serde_json::Value> {
        self.with_container_mut(|c| c.remove_property(key))
    }

    fn set_properties(&self, properties: Properties) {
        self.with_container_mut(|c| c.set_properties(properties))
    }

    /// Take properties fetched from the server, keeping local writes made
    /// before the first fetch
    fn hydrate(&self, properties: Properties) {
        self.with_container_mut(|c| c.hydrate(properties))
    }

    /// Property value as held in memory; never fetches
    fn cached_property(&self, key: &str) -> Option<serde_json::Value> {
        self.with_container(|c| c.property(key).cloned())
    }

    fn cached_properties(&self) -> Properties {
        self.with_container(|c| c.properties().clone())
    }

    fn use_lazy_load(&self, lazy: bool) {
        self.with_container_mut(|c| c.use_lazy_load(lazy))
    }

    fn is_loaded(&self) -> bool {
        self.with_container(|c| c.is_loaded())
    }

    fn mark_loaded(&self) {
        self.with_container_mut(|c| c.mark_loaded())
    }

    fn needs_load(&self) -> bool {
        self.with_container(|c| c.needs_load())
    }

    fn session(&self) -> Option<Arc<dyn Session>> {
        self.with_container(|c| c.session())
    }

    fn has_session(&self) -> bool {
        self.with_container(|c| c.has_session())
    }

    /// The attached session, or `NoSession`
    fn require_session(&self) -> Result<Arc<dyn Session>> {
        self.session().ok_or_else(|| Error::NoSession(self.kind()))
    }

    /// Attach this entity to a session
    fn set_session(&self, session: Weak<dyn Session>) {
        self.with_container_mut(|c| c.set_session(session))
    }

    /// Fetch the entity if it has an id and was never hydrated.
    ///
    /// Suspends on a network round trip through the session when a fetch is
    /// needed; returns immediately otherwise.
    async fn load_properties(&self) -> Result<()> {
        if !self.needs_load() {
            return Ok(());
        }
        let session = self.require_session()?;
        tracing::debug!("Lazy loading {} {:?}", self.kind(), self.id());
        self.fetch(session.as_ref()).await?;
        self.mark_loaded();
        Ok(())
    }

    /// Property value, fetching the entity first if needed
    async fn property(&self, key: &str) -> Result<Option<serde_json::Value>> {
        self.load_properties().await?;
        Ok(self.cached_property(key))
    }

    /// All properties, fetching the entity first if needed
    async fn properties(&self) -> Result<Properties> {
        self.load_properties().await?;
        Ok(self.cached_properties())
    }
}
