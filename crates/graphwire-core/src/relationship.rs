//! Relationship entities and unique-creation metadata

use std::sync::{Arc, PoisonError, RwLock, Weak};

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::container::PropertyContainer;
use crate::entity::{Entity, EntityKind};
use crate::error::{Error, Result};
use crate::node::Node;
use crate::session::Session;

/// Server-side policy for creating a unique relationship
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UniqueAction {
    /// Return the existing relationship if one matches
    #[default]
    GetOrCreate,
    /// Fail with a conflict if one matches
    CreateOrFail,
}

impl UniqueAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetOrCreate => "get_or_create",
            Self::CreateOrFail => "create_or_fail",
        }
    }
}

impl AsRef<str> for UniqueAction {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl std::fmt::Display for UniqueAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UniqueAction {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "get_or_create" => Ok(Self::GetOrCreate),
            "create_or_fail" => Ok(Self::CreateOrFail),
            other => Err(Error::InvalidUniqueAction(other.to_string())),
        }
    }
}

/// Key/value pair of a pending unique-relationship request
#[derive(Debug, Clone, Default, PartialEq)]
pub struct UniqueSpec {
    pub key: Option<String>,
    pub value: Option<serde_json::Value>,
}

#[derive(Debug)]
struct RelationshipState {
    container: PropertyContainer,
    start: Option<Node>,
    end: Option<Node>,
    rel_type: Option<String>,
    unique: Option<UniqueSpec>,
    unique_action: UniqueAction,
}

/// A relationship in the remote graph (shared handle).
///
/// Endpoints are shared node handles; a relationship never owns or destroys
/// its nodes.
#[derive(Clone)]
pub struct Relationship {
    inner: Arc<RwLock<RelationshipState>>,
}

impl Relationship {
    /// A new relationship that does not exist on the server yet
    pub fn new() -> Self {
        Self::from_container(PropertyContainer::new(EntityKind::Relationship))
    }

    /// A handle for an existing server record; endpoints, type and
    /// properties are fetched on first read.
    pub fn with_id(id: u64) -> Self {
        Self::from_container(PropertyContainer::with_id(EntityKind::Relationship, id))
    }

    fn from_container(container: PropertyContainer) -> Self {
        Self {
            inner: Arc::new(RwLock::new(RelationshipState {
                container,
                start: None,
                end: None,
                rel_type: None,
                unique: None,
                unique_action: UniqueAction::default(),
            })),
        }
    }

    fn read<R>(&self, f: impl FnOnce(&RelationshipState) -> R) -> R {
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    fn write<R>(&self, f: impl FnOnce(&mut RelationshipState) -> R) -> R {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Endpoints and type
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_start_node(&self, node: Node) {
        self.write(|s| s.start = Some(node));
    }

    pub fn set_end_node(&self, node: Node) {
        self.write(|s| s.end = Some(node));
    }

    pub fn set_type(&self, rel_type: impl Into<String>) {
        let rel_type = rel_type.into();
        self.write(|s| s.rel_type = Some(rel_type));
    }

    /// Start node, fetching the relationship first if the endpoint is unset.
    ///
    /// This is not a pure getter: on an unhydrated relationship it suspends
    /// on a request through the session.
    pub async fn start_node(&self) -> Result<Option<Node>> {
        if self.cached_start_node().is_none() {
            self.load_properties().await?;
        }
        Ok(self.cached_start_node())
    }

    /// End node, fetching the relationship first if the endpoint is unset.
    ///
    /// Suspends on a request through the session, like [`Self::start_node`].
    pub async fn end_node(&self) -> Result<Option<Node>> {
        if self.cached_end_node().is_none() {
            self.load_properties().await?;
        }
        Ok(self.cached_end_node())
    }

    /// Relationship type, fetching the relationship first if it was never
    /// hydrated.
    pub async fn rel_type(&self) -> Result<Option<String>> {
        self.load_properties().await?;
        Ok(self.cached_type())
    }

    pub fn cached_start_node(&self) -> Option<Node> {
        self.read(|s| s.start.clone())
    }

    pub fn cached_end_node(&self) -> Option<Node> {
        self.read(|s| s.end.clone())
    }

    pub fn cached_type(&self) -> Option<String> {
        self.read(|s| s.rel_type.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Uniqueness
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_unique_key(&self, key: impl Into<String>) {
        let key = key.into();
        self.write(|s| s.unique.get_or_insert_with(UniqueSpec::default).key = Some(key));
    }

    pub fn set_unique_value(&self, value: impl Into<serde_json::Value>) {
        let value = value.into();
        self.write(|s| s.unique.get_or_insert_with(UniqueSpec::default).value = Some(value));
    }

    pub fn unique_key(&self) -> Option<String> {
        self.read(|s| s.unique.as_ref().and_then(|u| u.key.clone()))
    }

    pub fn unique_value(&self) -> Option<serde_json::Value> {
        self.read(|s| s.unique.as_ref().and_then(|u| u.value.clone()))
    }

    pub fn unique_spec(&self) -> Option<UniqueSpec> {
        self.read(|s| s.unique.clone())
    }

    /// Set the uniqueness policy. Unrecognised actions are rejected and the
    /// current policy is kept.
    pub fn set_unique_action(&self, action: impl AsRef<str>) -> Result<()> {
        let action: UniqueAction = action.as_ref().parse()?;
        self.write(|s| s.unique_action = action);
        Ok(())
    }

    pub fn unique_action(&self) -> UniqueAction {
        self.read(|s| s.unique_action)
    }

    /// A relationship is unique once a unique key is present; a value alone
    /// does not count.
    pub fn is_unique(&self) -> bool {
        self.read(|s| s.unique.as_ref().is_some_and(|u| u.key.is_some()))
    }

    pub fn reset_uniqueness(&self) {
        self.write(|s| s.unique = None);
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Server operations
    // ─────────────────────────────────────────────────────────────────────────

    /// Create or update this relationship on the server. Lazy loading is
    /// disabled afterwards.
    pub async fn save(&self) -> Result<()> {
        let session = self.require_session()?;
        session.save_relationship(self).await?;
        self.use_lazy_load(false);
        Ok(())
    }

    /// Fetch endpoints, type and properties, even if already loaded
    pub async fn load(&self) -> Result<()> {
        let session = self.require_session()?;
        session.load_relationship(self).await
    }

    pub async fn delete(&self) -> Result<()> {
        let session = self.require_session()?;
        session.delete_relationship(self).await
    }
}

impl Default for Relationship {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Entity for Relationship {
    fn kind(&self) -> EntityKind {
        EntityKind::Relationship
    }

    fn with_container<R>(&self, f: impl FnOnce(&PropertyContainer) -> R) -> R {
        self.read(|s| f(&s.container))
    }

    fn with_container_mut<R>(&self, f: impl FnOnce(&mut PropertyContainer) -> R) -> R {
        self.write(|s| f(&mut s.container))
    }

    fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    async fn fetch(&self, session: &dyn Session) -> Result<()> {
        session.load_relationship(self).await
    }

    /// Attach the session, and hand it to any endpoint that has none.
    /// An endpoint's existing session is never replaced.
    fn set_session(&self, session: Weak<dyn Session>) {
        let (start, end) = self.write(|s| {
            s.container.set_session(session.clone());
            (s.start.clone(), s.end.clone())
        });
        for node in [start, end].into_iter().flatten() {
            if !node.has_session() {
                node.set_session(session.clone());
            }
        }
    }
}

impl std::fmt::Debug for Relationship {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.read(|s| {
            f.debug_struct("Relationship")
                .field("id", &s.container.id())
                .field("type", &s.rel_type)
                .field("start", &s.start.as_ref().and_then(|n| n.id()))
                .field("end", &s.end.as_ref().and_then(|n| n.id()))
                .field("unique", &s.unique)
                .field("unique_action", &s.unique_action)
                .field("properties", s.container.properties())
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
    fn test_unique_round_trip() {
        let rel = Relationship::new();
        assert!(!rel.is_unique());
        assert_eq!(rel.unique_action(), UniqueAction::GetOrCreate);

        rel.set_unique_value("alice@example.com");
        assert!(!rel.is_unique(), "a value without a key is not unique");
        assert_eq!(rel.unique_value(), Some(json!("alice@example.com")));
        assert_eq!(rel.unique_key(), None);

        rel.set_unique_key("email");
        rel.set_unique_action("create_or_fail").unwrap();

        assert!(rel.is_unique());
        assert_eq!(rel.unique_key().as_deref(), Some("email"));
        assert_eq!(rel.unique_value(), Some(json!("alice@example.com")));
        assert_eq!(rel.unique_action(), UniqueAction::CreateOrFail);
    }

    #[test]
    fn test_key_alone_makes_unique() {
        let rel = Relationship::new();
        rel.set_unique_key("email");
        assert!(rel.is_unique());
        assert_eq!(rel.unique_value(), None);
    }

    #[test]
    fn test_invalid_unique_action_keeps_previous() {
        let rel = Relationship::new();

        let err = rel.set_unique_action("bogus").unwrap_err();
        assert!(matches!(err, Error::InvalidUniqueAction(ref a) if a == "bogus"));
        assert_eq!(rel.unique_action(), UniqueAction::GetOrCreate);

        rel.set_unique_action(UniqueAction::CreateOrFail).unwrap();
        assert!(rel.set_unique_action("GET_OR_CREATE").is_err());
        assert_eq!(rel.unique_action(), UniqueAction::CreateOrFail);
    }

    #[test]
    fn test_reset_uniqueness() {
        let rel = Relationship::new();
        rel.set_unique_key("email");
        rel.set_unique_value("a@b.c");
        assert!(rel.is_unique());

        rel.reset_uniqueness();
        assert!(!rel.is_unique());
        assert!(rel.unique_spec().is_none());
        assert_eq!(rel.unique_key(), None);
    }

    #[test]
    fn test_session_propagation_never_overrides() {
        let first = RecordingSession::new();
        let second = RecordingSession::new();

        let start = Node::with_id(1);
        start.set_session(first.weak());
        let end = Node::with_id(2);

        let rel = Relationship::new();
        rel.set_start_node(start.clone());
        rel.set_end_node(end.clone());
        rel.set_session(second.weak());

        assert!(first.owns(&start.session().unwrap()));
        assert!(second.owns(&end.session().unwrap()));
        assert!(second.owns(&rel.session().unwrap()));
    }

    #[tokio::test]
    async fn test_endpoint_getters_lazy_load() {
        let session = RecordingSession::new();
        let rel = Relationship::with_id(12);
        rel.set_session(session.weak());

        session.on_load_relationship(|r| {
            r.set_start_node(Node::with_id(1));
            r.set_end_node(Node::with_id(2));
            r.set_type("KNOWS");
        });

        assert_eq!(rel.cached_type(), None);
        assert_eq!(rel.end_node().await.unwrap().and_then(|n| n.id()), Some(2));
        assert_eq!(rel.start_node().await.unwrap().and_then(|n| n.id()), Some(1));
        assert_eq!(rel.rel_type().await.unwrap().as_deref(), Some("KNOWS"));
        assert_eq!(session.relationship_loads(), 1);
    }

    #[tokio::test]
    async fn test_unsaved_relationship_getters_do_not_fetch() {
        let session = RecordingSession::new();
        let rel = Relationship::new();
        rel.set_session(session.weak());

        assert!(rel.start_node().await.unwrap().is_none());
        assert!(rel.rel_type().await.unwrap().is_none());
        assert_eq!(session.relationship_loads(), 0);
    }

    #[tokio::test]
    async fn test_lazy_getter_without_session() {
        let rel = Relationship::with_id(3);
        let err = rel.start_node().await.unwrap_err();
        assert!(matches!(err, Error::NoSession(EntityKind::Relationship)));
    }

    #[tokio::test]
    async fn test_failed_save_keeps_lazy_load() {
        let session = RecordingSession::new();
        session.fail_saves();
        let rel = Relationship::with_id(5);
        rel.set_session(session.weak());

        assert!(rel.save().await.is_err());
        assert_eq!(session.relationship_saves(), 0);
        assert!(rel.needs_load());
    }
}
