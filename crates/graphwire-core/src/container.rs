//! Key/value storage shared by nodes and relationships

use std::collections::HashMap;
use std::sync::{Arc, Weak};

use crate::entity::EntityKind;
use crate::error::{Error, Result};
use crate::session::Session;

/// Property map of an entity
pub type Properties = HashMap<String, serde_json::Value>;

/// Identity, properties and load state of one entity
pub struct PropertyContainer {
    kind: EntityKind,
    id: Option<u64>,
    properties: Properties,
    lazy_load: bool,
    loaded: bool,
    /// Writes made before the first fetch, replayed over the fetched map.
    /// `None` marks a removal.
    pending: HashMap<String, Option<serde_json::Value>>,
    /// Every property was replaced locally before the first fetch
    replaced: bool,
    session: Option<Weak<dyn Session>>,
}

impl PropertyContainer {
    pub fn new(kind: EntityKind) -> Self {
        Self {
            kind,
            id: None,
            properties: Properties::new(),
            lazy_load: true,
            loaded: false,
            pending: HashMap::new(),
            replaced: false,
            session: None,
        }
    }

    /// Container for a record that already exists on the server
    pub fn with_id(kind: EntityKind, id: u64) -> Self {
        Self {
            id: Some(id),
            ..Self::new(kind)
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.kind
    }

    pub fn id(&self) -> Option<u64> {
        self.id
    }

    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    /// Assign the server id. An id can only be assigned once.
    pub fn set_id(&mut self, id: u64) -> Result<()> {
        if let Some(current) = self.id {
            return Err(Error::IdAlreadySet {
                kind: self.kind,
                current,
            });
        }
        self.id = Some(id);
        Ok(())
    }

    /// Forget the server id after the record was deleted.
    pub fn clear_id(&mut self) {
        self.id = None;
        self.loaded = false;
        self.forget_pending();
    }

    pub fn property(&self, key: &str) -> Option<&serde_json::Value> {
        self.properties.get(key)
    }

    /// Set a property; a `null` value removes it.
    pub fn set_property(&mut self, key: impl Into<String>, value: impl Into<serde_json::Value>) {
        let key = key.into();
        let value = Some(value.into()).filter(|v| !v.is_null());
        if self.needs_load() {
            self.pending.insert(key.clone(), value.clone());
        }
        match value {
            Some(value) => {
                self.properties.insert(key, value);
            }
            None => {
                self.properties.remove(&key);
            }
        }
    }

    pub fn remove_property(&mut self, key: &str) -> Option<serde_json::Value> {
        if self.needs_load() {
            self.pending.insert(key.to_string(), None);
        }
        self.properties.remove(key)
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Replace every property
    pub fn set_properties(&mut self, properties: Properties) {
        if self.needs_load() {
            self.pending.clear();
            self.replaced = true;
        }
        self.properties = properties;
        self.properties.retain(|_, v| !v.is_null());
    }

    /// Take the properties fetched from the server. Local writes made
    /// before the first fetch are kept on top of them.
    pub fn hydrate(&mut self, fetched: Properties) {
        if !self.replaced {
            let mut merged = fetched;
            merged.retain(|_, v| !v.is_null());
            for (key, change) in self.pending.drain() {
                match change {
                    Some(value) => merged.insert(key, value),
                    None => merged.remove(&key),
                };
            }
            self.properties = merged;
        }
        self.forget_pending();
    }

    fn forget_pending(&mut self) {
        self.pending.clear();
        self.replaced = false;
    }

    pub fn use_lazy_load(&mut self, lazy: bool) {
        self.lazy_load = lazy;
    }

    pub fn is_lazy_load(&self) -> bool {
        self.lazy_load
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    pub fn mark_loaded(&mut self) {
        self.loaded = true;
        self.forget_pending();
    }

    /// Whether reading an unset field should fetch the entity first.
    pub fn needs_load(&self) -> bool {
        self.lazy_load && !self.loaded && self.id.is_some()
    }

    /// The attached session, if it is still alive.
    pub fn session(&self) -> Option<Arc<dyn Session>> {
        self.session.as_ref().and_then(Weak::upgrade)
    }

    pub fn has_session(&self) -> bool {
        self.session().is_some()
    }

    pub fn set_session(&mut self, session: Weak<dyn Session>) {
        self.session = Some(session);
    }
}

impl std::fmt::Debug for PropertyContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PropertyContainer")
            .field("kind", &self.kind)
            .field("id", &self.id)
            .field("properties", &self.properties)
            .field("lazy_load", &self.lazy_load)
            .field("loaded", &self.loaded)
            .field("pending", &self.pending.len())
            .field("session", &self.has_session())
            .finish()
    }
}
