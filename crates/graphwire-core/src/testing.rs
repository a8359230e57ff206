//! Session double for entity tests

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};

use async_trait::async_trait;

use crate::error::{Error, RequestFailure, Result};
use crate::node::Node;
use crate::relationship::Relationship;
use crate::session::Session;
use crate::transport::Headers;

type Hook<T> = Mutex<Option<Box<dyn Fn(&T) + Send + Sync>>>;

/// Counts calls and runs an optional hook in place of a server round trip
#[derive(Default)]
pub(crate) struct RecordingSession {
    node_loads: AtomicUsize,
    node_saves: AtomicUsize,
    relationship_loads: AtomicUsize,
    relationship_saves: AtomicUsize,
    fail_saves: AtomicBool,
    load_node_hook: Hook<Node>,
    load_relationship_hook: Hook<Relationship>,
}

impl RecordingSession {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn weak(self: &Arc<Self>) -> Weak<dyn Session> {
        let weak: Weak<RecordingSession> = Arc::downgrade(self);
        weak
    }

    /// Whether `session` is this recorder
    pub fn owns(self: &Arc<Self>, session: &Arc<dyn Session>) -> bool {
        Arc::as_ptr(session) as *const () == Arc::as_ptr(self) as *const ()
    }

    pub fn on_load_node(&self, hook: impl Fn(&Node) + Send + Sync + 'static) {
        *self.load_node_hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn on_load_relationship(&self, hook: impl Fn(&Relationship) + Send + Sync + 'static) {
        *self.load_relationship_hook.lock().unwrap() = Some(Box::new(hook));
    }

    pub fn fail_saves(&self) {
        self.fail_saves.store(true, Ordering::SeqCst);
    }

    pub fn node_loads(&self) -> usize {
        self.node_loads.load(Ordering::SeqCst)
    }

    pub fn node_saves(&self) -> usize {
        self.node_saves.load(Ordering::SeqCst)
    }

    pub fn relationship_loads(&self) -> usize {
        self.relationship_loads.load(Ordering::SeqCst)
    }

    pub fn relationship_saves(&self) -> usize {
        self.relationship_saves.load(Ordering::SeqCst)
    }

    fn save_result(&self) -> Result<()> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(Error::Request(RequestFailure::new(
                "Unable to save",
                500,
                Headers::new(),
                None,
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl Session for RecordingSession {
    async fn load_node(&self, node: &Node) -> Result<()> {
        self.node_loads.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.load_node_hook.lock().unwrap().as_ref() {
            hook(node);
        }
        Ok(())
    }

    async fn save_node(&self, _node: &Node) -> Result<()> {
        self.save_result()?;
        self.node_saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_node(&self, _node: &Node) -> Result<()> {
        Ok(())
    }

    async fn load_relationship(&self, relationship: &Relationship) -> Result<()> {
        self.relationship_loads.fetch_add(1, Ordering::SeqCst);
        if let Some(hook) = self.load_relationship_hook.lock().unwrap().as_ref() {
            hook(relationship);
        }
        Ok(())
    }

    async fn save_relationship(&self, _relationship: &Relationship) -> Result<()> {
        self.save_result()?;
        self.relationship_saves.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete_relationship(&self, _relationship: &Relationship) -> Result<()> {
        Ok(())
    }
}
