//! Graphwire Client - REST client for the graph database entity model
//!
//! Wires the entity model from `graphwire-core` to a server: commands that
//! turn entity operations into REST exchanges, an HTTP transport, the entity
//! cache, and the [`Client`] that ties them together as the entities'
//! session.

pub mod client;
pub mod command;
pub mod config;
pub mod transport;

#[cfg(test)]
mod testing;

pub use client::Client;
pub use command::{
    Command, CreateNode, CreateRelationship, DeleteNode, DeleteRelationship, LoadNode,
    LoadRelationship, UpdateNode, UpdateRelationship,
};
pub use config::{ClientConfig, ConfigError, DEFAULT_ENDPOINT, DEFAULT_TIMEOUT_SECS};
pub use transport::HttpTransport;

pub use graphwire_cache::{CachedEntity, EntityCache, MemoryEntityCache};
pub use graphwire_core::{
    Entity, EntityKind, Error, Node, Properties, Relationship, Result, Session, UniqueAction,
};
