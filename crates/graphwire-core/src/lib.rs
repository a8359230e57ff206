//! Graphwire Core - Entity model for a remote graph database
//!
//! This crate provides the client-side mirrors of server records (nodes and
//! relationships), the session and transport seams they talk through, and
//! the error taxonomy shared by the Graphwire crates.

pub mod container;
pub mod entity;
pub mod error;
pub mod node;
pub mod relationship;
pub mod session;
pub mod transport;
pub mod uri;

#[cfg(test)]
mod testing;

pub use container::{Properties, PropertyContainer};
pub use entity::{Entity, EntityKind};
pub use error::{Error, FailureKind, RequestFailure, Result, TransportError, ValidationError};
pub use node::Node;
pub use relationship::{Relationship, UniqueAction, UniqueSpec};
pub use session::Session;
pub use transport::{Headers, Method, Transport, TransportResponse};
pub use uri::{entity_uri, id_from_uri, node_uri};
