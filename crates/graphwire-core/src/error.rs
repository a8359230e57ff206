//! Error types for Graphwire Core

use crate::entity::EntityKind;
use crate::transport::Headers;
use thiserror::Error;

/// Result type alias using Graphwire's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Graphwire error types
#[derive(Error, Debug)]
pub enum Error {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Request(#[from] RequestFailure),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("{kind} already has id {current}")]
    IdAlreadySet { kind: EntityKind, current: u64 },

    #[error("Invalid unique action: {0} (expected get_or_create or create_or_fail)")]
    InvalidUniqueAction(String),

    #[error("Invalid entity uri: {0}")]
    InvalidUri(String),

    #[error("Response for {0} carried neither a Location header nor a self uri")]
    MissingIdentity(EntityKind),

    #[error("{0} is not attached to a session")]
    NoSession(EntityKind),

    #[error("Cache error: {0}")]
    Cache(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl Error {
    /// True when the server refused a create because the entity already
    /// exists (the `create_or_fail` uniqueness policy).
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Request(f) if f.kind == FailureKind::Conflict)
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::Request(f) if f.kind == FailureKind::NotFound)
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, Error::Validation(_))
    }

    /// The failed request, when the server answered with a non-2xx status.
    pub fn request_failure(&self) -> Option<&RequestFailure> {
        match self {
            Error::Request(f) => Some(f),
            _ => None,
        }
    }
}

/// Entity state that must be fixed before a request can be built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("no start node")]
    NoStartNode,

    #[error("no end node")]
    NoEndNode,

    #[error("no relationship type")]
    NoRelationshipType,

    #[error("{0} has no id")]
    MissingId(EntityKind),
}

/// Classification of a non-2xx response
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// 409: an existing record already satisfies a uniqueness constraint
    Conflict,
    /// 404
    NotFound,
    Other,
}

impl FailureKind {
    pub fn from_status(status: u16) -> Self {
        match status {
            409 => Self::Conflict,
            404 => Self::NotFound,
            _ => Self::Other,
        }
    }
}

/// A request the server answered with a non-2xx status.
///
/// Headers and body are kept verbatim for diagnostics.
#[derive(Error, Debug, Clone)]
#[error("{message} [{status}]")]
pub struct RequestFailure {
    pub message: String,
    pub status: u16,
    pub headers: Headers,
    pub body: Option<serde_json::Value>,
    pub kind: FailureKind,
}

impl RequestFailure {
    pub fn new(
        message: impl Into<String>,
        status: u16,
        headers: Headers,
        body: Option<serde_json::Value>,
    ) -> Self {
        Self {
            message: message.into(),
            status,
            headers,
            body,
            kind: FailureKind::from_status(status),
        }
    }

    /// The `message` field of a server error body, if there is one.
    pub fn server_message(&self) -> Option<&str> {
        self.body
            .as_ref()
            .and_then(|b| b.get("message"))
            .and_then(|m| m.as_str())
    }
}

/// Network-level failures reported by a transport
#[derive(Error, Debug, Clone)]
pub enum TransportError {
    #[error("request timed out: {0}")]
    Timeout(String),

    #[error("connection failed: {0}")]
    Connect(String),

    #[error("{0}")]
    Other(String),
}
