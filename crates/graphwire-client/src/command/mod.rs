//! Commands: one REST exchange per entity operation
//!
//! Every command builds its request from entity state (`method`, `path`,
//! `data`) and turns the response back into entity state (`interpret`).
//! A command either succeeds and mutates its entity, or fails and leaves
//! the entity exactly as it was.

mod node;
mod relationship;

pub use node::{CreateNode, DeleteNode, LoadNode, UpdateNode};
pub use relationship::{CreateRelationship, DeleteRelationship, LoadRelationship, UpdateRelationship};

use async_trait::async_trait;
use graphwire_cache::{CachedEntity, EntityCache};
use graphwire_core::{
    id_from_uri, Entity, EntityKind, Error, Method, RequestFailure, Result, TransportResponse,
    ValidationError,
};

use crate::client::Client;

#[async_trait]
pub trait Command: Send + Sync {
    type Output: Send;

    /// Operation name used in failure messages, e.g. "create relationship"
    fn operation(&self) -> &'static str;

    fn client(&self) -> &Client;

    fn method(&self) -> Method;

    /// Path relative to the endpoint. May reject the entity's state before
    /// anything is sent.
    fn path(&self) -> Result<String>;

    /// Request body. May reject the entity's state before anything is sent.
    fn data(&self) -> Result<Option<serde_json::Value>> {
        Ok(None)
    }

    /// Apply a 2xx response to the entity.
    fn handle_success(&self, response: TransportResponse) -> Result<Self::Output>;

    /// Classify the response: 2xx goes to [`Command::handle_success`],
    /// anything else becomes a [`RequestFailure`].
    fn interpret(&self, response: TransportResponse) -> Result<Self::Output> {
        if !response.is_success() {
            tracing::warn!(
                "Unable to {}: server answered {}",
                self.operation(),
                response.status
            );
            return Err(RequestFailure::new(
                format!("Unable to {}", self.operation()),
                response.status,
                response.headers,
                response.body,
            )
            .into());
        }
        self.handle_success(response)
    }

    async fn execute(&self) -> Result<Self::Output> {
        let path = self.path()?;
        let data = self.data()?;
        let method = self.method();

        tracing::debug!("{} {}", method, path);
        let response = self
            .client()
            .transport()
            .request(method, &path, data.as_ref())
            .await?;
        tracing::debug!("{} {} -> {}", method, path, response.status);

        self.interpret(response)
    }
}

/// Id of an entity that must already exist on the server
fn require_id<E: Entity>(entity: &E) -> Result<u64> {
    entity
        .id()
        .ok_or_else(|| ValidationError::MissingId(entity.kind()).into())
}

/// Id of a freshly created entity, from the `Location` header or, failing
/// that, the `self` uri in the body.
fn created_id(kind: EntityKind, response: &TransportResponse) -> Result<u64> {
    if let Some(location) = response.headers.get("Location") {
        return id_from_uri(location);
    }
    let body = response.body.as_ref();
    body.and_then(|b| b.get("body"))
        .and_then(|b| b.get("self"))
        .or_else(|| body.and_then(|b| b.get("self")))
        .and_then(|uri| uri.as_str())
        .ok_or(Error::MissingIdentity(kind))
        .and_then(id_from_uri)
}

/// Assign the new id and register the entity in the cache. If the cache
/// rejects it the id is taken back.
fn commit_created<E>(cache: &dyn EntityCache, entity: &E, id: u64) -> Result<()>
where
    E: Entity + Into<CachedEntity>,
{
    entity.set_id(id)?;
    if let Err(err) = cache.set_cached(entity.clone().into()) {
        entity.clear_id();
        return Err(err.into());
    }
    entity.mark_loaded();
    tracing::info!("Created {} {}", entity.kind(), id);
    Ok(())
}

/// Evict a deleted entity and forget its id
fn commit_deleted<E: Entity>(cache: &dyn EntityCache, entity: &E, id: u64) -> Result<()> {
    cache.remove(entity.kind(), id)?;
    entity.clear_id();
    tracing::info!("Deleted {} {}", entity.kind(), id);
    Ok(())
}

fn properties_body<E: Entity>(entity: &E) -> Result<serde_json::Value> {
    Ok(serde_json::to_value(entity.cached_properties())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_created_id_prefers_location() {
        let response = TransportResponse::new(201)
            .with_header("location", "http://host/relationship/42")
            .with_body(json!({"self": "http://host/relationship/7"}));
        assert_eq!(created_id(EntityKind::Relationship, &response).unwrap(), 42);
    }

    #[test]
    fn test_created_id_from_body() {
        let wrapped = TransportResponse::new(201)
            .with_body(json!({"body": {"self": "http://host/relationship/77"}}));
        assert_eq!(created_id(EntityKind::Relationship, &wrapped).unwrap(), 77);

        let plain = TransportResponse::new(201).with_body(json!({"self": "http://host/node/5"}));
        assert_eq!(created_id(EntityKind::Node, &plain).unwrap(), 5);
    }

    #[test]
    fn test_created_id_missing() {
        let response = TransportResponse::new(201).with_body(json!({"data": {}}));
        assert!(matches!(
            created_id(EntityKind::Node, &response),
            Err(Error::MissingIdentity(EntityKind::Node))
        ));

        let garbage = TransportResponse::new(201).with_header("Location", "http://host/node/x");
        assert!(matches!(
            created_id(EntityKind::Node, &garbage),
            Err(Error::InvalidUri(_))
        ));
    }
}
