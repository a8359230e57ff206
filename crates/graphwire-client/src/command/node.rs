//! Node commands

use graphwire_core::{Entity, EntityKind, Method, Node, Properties, Result, TransportResponse};
use serde::Deserialize;

use super::{commit_created, commit_deleted, created_id, properties_body, require_id, Command};
use crate::client::Client;

/// Body of `GET /node/{id}`
#[derive(Debug, Default, Deserialize)]
struct NodeBody {
    #[serde(default)]
    data: Properties,
}

/// `POST /node`
pub struct CreateNode<'a> {
    client: &'a Client,
    node: &'a Node,
}

impl<'a> CreateNode<'a> {
    pub fn new(client: &'a Client, node: &'a Node) -> Self {
        Self { client, node }
    }
}

impl Command for CreateNode<'_> {
    type Output = bool;

    fn operation(&self) -> &'static str {
        "create node"
    }

    fn client(&self) -> &Client {
        self.client
    }

    fn method(&self) -> Method {
        Method::Post
    }

    fn path(&self) -> Result<String> {
        Ok("/node".to_string())
    }

    fn data(&self) -> Result<Option<serde_json::Value>> {
        if self.node.cached_properties().is_empty() {
            return Ok(None);
        }
        properties_body(self.node).map(Some)
    }

    fn handle_success(&self, response: TransportResponse) -> Result<bool> {
        let id = created_id(EntityKind::Node, &response)?;
        commit_created(self.client.cache(), self.node, id)?;
        Ok(true)
    }
}

/// `GET /node/{id}`
pub struct LoadNode<'a> {
    client: &'a Client,
    node: &'a Node,
}

impl<'a> LoadNode<'a> {
    pub fn new(client: &'a Client, node: &'a Node) -> Self {
        Self { client, node }
    }
}

impl Command for LoadNode<'_> {
    type Output = Node;

    fn operation(&self) -> &'static str {
        "load node"
    }

    fn client(&self) -> &Client {
        self.client
    }

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> Result<String> {
        Ok(format!("/node/{}", require_id(self.node)?))
    }

    fn handle_success(&self, response: TransportResponse) -> Result<Node> {
        let body: NodeBody = match response.body {
            Some(body) => serde_json::from_value(body)?,
            None => NodeBody::default(),
        };
        self.client.cache().set_cached(self.node.clone().into())?;
        self.node.hydrate(body.data);
        self.node.mark_loaded();
        Ok(self.node.clone())
    }
}

/// `PUT /node/{id}/properties`
pub struct UpdateNode<'a> {
    client: &'a Client,
    node: &'a Node,
}

impl<'a> UpdateNode<'a> {
    pub fn new(client: &'a Client, node: &'a Node) -> Self {
        Self { client, node }
    }
}

impl Command for UpdateNode<'_> {
    type Output = bool;

    fn operation(&self) -> &'static str {
        "save node"
    }

    fn client(&self) -> &Client {
        self.client
    }

    fn method(&self) -> Method {
        Method::Put
    }

    fn path(&self) -> Result<String> {
        Ok(format!("/node/{}/properties", require_id(self.node)?))
    }

    fn data(&self) -> Result<Option<serde_json::Value>> {
        properties_body(self.node).map(Some)
    }

    fn handle_success(&self, _response: TransportResponse) -> Result<bool> {
        self.node.mark_loaded();
        Ok(true)
    }
}

/// `DELETE /node/{id}`
pub struct DeleteNode<'a> {
    client: &'a Client,
    node: &'a Node,
}

impl<'a> DeleteNode<'a> {
    pub fn new(client: &'a Client, node: &'a Node) -> Self {
        Self { client, node }
    }
}

impl Command for DeleteNode<'_> {
    type Output = bool;

    fn operation(&self) -> &'static str {
        "delete node"
    }

    fn client(&self) -> &Client {
        self.client
    }

    fn method(&self) -> Method {
        Method::Delete
    }

    fn path(&self) -> Result<String> {
        Ok(format!("/node/{}", require_id(self.node)?))
    }

    fn handle_success(&self, _response: TransportResponse) -> Result<bool> {
        let id = require_id(self.node)?;
        commit_deleted(self.client.cache(), self.node, id)?;
        Ok(true)
    }
}
