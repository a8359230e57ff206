//! Relationship commands

use graphwire_core::{
    id_from_uri, node_uri, Entity, EntityKind, Method, Properties, Relationship, Result,
    TransportResponse, ValidationError,
};
use serde::Deserialize;
use serde_json::json;

use super::{commit_created, commit_deleted, created_id, properties_body, require_id, Command};
use crate::client::Client;

/// Body of `GET /relationship/{id}`
#[derive(Debug, Deserialize)]
struct RelationshipBody {
    start: String,
    end: String,
    #[serde(rename = "type")]
    rel_type: String,
    #[serde(default)]
    data: Properties,
}

/// Everything a relationship needs before it can be created
struct Endpoints {
    start_id: u64,
    end_id: u64,
    rel_type: String,
}

/// Create a relationship, either plainly from its start node or through the
/// type's uniqueness index.
///
/// * ordinary: `POST /node/{start}/relationships`
/// * unique: `POST /index/relationship/{type}?uniqueness={action}`
pub struct CreateRelationship<'a> {
    client: &'a Client,
    rel: &'a Relationship,
}

impl<'a> CreateRelationship<'a> {
    pub fn new(client: &'a Client, rel: &'a Relationship) -> Self {
        Self { client, rel }
    }

    /// Start node, end node and type, checked in that order
    fn endpoints(&self) -> Result<Endpoints> {
        let start_id = self
            .rel
            .cached_start_node()
            .and_then(|n| n.id())
            .ok_or(ValidationError::NoStartNode)?;
        let end_id = self
            .rel
            .cached_end_node()
            .and_then(|n| n.id())
            .ok_or(ValidationError::NoEndNode)?;
        let rel_type = self
            .rel
            .cached_type()
            .filter(|t| !t.is_empty())
            .ok_or(ValidationError::NoRelationshipType)?;

        Ok(Endpoints {
            start_id,
            end_id,
            rel_type,
        })
    }
}

impl Command for CreateRelationship<'_> {
    type Output = bool;

    fn operation(&self) -> &'static str {
        "create relationship"
    }

    fn client(&self) -> &Client {
        self.client
    }

    fn method(&self) -> Method {
        Method::Post
    }

    fn path(&self) -> Result<String> {
        let endpoints = self.endpoints()?;
        if self.rel.is_unique() {
            return Ok(format!(
                "/index/relationship/{}?uniqueness={}",
                endpoints.rel_type,
                self.rel.unique_action()
            ));
        }
        Ok(format!("/node/{}/relationships", endpoints.start_id))
    }

    fn data(&self) -> Result<Option<serde_json::Value>> {
        let endpoints = self.endpoints()?;
        let endpoint = self.client.endpoint();
        let end_uri = node_uri(endpoint, endpoints.end_id);

        let mut data = json!({ "type": endpoints.rel_type });
        match self.rel.unique_spec() {
            Some(unique) if unique.key.is_some() => {
                data["key"] = json!(unique.key);
                data["value"] = json!(unique.value);
                data["start"] = json!(node_uri(endpoint, endpoints.start_id));
                data["end"] = json!(end_uri);
            }
            _ => {
                data["to"] = json!(end_uri);
            }
        }

        let properties = self.rel.cached_properties();
        if !properties.is_empty() {
            data["data"] = serde_json::to_value(properties)?;
        }
        Ok(Some(data))
    }

    fn handle_success(&self, response: TransportResponse) -> Result<bool> {
        let id = created_id(EntityKind::Relationship, &response)?;
        commit_created(self.client.cache(), self.rel, id)?;
        Ok(true)
    }
}

/// `GET /relationship/{id}`
pub struct LoadRelationship<'a> {
    client: &'a Client,
    rel: &'a Relationship,
}

impl<'a> LoadRelationship<'a> {
    pub fn new(client: &'a Client, rel: &'a Relationship) -> Self {
        Self { client, rel }
    }
}

impl Command for LoadRelationship<'_> {
    type Output = Relationship;

    fn operation(&self) -> &'static str {
        "load relationship"
    }

    fn client(&self) -> &Client {
        self.client
    }

    fn method(&self) -> Method {
        Method::Get
    }

    fn path(&self) -> Result<String> {
        Ok(format!("/relationship/{}", require_id(self.rel)?))
    }

    fn handle_success(&self, response: TransportResponse) -> Result<Relationship> {
        let body: RelationshipBody =
            serde_json::from_value(response.body.unwrap_or(serde_json::Value::Null))?;
        let start_id = id_from_uri(&body.start)?;
        let end_id = id_from_uri(&body.end)?;

        let start = self.client.node_ref(start_id)?;
        let end = self.client.node_ref(end_id)?;
        self.client.cache().set_cached(self.rel.clone().into())?;

        self.rel.set_start_node(start);
        self.rel.set_end_node(end);
        self.rel.set_type(body.rel_type);
        self.rel.hydrate(body.data);
        self.rel.mark_loaded();
        Ok(self.rel.clone())
    }
}

/// `PUT /relationship/{id}/properties`
pub struct UpdateRelationship<'a> {
    client: &'a Client,
    rel: &'a Relationship,
}

impl<'a> UpdateRelationship<'a> {
    pub fn new(client: &'a Client, rel: &'a Relationship) -> Self {
        Self { client, rel }
    }
}

impl Command for UpdateRelationship<'_> {
    type Output = bool;

    fn operation(&self) -> &'static str {
        "save relationship"
    }

    fn client(&self) -> &Client {
        self.client
    }

    fn method(&self) -> Method {
        Method::Put
    }

    fn path(&self) -> Result<String> {
        Ok(format!("/relationship/{}/properties", require_id(self.rel)?))
    }

    fn data(&self) -> Result<Option<serde_json::Value>> {
        properties_body(self.rel).map(Some)
    }

    fn handle_success(&self, _response: TransportResponse) -> Result<bool> {
        self.rel.mark_loaded();
        Ok(true)
    }
}

/// `DELETE /relationship/{id}`
pub struct DeleteRelationship<'a> {
    client: &'a Client,
    rel: &'a Relationship,
}

impl<'a> DeleteRelationship<'a> {
    pub fn new(client: &'a Client, rel: &'a Relationship) -> Self {
        Self { client, rel }
    }
}

impl Command for DeleteRelationship<'_> {
    type Output = bool;

    fn operation(&self) -> &'static str {
        "delete relationship"
    }

    fn client(&self) -> &Client {
        self.client
    }

    fn method(&self) -> Method {
        Method::Delete
    }

    fn path(&self) -> Result<String> {
        Ok(format!("/relationship/{}", require_id(self.rel)?))
    }

    fn handle_success(&self, _response: TransportResponse) -> Result<bool> {
        let id = require_id(self.rel)?;
        commit_deleted(self.client.cache(), self.rel, id)?;
        Ok(true)
    }
}
