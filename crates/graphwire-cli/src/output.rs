//! Output formatting utilities

use graphwire_client::{Entity, Node, Properties, Relationship};
use serde::Serialize;

/// Output format
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl From<&str> for OutputFormat {
    fn from(s: &str) -> Self {
        match s.to_lowercase().as_str() {
            "json" => Self::Json,
            _ => Self::Text,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct NodeView {
    pub id: Option<u64>,
    pub properties: Properties,
}

impl NodeView {
    pub fn new(node: &Node, properties: Properties) -> Self {
        Self {
            id: node.id(),
            properties,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct RelationshipView {
    pub id: Option<u64>,
    pub start: Option<u64>,
    #[serde(rename = "type")]
    pub rel_type: Option<String>,
    pub end: Option<u64>,
    pub properties: Properties,
}

impl RelationshipView {
    /// Snapshot of a relationship's current local state
    pub fn new(rel: &Relationship) -> Self {
        Self {
            id: rel.id(),
            start: rel.cached_start_node().and_then(|n| n.id()),
            rel_type: rel.cached_type(),
            end: rel.cached_end_node().and_then(|n| n.id()),
            properties: rel.cached_properties(),
        }
    }
}

fn id_text(id: Option<u64>) -> String {
    id.map(|id| id.to_string()).unwrap_or_else(|| "?".to_string())
}

/// Properties as sorted `key = value` lines
fn property_lines(properties: &Properties) -> Vec<String> {
    let mut keys: Vec<_> = properties.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|key| format!("  {} = {}", key, properties[key]))
        .collect()
}

pub fn format_node(view: &NodeView, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(view),
        OutputFormat::Text => {
            let mut lines = vec![format!("Node {}", id_text(view.id))];
            lines.extend(property_lines(&view.properties));
            lines.join("\n")
        }
    }
}

pub fn format_relationship(view: &RelationshipView, format: OutputFormat) -> String {
    match format {
        OutputFormat::Json => to_json(view),
        OutputFormat::Text => {
            let mut lines = vec![format!(
                "Relationship {}: ({})-[:{}]->({})",
                id_text(view.id),
                id_text(view.start),
                view.rel_type.as_deref().unwrap_or("?"),
                id_text(view.end)
            )];
            lines.extend(property_lines(&view.properties));
            lines.join("\n")
        }
    }
}

fn to_json<T: Serialize>(data: &T) -> String {
    serde_json::to_string_pretty(data).unwrap_or_else(|_| "{}".to_string())
}

/// Parse a `key=value` argument
pub fn parse_property(arg: &str) -> anyhow::Result<(String, serde_json::Value)> {
    let Some((key, value)) = arg.split_once('=') else {
        anyhow::bail!("Invalid property '{}': expected key=value", arg);
    };
    let key = key.trim();
    if key.is_empty() {
        anyhow::bail!("Invalid property '{}': empty key", arg);
    }
    Ok((key.to_string(), parse_value(value)))
}

/// A command line value: JSON when it parses, a plain string otherwise
pub fn parse_value(value: &str) -> serde_json::Value {
    serde_json::from_str(value).unwrap_or_else(|_| serde_json::Value::String(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_property() {
        assert_eq!(parse_property("age=41").unwrap(), ("age".to_string(), json!(41)));
        assert_eq!(
            parse_property("name=Alice").unwrap(),
            ("name".to_string(), json!("Alice"))
        );
        assert_eq!(
            parse_property("tags=[\"a\",\"b\"]").unwrap(),
            ("tags".to_string(), json!(["a", "b"]))
        );
        assert_eq!(parse_property("note=a=b").unwrap().1, json!("a=b"));
        assert!(parse_property("novalue").is_err());
        assert!(parse_property("=1").is_err());
    }

    #[test]
    fn test_format_node_text() {
        let view = NodeView {
            id: Some(3),
            properties: [("name".to_string(), json!("Bob")), ("age".to_string(), json!(41))]
                .into_iter()
                .collect(),
        };
        assert_eq!(
            format_node(&view, OutputFormat::Text),
            "Node 3\n  age = 41\n  name = \"Bob\""
        );
    }

    #[test]
    fn test_format_relationship_json() {
        let rel = Relationship::with_id(8);
        rel.set_start_node(Node::with_id(1));
        rel.set_end_node(Node::with_id(2));
        rel.set_type("KNOWS");

        let json: serde_json::Value =
            serde_json::from_str(&format_relationship(&RelationshipView::new(&rel), OutputFormat::Json))
                .unwrap();
        assert_eq!(
            json,
            json!({"id": 8, "start": 1, "type": "KNOWS", "end": 2, "properties": {}})
        );
    }
}
