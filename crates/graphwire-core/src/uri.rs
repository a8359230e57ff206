//! Entity URI helpers

use crate::entity::EntityKind;
use crate::error::{Error, Result};

/// Absolute URI of an entity, e.g. `http://localhost:7474/db/data/node/12`
pub fn entity_uri(endpoint: &str, kind: EntityKind, id: u64) -> String {
    format!(
        "{}/{}/{}",
        endpoint.trim_end_matches('/'),
        kind.path_segment(),
        id
    )
}

pub fn node_uri(endpoint: &str, id: u64) -> String {
    entity_uri(endpoint, EntityKind::Node, id)
}

/// Extract the numeric id from the trailing segment of `.../node/{id}` or
/// `.../relationship/{id}`.
pub fn id_from_uri(uri: &str) -> Result<u64> {
    uri.trim_end_matches('/')
        .rsplit('/')
        .next()
        .and_then(|segment| segment.parse().ok())
        .ok_or_else(|| Error::InvalidUri(uri.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_uri() {
        assert_eq!(id_from_uri("http://host/db/data/node/12").unwrap(), 12);
        assert_eq!(id_from_uri("http://host/relationship/42/").unwrap(), 42);
        assert_eq!(id_from_uri("7").unwrap(), 7);
    }

    #[test]
    fn test_id_from_uri_rejects_non_numeric() {
        assert!(matches!(
            id_from_uri("http://host/node/abc"),
            Err(Error::InvalidUri(_))
        ));
        assert!(id_from_uri("").is_err());
    }

    #[test]
    fn test_entity_uri() {
        assert_eq!(node_uri("http://host/db/data/", 3), "http://host/db/data/node/3");
        assert_eq!(
            entity_uri("http://host", EntityKind::Relationship, 9),
            "http://host/relationship/9"
        );
    }
}
