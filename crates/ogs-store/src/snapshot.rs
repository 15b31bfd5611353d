use serde::{Deserialize, Serialize};

use ogs_types::{
    GraphSchemaEdgeKind, GraphSchemaExtension, GraphSchemaNodeKind, GraphSchemaProperty,
};

/// A full export of the schema tables, used to persist an
/// [`InMemorySchemaStore`](crate::InMemorySchemaStore) between runs.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SchemaSnapshot {
    pub extensions: Vec<GraphSchemaExtension>,
    pub node_kinds: Vec<GraphSchemaNodeKind>,
    pub edge_kinds: Vec<GraphSchemaEdgeKind>,
    pub properties: Vec<GraphSchemaProperty>,
}

impl SchemaSnapshot {
    /// Returns `true` if no table has any rows.
    pub fn is_empty(&self) -> bool {
        self.extensions.is_empty()
            && self.node_kinds.is_empty()
            && self.edge_kinds.is_empty()
            && self.properties.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_until_any_table_has_rows() {
        assert!(SchemaSnapshot::default().is_empty());

        let json = r#"{ "properties": [ { "serial": { "id": 1 }, "name": "sid" } ] }"#;
        let snapshot: SchemaSnapshot = serde_json::from_str(json).unwrap();
        assert!(!snapshot.is_empty());
        assert!(snapshot.extensions.is_empty());
    }
}
