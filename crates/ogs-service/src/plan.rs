use ogs_diff::{DiffBucket, MapDiffActions};
use ogs_types::{
    ExtensionMember, GraphSchemaEdgeKind, GraphSchemaExtension, GraphSchemaNodeKind,
    GraphSchemaProperty,
};

/// The changes an upsert would make, computed against the current store.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SchemaPlan {
    /// The incoming extension, carrying the stored serial when it exists.
    pub extension: GraphSchemaExtension,
    pub extension_exists: bool,
    pub node_kinds: MapDiffActions<GraphSchemaNodeKind>,
    pub edge_kinds: MapDiffActions<GraphSchemaEdgeKind>,
    pub properties: MapDiffActions<GraphSchemaProperty>,
}

impl SchemaPlan {
    /// Point every record that will be written at `extension_id`.
    ///
    /// Deletes are left alone; they already reference their stored owner.
    pub fn bind_to_extension(&mut self, extension_id: i32) {
        bind(&mut self.node_kinds, extension_id);
        bind(&mut self.edge_kinds, extension_id);
        bind(&mut self.properties, extension_id);
    }

    /// Total number of actions across the three collections.
    pub fn len(&self) -> usize {
        self.node_kinds.len() + self.edge_kinds.len() + self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

fn bind<T: ExtensionMember>(actions: &mut MapDiffActions<T>, extension_id: i32) {
    for bucket in [DiffBucket::Update, DiffBucket::Insert] {
        actions.for_each_mut(bucket, |item| item.set_schema_extension_id(extension_id));
    }
}

/// Counts of the effects run for one collection.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ApplyStats {
    pub deleted: usize,
    pub updated: usize,
    pub inserted: usize,
}

/// The outcome of applying a [`SchemaPlan`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpsertReport {
    /// The extension as stored after the upsert.
    pub extension: GraphSchemaExtension,
    pub extension_existed: bool,
    pub node_kinds: ApplyStats,
    pub edge_kinds: ApplyStats,
    pub properties: ApplyStats,
}
