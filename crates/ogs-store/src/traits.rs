//! Repository traits defining the schema storage interface.
//!
//! Any backend (in-memory, Postgres, ...) implements these traits. Every call
//! is a single row-level operation; grouping calls into a transaction is the
//! backend's business and is not expressed here.

use ogs_types::{
    GraphSchemaEdgeKind, GraphSchemaExtension, GraphSchemaNodeKind, GraphSchemaProperty,
};

use crate::error::StoreResult;

/// Storage for schema extensions.
pub trait ExtensionRepository: Send + Sync {
    /// Create a non-built-in extension and return it as stored.
    fn create_extension(
        &self,
        name: &str,
        display_name: &str,
        version: &str,
    ) -> StoreResult<GraphSchemaExtension>;

    fn get_extension_by_id(&self, id: i32) -> StoreResult<GraphSchemaExtension>;

    /// Returns `Ok(None)` if no extension has this name.
    fn get_extension_by_name(&self, name: &str) -> StoreResult<Option<GraphSchemaExtension>>;

    /// All extensions, ordered by id.
    fn list_extensions(&self) -> StoreResult<Vec<GraphSchemaExtension>>;

    /// Update name, display name and version of the extension with
    /// `extension.serial.id`. The built-in flag is never changed.
    fn update_extension(
        &self,
        extension: &GraphSchemaExtension,
    ) -> StoreResult<GraphSchemaExtension>;

    /// Delete an extension together with every kind and property it owns.
    fn delete_extension(&self, id: i32) -> StoreResult<()>;
}

/// Storage for node kinds.
///
/// `create_*` ignores the incoming serial and assigns a new one; `update_*`
/// addresses the row by `serial.id`.
pub trait NodeKindRepository: Send + Sync {
    fn create_node_kind(&self, kind: &GraphSchemaNodeKind) -> StoreResult<GraphSchemaNodeKind>;
    fn get_node_kind_by_id(&self, id: i32) -> StoreResult<GraphSchemaNodeKind>;
    /// Node kinds owned by `extension_id`, ordered by id.
    fn list_node_kinds(&self, extension_id: i32) -> StoreResult<Vec<GraphSchemaNodeKind>>;
    fn update_node_kind(&self, kind: &GraphSchemaNodeKind) -> StoreResult<GraphSchemaNodeKind>;
    fn delete_node_kind(&self, id: i32) -> StoreResult<()>;
}

/// Storage for edge kinds. Same contract as [`NodeKindRepository`].
pub trait EdgeKindRepository: Send + Sync {
    fn create_edge_kind(&self, kind: &GraphSchemaEdgeKind) -> StoreResult<GraphSchemaEdgeKind>;
    fn get_edge_kind_by_id(&self, id: i32) -> StoreResult<GraphSchemaEdgeKind>;
    fn list_edge_kinds(&self, extension_id: i32) -> StoreResult<Vec<GraphSchemaEdgeKind>>;
    fn update_edge_kind(&self, kind: &GraphSchemaEdgeKind) -> StoreResult<GraphSchemaEdgeKind>;
    fn delete_edge_kind(&self, id: i32) -> StoreResult<()>;
}

/// Storage for properties. Same contract as [`NodeKindRepository`].
pub trait PropertyRepository: Send + Sync {
    fn create_property(&self, property: &GraphSchemaProperty) -> StoreResult<GraphSchemaProperty>;
    fn get_property_by_id(&self, id: i32) -> StoreResult<GraphSchemaProperty>;
    fn list_properties(&self, extension_id: i32) -> StoreResult<Vec<GraphSchemaProperty>>;
    fn update_property(&self, property: &GraphSchemaProperty) -> StoreResult<GraphSchemaProperty>;
    fn delete_property(&self, id: i32) -> StoreResult<()>;
}

/// Everything the upsert flow needs from storage.
pub trait SchemaRepository:
    ExtensionRepository + NodeKindRepository + EdgeKindRepository + PropertyRepository
{
}

impl<T> SchemaRepository for T where
    T: ExtensionRepository + NodeKindRepository + EdgeKindRepository + PropertyRepository
{
}

/// Refreshes the graph database's in-memory kind maps after the schema
/// tables change.
pub trait KindRefresher: Send + Sync {
    fn refresh_kinds(&self) -> StoreResult<()>;
}
