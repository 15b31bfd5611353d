//! In-memory schema store for tests and file-backed tooling.
//!
//! [`InMemorySchemaStore`] keeps all four schema tables behind a single
//! `RwLock`. It implements every repository trait and enforces the same
//! constraints a relational backend would: unique names, existing parent
//! extensions and cascading extension deletes.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::Utc;
use ogs_types::{
    GraphSchemaEdgeKind, GraphSchemaExtension, GraphSchemaNodeKind, GraphSchemaProperty,
};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::snapshot::SchemaSnapshot;
use crate::table::Table;
use crate::traits::{
    EdgeKindRepository, ExtensionRepository, KindRefresher, NodeKindRepository,
    PropertyRepository,
};

#[derive(Debug, Default)]
struct Tables {
    extensions: Table<GraphSchemaExtension>,
    node_kinds: Table<GraphSchemaNodeKind>,
    edge_kinds: Table<GraphSchemaEdgeKind>,
    properties: Table<GraphSchemaProperty>,
}

impl Tables {
    fn require_extension(&self, extension_id: i32) -> StoreResult<()> {
        self.extensions
            .get(extension_id)
            .map(|_| ())
            .map_err(|_| StoreError::ExtensionNotFound(extension_id))
    }

    fn check_owners(&self) -> StoreResult<()> {
        let owners = self
            .node_kinds
            .rows()
            .map(|r| (r.schema_extension_id, r.name.as_str()))
            .chain(self.edge_kinds.rows().map(|r| (r.schema_extension_id, r.name.as_str())))
            .chain(self.properties.rows().map(|r| (r.schema_extension_id, r.name.as_str())));

        for (extension_id, name) in owners {
            if self.require_extension(extension_id).is_err() {
                return Err(StoreError::Serialization(format!(
                    "{name} references missing schema extension {extension_id}"
                )));
            }
        }
        Ok(())
    }
}

/// An in-memory implementation of the schema repositories.
///
/// Data is lost when the store is dropped unless exported with
/// [`InMemorySchemaStore::snapshot`].
#[derive(Debug, Default)]
pub struct InMemorySchemaStore {
    tables: RwLock<Tables>,
}

impl InMemorySchemaStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Rebuild a store from an exported snapshot. Serials are kept and new
    /// rows continue after the highest id of each table.
    ///
    /// The snapshot is checked against the same constraints the store
    /// enforces on writes, and every kind and property must belong to an
    /// imported extension.
    pub fn from_snapshot(snapshot: SchemaSnapshot) -> StoreResult<Self> {
        let tables = Tables {
            extensions: Table::from_rows(snapshot.extensions)?,
            node_kinds: Table::from_rows(snapshot.node_kinds)?,
            edge_kinds: Table::from_rows(snapshot.edge_kinds)?,
            properties: Table::from_rows(snapshot.properties)?,
        };
        tables.check_owners()?;
        Ok(Self {
            tables: RwLock::new(tables),
        })
    }

    /// Export every table, each ordered by id.
    pub fn snapshot(&self) -> StoreResult<SchemaSnapshot> {
        let tables = self.read()?;
        Ok(SchemaSnapshot {
            extensions: tables.extensions.rows().cloned().collect(),
            node_kinds: tables.node_kinds.rows().cloned().collect(),
            edge_kinds: tables.edge_kinds.rows().cloned().collect(),
            properties: tables.properties.rows().cloned().collect(),
        })
    }

    /// Create a built-in extension, as product migrations would.
    pub fn seed_builtin_extension(
        &self,
        name: &str,
        display_name: &str,
        version: &str,
    ) -> StoreResult<GraphSchemaExtension> {
        let mut tables = self.write()?;
        tables.extensions.insert(
            GraphSchemaExtension {
                name: name.to_string(),
                display_name: display_name.to_string(),
                version: version.to_string(),
                is_builtin: true,
                ..Default::default()
            },
            Utc::now(),
        )
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|e| StoreError::LockPoisoned(e.to_string()))
    }
}

impl ExtensionRepository for InMemorySchemaStore {
    fn create_extension(
        &self,
        name: &str,
        display_name: &str,
        version: &str,
    ) -> StoreResult<GraphSchemaExtension> {
        let mut tables = self.write()?;
        let extension = tables.extensions.insert(
            GraphSchemaExtension {
                name: name.to_string(),
                display_name: display_name.to_string(),
                version: version.to_string(),
                is_builtin: false,
                ..Default::default()
            },
            Utc::now(),
        )?;
        debug!(id = extension.id(), name, "created schema extension");
        Ok(extension)
    }

    fn get_extension_by_id(&self, id: i32) -> StoreResult<GraphSchemaExtension> {
        self.read()?.extensions.get(id)
    }

    fn get_extension_by_name(&self, name: &str) -> StoreResult<Option<GraphSchemaExtension>> {
        Ok(self.read()?.extensions.find(|e| e.name == name))
    }

    fn list_extensions(&self) -> StoreResult<Vec<GraphSchemaExtension>> {
        Ok(self.read()?.extensions.list(|_| true))
    }

    fn update_extension(
        &self,
        extension: &GraphSchemaExtension,
    ) -> StoreResult<GraphSchemaExtension> {
        let mut tables = self.write()?;
        let stored = tables.extensions.get(extension.id())?;
        let row = GraphSchemaExtension {
            is_builtin: stored.is_builtin,
            ..extension.clone()
        };
        tables.extensions.update(row, Utc::now())
    }

    fn delete_extension(&self, id: i32) -> StoreResult<()> {
        let mut tables = self.write()?;
        tables.extensions.delete(id)?;
        let nodes = tables.node_kinds.delete_owned_by(id);
        let edges = tables.edge_kinds.delete_owned_by(id);
        let properties = tables.properties.delete_owned_by(id);
        debug!(id, nodes, edges, properties, "deleted schema extension");
        Ok(())
    }
}

/// Generates one member repository impl; the three member tables only
/// differ in their field and trait names.
macro_rules! impl_member_repository {
    (
        $trait:ident, $ty:ty, $field:ident,
        $create:ident, $get:ident, $list:ident, $update:ident, $delete:ident
    ) => {
        impl $trait for InMemorySchemaStore {
            fn $create(&self, row: &$ty) -> StoreResult<$ty> {
                let mut tables = self.write()?;
                tables.require_extension(row.schema_extension_id)?;
                tables.$field.insert(row.clone(), Utc::now())
            }

            fn $get(&self, id: i32) -> StoreResult<$ty> {
                self.read()?.$field.get(id)
            }

            fn $list(&self, extension_id: i32) -> StoreResult<Vec<$ty>> {
                Ok(self
                    .read()?
                    .$field
                    .list(|r| r.schema_extension_id == extension_id))
            }

            fn $update(&self, row: &$ty) -> StoreResult<$ty> {
                let mut tables = self.write()?;
                tables.require_extension(row.schema_extension_id)?;
                tables.$field.update(row.clone(), Utc::now())
            }

            fn $delete(&self, id: i32) -> StoreResult<()> {
                self.write()?.$field.delete(id).map(|_| ())
            }
        }
    };
}

impl_member_repository!(
    NodeKindRepository, GraphSchemaNodeKind, node_kinds,
    create_node_kind, get_node_kind_by_id, list_node_kinds, update_node_kind, delete_node_kind
);
impl_member_repository!(
    EdgeKindRepository, GraphSchemaEdgeKind, edge_kinds,
    create_edge_kind, get_edge_kind_by_id, list_edge_kinds, update_edge_kind, delete_edge_kind
);
impl_member_repository!(
    PropertyRepository, GraphSchemaProperty, properties,
    create_property, get_property_by_id, list_properties, update_property, delete_property
);

/// A [`KindRefresher`] that only counts refreshes.
///
/// Call [`InMemoryKindRefresher::fail_next`] to make refreshes fail, for
/// exercising callers' error paths.
#[derive(Debug, Default)]
pub struct InMemoryKindRefresher {
    refreshes: AtomicUsize,
    failing: AtomicBool,
}

impl InMemoryKindRefresher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful refreshes so far.
    pub fn refresh_count(&self) -> usize {
        self.refreshes.load(Ordering::SeqCst)
    }

    /// Make subsequent refreshes fail (`true`) or succeed (`false`).
    pub fn fail_next(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }
}

impl KindRefresher for InMemoryKindRefresher {
    fn refresh_kinds(&self) -> StoreResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(StoreError::KindRefresh("refresher configured to fail".into()));
        }
        self.refreshes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn node_kind(name: &str, extension_id: i32) -> GraphSchemaNodeKind {
        GraphSchemaNodeKind {
            name: name.to_string(),
            schema_extension_id: extension_id,
            display_name: format!("{name} display"),
            ..Default::default()
        }
    }

    fn edge_kind(name: &str, extension_id: i32) -> GraphSchemaEdgeKind {
        GraphSchemaEdgeKind {
            name: name.to_string(),
            schema_extension_id: extension_id,
            is_traversable: true,
            ..Default::default()
        }
    }

    fn property(name: &str, extension_id: i32) -> GraphSchemaProperty {
        GraphSchemaProperty {
            name: name.to_string(),
            schema_extension_id: extension_id,
            data_type: "string".into(),
            ..Default::default()
        }
    }

    // ---- Extensions ----

    #[test]
    fn create_and_read_extension() {
        let store = InMemorySchemaStore::new();
        let ext = store.create_extension("ext", "Extension", "1.0.0").unwrap();

        assert!(ext.serial.is_persisted());
        assert!(!ext.is_builtin);
        assert_eq!(store.get_extension_by_id(ext.id()).unwrap(), ext);
        assert_eq!(store.get_extension_by_name("ext").unwrap(), Some(ext));
        assert_eq!(store.get_extension_by_name("nope").unwrap(), None);
    }

    #[test]
    fn duplicate_extension_name_rejected() {
        let store = InMemorySchemaStore::new();
        store.create_extension("ext", "A", "1").unwrap();

        let err = store.create_extension("ext", "B", "2").unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName { .. }));
    }

    #[test]
    fn update_extension_keeps_builtin_flag_and_created_at() {
        let store = InMemorySchemaStore::new();
        let builtin = store.seed_builtin_extension("core", "Core", "1").unwrap();

        let mut changed = builtin.clone();
        changed.version = "2".into();
        changed.is_builtin = false;
        let updated = store.update_extension(&changed).unwrap();

        assert!(updated.is_builtin);
        assert_eq!(updated.version, "2");
        assert_eq!(updated.serial.created_at, builtin.serial.created_at);
    }

    #[test]
    fn update_missing_extension_is_not_found() {
        let store = InMemorySchemaStore::new();
        let ghost = GraphSchemaExtension {
            name: "ghost".into(),
            ..Default::default()
        };
        let err = store.update_extension(&ghost).unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn delete_extension_cascades() {
        let store = InMemorySchemaStore::new();
        let ext = store.create_extension("ext", "Ext", "1").unwrap();
        let other = store.create_extension("other", "Other", "1").unwrap();
        store.create_node_kind(&node_kind("User", ext.id())).unwrap();
        store.create_edge_kind(&edge_kind("Owns", ext.id())).unwrap();
        store.create_property(&property("email", ext.id())).unwrap();
        store.create_node_kind(&node_kind("Group", other.id())).unwrap();

        store.delete_extension(ext.id()).unwrap();

        assert!(store.list_node_kinds(ext.id()).unwrap().is_empty());
        assert!(store.list_edge_kinds(ext.id()).unwrap().is_empty());
        assert!(store.list_properties(ext.id()).unwrap().is_empty());
        assert_eq!(store.list_node_kinds(other.id()).unwrap().len(), 1);
        assert_eq!(store.list_extensions().unwrap(), vec![other]);
    }

    // ---- Kinds and properties ----

    #[test]
    fn create_kind_requires_extension() {
        let store = InMemorySchemaStore::new();
        let err = store.create_node_kind(&node_kind("User", 99)).unwrap_err();
        assert_eq!(err, StoreError::ExtensionNotFound(99));
    }

    #[test]
    fn node_kind_names_are_global() {
        let store = InMemorySchemaStore::new();
        let a = store.create_extension("a", "A", "1").unwrap();
        let b = store.create_extension("b", "B", "1").unwrap();
        store.create_node_kind(&node_kind("User", a.id())).unwrap();

        let err = store.create_node_kind(&node_kind("User", b.id())).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName { table: "schema node kind", .. }));
    }

    #[test]
    fn property_names_are_per_extension() {
        let store = InMemorySchemaStore::new();
        let a = store.create_extension("a", "A", "1").unwrap();
        let b = store.create_extension("b", "B", "1").unwrap();

        store.create_property(&property("email", a.id())).unwrap();
        store.create_property(&property("email", b.id())).unwrap();
        assert!(store.create_property(&property("email", a.id())).is_err());
    }

    #[test]
    fn create_ignores_incoming_serial() {
        let store = InMemorySchemaStore::new();
        let ext = store.create_extension("ext", "Ext", "1").unwrap();
        let mut kind = edge_kind("Owns", ext.id());
        kind.serial.id = 500;

        let created = store.create_edge_kind(&kind).unwrap();
        assert_eq!(created.serial.id, 1);
    }

    #[test]
    fn update_and_delete_node_kind() {
        let store = InMemorySchemaStore::new();
        let ext = store.create_extension("ext", "Ext", "1").unwrap();
        let mut kind = store.create_node_kind(&node_kind("User", ext.id())).unwrap();

        kind.icon = "user".into();
        let updated = store.update_node_kind(&kind).unwrap();
        assert_eq!(store.get_node_kind_by_id(kind.serial.id).unwrap(), updated);

        store.delete_node_kind(kind.serial.id).unwrap();
        let err = store.delete_node_kind(kind.serial.id).unwrap_err();
        assert_eq!(
            err,
            StoreError::NotFound {
                table: "schema node kind",
                id: kind.serial.id
            }
        );
    }

    #[test]
    fn update_into_existing_name_rejected() {
        let store = InMemorySchemaStore::new();
        let ext = store.create_extension("ext", "Ext", "1").unwrap();
        store.create_edge_kind(&edge_kind("Owns", ext.id())).unwrap();
        let mut second = store.create_edge_kind(&edge_kind("Admins", ext.id())).unwrap();

        second.name = "Owns".into();
        assert!(matches!(
            store.update_edge_kind(&second).unwrap_err(),
            StoreError::DuplicateName { .. }
        ));
    }

    #[test]
    fn list_is_filtered_and_ordered() {
        let store = InMemorySchemaStore::new();
        let a = store.create_extension("a", "A", "1").unwrap();
        let b = store.create_extension("b", "B", "1").unwrap();
        store.create_property(&property("z", a.id())).unwrap();
        store.create_property(&property("y", b.id())).unwrap();
        store.create_property(&property("x", a.id())).unwrap();

        let names: Vec<String> = store
            .list_properties(a.id())
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["z", "x"]);
    }

    // ---- Snapshots ----

    #[test]
    fn snapshot_round_trip_preserves_serials_and_counters() {
        let store = InMemorySchemaStore::new();
        let ext = store.create_extension("ext", "Ext", "1").unwrap();
        let kind = store.create_node_kind(&node_kind("User", ext.id())).unwrap();

        let json = serde_json::to_string(&store.snapshot().unwrap()).unwrap();
        let restored =
            InMemorySchemaStore::from_snapshot(serde_json::from_str(&json).unwrap()).unwrap();

        assert_eq!(restored.get_node_kind_by_id(kind.serial.id).unwrap(), kind);
        let next = restored.create_node_kind(&node_kind("Group", ext.id())).unwrap();
        assert_eq!(next.serial.id, kind.serial.id + 1);
    }

    #[test]
    fn snapshot_with_max_id_refuses_new_rows() {
        let snapshot: SchemaSnapshot = serde_json::from_str(
            r#"{ "extensions": [ { "serial": { "id": 2147483647 }, "name": "ext" } ] }"#,
        )
        .unwrap();
        let store = InMemorySchemaStore::from_snapshot(snapshot).unwrap();

        let err = store.create_extension("other", "Other", "1").unwrap_err();
        assert_eq!(err, StoreError::IdsExhausted { table: "schema extension" });
        assert_eq!(store.list_extensions().unwrap().len(), 1);
    }

    #[test]
    fn snapshot_rows_without_ids_rejected() {
        let snapshot: SchemaSnapshot = serde_json::from_str(
            r#"{ "extensions": [ { "name": "a" }, { "name": "b" } ] }"#,
        )
        .unwrap();
        let err = InMemorySchemaStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(_)));
    }

    #[test]
    fn snapshot_with_duplicate_kind_names_rejected() {
        let snapshot: SchemaSnapshot = serde_json::from_str(
            r#"{
                "extensions": [
                    { "serial": { "id": 1 }, "name": "a" },
                    { "serial": { "id": 2 }, "name": "b" }
                ],
                "node_kinds": [
                    { "serial": { "id": 1 }, "name": "User", "schema_extension_id": 1 },
                    { "serial": { "id": 2 }, "name": "User", "schema_extension_id": 2 }
                ]
            }"#,
        )
        .unwrap();
        let err = InMemorySchemaStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, StoreError::DuplicateName { ref name, .. } if name == "User"));
    }

    #[test]
    fn snapshot_with_orphan_kind_rejected() {
        let snapshot: SchemaSnapshot = serde_json::from_str(
            r#"{
                "edge_kinds": [
                    { "serial": { "id": 1 }, "name": "MemberOf", "schema_extension_id": 9 }
                ]
            }"#,
        )
        .unwrap();
        let err = InMemorySchemaStore::from_snapshot(snapshot).unwrap_err();
        assert!(matches!(err, StoreError::Serialization(ref msg) if msg.contains("MemberOf")));
    }

    // ---- Refresher ----

    #[test]
    fn refresher_counts_and_fails_on_demand() {
        let refresher = InMemoryKindRefresher::new();
        refresher.refresh_kinds().unwrap();
        assert_eq!(refresher.refresh_count(), 1);

        refresher.fail_next(true);
        assert!(matches!(
            refresher.refresh_kinds().unwrap_err(),
            StoreError::KindRefresh(_)
        ));
        assert_eq!(refresher.refresh_count(), 1);
    }
}
