//! Graph schema records.
//!
//! A [`GraphSchemaExtension`] owns a set of node kinds, edge kinds and
//! properties. Each owned record carries the id of its extension in
//! `schema_extension_id`; the store assigns that id, so desired-state records
//! usually arrive with it unset and are bound to the extension during upsert.

use serde::{Deserialize, Serialize};

use crate::named::Named;
use crate::serial::Serial;

/// A named, versioned bundle of graph kinds and properties.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSchemaExtension {
    pub serial: Serial,
    pub name: String,
    pub display_name: String,
    pub version: String,
    /// Built-in extensions ship with the product and cannot be modified.
    pub is_builtin: bool,
}

impl GraphSchemaExtension {
    pub fn id(&self) -> i32 {
        self.serial.id
    }
}

/// A node kind contributed by an extension.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSchemaNodeKind {
    pub serial: Serial,
    pub name: String,
    pub schema_extension_id: i32,
    pub display_name: String,
    pub description: String,
    pub is_display_kind: bool,
    pub icon: String,
    pub icon_color: String,
}

/// An edge kind contributed by an extension.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSchemaEdgeKind {
    pub serial: Serial,
    pub name: String,
    pub schema_extension_id: i32,
    pub description: String,
    pub is_traversable: bool,
}

/// A typed property contributed by an extension.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSchemaProperty {
    pub serial: Serial,
    pub name: String,
    pub schema_extension_id: i32,
    pub display_name: String,
    pub data_type: String,
    pub description: String,
}

/// Common access to the records owned by an extension.
pub trait ExtensionMember: Named {
    fn serial(&self) -> &Serial;
    fn serial_mut(&mut self) -> &mut Serial;
    fn schema_extension_id(&self) -> i32;
    fn set_schema_extension_id(&mut self, extension_id: i32);

    fn id(&self) -> i32 {
        self.serial().id
    }
}

macro_rules! impl_extension_member {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl Named for $ty {
                fn name(&self) -> &str {
                    &self.name
                }
            }

            impl ExtensionMember for $ty {
                fn serial(&self) -> &Serial {
                    &self.serial
                }

                fn serial_mut(&mut self) -> &mut Serial {
                    &mut self.serial
                }

                fn schema_extension_id(&self) -> i32 {
                    self.schema_extension_id
                }

                fn set_schema_extension_id(&mut self, extension_id: i32) {
                    self.schema_extension_id = extension_id;
                }
            }
        )+
    };
}

impl_extension_member!(GraphSchemaNodeKind, GraphSchemaEdgeKind, GraphSchemaProperty);

impl Named for GraphSchemaExtension {
    fn name(&self) -> &str {
        &self.name
    }
}

/// An extension together with everything it owns.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphSchema {
    pub extension: GraphSchemaExtension,
    pub node_kinds: Vec<GraphSchemaNodeKind>,
    pub edge_kinds: Vec<GraphSchemaEdgeKind>,
    pub properties: Vec<GraphSchemaProperty>,
}
