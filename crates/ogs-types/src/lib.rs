//! Foundation types for OpenGraph schema synchronization.
//!
//! This crate provides the persisted model of a graph schema extension. Every
//! other `ogs` crate depends on `ogs-types`.
//!
//! # Key Types
//!
//! - [`Serial`] -- Row identity and timestamps assigned by the store
//! - [`GraphSchemaExtension`] -- A named, versioned bundle of kinds
//! - [`GraphSchemaNodeKind`] / [`GraphSchemaEdgeKind`] -- Graph kinds owned by an extension
//! - [`GraphSchemaProperty`] -- A typed property owned by an extension
//! - [`GraphSchema`] -- An extension together with all of its kinds and properties
//! - [`Named`] -- Keying trait used to build name-keyed maps for diffing

pub mod named;
pub mod schema;
pub mod serial;

pub use named::{keyed_on_name, Named};
pub use schema::{
    ExtensionMember, GraphSchema, GraphSchemaEdgeKind, GraphSchemaExtension,
    GraphSchemaNodeKind, GraphSchemaProperty,
};
pub use serial::Serial;
