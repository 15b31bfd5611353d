//! Storage for graph schema extensions.
//!
//! This crate defines the repository boundary the upsert flow writes
//! through, and ships an in-memory backend that enforces the constraints of
//! the relational schema:
//!
//! - extension names are unique,
//! - node kind and edge kind names are unique across all extensions,
//! - property names are unique within their extension,
//! - deleting an extension deletes everything it owns.
//!
//! # Modules
//!
//! - [`error`] -- Error types for repository operations
//! - [`traits`] -- Repository traits, one per table, plus [`KindRefresher`]
//! - [`memory`] -- [`InMemorySchemaStore`] and [`InMemoryKindRefresher`]
//! - [`snapshot`] -- [`SchemaSnapshot`], a serializable export of all tables

pub mod error;
pub mod memory;
pub mod snapshot;
mod table;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use memory::{InMemoryKindRefresher, InMemorySchemaStore};
pub use snapshot::SchemaSnapshot;
pub use traits::{
    EdgeKindRepository, ExtensionRepository, KindRefresher, NodeKindRepository,
    PropertyRepository, SchemaRepository,
};
