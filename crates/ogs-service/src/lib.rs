//! Graph schema extension upsert.
//!
//! [`OpenGraphSchemaService`] takes a desired [`GraphSchema`](ogs_types::GraphSchema),
//! creates or updates its extension, and reconciles the extension's node
//! kinds, edge kinds and properties through the diff engine in `ogs-diff`.
//! Records are matched by name; matched records keep their stored serial.
//!
//! # Modules
//!
//! - [`service`] -- The upsert flow and schema validation
//! - [`plan`] -- [`SchemaPlan`] (a dry-run diff) and [`UpsertReport`]
//! - [`config`] -- [`ServiceConfig`], loadable from TOML
//! - [`error`] -- Error types for the service and its configuration

pub mod config;
pub mod error;
pub mod plan;
pub mod service;

pub use config::ServiceConfig;
pub use error::{ConfigError, ServiceError, ServiceResult};
pub use plan::{ApplyStats, SchemaPlan, UpsertReport};
pub use service::{validate_graph_schema, OpenGraphSchemaService};
