use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration for [`OpenGraphSchemaService`](crate::OpenGraphSchemaService).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Reject schemas that declare no node kinds.
    pub require_node_kinds: bool,
    /// Refresh the graph-side kind maps after a successful upsert.
    pub refresh_kinds: bool,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            require_node_kinds: true,
            refresh_kinds: true,
        }
    }
}

impl ServiceConfig {
    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Read and parse a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }
}
