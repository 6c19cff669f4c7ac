//! Graph configuration

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Behavioral switches for a [`Multigraph`](crate::Multigraph)
///
/// Loadable from TOML:
///
/// ```toml
/// implicit_nodes = false
/// allow_loops = true
/// max_batch_edges = 10000
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GraphConfig {
    /// Create unknown endpoints on edge insertion
    pub implicit_nodes: bool,

    /// Accept edges whose source equals their destination
    pub allow_loops: bool,

    /// Largest batch accepted by a single ingest call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_batch_edges: Option<usize>,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            implicit_nodes: true,
            allow_loops: true,
            max_batch_edges: None,
        }
    }
}

impl GraphConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(input: &str) -> Result<Self> {
        Ok(toml::from_str(input)?)
    }

    /// Require endpoints to exist before edges reference them
    pub fn strict_nodes(mut self) -> Self {
        self.implicit_nodes = false;
        self
    }

    pub fn without_loops(mut self) -> Self {
        self.allow_loops = false;
        self
    }

    pub fn with_max_batch_edges(mut self, max: usize) -> Self {
        self.max_batch_edges = Some(max);
        self
    }
}
