//! Bulk ingestion and deterministic enumeration
//!
//! Import/export collaborators talk to the graph only through this module:
//! batches of [`EdgeInput`] go in, [`NodeRecord`]s and [`EdgeView`]s come
//! out in creation order.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

use crate::attr::Attributes;
use crate::config::GraphConfig;
use crate::error::{Error, Result};
use crate::graph::Multigraph;
use crate::ids::{EdgeId, NodeIndex};
use crate::time::Timestamp;

/// An edge waiting to be inserted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EdgeInput<L> {
    pub source: L,
    pub destination: L,
    pub timestamp: Timestamp,
    #[serde(default)]
    pub attributes: Attributes,
}

impl<L> EdgeInput<L> {
    pub fn new(source: impl Into<L>, destination: impl Into<L>, timestamp: Timestamp) -> Self {
        Self {
            source: source.into(),
            destination: destination.into(),
            timestamp,
            attributes: Attributes::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// A node waiting to be created or re-attributed
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeInput<L> {
    pub label: L,
    #[serde(default)]
    pub attributes: Attributes,
}

impl<L> NodeInput<L> {
    pub fn new(label: impl Into<L>) -> Self {
        Self {
            label: label.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attributes(mut self, attributes: Attributes) -> Self {
        self.attributes = attributes;
        self
    }
}

/// Borrowed view of a live node
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NodeRecord<'a, L> {
    pub index: NodeIndex,
    pub label: &'a L,
    pub attributes: &'a Attributes,
}

impl<L: Clone> NodeRecord<'_, L> {
    pub fn to_input(&self) -> NodeInput<L> {
        NodeInput {
            label: self.label.clone(),
            attributes: self.attributes.clone(),
        }
    }
}

/// Borrowed view of a live edge with its endpoints resolved to labels
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EdgeView<'a, L> {
    pub id: EdgeId,
    pub source: &'a L,
    pub destination: &'a L,
    pub timestamp: Timestamp,
    pub attributes: &'a Attributes,
}

impl<L: Clone> EdgeView<'_, L> {
    pub fn to_input(&self) -> EdgeInput<L> {
        EdgeInput {
            source: self.source.clone(),
            destination: self.destination.clone(),
            timestamp: self.timestamp,
            attributes: self.attributes.clone(),
        }
    }
}

/// Everything needed to rebuild a graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphExport<L> {
    pub nodes: Vec<NodeInput<L>>,
    pub edges: Vec<EdgeInput<L>>,
}

impl<L> Default for GraphExport<L> {
    fn default() -> Self {
        Self {
            nodes: Vec::new(),
            edges: Vec::new(),
        }
    }
}

impl<L> Multigraph<L>
where
    L: Clone + Eq + Hash + Debug,
{
    /// Insert a batch of edges in input order
    ///
    /// The whole batch is validated first; if any edge is rejected the
    /// graph is left untouched.
    pub fn ingest(&mut self, edges: impl IntoIterator<Item = EdgeInput<L>>) -> Result<Vec<EdgeId>> {
        let batch: Vec<EdgeInput<L>> = edges.into_iter().collect();
        if let Some(max) = self.config.max_batch_edges {
            if batch.len() > max {
                return Err(Error::MalformedInput(format!(
                    "batch of {} edges exceeds the limit of {}",
                    batch.len(),
                    max
                )));
            }
        }
        for input in &batch {
            self.check_edge(&input.source, &input.destination)?;
        }

        tracing::debug!("Ingesting {} edges", batch.len());
        let ids = batch
            .into_iter()
            .map(|input| {
                self.insert_edge(
                    input.source,
                    input.destination,
                    input.timestamp,
                    input.attributes,
                )
            })
            .collect();
        Ok(ids)
    }

    /// Create nodes, or replace the attributes of nodes that already exist
    pub fn ingest_nodes(
        &mut self,
        nodes: impl IntoIterator<Item = NodeInput<L>>,
    ) -> Result<Vec<NodeIndex>> {
        let mut indices = Vec::new();
        for input in nodes {
            let idx = match self.nodes.lookup(&input.label) {
                Ok(idx) => {
                    self.nodes.set_attributes(idx, input.attributes)?;
                    idx
                }
                Err(_) => self.nodes.insert_new(input.label, input.attributes)?,
            };
            indices.push(idx);
        }
        tracing::debug!("Ingested {} nodes", indices.len());
        Ok(indices)
    }

    /// Live nodes in creation order
    pub fn nodes(&self) -> impl Iterator<Item = NodeRecord<'_, L>> + '_ {
        self.nodes
            .iter()
            .map(|(index, label, attributes)| NodeRecord {
                index,
                label,
                attributes,
            })
    }

    /// Live edges in creation order
    pub fn edges(&self) -> impl Iterator<Item = EdgeView<'_, L>> + '_ {
        self.edges.iter().filter_map(move |(id, _)| self.live_edge(id))
    }

    pub fn export(&self) -> GraphExport<L> {
        GraphExport {
            nodes: self.nodes().map(|n| n.to_input()).collect(),
            edges: self.edges().map(|e| e.to_input()).collect(),
        }
    }

    /// Rebuild a graph: nodes first, then edges in order
    pub fn from_export(export: GraphExport<L>, config: GraphConfig) -> Result<Self> {
        let mut graph = Self::with_config(config);
        graph.ingest_nodes(export.nodes)?;
        graph.ingest(export.edges)?;
        Ok(graph)
    }
}
