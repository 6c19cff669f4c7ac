//! Attribute aggregation and degree centrality

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use strands_core::{Direction, Error, GraphView, Reducer, Result};

/// Aggregate of one couple
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoupleTotal<L> {
    pub source: L,
    pub destination: L,
    pub value: Option<f64>,
}

/// Money-in / money-out style totals for one node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NodeFlow<L> {
    pub label: L,
    pub inflow: f64,
    pub outflow: f64,
}

impl<L> NodeFlow<L> {
    /// Inflow minus outflow
    pub fn net(&self) -> f64 {
        self.inflow - self.outflow
    }
}

/// Reduce `attribute` over each couple, in order of each couple's first edge
pub fn couple_totals<G: GraphView>(
    graph: &G,
    attribute: &str,
    reducer: Reducer,
) -> Result<Vec<CoupleTotal<G::Label>>> {
    let mut seen: HashSet<(G::Label, G::Label)> = HashSet::new();
    let mut totals = Vec::new();
    for id in graph.edge_ids() {
        let (source, destination) = graph.edge_endpoints(id)?;
        if !seen.insert((source.clone(), destination.clone())) {
            continue;
        }
        let value = graph.couple_aggregate(&source, &destination, attribute, reducer)?;
        totals.push(CoupleTotal {
            source,
            destination,
            value,
        });
    }
    tracing::debug!("Aggregated '{}' over {} couples", attribute, totals.len());
    Ok(totals)
}

/// Sum `attribute` into and out of every node with one pass over all edges
///
/// Nodes come back in creation order. A loop adds to both sides of its
/// node.
pub fn node_flows<G: GraphView>(graph: &G, attribute: &str) -> Result<Vec<NodeFlow<G::Label>>> {
    let mut flows: Vec<NodeFlow<G::Label>> = graph
        .node_labels()
        .into_iter()
        .map(|label| NodeFlow {
            label,
            inflow: 0.0,
            outflow: 0.0,
        })
        .collect();
    let position: HashMap<G::Label, usize> = flows
        .iter()
        .enumerate()
        .map(|(i, f)| (f.label.clone(), i))
        .collect();

    for id in graph.edge_ids() {
        let Some(value) = graph.edge_attribute(id, attribute)? else {
            continue;
        };
        let amount = value.as_f64().ok_or_else(|| {
            Error::MalformedInput(format!(
                "attribute '{}' of edge {} is {}, not a number",
                attribute,
                id,
                value.type_name()
            ))
        })?;
        let (source, destination) = graph.edge_endpoints(id)?;
        let s = *position
            .get(&source)
            .ok_or_else(|| Error::node_not_found(&source))?;
        let d = *position
            .get(&destination)
            .ok_or_else(|| Error::node_not_found(&destination))?;
        flows[s].outflow += amount;
        flows[d].inflow += amount;
    }
    Ok(flows)
}

/// Share of the other nodes each node is linked to, by total degree
///
/// Parallel edges count individually, so values above 1.0 are possible in
/// a multigraph. Graphs with fewer than two nodes score 0.0.
pub fn degree_centrality<G: GraphView>(graph: &G) -> Result<Vec<(G::Label, f64)>> {
    let labels = graph.node_labels();
    let others = labels.len().saturating_sub(1);
    labels
        .into_iter()
        .map(|label| {
            let degree = graph.degree(&label, Direction::Both)?;
            let score = if others == 0 {
                0.0
            } else {
                degree as f64 / others as f64
            };
            Ok((label, score))
        })
        .collect()
}

/// Number of nodes per degree value
pub fn degree_distribution<G: GraphView>(
    graph: &G,
    direction: Direction,
) -> Result<BTreeMap<usize, usize>> {
    let mut histogram = BTreeMap::new();
    for label in graph.node_labels() {
        *histogram.entry(graph.degree(&label, direction)?).or_insert(0) += 1;
    }
    Ok(histogram)
}
