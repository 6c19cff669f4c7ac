//! The multigraph aggregate root

use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::collections::BTreeSet;
use std::fmt::Debug;
use std::hash::Hash;

use crate::attr::Attributes;
use crate::config::GraphConfig;
use crate::couple::{CoupleIndex, Reducer};
use crate::edge::{EdgeRecord, EdgeStore, Order};
use crate::error::{Error, Result};
use crate::ids::{CoupleKey, EdgeId, NodeIndex};
use crate::ingest::EdgeView;
use crate::registry::NodeRegistry;
use crate::time::Timestamp;

/// Which incident edges of a node to consider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Outgoing,
    Incoming,
    Both,
}

/// Read-only snapshot of the graph's counts and shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Summary {
    pub node_count: usize,
    pub couple_count: usize,
    pub edge_count: usize,
    pub multi: bool,
    pub pseudo: bool,
    pub complete: bool,
}

impl std::fmt::Display for Summary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.complete {
            f.write_str("Complete ")?;
        }
        if self.pseudo {
            f.write_str("Pseudo ")?;
        }
        if self.multi {
            f.write_str("Multi ")?;
        }
        write!(
            f,
            "Directed Graph with {}, {} and {}",
            counted(self.node_count, "node"),
            counted(self.couple_count, "couple"),
            counted(self.edge_count, "edge")
        )
    }
}

fn counted(n: usize, noun: &str) -> String {
    if n == 1 {
        format!("1 {}", noun)
    } else {
        format!("{} {}s", n, noun)
    }
}

/// In-memory directed multigraph
///
/// Nodes are addressed by label, edges by [`EdgeId`]. Any number of
/// parallel edges may join the same ordered pair of nodes (a couple), and
/// every edge carries a [`Timestamp`] plus free-form [`Attributes`].
///
/// ```
/// use strands_core::{attrs, Multigraph, Reducer, Timestamp};
///
/// let mut graph: Multigraph = Multigraph::new();
/// let day = |s| Timestamp::parse(s).unwrap();
/// graph.add_edge("Alex", "Victoria", day("2024-05-17"), attrs([("amount", 1800.into())])).unwrap();
/// graph.add_edge("Robert", "Victoria", day("2024-09-23"), attrs([("amount", 2100.into())])).unwrap();
/// graph.add_edge("Robert", "Victoria", day("2024-11-26"), attrs([("amount", 1200.into())])).unwrap();
///
/// assert_eq!(graph.describe().to_string(), "Multi Directed Graph with 3 nodes, 2 couples and 3 edges");
/// assert_eq!(graph.aggregate("Robert", "Victoria", "amount", Reducer::Sum).unwrap(), Some(3300.0));
/// ```
#[derive(Debug, Clone)]
pub struct Multigraph<L = String> {
    pub(crate) config: GraphConfig,
    pub(crate) nodes: NodeRegistry<L>,
    pub(crate) couples: CoupleIndex,
    pub(crate) edges: EdgeStore,
}

impl<L> Default for Multigraph<L> {
    fn default() -> Self {
        Self {
            config: GraphConfig::default(),
            nodes: NodeRegistry::default(),
            couples: CoupleIndex::default(),
            edges: EdgeStore::default(),
        }
    }
}

/// Value equality over nodes and edges in creation order
///
/// Labels, attributes and timestamps must match; edge ids and the
/// configuration are not compared.
impl<L> PartialEq for Multigraph<L>
where
    L: Clone + Eq + Hash + Debug,
{
    fn eq(&self, other: &Self) -> bool {
        self.node_count() == other.node_count()
            && self.edge_count() == other.edge_count()
            && self
                .nodes()
                .map(|n| (n.label, n.attributes))
                .eq(other.nodes().map(|n| (n.label, n.attributes)))
            && self
                .edges()
                .map(|e| (e.source, e.destination, e.timestamp, e.attributes))
                .eq(other
                    .edges()
                    .map(|e| (e.source, e.destination, e.timestamp, e.attributes)))
    }
}

impl<L> Multigraph<L>
where
    L: Clone + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: GraphConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn couple_count(&self) -> usize {
        self.couples.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Nodes
    // ─────────────────────────────────────────────────────────────────────────

    pub fn has_node<Q>(&self, label: &Q) -> bool
    where
        L: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.nodes.contains(label)
    }

    /// Create a node explicitly; fails if the label is taken
    pub fn add_node(&mut self, label: impl Into<L>, attributes: Attributes) -> Result<NodeIndex> {
        self.nodes.insert_new(label.into(), attributes)
    }

    pub fn node_attributes<Q>(&self, label: &Q) -> Result<&Attributes>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let idx = self.nodes.lookup(label)?;
        self.nodes.attributes_of(idx)
    }

    /// Replace the attributes of an existing node, returning the old ones
    pub fn set_node_attributes<Q>(&mut self, label: &Q, attributes: Attributes) -> Result<Attributes>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let idx = self.nodes.lookup(label)?;
        self.nodes.set_attributes(idx, attributes)
    }

    /// Remove a node together with every edge touching it
    ///
    /// Returns the ids of the removed edges.
    pub fn remove_node<Q>(&mut self, label: &Q) -> Result<Vec<EdgeId>>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let idx = self.nodes.lookup(label)?;
        let detached = self.couples.remove_node_edges(idx);
        let mut removed = Vec::with_capacity(detached.len());
        for (_, edge) in detached {
            self.edges.remove(edge)?;
            removed.push(edge);
        }
        self.nodes.remove(idx)?;

        tracing::debug!("Removed node {:?} with {} edges", label, removed.len());
        Ok(removed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Edges
    // ─────────────────────────────────────────────────────────────────────────

    /// Insert an edge, creating missing endpoints unless the graph is strict
    pub fn add_edge(
        &mut self,
        source: impl Into<L>,
        destination: impl Into<L>,
        timestamp: Timestamp,
        attributes: Attributes,
    ) -> Result<EdgeId> {
        let source = source.into();
        let destination = destination.into();
        self.check_edge(&source, &destination)?;
        Ok(self.insert_edge(source, destination, timestamp, attributes))
    }

    /// Validate an edge against the configuration without mutating
    pub(crate) fn check_edge(&self, source: &L, destination: &L) -> Result<()> {
        if !self.config.allow_loops && source == destination {
            return Err(Error::MalformedInput(format!(
                "loop on {:?} rejected: loops are disabled",
                source
            )));
        }
        if !self.config.implicit_nodes {
            self.nodes.lookup(source)?;
            self.nodes.lookup(destination)?;
        }
        Ok(())
    }

    pub(crate) fn insert_edge(
        &mut self,
        source: L,
        destination: L,
        timestamp: Timestamp,
        attributes: Attributes,
    ) -> EdgeId {
        let s = self.nodes.resolve_or_create(source);
        let d = self.nodes.resolve_or_create(destination);
        let key = CoupleKey::new(s, d);
        let id = self.edges.insert(key, timestamp, attributes);
        self.couples.link(key, id);
        tracing::trace!("Added edge {} on {}", id, key);
        id
    }

    /// Remove a single edge; on failure nothing changes
    pub fn remove_edge(&mut self, id: EdgeId) -> Result<EdgeRecord> {
        let key = self.edges.get(id)?.couple;
        self.couples.remove_edge(&key, id)?;
        self.edges.remove(id)
    }

    /// Remove every parallel edge between two nodes
    pub fn remove_couple<Q>(&mut self, source: &Q, destination: &Q) -> Result<Vec<EdgeId>>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let key = self.couple_key(source, destination)?;
        let ids = self.couples.remove_couple(&key)?;
        for id in &ids {
            self.edges.remove(*id)?;
        }
        tracing::debug!(
            "Removed couple {:?} -> {:?} with {} edges",
            source,
            destination,
            ids.len()
        );
        Ok(ids)
    }

    /// Drop every edge and couple, keeping the nodes
    pub fn clear_edges(&mut self) {
        tracing::debug!("Clearing {} edges", self.edges.len());
        self.couples.clear();
        self.edges.clear();
    }

    /// Drop everything; indices keep counting from where they were
    pub fn clear(&mut self) {
        self.clear_edges();
        self.nodes.clear();
    }

    pub fn edge(&self, id: EdgeId) -> Result<EdgeView<'_, L>> {
        let record = self.edges.get(id)?;
        Ok(EdgeView {
            id,
            source: self.nodes.label_of(record.couple.source)?,
            destination: self.nodes.label_of(record.couple.destination)?,
            timestamp: record.timestamp,
            attributes: &record.attributes,
        })
    }

    /// Edges of one couple in insertion order
    pub fn couple_edges<Q>(&self, source: &Q, destination: &Q) -> Result<Vec<EdgeView<'_, L>>>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let key = self.couple_key(source, destination)?;
        self.couples
            .edge_ids_of(&key)?
            .iter()
            .map(|id| self.edge(*id))
            .collect()
    }

    /// Fold a numeric attribute over the edges of one couple
    pub fn aggregate<Q>(
        &self,
        source: &Q,
        destination: &Q,
        attribute: &str,
        reducer: Reducer,
    ) -> Result<Option<f64>>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let key = self.couple_key(source, destination)?;
        self.couples.aggregate(&key, attribute, reducer, &self.edges)
    }

    /// Edges ordered by timestamp, ties in insertion order
    pub fn edges_by_time(&self, order: Order) -> impl Iterator<Item = EdgeView<'_, L>> + '_ {
        self.edges
            .iterate_by_time(order)
            .filter_map(move |id| self.live_edge(id))
    }

    /// View of an edge the store lists as live; its endpoints always resolve
    pub(crate) fn live_edge(&self, id: EdgeId) -> Option<EdgeView<'_, L>> {
        let view = self.edge(id);
        debug_assert!(view.is_ok(), "live edge {} has a dangling endpoint", id);
        view.ok()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Queries
    // ─────────────────────────────────────────────────────────────────────────

    /// True when at least one edge runs from `source` to `destination`
    ///
    /// Unknown labels simply have no couples.
    pub fn has_couple<Q>(&self, source: &Q, destination: &Q) -> bool
    where
        L: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        match (self.nodes.lookup(source), self.nodes.lookup(destination)) {
            (Ok(s), Ok(d)) => self.couples.contains(&CoupleKey::new(s, d)),
            _ => false,
        }
    }

    /// Number of edges at a node; a loop counts once under `Both`
    pub fn degree<Q>(&self, label: &Q, direction: Direction) -> Result<usize>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let idx = self.nodes.lookup(label)?;
        Ok(self.degree_of(idx, direction))
    }

    pub(crate) fn degree_of(&self, idx: NodeIndex, direction: Direction) -> usize {
        match direction {
            Direction::Outgoing => self.couples.out_edge_count(idx),
            Direction::Incoming => self.couples.in_edge_count(idx),
            Direction::Both => {
                let loops = self.couples.edge_count(&CoupleKey::new(idx, idx));
                self.couples.out_edge_count(idx) + self.couples.in_edge_count(idx) - loops
            }
        }
    }

    /// Labels one edge away, deduplicated, in node creation order
    pub fn neighbors<Q>(&self, label: &Q, direction: Direction) -> Result<Vec<&L>>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let idx = self.nodes.lookup(label)?;
        let mut found: BTreeSet<NodeIndex> = BTreeSet::new();
        if direction != Direction::Incoming {
            found.extend(self.couples.successors(idx));
        }
        if direction != Direction::Outgoing {
            found.extend(self.couples.predecessors(idx));
        }
        found.into_iter().map(|n| self.nodes.label_of(n)).collect()
    }

    /// Labels of nodes carrying at least one loop
    pub fn loops(&self) -> Vec<&L> {
        self.couples
            .iter()
            .filter(|(key, _)| key.is_loop())
            .filter_map(|(key, _)| self.nodes.label_of(key.source).ok())
            .collect()
    }

    /// Some couple holds parallel edges
    pub fn is_multi(&self) -> bool {
        self.couples.iter().any(|(_, ids)| ids.len() > 1)
    }

    /// Some node has a loop
    pub fn is_pseudo(&self) -> bool {
        self.couples.iter().any(|(key, _)| key.is_loop())
    }

    /// Every pair of distinct nodes is joined in at least one direction
    pub fn is_complete(&self) -> bool {
        let indices: Vec<NodeIndex> = self.nodes.iter().map(|(idx, _, _)| idx).collect();
        indices.iter().enumerate().all(|(i, a)| {
            indices[i + 1..].iter().all(|b| {
                self.couples.contains(&CoupleKey::new(*a, *b))
                    || self.couples.contains(&CoupleKey::new(*b, *a))
            })
        })
    }

    pub fn describe(&self) -> Summary {
        Summary {
            node_count: self.node_count(),
            couple_count: self.couple_count(),
            edge_count: self.edge_count(),
            multi: self.is_multi(),
            pseudo: self.is_pseudo(),
            complete: self.is_complete(),
        }
    }

    /// Copy the selected nodes and their edges into a fresh graph
    ///
    /// With `full_match` an edge is kept only when both endpoints are
    /// selected; otherwise one selected endpoint suffices and the other
    /// endpoint comes along.
    pub fn subgraph<'q, Q, I>(&self, labels: I, full_match: bool) -> Result<Self>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        let mut selected: BTreeSet<NodeIndex> = BTreeSet::new();
        for label in labels {
            selected.insert(self.nodes.lookup(label)?);
        }

        let kept: Vec<(EdgeId, &EdgeRecord)> = self
            .edges
            .iter()
            .filter(|(_, record)| {
                let s = selected.contains(&record.couple.source);
                let d = selected.contains(&record.couple.destination);
                if full_match {
                    s && d
                } else {
                    s || d
                }
            })
            .collect();

        let mut members = selected;
        for (_, record) in &kept {
            members.insert(record.couple.source);
            members.insert(record.couple.destination);
        }

        let mut sub = Self::with_config(self.config.clone());
        for idx in members {
            let label = self.nodes.label_of(idx)?.clone();
            let attributes = self.nodes.attributes_of(idx)?.clone();
            sub.nodes.insert_new(label, attributes)?;
        }
        for (_, record) in kept {
            sub.insert_edge(
                self.nodes.label_of(record.couple.source)?.clone(),
                self.nodes.label_of(record.couple.destination)?.clone(),
                record.timestamp,
                record.attributes.clone(),
            );
        }

        tracing::debug!(
            "Subgraph with {} nodes and {} edges",
            sub.node_count(),
            sub.edge_count()
        );
        Ok(sub)
    }

    pub(crate) fn couple_key<Q>(&self, source: &Q, destination: &Q) -> Result<CoupleKey>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        let s = self.nodes.lookup(source)?;
        let d = self.nodes.lookup(destination)?;
        let key = CoupleKey::new(s, d);
        if !self.couples.contains(&key) {
            return Err(Error::couple_not_found(&source, &destination));
        }
        Ok(key)
    }
}
