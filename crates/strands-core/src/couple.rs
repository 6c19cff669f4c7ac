//! Couple index: ordered node pairs and the edges between them

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashMap};

use crate::attr::AttrValue;
use crate::edge::EdgeStore;
use crate::error::{Error, Result};
use crate::ids::{CoupleKey, EdgeId, NodeIndex};

/// Fold applied to a numeric attribute across edges
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Reducer {
    Sum,
    Count,
    Mean,
    Min,
    Max,
}

impl Reducer {
    /// Fold a stream of values
    ///
    /// `Sum` and `Count` of nothing are zero; `Mean`, `Min` and `Max` of
    /// nothing are `None`.
    pub fn fold(self, values: impl IntoIterator<Item = f64>) -> Option<f64> {
        let mut count = 0usize;
        let mut sum = 0.0;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for v in values {
            count += 1;
            sum += v;
            min = min.min(v);
            max = max.max(v);
        }
        match self {
            Self::Sum => Some(sum),
            Self::Count => Some(count as f64),
            _ if count == 0 => None,
            Self::Mean => Some(sum / count as f64),
            Self::Min => Some(min),
            Self::Max => Some(max),
        }
    }

    /// Fold attribute values read from edges, rejecting non-numeric ones
    ///
    /// When every value is an `Int`, `Sum` and `Mean` total exactly and
    /// round to `f64` once, so integer amounts past 2^53 do not drift.
    pub fn fold_attributes<'a>(
        self,
        attribute: &str,
        values: impl IntoIterator<Item = (EdgeId, &'a AttrValue)>,
    ) -> Result<Option<f64>> {
        let mut numbers = Vec::new();
        let mut exact: Option<i128> = Some(0);
        for (id, value) in values {
            let number = value.as_f64().ok_or_else(|| {
                Error::MalformedInput(format!(
                    "attribute '{}' of edge {} is {}, not a number",
                    attribute,
                    id,
                    value.type_name()
                ))
            })?;
            exact = match value {
                AttrValue::Int(v) => exact.map(|total| total + i128::from(*v)),
                _ => None,
            };
            numbers.push(number);
        }
        let count = numbers.len();
        Ok(match (self, exact) {
            (Self::Sum, Some(total)) => Some(total as f64),
            (Self::Mean, Some(total)) if count > 0 => Some(total as f64 / count as f64),
            _ => self.fold(numbers),
        })
    }
}

/// Tracks every couple with at least one edge
///
/// Holds edge ids only; edge payloads stay in the [`EdgeStore`].
#[derive(Debug, Clone, Default)]
pub struct CoupleIndex {
    couples: BTreeMap<CoupleKey, Vec<EdgeId>>,
    // source -> destinations
    outgoing: HashMap<NodeIndex, BTreeSet<NodeIndex>>,
    // destination -> sources
    incoming: HashMap<NodeIndex, BTreeSet<NodeIndex>>,
}

impl CoupleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of couples
    pub fn len(&self) -> usize {
        self.couples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.couples.is_empty()
    }

    pub fn contains(&self, key: &CoupleKey) -> bool {
        self.couples.contains_key(key)
    }

    /// Record `edge` under `key`, creating the couple on its first edge
    pub fn link(&mut self, key: CoupleKey, edge: EdgeId) {
        let edges = self.couples.entry(key).or_insert_with(|| {
            tracing::trace!("New couple {}", key);
            Vec::new()
        });
        if edges.is_empty() {
            self.outgoing
                .entry(key.source)
                .or_default()
                .insert(key.destination);
            self.incoming
                .entry(key.destination)
                .or_default()
                .insert(key.source);
        }
        edges.push(edge);
    }

    /// Edge ids of a couple in insertion order
    pub fn edge_ids_of(&self, key: &CoupleKey) -> Result<&[EdgeId]> {
        self.couples
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| couple_missing(*key))
    }

    /// Drop one edge reference; returns true when the couple went away with it
    pub fn remove_edge(&mut self, key: &CoupleKey, edge: EdgeId) -> Result<bool> {
        let edges = self.couples.get_mut(key).ok_or_else(|| couple_missing(*key))?;
        let pos = edges
            .iter()
            .position(|e| *e == edge)
            .ok_or(Error::EdgeNotFound(edge))?;
        edges.remove(pos);
        if edges.is_empty() {
            self.forget(key);
            return Ok(true);
        }
        Ok(false)
    }

    /// Drop a whole couple, returning the ids it held
    pub fn remove_couple(&mut self, key: &CoupleKey) -> Result<Vec<EdgeId>> {
        if !self.couples.contains_key(key) {
            return Err(couple_missing(*key));
        }
        Ok(self.forget(key))
    }

    /// Remove every couple where `node` is source or destination
    pub fn remove_node_edges(&mut self, node: NodeIndex) -> Vec<(CoupleKey, EdgeId)> {
        let mut keys: BTreeSet<CoupleKey> = BTreeSet::new();
        if let Some(destinations) = self.outgoing.get(&node) {
            keys.extend(destinations.iter().map(|d| CoupleKey::new(node, *d)));
        }
        if let Some(sources) = self.incoming.get(&node) {
            keys.extend(sources.iter().map(|s| CoupleKey::new(*s, node)));
        }

        let mut removed = Vec::new();
        for key in keys {
            for edge in self.forget(&key) {
                removed.push((key, edge));
            }
        }
        removed
    }

    /// Fold a numeric attribute over the edges of one couple
    ///
    /// Only this couple's edges are read. Edges without the attribute are
    /// skipped; a non-numeric value is rejected.
    pub fn aggregate(
        &self,
        key: &CoupleKey,
        attribute: &str,
        reducer: Reducer,
        store: &EdgeStore,
    ) -> Result<Option<f64>> {
        let mut values = Vec::new();
        for id in self.edge_ids_of(key)? {
            if let Some(value) = store.get(*id)?.attributes.get(attribute) {
                values.push((*id, value));
            }
        }
        reducer.fold_attributes(attribute, values)
    }

    /// Destinations reachable from `node` by one couple
    pub fn successors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.outgoing.get(&node).into_iter().flatten().copied()
    }

    /// Sources pointing at `node` by one couple
    pub fn predecessors(&self, node: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.incoming.get(&node).into_iter().flatten().copied()
    }

    /// Number of edges leaving `node`
    pub fn out_edge_count(&self, node: NodeIndex) -> usize {
        self.successors(node)
            .map(|d| self.edge_count(&CoupleKey::new(node, d)))
            .sum()
    }

    /// Number of edges entering `node`
    pub fn in_edge_count(&self, node: NodeIndex) -> usize {
        self.predecessors(node)
            .map(|s| self.edge_count(&CoupleKey::new(s, node)))
            .sum()
    }

    /// Number of edges in a couple, zero when absent
    pub fn edge_count(&self, key: &CoupleKey) -> usize {
        self.couples.get(key).map_or(0, Vec::len)
    }

    /// Couples in key order with their edge ids
    pub fn iter(&self) -> impl Iterator<Item = (&CoupleKey, &[EdgeId])> + '_ {
        self.couples.iter().map(|(k, v)| (k, v.as_slice()))
    }

    pub fn clear(&mut self) {
        self.couples.clear();
        self.outgoing.clear();
        self.incoming.clear();
    }

    fn forget(&mut self, key: &CoupleKey) -> Vec<EdgeId> {
        let edges = self.couples.remove(key).unwrap_or_default();
        if let Some(set) = self.outgoing.get_mut(&key.source) {
            set.remove(&key.destination);
            if set.is_empty() {
                self.outgoing.remove(&key.source);
            }
        }
        if let Some(set) = self.incoming.get_mut(&key.destination) {
            set.remove(&key.source);
            if set.is_empty() {
                self.incoming.remove(&key.destination);
            }
        }
        edges
    }
}

fn couple_missing(key: CoupleKey) -> Error {
    Error::couple_not_found(&key.source, &key.destination)
}
