//! Read-only graph access for analysis code

use std::fmt::Debug;
use std::hash::Hash;

use crate::attr::AttrValue;
use crate::couple::Reducer;
use crate::error::Result;
use crate::graph::{Direction, Multigraph};
use crate::ids::EdgeId;

/// The read surface algorithms are written against
///
/// Labels are returned owned so implementations are free to compute them.
/// Every lookup by label or id fails with a not-found error rather than
/// returning an empty result.
pub trait GraphView {
    type Label: Clone + Eq + Hash + Debug;

    /// All labels in node creation order
    fn node_labels(&self) -> Vec<Self::Label>;

    fn contains_node(&self, label: &Self::Label) -> bool;

    fn degree(&self, label: &Self::Label, direction: Direction) -> Result<usize>;

    /// Deduplicated labels one edge away
    fn neighbors(&self, label: &Self::Label, direction: Direction) -> Result<Vec<Self::Label>>;

    fn has_couple(&self, source: &Self::Label, destination: &Self::Label) -> bool;

    /// Edge ids of one couple in insertion order
    fn couple_edge_ids(&self, source: &Self::Label, destination: &Self::Label)
        -> Result<Vec<EdgeId>>;

    fn edge_endpoints(&self, id: EdgeId) -> Result<(Self::Label, Self::Label)>;

    fn edge_attribute(&self, id: EdgeId, name: &str) -> Result<Option<AttrValue>>;

    /// All edge ids in creation order
    fn edge_ids(&self) -> Vec<EdgeId>;

    /// Fold a numeric attribute over one couple
    ///
    /// The default reads each edge of the couple through
    /// [`GraphView::edge_attribute`].
    fn couple_aggregate(
        &self,
        source: &Self::Label,
        destination: &Self::Label,
        attribute: &str,
        reducer: Reducer,
    ) -> Result<Option<f64>> {
        let mut values = Vec::new();
        for id in self.couple_edge_ids(source, destination)? {
            if let Some(value) = self.edge_attribute(id, attribute)? {
                values.push((id, value));
            }
        }
        reducer.fold_attributes(attribute, values.iter().map(|(id, v)| (*id, v)))
    }
}

impl<L> GraphView for Multigraph<L>
where
    L: Clone + Eq + Hash + Debug,
{
    type Label = L;

    fn node_labels(&self) -> Vec<L> {
        self.nodes().map(|n| n.label.clone()).collect()
    }

    fn contains_node(&self, label: &L) -> bool {
        self.has_node(label)
    }

    fn degree(&self, label: &L, direction: Direction) -> Result<usize> {
        Multigraph::degree(self, label, direction)
    }

    fn neighbors(&self, label: &L, direction: Direction) -> Result<Vec<L>> {
        Ok(Multigraph::neighbors(self, label, direction)?
            .into_iter()
            .cloned()
            .collect())
    }

    fn has_couple(&self, source: &L, destination: &L) -> bool {
        Multigraph::has_couple(self, source, destination)
    }

    fn couple_edge_ids(&self, source: &L, destination: &L) -> Result<Vec<EdgeId>> {
        let key = self.couple_key(source, destination)?;
        Ok(self.couples.edge_ids_of(&key)?.to_vec())
    }

    fn edge_endpoints(&self, id: EdgeId) -> Result<(L, L)> {
        let edge = self.edge(id)?;
        Ok((edge.source.clone(), edge.destination.clone()))
    }

    fn edge_attribute(&self, id: EdgeId, name: &str) -> Result<Option<AttrValue>> {
        Ok(self.edges.get(id)?.attributes.get(name).cloned())
    }

    fn edge_ids(&self) -> Vec<EdgeId> {
        self.edges.iter().map(|(id, _)| id).collect()
    }

    fn couple_aggregate(
        &self,
        source: &L,
        destination: &L,
        attribute: &str,
        reducer: Reducer,
    ) -> Result<Option<f64>> {
        self.aggregate(source, destination, attribute, reducer)
    }
}
