//! Node registry: label <-> index resolution

use std::borrow::Borrow;
use std::collections::HashMap;
use std::fmt::Debug;
use std::hash::Hash;

use crate::attr::Attributes;
use crate::error::{Error, Result};
use crate::ids::NodeIndex;

#[derive(Debug, Clone)]
struct NodeSlot<L> {
    label: L,
    attributes: Attributes,
}

/// Owns node identity
///
/// Indices are handed out densely and a removed node leaves a tombstone
/// behind, so an index is never reused by the same registry.
#[derive(Debug, Clone)]
pub struct NodeRegistry<L> {
    slots: Vec<Option<NodeSlot<L>>>,
    index: HashMap<L, NodeIndex>,
}

impl<L> Default for NodeRegistry<L> {
    fn default() -> Self {
        Self {
            slots: Vec::new(),
            index: HashMap::new(),
        }
    }
}

impl<L> NodeRegistry<L>
where
    L: Clone + Eq + Hash + Debug,
{
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    pub fn contains<Q>(&self, label: &Q) -> bool
    where
        L: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.index.contains_key(label)
    }

    /// Return the index for `label`, allocating one if the label is new
    pub fn resolve_or_create(&mut self, label: L) -> NodeIndex {
        if let Some(idx) = self.index.get(&label) {
            return *idx;
        }
        self.allocate(label, Attributes::new())
    }

    /// Allocate a node, failing if the label is already registered
    pub fn insert_new(&mut self, label: L, attributes: Attributes) -> Result<NodeIndex> {
        if self.index.contains_key(&label) {
            return Err(Error::DuplicateNode(format!("{:?}", label)));
        }
        Ok(self.allocate(label, attributes))
    }

    fn allocate(&mut self, label: L, attributes: Attributes) -> NodeIndex {
        let idx = NodeIndex::from_raw(self.slots.len() as u64);
        tracing::trace!("Registering node {:?} as {}", label, idx);
        self.index.insert(label.clone(), idx);
        self.slots.push(Some(NodeSlot { label, attributes }));
        idx
    }

    pub fn lookup<Q>(&self, label: &Q) -> Result<NodeIndex>
    where
        L: Borrow<Q>,
        Q: Hash + Eq + Debug + ?Sized,
    {
        self.index
            .get(label)
            .copied()
            .ok_or_else(|| Error::node_not_found(&label))
    }

    pub fn label_of(&self, idx: NodeIndex) -> Result<&L> {
        self.slot(idx).map(|slot| &slot.label)
    }

    pub fn attributes_of(&self, idx: NodeIndex) -> Result<&Attributes> {
        self.slot(idx).map(|slot| &slot.attributes)
    }

    /// Replace the attributes of an existing node, returning the old ones
    pub fn set_attributes(&mut self, idx: NodeIndex, attributes: Attributes) -> Result<Attributes> {
        let slot = self
            .slots
            .get_mut(idx.slot())
            .and_then(Option::as_mut)
            .ok_or_else(|| Error::NodeNotFound(idx.to_string()))?;
        Ok(std::mem::replace(&mut slot.attributes, attributes))
    }

    /// Drop the label mapping; edge and couple cleanup is the caller's job
    pub fn remove(&mut self, idx: NodeIndex) -> Result<(L, Attributes)> {
        let slot = self
            .slots
            .get_mut(idx.slot())
            .and_then(Option::take)
            .ok_or_else(|| Error::NodeNotFound(idx.to_string()))?;
        self.index.remove(&slot.label);
        Ok((slot.label, slot.attributes))
    }

    /// Live nodes in creation order
    pub fn iter(&self) -> impl Iterator<Item = (NodeIndex, &L, &Attributes)> + '_ {
        self.slots.iter().enumerate().filter_map(|(i, slot)| {
            slot.as_ref()
                .map(|s| (NodeIndex::from_raw(i as u64), &s.label, &s.attributes))
        })
    }

    /// Forget every node while keeping the allocation cursor
    pub fn clear(&mut self) {
        self.index.clear();
        for slot in self.slots.iter_mut() {
            *slot = None;
        }
    }

    fn slot(&self, idx: NodeIndex) -> Result<&NodeSlot<L>> {
        self.slots
            .get(idx.slot())
            .and_then(Option::as_ref)
            .ok_or_else(|| Error::NodeNotFound(idx.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attr::{attrs, AttrValue};
    use crate::error::ErrorKind;

    #[test]
    fn test_resolve_is_idempotent() {
        let mut registry: NodeRegistry<String> = NodeRegistry::new();
        let a = registry.resolve_or_create("Alex".to_string());
        let b = registry.resolve_or_create("Victoria".to_string());
        let again = registry.resolve_or_create("Alex".to_string());

        assert_eq!(a, again);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.lookup("Victoria").unwrap(), b);
        assert_eq!(registry.label_of(a).unwrap(), "Alex");
    }

    #[test]
    fn test_lookup_unknown_label() {
        let registry: NodeRegistry<String> = NodeRegistry::new();
        let err = registry.lookup("Nobody").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_indices_not_reused_after_remove() {
        let mut registry: NodeRegistry<&str> = NodeRegistry::new();
        let a = registry.resolve_or_create("a");
        registry.remove(a).unwrap();
        let a2 = registry.resolve_or_create("a");

        assert_ne!(a, a2);
        assert!(registry.label_of(a).is_err());
        assert!(registry.remove(a).unwrap_err().is_not_found());
    }

    #[test]
    fn test_insert_new_rejects_duplicates() {
        let mut registry: NodeRegistry<&str> = NodeRegistry::new();
        let idx = registry
            .insert_new("Elizabeth", attrs([("age", 19.into())]))
            .unwrap();
        let err = registry.insert_new("Elizabeth", Attributes::new()).unwrap_err();

        assert_eq!(err.kind(), ErrorKind::DuplicateNode);
        assert_eq!(registry.attributes_of(idx).unwrap()["age"], AttrValue::Int(19));
    }

    #[test]
    fn test_iter_in_creation_order() {
        let mut registry: NodeRegistry<&str> = NodeRegistry::new();
        for label in ["c", "a", "b"] {
            registry.resolve_or_create(label);
        }
        let a = registry.lookup("a").unwrap();
        registry.remove(a).unwrap();

        let labels: Vec<_> = registry.iter().map(|(_, l, _)| *l).collect();
        assert_eq!(labels, vec!["c", "b"]);
    }

    #[test]
    fn test_clear_keeps_cursor() {
        let mut registry: NodeRegistry<&str> = NodeRegistry::new();
        let first = registry.resolve_or_create("x");
        registry.clear();
        assert!(registry.is_empty());
        let second = registry.resolve_or_create("x");
        assert!(second > first);
    }
}
