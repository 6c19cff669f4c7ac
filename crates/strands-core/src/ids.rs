//! Identifiers for nodes, edges and couples

use serde::{Deserialize, Serialize};

/// Internal index of a node, allocated once and never reused
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct NodeIndex(u64);

impl NodeIndex {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }

    pub(crate) fn slot(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "n{}", self.0)
    }
}

/// Identifier of a single edge record
///
/// Ids grow with insertion, so comparing two ids compares creation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EdgeId(u64);

impl EdgeId {
    pub fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub fn as_raw(&self) -> u64 {
        self.0
    }

    pub(crate) fn slot(&self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for EdgeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "e{}", self.0)
    }
}

/// Ordered (source, destination) pair; distinct from its reverse
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CoupleKey {
    pub source: NodeIndex,
    pub destination: NodeIndex,
}

impl CoupleKey {
    pub fn new(source: NodeIndex, destination: NodeIndex) -> Self {
        Self {
            source,
            destination,
        }
    }

    /// The same pair with direction flipped
    pub fn reversed(&self) -> Self {
        Self::new(self.destination, self.source)
    }

    pub fn is_loop(&self) -> bool {
        self.source == self.destination
    }

    pub fn touches(&self, node: NodeIndex) -> bool {
        self.source == node || self.destination == node
    }
}

impl std::fmt::Display for CoupleKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({} -> {})", self.source, self.destination)
    }
}
