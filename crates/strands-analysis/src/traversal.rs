//! Reachability by breadth-first search

use serde::{Deserialize, Serialize};
use std::collections::{HashSet, VecDeque};

use strands_core::{Direction, Error, GraphView, Result};

/// Traversal query builder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalQuery<L> {
    /// Starting node label
    pub start: L,

    /// Which edges to follow
    #[serde(default)]
    pub direction: Direction,

    /// Maximum number of hops, unbounded when `None`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_depth: Option<u32>,

    /// Stop after this many nodes were reached
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_nodes: Option<usize>,
}

impl<L> TraversalQuery<L> {
    /// Follow outgoing edges from `start` with no limits
    pub fn new(start: impl Into<L>) -> Self {
        Self {
            start: start.into(),
            direction: Direction::Outgoing,
            max_depth: None,
            max_nodes: None,
        }
    }

    pub fn with_direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    pub fn with_depth(mut self, depth: u32) -> Self {
        self.max_depth = Some(depth);
        self
    }

    pub fn with_max_nodes(mut self, max: usize) -> Self {
        self.max_nodes = Some(max);
        self
    }
}

/// Traversal statistics
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TraversalStats {
    pub nodes_expanded: usize,
    pub neighbors_examined: usize,
    pub max_depth_reached: u32,
    /// A depth or node limit cut the search short
    pub truncated: bool,
}

/// Result of a traversal
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TraversalResult<L> {
    pub start: L,

    /// Reached labels in discovery order
    pub visited: Vec<L>,

    pub stats: TraversalStats,
}

impl<L> TraversalResult<L> {
    pub fn contains(&self, label: &L) -> bool
    where
        L: PartialEq,
    {
        self.visited.contains(label)
    }
}

/// Breadth-first search from `query.start`
///
/// The start node is reported only when a cycle leads back to it. Every
/// node is expanded at most once, so cyclic graphs terminate.
pub fn reachable<G: GraphView>(
    graph: &G,
    query: &TraversalQuery<G::Label>,
) -> Result<TraversalResult<G::Label>> {
    tracing::debug!(
        "Executing traversal: start={:?}, depth={:?}, direction={:?}",
        query.start,
        query.max_depth,
        query.direction
    );

    if !graph.contains_node(&query.start) {
        return Err(Error::node_not_found(&query.start));
    }

    let mut seen: HashSet<G::Label> = HashSet::new();
    let mut visited: Vec<G::Label> = Vec::new();
    let mut queue: VecDeque<(G::Label, u32)> = VecDeque::new();
    let mut stats = TraversalStats::default();

    queue.push_back((query.start.clone(), 0));

    'search: while let Some((current, depth)) = queue.pop_front() {
        stats.nodes_expanded += 1;
        stats.max_depth_reached = stats.max_depth_reached.max(depth);

        let neighbors = graph.neighbors(&current, query.direction)?;
        if query.max_depth.is_some_and(|max| depth >= max) {
            stats.truncated |= neighbors.iter().any(|n| !seen.contains(n));
            continue;
        }

        for next in neighbors {
            stats.neighbors_examined += 1;
            if seen.contains(&next) {
                continue;
            }
            if query.max_nodes.is_some_and(|max| visited.len() >= max) {
                stats.truncated = true;
                break 'search;
            }

            seen.insert(next.clone());
            visited.push(next.clone());
            // the start was expanded first; reaching it again only records it
            if next != query.start {
                queue.push_back((next, depth + 1));
            }
        }
    }

    tracing::debug!(
        "BFS reached {} nodes, examined {} neighbors",
        visited.len(),
        stats.neighbors_examined
    );

    Ok(TraversalResult {
        start: query.start.clone(),
        visited,
        stats,
    })
}

/// Labels reachable from `start` along outgoing edges
pub fn reachable_set<G: GraphView>(graph: &G, start: &G::Label) -> Result<HashSet<G::Label>> {
    let query = TraversalQuery {
        start: start.clone(),
        direction: Direction::Outgoing,
        max_depth: None,
        max_nodes: None,
    };
    Ok(reachable(graph, &query)?.visited.into_iter().collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use strands_core::{attrs, Attributes, ErrorKind, Multigraph, Timestamp};

    fn day(s: &str) -> Timestamp {
        Timestamp::parse(s).unwrap()
    }

    fn payments() -> Multigraph {
        let mut graph = Multigraph::new();
        graph
            .add_edge("Alex", "Victoria", day("2024-05-17"), attrs([("amount", 1800.into())]))
            .unwrap();
        graph
            .add_edge("Robert", "Victoria", day("2024-09-23"), attrs([("amount", 2100.into())]))
            .unwrap();
        graph
            .add_edge("Robert", "Victoria", day("2024-11-26"), attrs([("amount", 1200.into())]))
            .unwrap();
        graph
    }

    fn chain(labels: &[&'static str]) -> Multigraph<&'static str> {
        let mut graph = Multigraph::new();
        for pair in labels.windows(2) {
            graph
                .add_edge(pair[0], pair[1], day("2024-01-01"), Attributes::new())
                .unwrap();
        }
        graph
    }

    #[test]
    fn test_reachable_from_payer() {
        let graph = payments();
        let reached = reachable_set(&graph, &"Alex".to_string()).unwrap();
        assert_eq!(reached, HashSet::from(["Victoria".to_string()]));

        let reached = reachable_set(&graph, &"Victoria".to_string()).unwrap();
        assert!(reached.is_empty());
    }

    #[test]
    fn test_unknown_start() {
        let graph = payments();
        let err = reachable_set(&graph, &"Nobody".to_string()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn test_incoming_direction() {
        let graph = payments();
        let query = TraversalQuery::new("Victoria").with_direction(Direction::Incoming);
        let result = reachable(&graph, &query).unwrap();
        assert_eq!(result.visited, vec!["Alex".to_string(), "Robert".to_string()]);
    }

    #[test]
    fn test_cycle_terminates_and_includes_start() {
        let graph = chain(&["a", "b", "c", "a"]);
        let result = reachable(&graph, &TraversalQuery::new("a")).unwrap();

        assert_eq!(result.visited, vec!["b", "c", "a"]);
        assert_eq!(result.stats.nodes_expanded, 3);
        assert!(!result.stats.truncated);
    }

    #[test]
    fn test_depth_limit() {
        let graph = chain(&["a", "b", "c", "d"]);
        let result = reachable(&graph, &TraversalQuery::new("a").with_depth(2)).unwrap();

        assert_eq!(result.visited, vec!["b", "c"]);
        assert_eq!(result.stats.max_depth_reached, 2);
        assert!(result.stats.truncated);
    }

    #[test]
    fn test_node_limit() {
        let graph = chain(&["a", "b", "c", "d"]);
        let result = reachable(&graph, &TraversalQuery::new("a").with_max_nodes(1)).unwrap();

        assert_eq!(result.visited, vec!["b"]);
        assert!(result.stats.truncated);
        assert!(result.contains(&"b"));
    }
}
