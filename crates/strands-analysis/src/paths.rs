//! Path search: fewest hops, lightest and heaviest weighted paths

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap, VecDeque};

use strands_core::{Direction, EdgeId, Error, GraphView, Result};

/// What a weighted search optimizes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Objective {
    /// Smallest total weight, using the lightest edge of each couple
    Lightest,
    /// Largest total weight, using the heaviest edge of each couple
    Heaviest,
}

/// A single path through the graph
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GraphPath<L> {
    /// Ordered node labels, both endpoints included
    pub nodes: Vec<L>,

    /// The edge chosen for each hop
    pub edges: Vec<PathEdge<L>>,

    /// Sum of hop weights; the hop count for unweighted searches
    pub total_weight: f64,

    /// Number of hops
    pub length: usize,
}

/// Edge in a path
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathEdge<L> {
    pub from: L,
    pub to: L,
    pub edge: EdgeId,
    pub weight: Option<f64>,
}

impl<L: Clone> GraphPath<L> {
    fn single(node: L) -> Self {
        Self {
            nodes: vec![node],
            edges: Vec::new(),
            total_weight: 0.0,
            length: 0,
        }
    }

    fn from_edges(start: L, edges: Vec<PathEdge<L>>) -> Self {
        let mut nodes = vec![start];
        nodes.extend(edges.iter().map(|e| e.to.clone()));
        let total_weight = edges.iter().map(|e| e.weight.unwrap_or(1.0)).sum();
        Self {
            length: edges.len(),
            nodes,
            edges,
            total_weight,
        }
    }
}

/// Fewest-hop path from `from` to `to`
///
/// Unknown labels fail with a not-found error before any search; a pair of
/// known but disconnected nodes fails with [`Error::NoPath`].
pub fn shortest_path<G: GraphView>(
    graph: &G,
    from: &G::Label,
    to: &G::Label,
) -> Result<GraphPath<G::Label>> {
    check_endpoints(graph, from, to)?;
    tracing::debug!("Shortest path search: {:?} -> {:?}", from, to);

    if from == to {
        return Ok(GraphPath::single(from.clone()));
    }

    let mut parent: HashMap<G::Label, G::Label> = HashMap::new();
    let mut queue: VecDeque<G::Label> = VecDeque::new();
    queue.push_back(from.clone());

    let mut found = false;
    'search: while let Some(current) = queue.pop_front() {
        for next in graph.neighbors(&current, Direction::Outgoing)? {
            if &next == from || parent.contains_key(&next) {
                continue;
            }
            parent.insert(next.clone(), current.clone());
            if &next == to {
                found = true;
                break 'search;
            }
            queue.push_back(next);
        }
    }

    if !found {
        return Err(Error::no_path(from, to));
    }

    let mut hops = Vec::new();
    let mut current = to.clone();
    while let Some(prev) = parent.get(&current) {
        let edge = graph
            .couple_edge_ids(prev, &current)?
            .first()
            .copied()
            .ok_or_else(|| Error::couple_not_found(prev, &current))?;
        hops.push(PathEdge {
            from: prev.clone(),
            to: current.clone(),
            edge,
            weight: None,
        });
        current = prev.clone();
    }
    hops.reverse();

    tracing::debug!("BFS found path of length {}", hops.len());
    Ok(GraphPath::from_edges(from.clone(), hops))
}

/// Best path by a numeric edge attribute
///
/// Parallel edges collapse to the lightest (or heaviest) edge of their
/// couple and edges without the attribute cannot be used. Every weight in
/// the region reachable from `from` must be a non-negative number. A
/// heaviest search also rejects regions containing a cycle, since the
/// total would be unbounded.
pub fn weighted_path<G: GraphView>(
    graph: &G,
    from: &G::Label,
    to: &G::Label,
    attribute: &str,
    objective: Objective,
) -> Result<GraphPath<G::Label>> {
    check_endpoints(graph, from, to)?;
    tracing::debug!(
        "Weighted path search: {:?} -> {:?}, attribute={}, objective={:?}",
        from,
        to,
        attribute,
        objective
    );

    let region = Region::explore(graph, from, attribute, objective)?;
    let target = match region.position.get(to) {
        Some(t) => *t,
        None => return Err(Error::no_path(from, to)),
    };
    if target == 0 {
        return Ok(GraphPath::single(from.clone()));
    }

    let parent = match objective {
        Objective::Lightest => region.dijkstra(),
        Objective::Heaviest => region.longest(attribute)?,
    };

    let mut hops = Vec::new();
    let mut current = target;
    while current != 0 {
        let (prev, edge, weight) = parent[current].ok_or_else(|| Error::no_path(from, to))?;
        hops.push(PathEdge {
            from: region.labels[prev].clone(),
            to: region.labels[current].clone(),
            edge,
            weight: Some(weight),
        });
        current = prev;
    }
    hops.reverse();

    tracing::debug!("Weighted search found path with {} hops", hops.len());
    Ok(GraphPath::from_edges(from.clone(), hops))
}

fn check_endpoints<G: GraphView>(graph: &G, from: &G::Label, to: &G::Label) -> Result<()> {
    for label in [from, to] {
        if !graph.contains_node(label) {
            return Err(Error::node_not_found(label));
        }
    }
    Ok(())
}

/// The single edge standing in for a couple, and its weight
fn couple_weight<G: GraphView>(
    graph: &G,
    source: &G::Label,
    destination: &G::Label,
    attribute: &str,
    objective: Objective,
) -> Result<Option<(EdgeId, f64)>> {
    let mut best: Option<(EdgeId, f64)> = None;
    for id in graph.couple_edge_ids(source, destination)? {
        let Some(value) = graph.edge_attribute(id, attribute)? else {
            continue;
        };
        let weight = value.as_f64().ok_or_else(|| {
            Error::unsupported_weight(
                attribute,
                format!("edge {} holds {}, not a number", id, value.type_name()),
            )
        })?;
        if weight.is_nan() || weight < 0.0 {
            return Err(Error::unsupported_weight(
                attribute,
                format!("edge {} has weight {}", id, weight),
            ));
        }
        let better = match (best, objective) {
            (None, _) => true,
            (Some((_, w)), Objective::Lightest) => weight < w,
            (Some((_, w)), Objective::Heaviest) => weight > w,
        };
        if better {
            best = Some((id, weight));
        }
    }
    Ok(best)
}

type Parent = Option<(usize, EdgeId, f64)>;

/// Weighted adjacency of everything reachable from a start node
///
/// Position 0 is the start.
struct Region<L> {
    labels: Vec<L>,
    position: HashMap<L, usize>,
    adjacency: Vec<Vec<(usize, EdgeId, f64)>>,
}

impl<L: Clone + Eq + std::hash::Hash> Region<L> {
    fn explore<G: GraphView<Label = L>>(
        graph: &G,
        start: &L,
        attribute: &str,
        objective: Objective,
    ) -> Result<Self> {
        let mut region = Self {
            labels: vec![start.clone()],
            position: HashMap::from([(start.clone(), 0)]),
            adjacency: vec![Vec::new()],
        };

        let mut next_unexplored = 0;
        while next_unexplored < region.labels.len() {
            let current = region.labels[next_unexplored].clone();
            for neighbor in graph.neighbors(&current, Direction::Outgoing)? {
                let Some((edge, weight)) =
                    couple_weight(graph, &current, &neighbor, attribute, objective)?
                else {
                    continue;
                };
                let to = region.intern(neighbor);
                region.adjacency[next_unexplored].push((to, edge, weight));
            }
            next_unexplored += 1;
        }
        Ok(region)
    }

    fn intern(&mut self, label: L) -> usize {
        if let Some(pos) = self.position.get(&label) {
            return *pos;
        }
        let pos = self.labels.len();
        self.position.insert(label.clone(), pos);
        self.labels.push(label);
        self.adjacency.push(Vec::new());
        pos
    }

    fn dijkstra(&self) -> Vec<Parent> {
        let mut dist = vec![f64::INFINITY; self.labels.len()];
        let mut parent: Vec<Parent> = vec![None; self.labels.len()];
        let mut heap = BinaryHeap::new();

        dist[0] = 0.0;
        heap.push(DijkstraState { cost: 0.0, node: 0 });

        while let Some(DijkstraState { cost, node }) = heap.pop() {
            // Skip if we already found a better path
            if cost > dist[node] {
                continue;
            }
            for &(next, edge, weight) in &self.adjacency[node] {
                let new_cost = cost + weight;
                if new_cost < dist[next] {
                    dist[next] = new_cost;
                    parent[next] = Some((node, edge, weight));
                    heap.push(DijkstraState {
                        cost: new_cost,
                        node: next,
                    });
                }
            }
        }
        parent
    }

    /// Longest paths by relaxing in topological order (Kahn)
    fn longest(&self, attribute: &str) -> Result<Vec<Parent>> {
        let n = self.labels.len();
        let mut in_degree = vec![0usize; n];
        for edges in &self.adjacency {
            for &(next, _, _) in edges {
                in_degree[next] += 1;
            }
        }

        let mut ready: VecDeque<usize> = (0..n).filter(|i| in_degree[*i] == 0).collect();
        let mut order = Vec::with_capacity(n);
        while let Some(node) = ready.pop_front() {
            order.push(node);
            for &(next, _, _) in &self.adjacency[node] {
                in_degree[next] -= 1;
                if in_degree[next] == 0 {
                    ready.push_back(next);
                }
            }
        }
        if order.len() < n {
            return Err(Error::unsupported_weight(
                attribute,
                "a cycle is reachable from the start, so the heaviest path is unbounded",
            ));
        }

        let mut best = vec![f64::NEG_INFINITY; n];
        let mut parent: Vec<Parent> = vec![None; n];
        best[0] = 0.0;
        for node in order {
            if best[node] == f64::NEG_INFINITY {
                continue;
            }
            for &(next, edge, weight) in &self.adjacency[node] {
                if best[node] + weight > best[next] {
                    best[next] = best[node] + weight;
                    parent[next] = Some((node, edge, weight));
                }
            }
        }
        Ok(parent)
    }
}

/// State for Dijkstra priority queue
#[derive(Clone, Copy, PartialEq)]
struct DijkstraState {
    cost: f64,
    node: usize,
}

impl Eq for DijkstraState {}

impl Ord for DijkstraState {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap
        other
            .cost
            .partial_cmp(&self.cost)
            .unwrap_or(Ordering::Equal)
            .then_with(|| other.node.cmp(&self.node))
    }
}

impl PartialOrd for DijkstraState {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}
