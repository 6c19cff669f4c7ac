use std::collections::{BTreeSet, HashSet};

use proptest::prelude::*;
use strands_analysis::{
    couple_totals, reachable_set, shortest_path, strongly_connected_components,
    weakly_connected_components, weighted_path, Objective,
};
use strands_core::{
    AttrValue, Direction, EdgeId, Error, ErrorKind, GraphView, Multigraph, Reducer, Result,
    Timestamp,
};

/// Edge-list graph with numeric labels and an optional weight per edge
struct EdgeList {
    nodes: Vec<u32>,
    edges: Vec<(u32, u32, Option<f64>)>,
}

impl EdgeList {
    fn new(nodes: u32, edges: &[(u32, u32, Option<f64>)]) -> Self {
        Self {
            nodes: (0..nodes).collect(),
            edges: edges.to_vec(),
        }
    }

    fn endpoints(&self, id: EdgeId) -> Result<(u32, u32, Option<f64>)> {
        self.edges
            .get(id.as_raw() as usize)
            .copied()
            .ok_or(Error::EdgeNotFound(id))
    }

    fn check(&self, label: &u32) -> Result<()> {
        if self.nodes.contains(label) {
            Ok(())
        } else {
            Err(Error::node_not_found(label))
        }
    }
}

impl GraphView for EdgeList {
    type Label = u32;

    fn node_labels(&self) -> Vec<u32> {
        self.nodes.clone()
    }

    fn contains_node(&self, label: &u32) -> bool {
        self.nodes.contains(label)
    }

    fn degree(&self, label: &u32, direction: Direction) -> Result<usize> {
        self.check(label)?;
        Ok(self
            .edges
            .iter()
            .filter(|(s, d, _)| match direction {
                Direction::Outgoing => s == label,
                Direction::Incoming => d == label,
                Direction::Both => s == label || d == label,
            })
            .count())
    }

    fn neighbors(&self, label: &u32, direction: Direction) -> Result<Vec<u32>> {
        self.check(label)?;
        let mut found = BTreeSet::new();
        for (s, d, _) in &self.edges {
            if direction != Direction::Incoming && s == label {
                found.insert(*d);
            }
            if direction != Direction::Outgoing && d == label {
                found.insert(*s);
            }
        }
        Ok(found.into_iter().collect())
    }

    fn has_couple(&self, source: &u32, destination: &u32) -> bool {
        self.edges
            .iter()
            .any(|(s, d, _)| s == source && d == destination)
    }

    fn couple_edge_ids(&self, source: &u32, destination: &u32) -> Result<Vec<EdgeId>> {
        let ids: Vec<EdgeId> = self
            .edges
            .iter()
            .enumerate()
            .filter(|(_, (s, d, _))| s == source && d == destination)
            .map(|(i, _)| EdgeId::from_raw(i as u64))
            .collect();
        if ids.is_empty() {
            return Err(Error::couple_not_found(source, destination));
        }
        Ok(ids)
    }

    fn edge_endpoints(&self, id: EdgeId) -> Result<(u32, u32)> {
        let (s, d, _) = self.endpoints(id)?;
        Ok((s, d))
    }

    fn edge_attribute(&self, id: EdgeId, name: &str) -> Result<Option<AttrValue>> {
        let (_, _, weight) = self.endpoints(id)?;
        Ok(weight.filter(|_| name == "w").map(AttrValue::Float))
    }

    fn edge_ids(&self) -> Vec<EdgeId> {
        (0..self.edges.len() as u64).map(EdgeId::from_raw).collect()
    }
}

fn diamond() -> EdgeList {
    EdgeList::new(
        5,
        &[
            (0, 1, Some(1.0)),
            (0, 2, Some(4.0)),
            (1, 3, Some(1.0)),
            (2, 3, Some(1.0)),
            (0, 1, Some(0.5)),
            (3, 3, None),
        ],
    )
}

#[test]
fn reachability_through_mock() {
    let graph = diamond();
    assert_eq!(reachable_set(&graph, &0).unwrap(), HashSet::from([1, 2, 3]));
    // self-loop re-enters the start
    assert_eq!(reachable_set(&graph, &3).unwrap(), HashSet::from([3]));
    assert!(reachable_set(&graph, &4).unwrap().is_empty());
    assert!(reachable_set(&graph, &9).unwrap_err().is_not_found());
}

#[test]
fn paths_through_mock() {
    let graph = diamond();

    let hops = shortest_path(&graph, &0, &3).unwrap();
    assert_eq!(hops.length, 2);
    assert_eq!(hops.nodes, vec![0, 1, 3]);

    let light = weighted_path(&graph, &0, &3, "w", Objective::Lightest).unwrap();
    assert_eq!(light.total_weight, 1.5);
    assert_eq!(light.edges[0].edge, EdgeId::from_raw(4));

    let heavy = weighted_path(&graph, &0, &3, "w", Objective::Heaviest).unwrap();
    assert_eq!(heavy.nodes, vec![0, 2, 3]);
    assert_eq!(heavy.total_weight, 5.0);

    let err = shortest_path(&graph, &3, &0).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::NoPath);
}

#[test]
fn components_through_mock() {
    let graph = diamond();
    assert_eq!(
        weakly_connected_components(&graph).unwrap(),
        vec![vec![0, 1, 2, 3], vec![4]]
    );
    assert_eq!(
        strongly_connected_components(&graph).unwrap(),
        vec![vec![0], vec![1], vec![2], vec![3], vec![4]]
    );
}

#[test]
fn default_couple_aggregate_through_mock() {
    let graph = diamond();
    let totals = couple_totals(&graph, "w", Reducer::Sum).unwrap();
    assert_eq!(totals[0].value, Some(1.5));
    assert_eq!(totals.len(), 5);
    assert_eq!(totals[4].value, Some(0.0));
}

fn to_multigraph(list: &EdgeList) -> Multigraph<u32> {
    let day = Timestamp::from_ymd(2024, 1, 1).unwrap();
    let mut graph = Multigraph::new();
    for label in &list.nodes {
        graph.add_node(*label, Default::default()).unwrap();
    }
    for (s, d, _) in &list.edges {
        graph.add_edge(*s, *d, day, Default::default()).unwrap();
    }
    graph
}

fn edge_lists() -> impl Strategy<Value = EdgeList> {
    (1u32..8).prop_flat_map(|n| {
        prop::collection::vec((0..n, 0..n), 0..20).prop_map(move |pairs| {
            let edges: Vec<_> = pairs.into_iter().map(|(s, d)| (s, d, None)).collect();
            EdgeList::new(n, &edges)
        })
    })
}

impl std::fmt::Debug for EdgeList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "EdgeList({} nodes, {:?})", self.nodes.len(), self.edges)
    }
}

proptest! {
    #[test]
    fn mock_and_multigraph_agree(list in edge_lists()) {
        let graph = to_multigraph(&list);
        for label in &list.nodes {
            prop_assert_eq!(
                reachable_set(&list, label).unwrap(),
                reachable_set(&graph, label).unwrap()
            );
            prop_assert_eq!(
                list.degree(label, Direction::Both).unwrap(),
                GraphView::degree(&graph, label, Direction::Both).unwrap()
            );
        }
        prop_assert_eq!(
            weakly_connected_components(&list).unwrap(),
            weakly_connected_components(&graph).unwrap()
        );
        prop_assert_eq!(
            strongly_connected_components(&list).unwrap(),
            strongly_connected_components(&graph).unwrap()
        );
    }

    #[test]
    fn strong_components_refine_weak_ones(list in edge_lists()) {
        let weak = weakly_connected_components(&list).unwrap();
        let strong = strongly_connected_components(&list).unwrap();

        let total: usize = strong.iter().map(Vec::len).sum();
        prop_assert_eq!(total, list.nodes.len());
        for component in &strong {
            prop_assert!(weak.iter().any(|w| component.iter().all(|n| w.contains(n))));
        }
    }

    #[test]
    fn shortest_path_hops_are_edges(list in edge_lists(), from in 0u32..8, to in 0u32..8) {
        prop_assume!(list.contains_node(&from) && list.contains_node(&to));
        match shortest_path(&list, &from, &to) {
            Ok(path) => {
                prop_assert_eq!(path.nodes.len(), path.length + 1);
                for pair in path.nodes.windows(2) {
                    prop_assert!(list.has_couple(&pair[0], &pair[1]));
                }
                prop_assert!(from == to || reachable_set(&list, &from).unwrap().contains(&to));
            }
            Err(err) => {
                prop_assert_eq!(err.kind(), ErrorKind::NoPath);
                prop_assert!(!reachable_set(&list, &from).unwrap().contains(&to));
            }
        }
    }
}
