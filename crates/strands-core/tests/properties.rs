use std::collections::BTreeSet;

use proptest::prelude::*;
use strands_core::{
    attrs, Direction, EdgeInput, GraphConfig, Multigraph, Order, Reducer, Timestamp,
};

type Row = (u8, u8, u32, i64);

fn label(n: u8) -> String {
    format!("p{}", n)
}

fn input((s, d, day, amount): Row) -> EdgeInput<String> {
    EdgeInput::new(label(s), label(d), Timestamp::from_ymd(2024, 6, day).unwrap())
        .with_attributes(attrs([("amount", amount.into())]))
}

fn edge_rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec((0u8..6, 0u8..6, 1u32..29, 0i64..5000), 0..40)
}

fn build(rows: &[Row]) -> Multigraph {
    let mut graph: Multigraph = Multigraph::new();
    graph.ingest(rows.iter().copied().map(input)).unwrap();
    graph
}

fn check_counts(graph: &Multigraph) {
    let edges: Vec<_> = graph.edges().collect();
    let couples: BTreeSet<(&String, &String)> =
        edges.iter().map(|e| (e.source, e.destination)).collect();

    assert_eq!(edges.len(), graph.edge_count());
    assert_eq!(couples.len(), graph.couple_count());
    assert!(graph.edge_count() >= graph.couple_count());
    for e in &edges {
        assert!(graph.has_node(e.source.as_str()));
        assert!(graph.has_node(e.destination.as_str()));
    }
}

proptest! {
    #[test]
    fn add_edge_moves_counts_by_expected_steps(rows in edge_rows()) {
        let mut graph: Multigraph = Multigraph::new();
        for (s, d, day, amount) in rows {
            let (source, destination) = (label(s), label(d));
            let new_nodes = [&source, &destination]
                .iter()
                .collect::<BTreeSet<_>>()
                .into_iter()
                .filter(|l| !graph.has_node(l.as_str()))
                .count();
            let new_couple = !graph.has_couple(source.as_str(), destination.as_str());
            let before = graph.describe();

            graph
                .add_edge(
                    source,
                    destination,
                    Timestamp::from_ymd(2024, 6, day).unwrap(),
                    attrs([("amount", amount.into())]),
                )
                .unwrap();

            let after = graph.describe();
            prop_assert_eq!(after.edge_count, before.edge_count + 1);
            prop_assert_eq!(after.couple_count, before.couple_count + usize::from(new_couple));
            prop_assert_eq!(after.node_count, before.node_count + new_nodes);
        }
        check_counts(&graph);
    }

    #[test]
    fn removing_a_couple_edge_by_edge_removes_the_couple(rows in edge_rows(), s in 0u8..6, d in 0u8..6) {
        let mut graph = build(&rows);
        let (source, destination) = (label(s), label(d));
        prop_assume!(graph.has_couple(source.as_str(), destination.as_str()));

        let before = graph.couple_count();
        let ids: Vec<_> = graph
            .couple_edges(source.as_str(), destination.as_str())
            .unwrap()
            .iter()
            .map(|e| e.id)
            .collect();
        for id in ids {
            graph.remove_edge(id).unwrap();
        }

        prop_assert!(!graph.has_couple(source.as_str(), destination.as_str()));
        prop_assert_eq!(graph.couple_count(), before - 1);
        check_counts(&graph);
    }

    #[test]
    fn removing_a_node_drops_its_degree(rows in edge_rows(), n in 0u8..6) {
        let mut graph = build(&rows);
        let target = label(n);
        prop_assume!(graph.has_node(target.as_str()));

        let degree = graph.degree(target.as_str(), Direction::Both).unwrap();
        let before = graph.edge_count();
        let removed = graph.remove_node(target.as_str()).unwrap();

        prop_assert_eq!(removed.len(), degree);
        prop_assert_eq!(graph.edge_count(), before - degree);
        prop_assert!(graph.degree(target.as_str(), Direction::Both).unwrap_err().is_not_found());
        check_counts(&graph);
    }

    #[test]
    fn export_then_ingest_reproduces_the_graph(rows in edge_rows()) {
        let graph = build(&rows);
        let copy = Multigraph::from_export(graph.export(), GraphConfig::default()).unwrap();

        prop_assert_eq!(copy.describe(), graph.describe());
        prop_assert_eq!(copy, graph);
    }

    #[test]
    fn time_order_is_sorted_and_stable(rows in edge_rows()) {
        let graph = build(&rows);
        let ascending: Vec<_> = graph
            .edges_by_time(Order::Ascending)
            .map(|e| (e.timestamp, e.id))
            .collect();

        prop_assert_eq!(ascending.len(), graph.edge_count());
        prop_assert!(ascending.windows(2).all(|w| w[0] < w[1]));

        let descending: Vec<_> = graph
            .edges_by_time(Order::Descending)
            .map(|e| (e.timestamp, e.id))
            .collect();
        prop_assert_eq!(descending.len(), ascending.len());
        prop_assert!(descending
            .windows(2)
            .all(|w| w[0].0 > w[1].0 || (w[0].0 == w[1].0 && w[0].1 < w[1].1)));
    }

    #[test]
    fn couple_sums_add_up_to_total(rows in edge_rows()) {
        let graph = build(&rows);
        let total: i64 = rows.iter().map(|(_, _, _, amount)| amount).sum();

        let mut by_couple = 0.0;
        let couples: BTreeSet<(String, String)> = graph
            .edges()
            .map(|e| (e.source.clone(), e.destination.clone()))
            .collect();
        for (s, d) in couples {
            by_couple += graph
                .aggregate(s.as_str(), d.as_str(), "amount", Reducer::Sum)
                .unwrap()
                .unwrap_or_default();
        }
        prop_assert_eq!(by_couple, total as f64);
    }
}
