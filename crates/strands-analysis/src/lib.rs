//! Strands Analysis - graph algorithms over any [`GraphView`]
//!
//! Provides reachability, path search, connected components and
//! attribute/degree aggregation. Every function is stateless and reads the
//! graph only through [`strands_core::GraphView`].

pub mod centrality;
pub mod components;
pub mod paths;
pub mod traversal;

pub use centrality::{
    couple_totals, degree_centrality, degree_distribution, node_flows, CoupleTotal, NodeFlow,
};
pub use components::{is_connected, strongly_connected_components, weakly_connected_components};
pub use paths::{shortest_path, weighted_path, GraphPath, Objective, PathEdge};
pub use traversal::{reachable, reachable_set, TraversalQuery, TraversalResult, TraversalStats};

pub use strands_core::GraphView;
