//! Strands Core - in-memory directed multigraph engine
//!
//! This crate provides the storage layers (node registry, couple index,
//! edge store), the [`Multigraph`] that composes them, and the
//! [`GraphView`] read surface that analysis code is written against.

pub mod attr;
pub mod config;
pub mod couple;
pub mod edge;
pub mod error;
pub mod graph;
pub mod ids;
pub mod ingest;
pub mod registry;
pub mod time;
pub mod view;

pub use attr::{attrs, AttrValue, Attributes};
pub use config::GraphConfig;
pub use couple::{CoupleIndex, Reducer};
pub use edge::{ByTime, EdgeRecord, EdgeStore, Order};
pub use error::{Error, ErrorKind, Result};
pub use graph::{Direction, Multigraph, Summary};
pub use ids::{CoupleKey, EdgeId, NodeIndex};
pub use ingest::{EdgeInput, EdgeView, GraphExport, NodeInput, NodeRecord};
pub use registry::NodeRegistry;
pub use time::Timestamp;
pub use view::GraphView;
