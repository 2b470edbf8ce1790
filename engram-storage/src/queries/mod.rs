//! Row-level query modules over the graph tables.

pub mod edge_ops;
pub mod node_crud;
pub mod stats_ops;
pub mod window_ops;
