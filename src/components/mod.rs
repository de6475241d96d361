//! UI components.

pub mod requisite_graph;
