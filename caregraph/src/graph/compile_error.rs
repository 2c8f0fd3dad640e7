//! Graph compilation error.
//!
//! Returned by `StateGraph::compile` when edges reference unknown nodes or the graph
//! has no single entry or no way to finish.

use thiserror::Error;

/// Error when compiling a state graph.
#[derive(Debug, Error)]
pub enum CompilationError {
    /// A node id in an edge or path map was not registered via `add_node` (and is not START/END).
    #[error("node not found: {0}")]
    NodeNotFound(String),

    /// No edge has from_id == START, or more than one such edge.
    #[error("graph must have exactly one edge from START")]
    MissingStart,

    /// No edge or path map entry leads to END.
    #[error("graph must have at least one transition to END")]
    MissingEnd,

    /// Structural problem, e.g. two outgoing transitions from one node.
    #[error("invalid graph: {0}")]
    InvalidGraph(String),
}
