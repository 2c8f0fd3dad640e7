//! Structured logging for graph execution events.

use tracing::{debug, error, info};

use crate::error::AgentError;
use crate::graph::Next;

pub fn log_node_start(node_id: &str) {
    debug!(node_id, "Starting node execution");
}

pub fn log_node_complete(node_id: &str, next: &Next) {
    debug!(node_id, ?next, "Node execution complete");
}

pub fn log_route(from: &str, key: &str, to: &str) {
    debug!(from, key, to, "Conditional edge taken");
}

pub fn log_graph_start() {
    debug!("Starting graph execution");
}

pub fn log_graph_complete(steps: usize) {
    info!(steps, "Graph execution complete");
}

pub fn log_graph_error(error: &AgentError) {
    error!(%error, "Graph execution error");
}
