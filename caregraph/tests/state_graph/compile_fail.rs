//! StateGraph compile failure cases: unknown node, missing start or end, duplicate transitions.

use std::sync::Arc;

use caregraph::graph::{END, START};
use caregraph::{AgentError, CompilationError, StateGraph};

use crate::common::{StepNode, TraceState};

fn always(key: &'static str) -> impl Fn(&TraceState) -> Result<String, AgentError> {
    move |_| Ok(key.to_string())
}

#[tokio::test]
async fn compile_fails_when_edge_refers_to_unknown_node() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("a", Arc::new(StepNode::new("a")));
    graph.add_edge(START, "a");
    graph.add_edge("a", "missing");

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "missing"),
        _ => panic!("expected NodeNotFound"),
    }
}

#[tokio::test]
async fn compile_fails_when_path_map_refers_to_unknown_node() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("a", Arc::new(StepNode::new("a")));
    graph.add_edge(START, "a");
    graph.add_conditional_edges("a", always("x"), [("x", "ghost"), ("done", END)]);

    match graph.compile() {
        Err(CompilationError::NodeNotFound(id)) => assert_eq!(id, "ghost"),
        _ => panic!("expected NodeNotFound"),
    }
}

#[tokio::test]
async fn compile_fails_without_start_edge() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("a", Arc::new(StepNode::new("a")));
    graph.add_edge("a", END);
    assert!(matches!(graph.compile(), Err(CompilationError::MissingStart)));
}

#[tokio::test]
async fn compile_fails_without_path_to_end() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("a", Arc::new(StepNode::new("a")));
    graph.add_node("b", Arc::new(StepNode::new("b")));
    graph.add_edge(START, "a");
    graph.add_edge("a", "b");
    assert!(matches!(graph.compile(), Err(CompilationError::MissingEnd)));
}

/// **Scenario**: A node with both a plain edge and a conditional edge is rejected.
#[tokio::test]
async fn compile_fails_on_two_outgoing_transitions() {
    let mut graph = StateGraph::<TraceState>::new();
    graph.add_node("a", Arc::new(StepNode::new("a")));
    graph.add_edge(START, "a");
    graph.add_edge("a", END);
    graph.add_conditional_edges("a", always("done"), [("done", END)]);
    assert!(matches!(
        graph.compile(),
        Err(CompilationError::InvalidGraph(_))
    ));
}
