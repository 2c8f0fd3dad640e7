//! Compiled state graph: immutable, supports invoke only.
//!
//! Built by `StateGraph::compile`. Holds nodes, the entry node and one outgoing transition
//! per node (plain edge or conditional edge). Runs nodes strictly one at a time.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AgentError;

use super::logging::{
    log_graph_complete, log_graph_error, log_graph_start, log_node_complete, log_node_start,
    log_route,
};
use super::node_middleware::NodeMiddleware;
use super::state_graph::{RouteFn, END};
use super::{Next, Node};

/// Default bound on node runs per invoke.
pub const DEFAULT_MAX_STEPS: usize = 25;

/// Conditional edge: router plus key → target map.
pub(super) struct Branch<S> {
    pub(super) router: RouteFn<S>,
    pub(super) path_map: HashMap<String, String>,
}

impl<S> Clone for Branch<S> {
    fn clone(&self) -> Self {
        Self {
            router: self.router.clone(),
            path_map: self.path_map.clone(),
        }
    }
}

/// Outgoing transition of one node.
pub(super) enum Transition<S> {
    Edge(String),
    Branch(Branch<S>),
}

impl<S> Clone for Transition<S> {
    fn clone(&self) -> Self {
        match self {
            Self::Edge(to) => Self::Edge(to.clone()),
            Self::Branch(b) => Self::Branch(b.clone()),
        }
    }
}

/// Compiled graph: immutable structure, supports invoke only.
///
/// Starts at the node after START; after each node uses the returned `Next` and the node's
/// outgoing transition to choose the next node, until END or a node with no transition.
pub struct CompiledStateGraph<S> {
    pub(super) nodes: HashMap<String, Arc<dyn Node<S>>>,
    pub(super) entry: String,
    pub(super) transitions: HashMap<String, Transition<S>>,
    pub(super) middleware: Option<Arc<dyn NodeMiddleware<S>>>,
    pub(super) max_steps: usize,
}

impl<S> Clone for CompiledStateGraph<S> {
    fn clone(&self) -> Self {
        Self {
            nodes: self.nodes.clone(),
            entry: self.entry.clone(),
            transitions: self.transitions.clone(),
            middleware: self.middleware.clone(),
            max_steps: self.max_steps,
        }
    }
}

impl<S> CompiledStateGraph<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Sets the bound on node runs per invoke. Exceeding it fails the run.
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Runs the graph with the given state and returns the final state.
    ///
    /// - `Next::Continue`: follow the node's edge, or evaluate its conditional edge; end if none.
    /// - `Next::Node(id)`: run the node with that id next.
    /// - `Next::End`: stop and return current state.
    pub async fn invoke(&self, state: S) -> Result<S, AgentError> {
        self.invoke_traced(state).await.map(|(s, _)| s)
    }

    /// Like `invoke`, also returning the ids of the nodes that ran, in order.
    pub async fn invoke_traced(&self, state: S) -> Result<(S, Vec<String>), AgentError> {
        log_graph_start();
        let result = self.run_loop(state).await;
        match &result {
            Ok((_, visited)) => log_graph_complete(visited.len()),
            Err(e) => log_graph_error(e),
        }
        result
    }

    async fn run_loop(&self, mut state: S) -> Result<(S, Vec<String>), AgentError> {
        let mut current = self.entry.clone();
        let mut visited = Vec::new();
        loop {
            if visited.len() >= self.max_steps {
                return Err(AgentError::ExecutionFailed(format!(
                    "step limit {} reached before {}",
                    self.max_steps, current
                )));
            }
            let node = self
                .nodes
                .get(&current)
                .cloned()
                .ok_or_else(|| AgentError::ExecutionFailed(format!("unknown node: {}", current)))?;

            log_node_start(&current);
            let (new_state, next) = match &self.middleware {
                Some(middleware) => {
                    middleware
                        .around_run(
                            &current,
                            state,
                            Box::new(move |s| Box::pin(async move { node.run(s).await })),
                        )
                        .await?
                }
                None => node.run(state).await?,
            };
            state = new_state;
            log_node_complete(&current, &next);
            visited.push(current.clone());

            let target = match next {
                Next::End => None,
                Next::Node(id) => Some(id),
                Next::Continue => self.resolve(&current, &state)?,
            };
            match target {
                Some(id) if id != END => current = id,
                _ => return Ok((state, visited)),
            }
        }
    }

    /// Target of `from`'s outgoing transition, or None when it has none.
    fn resolve(&self, from: &str, state: &S) -> Result<Option<String>, AgentError> {
        match self.transitions.get(from) {
            None => Ok(None),
            Some(Transition::Edge(to)) => Ok(Some(to.clone())),
            Some(Transition::Branch(branch)) => {
                let key = (branch.router)(state)?;
                let to = branch.path_map.get(&key).ok_or_else(|| {
                    AgentError::ExecutionFailed(format!(
                        "route key {} from {} is not in the path map",
                        key, from
                    ))
                })?;
                log_route(from, &key, to);
                Ok(Some(to.clone()))
            }
        }
    }
}
