//! State graph builder: nodes, plain edges (from → to) and conditional edges.
//!
//! Add nodes with `add_node`, wire them with `add_edge(from, to)` using `START` and `END`
//! for entry/exit, or with `add_conditional_edges(from, router, path_map)` where the
//! router reads the state and returns a key of `path_map`. Then `compile` to get a
//! `CompiledStateGraph`.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::AgentError;
use crate::graph::compile_error::CompilationError;
use crate::graph::compiled::{Branch, CompiledStateGraph, Transition, DEFAULT_MAX_STEPS};
use crate::graph::node::Node;
use crate::graph::node_middleware::NodeMiddleware;

/// Sentinel for graph entry: use as `from_id` in `add_edge(START, first_node_id)`.
pub const START: &str = "__start__";

/// Sentinel for graph exit: use as `to_id` in `add_edge(last_node_id, END)` or as a path map target.
pub const END: &str = "__end__";

/// Router for a conditional edge: reads the state after the source node ran and returns
/// a key of the edge's path map. An `Err` aborts the run.
pub type RouteFn<S> = Arc<dyn Fn(&S) -> Result<String, AgentError> + Send + Sync>;

/// State graph: nodes plus plain and conditional edges.
///
/// Generic over state type `S`. Each node has at most one outgoing transition: either a
/// plain edge or a conditional edge.
///
/// **Interaction**: Accepts `Arc<dyn Node<S>>`; produces `CompiledStateGraph<S>`.
pub struct StateGraph<S> {
    nodes: HashMap<String, Arc<dyn Node<S>>>,
    edges: Vec<(String, String)>,
    branches: Vec<(String, Branch<S>)>,
    middleware: Option<Arc<dyn NodeMiddleware<S>>>,
}

impl<S> Default for StateGraph<S>
where
    S: Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<S> StateGraph<S>
where
    S: Clone + Send + Sync + 'static,
{
    /// Creates an empty graph.
    pub fn new() -> Self {
        Self {
            nodes: HashMap::new(),
            edges: Vec::new(),
            branches: Vec::new(),
            middleware: None,
        }
    }

    /// Adds a node; replaces any node registered under the same id.
    pub fn add_node(&mut self, id: impl Into<String>, node: Arc<dyn Node<S>>) -> &mut Self {
        self.nodes.insert(id.into(), node);
        self
    }

    /// Adds an unconditional edge. Use `START` for graph entry and `END` for graph exit.
    pub fn add_edge(&mut self, from_id: impl Into<String>, to_id: impl Into<String>) -> &mut Self {
        self.edges.push((from_id.into(), to_id.into()));
        self
    }

    /// Adds a conditional edge out of `from_id`. After that node runs, `router` picks a key
    /// and the graph continues at `path_map[key]` (a node id or `END`).
    pub fn add_conditional_edges<F, K, V>(
        &mut self,
        from_id: impl Into<String>,
        router: F,
        path_map: impl IntoIterator<Item = (K, V)>,
    ) -> &mut Self
    where
        F: Fn(&S) -> Result<String, AgentError> + Send + Sync + 'static,
        K: Into<String>,
        V: Into<String>,
    {
        let branch = Branch {
            router: Arc::new(router),
            path_map: path_map
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        };
        self.branches.push((from_id.into(), branch));
        self
    }

    /// Wraps every node run with the given middleware once compiled.
    pub fn with_middleware(self, middleware: Arc<dyn NodeMiddleware<S>>) -> Self {
        Self {
            middleware: Some(middleware),
            ..self
        }
    }

    /// Builds the executable graph.
    ///
    /// Validates: exactly one edge from START; every referenced id is registered; no node
    /// has more than one outgoing transition; some transition reaches END.
    pub fn compile(self) -> Result<CompiledStateGraph<S>, CompilationError> {
        let known = |id: &str| self.nodes.contains_key(id);

        let starts: Vec<&String> = self
            .edges
            .iter()
            .filter(|(f, _)| f == START)
            .map(|(_, t)| t)
            .collect();
        if starts.len() != 1 {
            return Err(CompilationError::MissingStart);
        }
        let entry = starts[0].clone();
        if entry == END {
            return Err(CompilationError::InvalidGraph("START leads directly to END".into()));
        }

        let mut transitions: HashMap<String, Transition<S>> = HashMap::new();
        let mut reaches_end = false;

        for (from, to) in &self.edges {
            if from == END {
                return Err(CompilationError::InvalidGraph("edge out of END".into()));
            }
            if from != START && !known(from.as_str()) {
                return Err(CompilationError::NodeNotFound(from.clone()));
            }
            if to != END && !known(to.as_str()) {
                return Err(CompilationError::NodeNotFound(to.clone()));
            }
            reaches_end |= to == END;
            if from == START {
                continue;
            }
            if transitions
                .insert(from.clone(), Transition::Edge(to.clone()))
                .is_some()
            {
                return Err(CompilationError::InvalidGraph(format!(
                    "multiple outgoing transitions from {}",
                    from
                )));
            }
        }

        for (from, branch) in self.branches {
            if !known(from.as_str()) {
                return Err(CompilationError::NodeNotFound(from));
            }
            if branch.path_map.is_empty() {
                return Err(CompilationError::InvalidGraph(format!(
                    "conditional edge from {} has an empty path map",
                    from
                )));
            }
            for target in branch.path_map.values() {
                if target != END && !known(target.as_str()) {
                    return Err(CompilationError::NodeNotFound(target.clone()));
                }
                reaches_end |= target == END;
            }
            if transitions
                .insert(from.clone(), Transition::Branch(branch))
                .is_some()
            {
                return Err(CompilationError::InvalidGraph(format!(
                    "multiple outgoing transitions from {}",
                    from
                )));
            }
        }

        if !reaches_end {
            return Err(CompilationError::MissingEnd);
        }

        Ok(CompiledStateGraph {
            nodes: self.nodes,
            entry,
            transitions,
            middleware: self.middleware,
            max_steps: DEFAULT_MAX_STEPS,
        })
    }
}
