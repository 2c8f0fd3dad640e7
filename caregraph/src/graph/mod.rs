//! State graph: nodes, plain edges and conditional edges; compile and invoke.
//!
//! Aligns with LangGraph `StateGraph`: add nodes and edges, compile, then invoke with
//! state. Conditional edges pick the next node from the state after a node runs.

mod compile_error;
mod compiled;
pub mod logging;
mod next;
mod node;
mod node_middleware;
mod state_graph;

pub use compile_error::CompilationError;
pub use compiled::{CompiledStateGraph, DEFAULT_MAX_STEPS};
pub use next::Next;
pub use node::Node;
pub use node_middleware::{NodeMiddleware, NodeRunFn};
pub use state_graph::{RouteFn, StateGraph, END, START};
