//! Graph node trait.

use async_trait::async_trait;

use crate::error::AgentError;

use super::Next;

/// One step of a state graph: receives the state, returns the updated state and [`Next`].
///
/// **Interaction**: Registered with `StateGraph::add_node` as `Arc<dyn Node<S>>`; called by
/// `CompiledStateGraph` (through `NodeMiddleware` when one is installed).
#[async_trait]
pub trait Node<S>: Send + Sync
where
    S: Clone + Send + Sync + 'static,
{
    /// Stable id, used in logs and by middleware.
    fn id(&self) -> &str;

    async fn run(&self, state: S) -> Result<(S, Next), AgentError>;
}
