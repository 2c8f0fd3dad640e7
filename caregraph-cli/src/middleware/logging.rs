//! Logging middleware that records node enter/exit around each node run.

use async_trait::async_trait;
use tracing::info;

use caregraph::graph::NodeRunFn;
use caregraph::{AgentError, Next, NodeMiddleware, TurnState};

/// Middleware that logs node enter/exit, with the routing flags the node left behind.
///
/// Installed by the binary when `--verbose` is passed.
pub struct LoggingMiddleware;

#[async_trait]
impl NodeMiddleware<TurnState> for LoggingMiddleware {
    async fn around_run(
        &self,
        node_id: &str,
        state: TurnState,
        inner: NodeRunFn<TurnState>,
    ) -> Result<(TurnState, Next), AgentError> {
        info!(node_id, session_id = %state.session.id, "node enter");
        let result = inner(state).await;
        match &result {
            Ok((s, next)) => info!(
                node_id,
                ?next,
                needs_handoff = s.context.needs_handoff,
                needs_prior_knowledge = s.context.needs_prior_knowledge,
                needs_live_search = s.context.needs_live_search,
                "node exit"
            ),
            Err(e) => info!(node_id, error = %e, "node exit"),
        }
        result
    }
}
