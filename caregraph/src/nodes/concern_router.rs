//! Concern router: picks at most one retrieval strategy for the turn.

use async_trait::async_trait;
use tracing::debug;

use crate::classify::classify_concern;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::state::{ActiveRole, TurnState};

/// Classifies the latest user message (never the intake acknowledgement).
///
/// Clears retrieval results from any earlier pass, then sets the two retrieval flags from
/// [`classify_concern`]; live-search terms take priority over prior-knowledge terms.
#[derive(Debug, Default)]
pub struct ConcernRouterNode;

#[async_trait]
impl Node<TurnState> for ConcernRouterNode {
    fn id(&self) -> &str {
        super::CONCERN_ROUTER
    }

    async fn run(&self, mut state: TurnState) -> Result<(TurnState, Next), AgentError> {
        state.context.clear_retrieval();
        let choice = classify_concern(state.latest_user_text());
        state.context.needs_live_search = choice.needs_live_search();
        state.context.needs_prior_knowledge = choice.needs_prior_knowledge();
        state.delta.active_role = Some(ActiveRole::Concern);
        debug!(
            session_id = %state.session.id,
            needs_live_search = state.context.needs_live_search,
            needs_prior_knowledge = state.context.needs_prior_knowledge,
            "concern classified"
        );
        Ok((state, Next::Continue))
    }
}
