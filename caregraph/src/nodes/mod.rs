//! Nodes of the turn graph and the conditional-edge routers between them.
//!
//! ```text
//! START → intake ─(handoff)→ concern_router ─┬→ live_search ─────────┐
//!           │                                ├→ knowledge_retrieval ─┤
//!           └─(no handoff)→ END              └───────────────────────┴→ response → END
//! ```

mod concern_router;
mod intake;
mod knowledge;
mod live_search;
pub mod prompts;
mod response;

pub use concern_router::ConcernRouterNode;
pub use intake::IntakeNode;
pub use knowledge::KnowledgeRetrievalNode;
pub use live_search::LiveSearchNode;
pub use response::ResponseNode;

use crate::error::AgentError;
use crate::graph::END;
use crate::state::TurnState;

pub const INTAKE: &str = "intake";
pub const CONCERN_ROUTER: &str = "concern_router";
pub const KNOWLEDGE_RETRIEVAL: &str = "knowledge_retrieval";
pub const LIVE_SEARCH: &str = "live_search";
pub const RESPONSE: &str = "response";

/// Router out of intake: concern routing on handoff, otherwise the turn ends.
pub fn route_after_intake(state: &TurnState) -> Result<String, AgentError> {
    Ok(if state.context.needs_handoff {
        CONCERN_ROUTER
    } else {
        END
    }
    .to_string())
}

/// Router out of concern routing: at most one retrieval branch, then the composer.
pub fn route_after_concern(state: &TurnState) -> Result<String, AgentError> {
    state.context.check_exclusive()?;
    let ctx = &state.context;
    Ok(if ctx.needs_live_search {
        LIVE_SEARCH
    } else if ctx.needs_prior_knowledge {
        KNOWLEDGE_RETRIEVAL
    } else {
        RESPONSE
    }
    .to_string())
}
