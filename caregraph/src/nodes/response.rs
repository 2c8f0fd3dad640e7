//! Response composer: the final reply of a routed turn.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::collab::CallPolicy;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::llm::{GenerationRequest, LlmClient};
use crate::state::TurnState;

use super::prompts;

/// Builds the context block (patient record, then whichever retrieval result is present),
/// generates the answer and appends the matching source line.
///
/// When generation fails the reply is [`prompts::CONCERN_FALLBACK`] with no source line.
/// The reply overwrites intake's handoff acknowledgement.
pub struct ResponseNode {
    llm: Arc<dyn LlmClient>,
    policy: CallPolicy,
}

impl ResponseNode {
    pub fn new(llm: Arc<dyn LlmClient>, policy: CallPolicy) -> Self {
        Self { llm, policy }
    }

    fn context_block(state: &TurnState) -> (String, Option<&'static str>) {
        let mut parts = Vec::new();
        let mut suffix = None;
        if let Some(p) = state.patient() {
            parts.push(p.context_block());
        }
        if let Some(k) = state.context.prior_knowledge_result.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("MEDICAL KNOWLEDGE BASE (use this and cite it):\n{}", k));
            suffix = Some(prompts::KNOWLEDGE_SOURCE_SUFFIX);
        }
        if let Some(w) = state.context.live_search_result.as_deref().filter(|s| !s.is_empty()) {
            parts.push(format!("RECENT MEDICAL RESEARCH (use this and cite it):\n{}", w));
            suffix = Some(prompts::LIVE_SEARCH_SOURCE_SUFFIX);
        }
        let context = if parts.is_empty() {
            "No additional context available.".to_string()
        } else {
            parts.join("\n\n")
        };
        (context, suffix)
    }
}

#[async_trait]
impl Node<TurnState> for ResponseNode {
    fn id(&self) -> &str {
        super::RESPONSE
    }

    async fn run(&self, mut state: TurnState) -> Result<(TurnState, Next), AgentError> {
        state.context.check_exclusive()?;
        let (context, suffix) = Self::context_block(&state);
        let request = GenerationRequest::new(state.latest_user_text())
            .with_system(prompts::CONCERN_SYSTEM_PROMPT)
            .with_system(format!("Context:\n{}", context))
            .with_history(state.history());

        let reply = match self
            .policy
            .call("llm", || self.llm.generate(&request))
            .await
        {
            Ok(text) => {
                state.context.used_prior_knowledge = suffix == Some(prompts::KNOWLEDGE_SOURCE_SUFFIX);
                state.context.used_live_search = suffix == Some(prompts::LIVE_SEARCH_SOURCE_SUFFIX);
                format!("{}{}", text, suffix.unwrap_or_default())
            }
            Err(e) => {
                warn!(session_id = %state.session.id, error = %e, "response generation failed");
                state.delta.error = Some(e.to_string());
                prompts::CONCERN_FALLBACK.to_string()
            }
        };
        debug!(
            session_id = %state.session.id,
            used_prior_knowledge = state.context.used_prior_knowledge,
            used_live_search = state.context.used_live_search,
            "response composed"
        );
        state.delta.reply = Some(reply);
        Ok((state, Next::Continue))
    }
}
