//! Knowledge retrieval node: top-k passages from the static corpus.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::collab::CallPolicy;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::retrieval::{format_chunks, KnowledgeRetriever};
use crate::state::TurnState;

/// Queries the knowledge base with the latest user message.
///
/// Writes `prior_knowledge_result` only when passages came back. A failed query leaves
/// it empty and records the error; the turn continues to the composer either way.
pub struct KnowledgeRetrievalNode {
    retriever: Arc<dyn KnowledgeRetriever>,
    top_k: usize,
    policy: CallPolicy,
}

impl KnowledgeRetrievalNode {
    pub fn new(retriever: Arc<dyn KnowledgeRetriever>, top_k: usize, policy: CallPolicy) -> Self {
        Self {
            retriever,
            top_k,
            policy,
        }
    }
}

#[async_trait]
impl Node<TurnState> for KnowledgeRetrievalNode {
    fn id(&self) -> &str {
        super::KNOWLEDGE_RETRIEVAL
    }

    async fn run(&self, mut state: TurnState) -> Result<(TurnState, Next), AgentError> {
        let query = state.latest_user_text().to_string();
        let result = self
            .policy
            .call("knowledge_retriever", || self.retriever.query(&query, self.top_k))
            .await;
        match result {
            Ok(chunks) => {
                debug!(session_id = %state.session.id, count = chunks.len(), "knowledge retrieved");
                state.context.prior_knowledge_result =
                    Some(format_chunks(&chunks)).filter(|s| !s.is_empty());
            }
            Err(e) => {
                warn!(session_id = %state.session.id, error = %e, "knowledge retrieval failed");
                state.context.prior_knowledge_result = None;
                state.delta.error = Some(format!("knowledge retrieval: {}", e));
            }
        }
        Ok((state, Next::Continue))
    }
}
