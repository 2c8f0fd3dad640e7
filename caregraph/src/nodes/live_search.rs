//! Live search node: recent information from the web.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::collab::CallPolicy;
use crate::error::AgentError;
use crate::graph::{Next, Node};
use crate::search::{format_hits, WebSearch};
use crate::state::TurnState;

/// Searches with the latest user message plus a fixed query suffix.
///
/// Same failure contract as the knowledge node: an error or no hits leaves
/// `live_search_result` empty and the turn continues.
pub struct LiveSearchNode {
    search: Arc<dyn WebSearch>,
    max_results: usize,
    query_suffix: String,
    policy: CallPolicy,
}

impl LiveSearchNode {
    pub fn new(
        search: Arc<dyn WebSearch>,
        max_results: usize,
        query_suffix: impl Into<String>,
        policy: CallPolicy,
    ) -> Self {
        Self {
            search,
            max_results,
            query_suffix: query_suffix.into(),
            policy,
        }
    }
}

#[async_trait]
impl Node<TurnState> for LiveSearchNode {
    fn id(&self) -> &str {
        super::LIVE_SEARCH
    }

    async fn run(&self, mut state: TurnState) -> Result<(TurnState, Next), AgentError> {
        let query = format!("{}{}", state.latest_user_text(), self.query_suffix);
        let result = self
            .policy
            .call("web_search", || self.search.search(&query, self.max_results))
            .await;
        match result {
            Ok(hits) => {
                debug!(session_id = %state.session.id, count = hits.len(), "search results");
                state.context.live_search_result =
                    Some(format_hits(&hits)).filter(|s| !s.is_empty());
            }
            Err(e) => {
                warn!(session_id = %state.session.id, error = %e, "live search failed");
                state.context.live_search_result = None;
                state.delta.error = Some(format!("live search: {}", e));
            }
        }
        Ok((state, Next::Continue))
    }
}
