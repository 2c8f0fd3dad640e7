//! Text generation collaborator.
//!
//! Nodes that speak build a [`GenerationRequest`] (system context blocks, prior
//! conversation, current query) and hand it to an [`LlmClient`]. The client is opaque to
//! the graph; failures come back as `AgentError` and the calling node substitutes a fixed
//! fallback reply.

mod mock;
#[cfg(feature = "openai")]
mod openai;

pub use mock::MockLlm;
#[cfg(feature = "openai")]
pub use openai::ChatOpenAI;

use async_trait::async_trait;

use crate::error::AgentError;
use crate::message::Message;

/// One generation call: system context, history and the query to answer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GenerationRequest {
    /// System-level context blocks, in order (role prompt first).
    pub system: Vec<String>,
    /// Prior conversation, oldest first.
    pub history: Vec<Message>,
    pub query: String,
}

impl GenerationRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_system(mut self, block: impl Into<String>) -> Self {
        self.system.push(block.into());
        self
    }

    pub fn with_history(mut self, history: &[Message]) -> Self {
        self.history = history.to_vec();
        self
    }
}

/// LLM client: given a request, returns the assistant text.
///
/// Implementations: `MockLlm` (scripted), `ChatOpenAI` (real API, feature `openai`).
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AgentError>;
}
