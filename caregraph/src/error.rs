//! Execution error types.
//!
//! Returned by `Node::run`, `CompiledStateGraph::invoke` and `ConversationEngine`.
//! Collaborator failures (retrieval, search, generation) are normally absorbed by the
//! nodes and never reach the caller; what does reach the caller is either a persistence
//! failure or a broken internal contract.

use thiserror::Error;

use crate::memory::StoreError;

/// Agent / engine execution error.
#[derive(Debug, Error)]
pub enum AgentError {
    /// Execution failed with a message (e.g. LLM call failed, unknown route key).
    #[error("execution failed: {0}")]
    ExecutionFailed(String),

    /// A collaborator call did not finish within its deadline.
    #[error("timed out: {0}")]
    Timeout(String),

    /// An internal invariant was observed broken (e.g. both retrieval flags set).
    #[error("invariant violated: {0}")]
    InvariantViolation(String),

    /// Session load or save failed.
    #[error("session store: {0}")]
    Store(#[from] StoreError),
}
