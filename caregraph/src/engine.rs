//! Conversation engine: one compiled turn graph plus session persistence.
//!
//! A turn runs under its session's lock: load (or create) the session, run the graph on a
//! [`TurnState`], fold the turn's delta into the session with [`Session::apply`], save.
//! The session is written only after the graph finished, so a turn that errors or whose
//! future is dropped leaves the stored session as it was.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{info, warn};
use uuid::Uuid;

use crate::collab::{CallPolicy, DEFAULT_RETRIES, DEFAULT_TIMEOUT};
use crate::error::AgentError;
use crate::graph::{
    CompilationError, CompiledStateGraph, NodeMiddleware, StateGraph, DEFAULT_MAX_STEPS, END,
    START,
};
use crate::llm::LlmClient;
use crate::memory::{MemorySessionStore, SessionLocks, SessionStore};
use crate::message::HistoryEntry;
use crate::nodes::{
    self, ConcernRouterNode, IntakeNode, KnowledgeRetrievalNode, LiveSearchNode, ResponseNode,
};
use crate::patient::PatientDirectory;
use crate::retrieval::KnowledgeRetriever;
use crate::search::WebSearch;
use crate::state::{ActiveRole, Session, TurnState};

/// Tunables for collaborator calls and graph execution.
#[derive(Clone, Debug, PartialEq)]
pub struct EngineConfig {
    /// Passages requested from the knowledge base.
    pub knowledge_top_k: usize,
    /// Hits requested from live search.
    pub max_search_results: usize,
    /// Per-attempt deadline for every collaborator call.
    pub collaborator_timeout: Duration,
    /// Retries after a failed or timed-out collaborator call.
    pub collaborator_retries: u32,
    /// Appended to the user's text before live search.
    pub search_query_suffix: String,
    /// Node executions allowed per turn.
    pub max_steps: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            knowledge_top_k: 3,
            max_search_results: 3,
            collaborator_timeout: DEFAULT_TIMEOUT,
            collaborator_retries: DEFAULT_RETRIES,
            search_query_suffix: " medical health information".to_string(),
            max_steps: DEFAULT_MAX_STEPS,
        }
    }
}

impl EngineConfig {
    /// Defaults overridden by `CAREGRAPH_TOP_K`, `CAREGRAPH_MAX_SEARCH_RESULTS`,
    /// `CAREGRAPH_TIMEOUT_SECS` and `CAREGRAPH_RETRIES`. Unparsable values are ignored
    /// with a warning.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        if let Some(v) = env_parse::<usize>("CAREGRAPH_TOP_K") {
            config.knowledge_top_k = v;
        }
        if let Some(v) = env_parse::<usize>("CAREGRAPH_MAX_SEARCH_RESULTS") {
            config.max_search_results = v;
        }
        if let Some(v) = env_parse::<u64>("CAREGRAPH_TIMEOUT_SECS") {
            config.collaborator_timeout = Duration::from_secs(v);
        }
        if let Some(v) = env_parse::<u32>("CAREGRAPH_RETRIES") {
            config.collaborator_retries = v;
        }
        config
    }

    pub fn call_policy(&self) -> CallPolicy {
        CallPolicy::new(self.collaborator_timeout, self.collaborator_retries)
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!(key, value = %raw, "ignoring unparsable environment value");
            None
        }
    }
}

/// Result of one completed turn.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub reply: String,
    pub session_id: String,
    /// The reply cites the knowledge base.
    pub used_prior_knowledge: bool,
    /// The reply cites live search results.
    pub used_live_search: bool,
    pub turn_count: u64,
    pub patient_name: Option<String>,
    pub active_role: ActiveRole,
    /// Node ids visited this turn, in order.
    pub path: Vec<String>,
}

/// Builds a [`ConversationEngine`] from its collaborators.
pub struct EngineBuilder {
    directory: Arc<dyn PatientDirectory>,
    retriever: Arc<dyn KnowledgeRetriever>,
    search: Arc<dyn WebSearch>,
    llm: Arc<dyn LlmClient>,
    store: Option<Arc<dyn SessionStore>>,
    middleware: Option<Arc<dyn NodeMiddleware<TurnState>>>,
    config: EngineConfig,
}

impl EngineBuilder {
    /// Session store; defaults to [`MemorySessionStore`].
    pub fn with_store(mut self, store: Arc<dyn SessionStore>) -> Self {
        self.store = Some(store);
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Wraps every node run, e.g. for logging.
    pub fn with_middleware(mut self, middleware: Arc<dyn NodeMiddleware<TurnState>>) -> Self {
        self.middleware = Some(middleware);
        self
    }

    pub fn build(self) -> Result<ConversationEngine, CompilationError> {
        let policy = self.config.call_policy();
        let mut graph = StateGraph::<TurnState>::new();
        graph
            .add_node(
                nodes::INTAKE,
                Arc::new(IntakeNode::new(self.directory, self.llm.clone(), policy)),
            )
            .add_node(nodes::CONCERN_ROUTER, Arc::new(ConcernRouterNode))
            .add_node(
                nodes::KNOWLEDGE_RETRIEVAL,
                Arc::new(KnowledgeRetrievalNode::new(
                    self.retriever,
                    self.config.knowledge_top_k,
                    policy,
                )),
            )
            .add_node(
                nodes::LIVE_SEARCH,
                Arc::new(LiveSearchNode::new(
                    self.search,
                    self.config.max_search_results,
                    self.config.search_query_suffix.clone(),
                    policy,
                )),
            )
            .add_node(nodes::RESPONSE, Arc::new(ResponseNode::new(self.llm, policy)))
            .add_edge(START, nodes::INTAKE)
            .add_conditional_edges(
                nodes::INTAKE,
                nodes::route_after_intake,
                [(nodes::CONCERN_ROUTER, nodes::CONCERN_ROUTER), (END, END)],
            )
            .add_conditional_edges(
                nodes::CONCERN_ROUTER,
                nodes::route_after_concern,
                [
                    (nodes::LIVE_SEARCH, nodes::LIVE_SEARCH),
                    (nodes::KNOWLEDGE_RETRIEVAL, nodes::KNOWLEDGE_RETRIEVAL),
                    (nodes::RESPONSE, nodes::RESPONSE),
                ],
            )
            .add_edge(nodes::LIVE_SEARCH, nodes::RESPONSE)
            .add_edge(nodes::KNOWLEDGE_RETRIEVAL, nodes::RESPONSE)
            .add_edge(nodes::RESPONSE, END);

        let graph = match self.middleware {
            Some(m) => graph.with_middleware(m),
            None => graph,
        };
        let compiled = graph.compile()?.with_max_steps(self.config.max_steps);

        Ok(ConversationEngine {
            graph: compiled,
            store: self
                .store
                .unwrap_or_else(|| Arc::new(MemorySessionStore::new())),
            locks: SessionLocks::new(),
        })
    }
}

/// Runs chat turns against per-session state.
///
/// Construct once at startup and share (e.g. behind `Arc`); it holds no global state.
pub struct ConversationEngine {
    graph: CompiledStateGraph<TurnState>,
    store: Arc<dyn SessionStore>,
    locks: SessionLocks,
}

impl ConversationEngine {
    pub fn builder(
        directory: Arc<dyn PatientDirectory>,
        retriever: Arc<dyn KnowledgeRetriever>,
        search: Arc<dyn WebSearch>,
        llm: Arc<dyn LlmClient>,
    ) -> EngineBuilder {
        EngineBuilder {
            directory,
            retriever,
            search,
            llm,
            store: None,
            middleware: None,
            config: EngineConfig::default(),
        }
    }

    /// Processes one user message.
    ///
    /// `session_id` of `None` (or blank) starts a new session with a fresh id. Turns on the
    /// same id run one at a time in arrival order; turns on different ids run concurrently.
    pub async fn process_turn(
        &self,
        session_id: Option<&str>,
        text: &str,
    ) -> Result<TurnOutcome, AgentError> {
        let id = session_id
            .map(session_key)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let _guard = self.locks.acquire(&id).await;
        let session = self
            .store
            .load(&id)
            .await?
            .unwrap_or_else(|| Session::new(id.clone()));

        let (state, path) = self
            .graph
            .invoke_traced(TurnState::new(session, text))
            .await?;

        let TurnState {
            mut session,
            context,
            delta,
            ..
        } = state;
        session.apply(delta)?;
        self.store.save(&session).await?;

        let reply = session
            .messages
            .last()
            .map(|m| m.text().to_string())
            .unwrap_or_default();
        info!(
            session_id = %session.id,
            turn = session.turn_count,
            path = ?path,
            used_prior_knowledge = context.used_prior_knowledge,
            used_live_search = context.used_live_search,
            "turn complete"
        );

        Ok(TurnOutcome {
            reply,
            patient_name: session.patient_name().map(str::to_string),
            session_id: session.id,
            used_prior_knowledge: context.used_prior_knowledge,
            used_live_search: context.used_live_search,
            turn_count: session.turn_count,
            active_role: session.active_role,
            path,
        })
    }

    /// Ordered message log of a session; empty for an unknown id.
    pub async fn history(&self, session_id: &str) -> Result<Vec<HistoryEntry>, AgentError> {
        let session = self.store.load(session_key(session_id)).await?;
        Ok(session
            .map(|s| s.messages.iter().map(HistoryEntry::from).collect())
            .unwrap_or_default())
    }

    /// Snapshot of a stored session.
    pub async fn session(&self, session_id: &str) -> Result<Option<Session>, AgentError> {
        Ok(self.store.load(session_key(session_id)).await?)
    }

    /// Detaches the session's patient so a different one can be identified.
    /// Returns false when the session does not exist.
    pub async fn clear_patient(&self, session_id: &str) -> Result<bool, AgentError> {
        let session_id = session_key(session_id);
        let _guard = self.locks.acquire(session_id).await;
        let Some(mut session) = self.store.load(session_id).await? else {
            return Ok(false);
        };
        session.clear_patient();
        self.store.save(&session).await?;
        info!(session_id, "patient cleared");
        Ok(true)
    }
}

/// Session ids are compared with surrounding whitespace removed.
fn session_key(id: &str) -> &str {
    id.trim()
}
