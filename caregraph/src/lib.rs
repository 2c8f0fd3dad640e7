//! # caregraph
//!
//! Routes a discharged patient's chat turn through a small graph of cooperating nodes and
//! keeps per-session conversation state across turns.
//!
//! ## Turn graph
//!
//! Every turn starts at **intake**. Until a patient is identified, intake treats the input
//! as a name and looks it up. Once identified, routine questions are answered by intake
//! itself; messages with symptom or research terms are handed off to the **concern
//! router**, which picks at most one retrieval strategy (live search outranks prior
//! knowledge), and the **response** node composes the final reply with a source line
//! naming the retrieval that contributed.
//!
//! ## Design Principles
//!
//! - **State in, state out**: nodes receive a [`TurnState`] and return it updated. The
//!   session snapshot is read-only during the turn; nodes write a [`TurnDelta`] that the
//!   engine folds into the [`Session`] with [`Session::apply`].
//! - **Soft collaborators**: retrieval, search, generation and lookup failures degrade to
//!   empty context or fixed fallback text. Only persistence failures and broken internal
//!   invariants reach the caller as [`AgentError`].
//! - **One turn per session at a time**: [`ConversationEngine`] serializes turns per session
//!   id and persists only after the graph finished.
//!
//! ## Main Modules
//!
//! - [`graph`]: `StateGraph`, `CompiledStateGraph`, `Node`, `Next`, conditional edges.
//! - [`nodes`]: intake, concern router, knowledge retrieval, live search, response.
//! - [`classify`]: keyword vocabularies and concern classification.
//! - [`engine`]: `ConversationEngine`, `EngineBuilder`, `EngineConfig`, `TurnOutcome`.
//! - [`memory`]: `SessionStore`, in-memory and SQLite stores, per-session locks.
//! - [`llm`], [`retrieval`], [`search`], [`patient`]: collaborator traits and adapters.
//!
//! ## Features
//!
//! - `sqlite` (default): `SqliteSessionStore`.
//! - `openai`: `ChatOpenAI` and `OpenAIEmbedder` via `async-openai`.
//! - `web`: `DuckDuckGoSearch` via `reqwest`.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use caregraph::mock::{MockPatientDirectory, MockRetriever, MockWebSearch};
//! use caregraph::{ConversationEngine, MockLlm};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = ConversationEngine::builder(
//!     Arc::new(MockPatientDirectory::new(vec![])),
//!     Arc::new(MockRetriever::empty()),
//!     Arc::new(MockWebSearch::empty()),
//!     Arc::new(MockLlm::with_reply("Happy to help.")),
//! )
//! .build()?;
//!
//! let first = engine.process_turn(None, "Noah Bennett").await?;
//! let next = engine
//!     .process_turn(Some(&first.session_id), "When is my follow-up?")
//!     .await?;
//! println!("{}", next.reply);
//! # Ok(())
//! # }
//! ```

pub mod classify;
pub mod collab;
pub mod engine;
pub mod error;
pub mod graph;
pub mod llm;
pub mod memory;
pub mod message;
pub mod mock;
pub mod nodes;
pub mod patient;
pub mod retrieval;
pub mod search;
pub mod state;

pub use classify::{classify_concern, needs_handoff, KeywordSet, RetrievalChoice};
pub use collab::CallPolicy;
pub use engine::{ConversationEngine, EngineBuilder, EngineConfig, TurnOutcome};
pub use error::AgentError;
pub use graph::{CompilationError, CompiledStateGraph, Next, Node, NodeMiddleware, StateGraph};
#[cfg(feature = "openai")]
pub use llm::ChatOpenAI;
pub use llm::{GenerationRequest, LlmClient, MockLlm};
#[cfg(feature = "sqlite")]
pub use memory::SqliteSessionStore;
pub use memory::{JsonSerializer, MemorySessionStore, SessionLocks, SessionStore, StoreError};
pub use message::{HistoryEntry, Message, Role};
pub use patient::{
    DirectoryError, InMemoryPatientDirectory, PatientDirectory, PatientLookup, PatientRecord,
};
#[cfg(feature = "openai")]
pub use retrieval::OpenAIEmbedder;
pub use retrieval::{Embedder, InMemoryKnowledgeBase, KnowledgeRetriever, RetrievedChunk};
#[cfg(feature = "web")]
pub use search::DuckDuckGoSearch;
pub use search::{SearchHit, WebSearch};
pub use state::{ActiveRole, Session, TurnContext, TurnDelta, TurnState};
