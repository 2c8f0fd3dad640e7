//! Run entry points: wire the engine from config, run one message or an interactive loop.
//!
//! [`build_engine`] turns a [`RunConfig`] into a [`ConversationEngine`] backed by OpenAI,
//! DuckDuckGo, the knowledge corpus and the patient data file. [`run_once`] and
//! [`run_repl`] drive it and print replies.

mod knowledge;

use std::io::Write;
use std::sync::Arc;

use caregraph::retrieval::RetrievalError;
use caregraph::{
    AgentError, ChatOpenAI, CompilationError, ConversationEngine, DirectoryError,
    DuckDuckGoSearch, InMemoryPatientDirectory, LlmClient, OpenAIEmbedder, SessionStore,
    StoreError, TurnOutcome,
};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::info;

use crate::config::{ConfigError, RunConfig, RunOptions};
use crate::middleware::LoggingMiddleware;

pub use knowledge::{load_knowledge_base, parse_passages};

/// Input lines that end the interactive loop.
const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];
/// Input line that detaches the current patient so another can be identified.
pub const NEW_PATIENT_COMMAND: &str = "/new-patient";

/// Error running the CLI.
#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("patient data: {0}")]
    Directory(#[from] DirectoryError),
    #[error("knowledge corpus: {0}")]
    Knowledge(String),
    #[error("knowledge base: {0}")]
    Retrieval(#[from] RetrievalError),
    #[error("session store: {0}")]
    Store(#[from] StoreError),
    #[error("graph: {0}")]
    Compilation(#[from] CompilationError),
    #[error(transparent)]
    Agent(#[from] AgentError),
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// Loads `.env`, builds the config from env and applies `options`.
pub fn load_config(options: &RunOptions) -> Result<RunConfig, RunError> {
    dotenv::dotenv().ok();
    let mut config = RunConfig::from_env()?;
    config.apply_options(options);
    Ok(config)
}

/// Wires concrete collaborators into an engine. Does not read `.env`.
pub async fn build_engine(config: &RunConfig) -> Result<ConversationEngine, RunError> {
    let directory = InMemoryPatientDirectory::from_path(&config.patients_path)?;
    info!(
        path = %config.patients_path.display(),
        patients = directory.len(),
        "patient data loaded"
    );

    let embedder = Arc::new(OpenAIEmbedder::with_config(
        config.embedding_openai_config(),
        config.embedding_model(),
    ));
    let knowledge = load_knowledge_base(config.knowledge_path.as_deref(), embedder).await?;

    let mut llm = ChatOpenAI::with_config(config.chat_openai_config(), config.model.clone());
    if let Some(t) = config.temperature {
        llm = llm.with_temperature(t);
    }
    let llm: Arc<dyn LlmClient> = Arc::new(llm);

    let mut builder = ConversationEngine::builder(
        Arc::new(directory),
        Arc::new(knowledge),
        Arc::new(DuckDuckGoSearch::new()),
        llm,
    )
    .with_config(config.engine.clone());
    if let Some(store) = open_store(config)? {
        builder = builder.with_store(store);
    }
    if config.verbose {
        builder = builder.with_middleware(Arc::new(LoggingMiddleware));
    }
    Ok(builder.build()?)
}

#[cfg(feature = "sqlite")]
fn open_store(config: &RunConfig) -> Result<Option<Arc<dyn SessionStore>>, RunError> {
    match &config.db_path {
        Some(path) => {
            info!(path = %path.display(), "persisting sessions to sqlite");
            let store: Arc<dyn SessionStore> = Arc::new(caregraph::SqliteSessionStore::new(path)?);
            Ok(Some(store))
        }
        None => Ok(None),
    }
}

#[cfg(not(feature = "sqlite"))]
fn open_store(config: &RunConfig) -> Result<Option<Arc<dyn SessionStore>>, RunError> {
    if config.db_path.is_some() {
        tracing::warn!("built without sqlite; sessions stay in memory");
    }
    Ok(None)
}

/// Runs one message and prints the reply followed by the session id.
pub async fn run_once<W: Write>(
    engine: &ConversationEngine,
    session_id: Option<&str>,
    message: &str,
    out: &mut W,
) -> Result<TurnOutcome, RunError> {
    let outcome = engine.process_turn(session_id, message).await?;
    writeln!(out, "{}", outcome.reply)?;
    writeln!(out, "session: {}", outcome.session_id)?;
    Ok(outcome)
}

/// Reads lines from `input` and runs each as a turn against one session, printing replies.
///
/// Blank lines are skipped; `exit`/`quit` or end of input stops the loop and
/// [`NEW_PATIENT_COMMAND`] detaches the current patient. Returns the session id, if any
/// turn ran.
pub async fn run_repl<R, W>(
    engine: &ConversationEngine,
    session_id: Option<String>,
    input: R,
    out: &mut W,
) -> Result<Option<String>, RunError>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut session_id = session_id;
    let mut lines = input.lines();
    write!(out, "> ")?;
    out.flush()?;
    while let Some(line) = lines.next_line().await? {
        let line = line.trim();
        if EXIT_COMMANDS.contains(&line) {
            break;
        }
        if line == NEW_PATIENT_COMMAND {
            let cleared = match session_id.as_deref() {
                Some(id) => engine.clear_patient(id).await?,
                None => false,
            };
            if cleared {
                writeln!(out, "Patient cleared. Please tell me your full name.")?;
            } else {
                writeln!(out, "No patient to clear.")?;
            }
        } else if !line.is_empty() {
            let outcome = engine.process_turn(session_id.as_deref(), line).await?;
            writeln!(out, "{}", outcome.reply)?;
            session_id = Some(outcome.session_id);
        }
        write!(out, "> ")?;
        out.flush()?;
    }
    writeln!(out)?;
    if let Some(id) = &session_id {
        writeln!(out, "session: {}", id)?;
    }
    Ok(session_id)
}
