//! caregraph-cli library: configuration and run logic behind the `caregraph` binary.
//!
//! Reads OpenAI and data-file config from env / `.env`, wires a
//! [`ConversationEngine`](caregraph::ConversationEngine) with real collaborators and runs
//! one message or an interactive loop.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use caregraph_cli::{build_engine, load_config, run_once, RunOptions};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), caregraph_cli::RunError> {
//! let config = load_config(&RunOptions::default())?;
//! let engine = build_engine(&config).await?;
//! run_once(&engine, None, "Noah Bennett", &mut std::io::stdout()).await?;
//! # Ok(())
//! # }
//! ```

mod config;
mod middleware;
mod run;

pub use config::{ConfigError, RunConfig, RunOptions, DEFAULT_PATIENTS_PATH};
pub use middleware::LoggingMiddleware;
pub use run::{
    build_engine, load_config, load_knowledge_base, parse_passages, run_once, run_repl,
    RunError, NEW_PATIENT_COMMAND,
};

#[cfg(test)]
mod tests;
