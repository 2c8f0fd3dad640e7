//! Configuration for running the care conversation from the command line.
//!
//! Re-exports [`RunConfig`], [`RunOptions`] and [`ConfigError`].

mod run_config;
mod run_options;

pub use run_config::{ConfigError, RunConfig, DEFAULT_PATIENTS_PATH};
pub use run_options::RunOptions;
