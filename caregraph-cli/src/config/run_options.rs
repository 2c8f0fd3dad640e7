//! Optional overrides for a run (CLI args or programmatic).
//!
//! Used by [`RunConfig::apply_options`](super::RunConfig::apply_options). Callers (the
//! binary or tests) build a `RunOptions` and apply it on top of the env-based config.

use std::path::PathBuf;

/// Optional overrides: temperature, patient data, knowledge corpus, session database.
///
/// All fields are optional; only set fields override the base config (from env).
#[derive(Clone, Debug, Default)]
pub struct RunOptions {
    /// Override sampling temperature (0–2).
    pub temperature: Option<f32>,
    /// Override the patient data JSON file.
    pub patients_path: Option<PathBuf>,
    /// Override the knowledge corpus JSON file.
    pub knowledge_path: Option<PathBuf>,
    /// Persist sessions to this SQLite file.
    pub db_path: Option<PathBuf>,
    /// Log node enter/exit for every turn.
    pub verbose: bool,
}
