//! Live search: ranked web snippets for questions about recent information.

#[cfg(feature = "web")]
mod duckduckgo;

#[cfg(feature = "web")]
pub use duckduckgo::DuckDuckGoSearch;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Longest snippet kept from a search hit, in characters.
pub const MAX_SNIPPET_CHARS: usize = 500;

/// One ranked search result.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchHit {
    pub title: String,
    pub snippet: String,
    pub url: String,
}

impl SearchHit {
    /// Builds a hit, truncating the snippet to [`MAX_SNIPPET_CHARS`].
    pub fn new(title: impl Into<String>, snippet: &str, url: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: truncate_chars(snippet, MAX_SNIPPET_CHARS),
            url: url.into(),
        }
    }
}

#[derive(Debug, Error)]
pub enum SearchError {
    #[error("transport: {0}")]
    Transport(String),
    #[error("invalid response: {0}")]
    Parse(String),
}

/// Live search collaborator.
#[async_trait]
pub trait WebSearch: Send + Sync {
    /// At most `max_results` hits, best first.
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError>;
}

/// Renders hits as `Source:` / snippet / `URL:` blocks separated by blank lines.
pub fn format_hits(hits: &[SearchHit]) -> String {
    hits.iter()
        .map(|h| format!("Source: {}\n{}\nURL: {}", h.title, h.snippet, h.url))
        .collect::<Vec<_>>()
        .join("\n\n")
}

fn truncate_chars(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        Some((idx, _)) => s[..idx].to_string(),
        None => s.to_string(),
    }
}
