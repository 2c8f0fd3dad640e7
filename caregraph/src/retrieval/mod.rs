//! Prior-knowledge retrieval: top-k similarity lookup against a static corpus.
//!
//! The graph only sees [`KnowledgeRetriever`]; how the corpus is embedded and indexed is
//! up to the implementation. [`InMemoryKnowledgeBase`] ranks passages by cosine
//! similarity of vectors from an [`Embedder`].

mod in_memory;
#[cfg(feature = "openai")]
mod openai_embedder;

pub use in_memory::InMemoryKnowledgeBase;
#[cfg(feature = "openai")]
pub use openai_embedder::OpenAIEmbedder;

use async_trait::async_trait;
use thiserror::Error;

/// One retrieved passage with its relevance score (higher is more relevant).
#[derive(Clone, Debug, PartialEq)]
pub struct RetrievedChunk {
    pub content: String,
    pub score: f32,
}

/// Error from a retrieval backend or its embedder.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("embedding failed: {0}")]
    Embedding(String),
    #[error("backend failed: {0}")]
    Backend(String),
}

/// Similarity retrieval collaborator.
#[async_trait]
pub trait KnowledgeRetriever: Send + Sync {
    /// Up to `k` passages, most relevant first. Empty when nothing is indexed.
    async fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievedChunk>, RetrievalError>;
}

/// Turns texts into vectors, one per input, in input order.
#[async_trait]
pub trait Embedder: Send + Sync {
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RetrievalError>;
}

/// Renders passages as numbered `Source N:` blocks separated by blank lines.
pub fn format_chunks(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .enumerate()
        .map(|(i, c)| format!("Source {}:\n{}", i + 1, c.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
