//! Knowledge corpus file: a JSON array of passages, each either a plain string or an
//! object `{ "id": ..., "text": ... }`.

use std::path::Path;
use std::sync::Arc;

use caregraph::{Embedder, InMemoryKnowledgeBase};
use serde::Deserialize;
use tracing::info;

use super::RunError;

#[derive(Deserialize)]
#[serde(untagged)]
enum Passage {
    Text(String),
    Keyed { id: Option<String>, text: String },
}

/// Parses the corpus into `(id, text)` pairs. Passages without an id get `passage-{n}`;
/// blank passages are skipped.
pub fn parse_passages(json: &str) -> Result<Vec<(String, String)>, RunError> {
    let passages: Vec<Passage> =
        serde_json::from_str(json).map_err(|e| RunError::Knowledge(e.to_string()))?;
    Ok(passages
        .into_iter()
        .enumerate()
        .filter_map(|(n, p)| {
            let (id, text) = match p {
                Passage::Text(text) => (None, text),
                Passage::Keyed { id, text } => (id, text),
            };
            if text.trim().is_empty() {
                return None;
            }
            Some((id.unwrap_or_else(|| format!("passage-{}", n)), text))
        })
        .collect())
}

/// Builds the knowledge base, embedding every passage of `path` when one is given.
pub async fn load_knowledge_base(
    path: Option<&Path>,
    embedder: Arc<dyn Embedder>,
) -> Result<InMemoryKnowledgeBase, RunError> {
    let base = InMemoryKnowledgeBase::new(embedder);
    let Some(path) = path else {
        info!("no knowledge corpus configured; knowledge base is empty");
        return Ok(base);
    };
    let json = std::fs::read_to_string(path)
        .map_err(|e| RunError::Knowledge(format!("{}: {}", path.display(), e)))?;
    let passages = parse_passages(&json)?;
    base.add_documents(&passages).await?;
    info!(path = %path.display(), passages = base.len(), "knowledge base loaded");
    Ok(base)
}
