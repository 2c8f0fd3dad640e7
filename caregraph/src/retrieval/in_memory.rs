use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;

use super::{Embedder, KnowledgeRetriever, RetrievalError, RetrievedChunk};

/// Pure in-memory knowledge base for semantic search.
///
/// **In-Memory**: All passages and vectors are lost when the knowledge base is dropped.
pub struct InMemoryKnowledgeBase {
    data: DashMap<String, VectorEntry>,
    embedder: Arc<dyn Embedder>,
}

#[derive(Clone)]
struct VectorEntry {
    vector: Vec<f32>,
    text: String,
}

impl InMemoryKnowledgeBase {
    pub fn new(embedder: Arc<dyn Embedder>) -> Self {
        Self {
            data: DashMap::new(),
            embedder,
        }
    }

    /// Embeds and stores passages keyed by id; an existing id is replaced.
    pub async fn add_documents(&self, docs: &[(String, String)]) -> Result<(), RetrievalError> {
        if docs.is_empty() {
            return Ok(());
        }
        let texts: Vec<&str> = docs.iter().map(|(_, t)| t.as_str()).collect();
        let vectors = self.embedder.embed(&texts).await?;
        if vectors.len() != docs.len() {
            return Err(RetrievalError::Embedding(format!(
                "expected {} vectors, got {}",
                docs.len(),
                vectors.len()
            )));
        }
        for ((id, text), vector) in docs.iter().zip(vectors) {
            self.data.insert(
                id.clone(),
                VectorEntry {
                    vector,
                    text: text.clone(),
                },
            );
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Cosine similarity; 0.0 if either vector has zero magnitude.
    fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
        let dot_product: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
        let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
        let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

        if norm_a == 0.0 || norm_b == 0.0 {
            0.0
        } else {
            dot_product / (norm_a * norm_b)
        }
    }
}

#[async_trait]
impl KnowledgeRetriever for InMemoryKnowledgeBase {
    async fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        if self.data.is_empty() || k == 0 {
            return Ok(Vec::new());
        }
        let query_vector = self
            .embedder
            .embed(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| RetrievalError::Embedding("no vector returned".into()))?;

        let mut hits: Vec<RetrievedChunk> = self
            .data
            .iter()
            .map(|entry| RetrievedChunk {
                content: entry.text.clone(),
                score: Self::cosine_similarity(&query_vector, &entry.vector),
            })
            .collect();
        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(k);
        Ok(hits)
    }
}
