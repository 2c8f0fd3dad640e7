//! Scripted collaborators for tests and offline demos.
//!
//! Each mock returns a fixed answer or fails, can sleep before answering (to exercise
//! call deadlines), and records the queries it receives.

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;

use crate::patient::{
    DirectoryError, InMemoryPatientDirectory, PatientDirectory, PatientLookup, PatientRecord,
};
use crate::retrieval::{KnowledgeRetriever, RetrievalError, RetrievedChunk};
use crate::search::{SearchError, SearchHit, WebSearch};

fn record_query(log: &Mutex<Vec<String>>, query: &str) {
    if let Ok(mut q) = log.lock() {
        q.push(query.to_string());
    }
}

fn queries_of(log: &Mutex<Vec<String>>) -> Vec<String> {
    log.lock().map(|q| q.clone()).unwrap_or_default()
}

/// Patient directory over fixed records; lookups can be made to fail.
#[derive(Debug, Default)]
pub struct MockPatientDirectory {
    inner: InMemoryPatientDirectory,
    fail: bool,
    queries: Mutex<Vec<String>>,
}

impl MockPatientDirectory {
    pub fn new(records: Vec<PatientRecord>) -> Self {
        Self {
            inner: InMemoryPatientDirectory::new(records),
            ..Default::default()
        }
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    /// Names looked up so far, oldest first.
    pub fn queries(&self) -> Vec<String> {
        queries_of(&self.queries)
    }
}

#[async_trait]
impl PatientDirectory for MockPatientDirectory {
    async fn lookup(&self, name: &str) -> Result<PatientLookup, DirectoryError> {
        record_query(&self.queries, name);
        if self.fail {
            return Err(DirectoryError::Lookup("mock directory unavailable".into()));
        }
        self.inner.lookup(name).await
    }
}

/// Knowledge retriever returning fixed passages.
#[derive(Debug, Default)]
pub struct MockRetriever {
    chunks: Vec<RetrievedChunk>,
    fail: bool,
    delay: Option<Duration>,
    queries: Mutex<Vec<String>>,
}

impl MockRetriever {
    /// Returns these passages (scored in descending order) for every query.
    pub fn with_passages(passages: &[&str]) -> Self {
        let n = passages.len().max(1) as f32;
        Self {
            chunks: passages
                .iter()
                .enumerate()
                .map(|(i, p)| RetrievedChunk {
                    content: p.to_string(),
                    score: 1.0 - i as f32 / n,
                })
                .collect(),
            ..Default::default()
        }
    }

    /// Returns no passages.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queries(&self) -> Vec<String> {
        queries_of(&self.queries)
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl KnowledgeRetriever for MockRetriever {
    async fn query(&self, text: &str, k: usize) -> Result<Vec<RetrievedChunk>, RetrievalError> {
        record_query(&self.queries, text);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        if self.fail {
            return Err(RetrievalError::Backend("mock retriever unavailable".into()));
        }
        Ok(self.chunks.iter().take(k).cloned().collect())
    }
}

/// Web search returning fixed hits.
#[derive(Debug, Default)]
pub struct MockWebSearch {
    hits: Vec<SearchHit>,
    fail: bool,
    delay: Option<Duration>,
    queries: Mutex<Vec<String>>,
}

impl MockWebSearch {
    pub fn with_hits(hits: Vec<SearchHit>) -> Self {
        Self {
            hits,
            ..Default::default()
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Queries as sent, including any suffix the caller added.
    pub fn queries(&self) -> Vec<String> {
        queries_of(&self.queries)
    }

    pub fn call_count(&self) -> usize {
        self.queries.lock().map(|q| q.len()).unwrap_or(0)
    }
}

#[async_trait]
impl WebSearch for MockWebSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        record_query(&self.queries, query);
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
        if self.fail {
            return Err(SearchError::Transport("mock search unavailable".into()));
        }
        Ok(self.hits.iter().take(max_results).cloned().collect())
    }
}
