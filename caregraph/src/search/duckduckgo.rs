//! DuckDuckGo Instant Answer API adapter (feature `web`).

use async_trait::async_trait;
use serde_json::Value;

use super::{SearchError, SearchHit, WebSearch};

const DEFAULT_ENDPOINT: &str = "https://api.duckduckgo.com/";

/// Web search over the DuckDuckGo Instant Answer API.
///
/// The abstract (when present) comes first, followed by related topics. Nested topic
/// groups are flattened.
///
/// Instant Answer is not full web search: it only answers topic-like queries and returns
/// no abstract and no topics for most full-sentence questions. Live search then finds
/// nothing and the reply carries no live-search source line. Plug in a full web search
/// [`WebSearch`] implementation where that matters.
pub struct DuckDuckGoSearch {
    client: reqwest::Client,
    endpoint: String,
}

impl Default for DuckDuckGoSearch {
    fn default() -> Self {
        Self::new()
    }
}

impl DuckDuckGoSearch {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    /// Custom HTTP client, e.g. with proxy or timeout settings.
    pub fn with_client(client: reqwest::Client) -> Self {
        Self {
            client,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn parse(body: &Value, query: &str, max_results: usize) -> Vec<SearchHit> {
        let mut hits = Vec::new();
        let abstract_text = body["AbstractText"].as_str().unwrap_or_default();
        if !abstract_text.is_empty() {
            let heading = body["Heading"].as_str().filter(|h| !h.is_empty());
            hits.push(SearchHit::new(
                heading.unwrap_or(query),
                abstract_text,
                body["AbstractURL"].as_str().unwrap_or_default(),
            ));
        }
        let mut topics = Vec::new();
        if let Some(related) = body["RelatedTopics"].as_array() {
            flatten_topics(related, &mut topics);
        }
        for topic in topics {
            let text = topic["Text"].as_str().unwrap_or_default();
            if text.is_empty() {
                continue;
            }
            let title = text.split(" - ").next().unwrap_or(text);
            hits.push(SearchHit::new(
                title,
                text,
                topic["FirstURL"].as_str().unwrap_or_default(),
            ));
        }
        hits.truncate(max_results);
        hits
    }
}

fn flatten_topics<'a>(items: &'a [Value], out: &mut Vec<&'a Value>) {
    for item in items {
        match item["Topics"].as_array() {
            Some(nested) => flatten_topics(nested, out),
            None => out.push(item),
        }
    }
}

#[async_trait]
impl WebSearch for DuckDuckGoSearch {
    async fn search(&self, query: &str, max_results: usize) -> Result<Vec<SearchHit>, SearchError> {
        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("q", query),
                ("format", "json"),
                ("no_html", "1"),
                ("skip_disambig", "1"),
            ])
            .send()
            .await
            .map_err(|e| SearchError::Transport(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(SearchError::Transport(format!(
                "request failed with status: {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| SearchError::Parse(e.to_string()))?;

        Ok(Self::parse(&body, query, max_results))
    }
}
