//! OpenAI Chat Completions client implementing `LlmClient` (ChatOpenAI).
//!
//! Uses the real OpenAI Chat Completions API. Requires `OPENAI_API_KEY` (or
//! explicit config). Depends on `async_openai` (feature `openai`).

use async_trait::async_trait;

use async_openai::{
    config::OpenAIConfig,
    types::chat::{
        ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
        ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
    },
    Client,
};

use crate::error::AgentError;
use crate::llm::{GenerationRequest, LlmClient};
use crate::message::Message;

/// OpenAI Chat Completions client implementing `LlmClient`.
///
/// Uses `OPENAI_API_KEY` from the environment by default; or provide config via
/// `ChatOpenAI::with_config`.
pub struct ChatOpenAI {
    client: Client<OpenAIConfig>,
    model: String,
    temperature: Option<f32>,
}

impl ChatOpenAI {
    /// Build client with default config (API key from `OPENAI_API_KEY` env).
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            model: model.into(),
            temperature: None,
        }
    }

    /// Build client with custom config (e.g. custom API key or base URL).
    pub fn with_config(config: OpenAIConfig, model: impl Into<String>) -> Self {
        Self {
            client: Client::with_config(config),
            model: model.into(),
            temperature: None,
        }
    }

    /// Set temperature (0–2). Lower values are more deterministic.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    /// System blocks first, then history, then the query as the last user message.
    fn request_messages(request: &GenerationRequest) -> Vec<ChatCompletionRequestMessage> {
        let system = request.system.iter().map(|s| {
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage::from(
                s.as_str(),
            ))
        });
        let history = request.history.iter().map(|m| match m {
            Message::User(s) => {
                ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage::from(s.as_str()))
            }
            Message::Assistant(s) => ChatCompletionRequestMessage::Assistant(s.as_str().into()),
        });
        let query = std::iter::once(ChatCompletionRequestMessage::User(
            ChatCompletionRequestUserMessage::from(request.query.as_str()),
        ));
        system.chain(history).chain(query).collect()
    }
}

#[async_trait]
impl LlmClient for ChatOpenAI {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, AgentError> {
        let mut args = CreateChatCompletionRequestArgs::default();
        args.model(self.model.clone());
        args.messages(Self::request_messages(request));
        if let Some(t) = self.temperature {
            args.temperature(t);
        }

        let request = args.build().map_err(|e| {
            AgentError::ExecutionFailed(format!("OpenAI request build failed: {}", e))
        })?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| AgentError::ExecutionFailed(format!("OpenAI API error: {}", e)))?;

        let choice = response.choices.into_iter().next().ok_or_else(|| {
            AgentError::ExecutionFailed("OpenAI returned no choices".to_string())
        })?;

        Ok(choice.message.content.unwrap_or_default())
    }
}
