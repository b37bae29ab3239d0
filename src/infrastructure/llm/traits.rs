//! LLM traits - Unified AI interface

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// Chat message for LLM conversations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LLMMessage {
    /// Role: "user" or "model"
    pub role: String,
    /// Message content
    pub content: String,
}

impl LLMMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn model(content: impl Into<String>) -> Self {
        Self {
            role: "model".to_string(),
            content: content.into(),
        }
    }
}

/// Settings fixed when a chat session is created
#[derive(Debug, Clone, PartialEq)]
pub struct ChatOptions {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    pub system_instruction: Option<String>,
}

/// LLM errors
#[derive(Debug, Clone, PartialEq)]
pub enum LLMError {
    /// API key missing
    MissingApiKey,
    /// API error from provider
    ApiError(String),
    /// Network error
    NetworkError(String),
    /// Rate limited
    RateLimited,
    /// Parse error
    ParseError(String),
}

impl LLMError {
    /// Message suitable for showing to a visitor
    pub fn user_message(&self) -> &'static str {
        match self {
            LLMError::MissingApiKey => "Module neuronal non configuré. Contactez l'administrateur du site.",
            LLMError::RateLimited => "Module neuronal saturé. Veuillez patienter avant de réessayer.",
            _ => "Erreur de connexion au module neuronal. Veuillez réessayer.",
        }
    }
}

impl std::fmt::Display for LLMError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LLMError::MissingApiKey => write!(f, "Missing API key"),
            LLMError::ApiError(msg) => write!(f, "API error: {}", msg),
            LLMError::NetworkError(msg) => write!(f, "Network error: {}", msg),
            LLMError::RateLimited => write!(f, "Rate limited"),
            LLMError::ParseError(msg) => write!(f, "Parse error: {}", msg),
        }
    }
}

impl std::error::Error for LLMError {}

/// Result type for LLM operations
pub type LLMResult<T> = Result<T, LLMError>;

/// Incrementally arriving reply text.
///
/// Fragments are yielded in order, each exactly once. The stream ends after
/// the last fragment or after the first error, and cannot be restarted.
pub struct FragmentStream {
    rx: mpsc::Receiver<LLMResult<String>>,
    failed: bool,
}

impl FragmentStream {
    pub fn new(rx: mpsc::Receiver<LLMResult<String>>) -> Self {
        Self { rx, failed: false }
    }

    /// Stream over an already known list of fragments
    pub fn from_fragments<I, S>(fragments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_results(fragments.into_iter().map(|f| Ok(f.into())))
    }

    /// Stream over known items, errors included
    pub fn from_results<I>(items: I) -> Self
    where
        I: IntoIterator<Item = LLMResult<String>>,
    {
        let items: Vec<_> = items.into_iter().collect();
        let (tx, rx) = mpsc::channel(items.len().max(1));
        for item in items {
            // Capacity covers every item
            let _ = tx.try_send(item);
        }
        Self::new(rx)
    }

    /// Next fragment, `None` once the reply is complete
    pub async fn next(&mut self) -> Option<LLMResult<String>> {
        if self.failed {
            return None;
        }
        let item = self.rx.recv().await;
        if matches!(item, Some(Err(_))) {
            self.failed = true;
        }
        item
    }

    /// Drain the stream into the full reply text
    pub async fn collect_text(mut self) -> LLMResult<String> {
        let mut text = String::new();
        while let Some(fragment) = self.next().await {
            text.push_str(&fragment?);
        }
        Ok(text)
    }
}

/// LLM Provider trait
pub trait LLM: Send + Sync {
    /// Get the provider name
    fn name(&self) -> &str;

    /// Open a fresh conversation with no prior turns
    fn create_chat(&self, options: ChatOptions) -> Box<dyn LLMChat>;
}

/// A conversation that remembers its previous turns
#[async_trait]
pub trait LLMChat: Send + Sync {
    /// Send the next user turn and stream the model reply
    async fn send_message_stream(&mut self, message: &str) -> LLMResult<FragmentStream>;

    /// Completed turns so far
    fn history(&self) -> Vec<LLMMessage>;
}
