//! Google Gemini Provider - streamed chat sessions

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

use crate::infrastructure::llm::sse::SseDecoder;
use crate::infrastructure::llm::{ChatOptions, FragmentStream, LLMChat, LLMError, LLMMessage, LLMResult, LLM};

/// Gemini API endpoint
const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Fragments buffered between the HTTP reader and the consumer
const STREAM_BUFFER: usize = 32;

/// Gemini provider
pub struct GeminiProvider {
    api_key: String,
    client: Client,
    base_url: String,
}

impl GeminiProvider {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            client: Client::new(),
            base_url: API_BASE.to_string(),
        }
    }

    /// Point the provider at another API root (proxies, mock servers)
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

impl LLM for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    fn create_chat(&self, options: ChatOptions) -> Box<dyn LLMChat> {
        tracing::debug!("Creating Gemini chat session with model {}", options.model);
        Box::new(GeminiChat {
            api_key: self.api_key.clone(),
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            options,
            history: Arc::new(Mutex::new(Vec::new())),
        })
    }
}

/// One Gemini conversation. Gemini is stateless, so the session replays
/// its history with each request.
pub struct GeminiChat {
    api_key: String,
    client: Client,
    base_url: String,
    options: ChatOptions,
    history: Arc<Mutex<Vec<LLMMessage>>>,
}

impl GeminiChat {
    fn stream_url(&self) -> String {
        format!(
            "{}/models/{}:streamGenerateContent?alt=sse",
            self.base_url, self.options.model
        )
    }

    fn build_request(&self, message: &str) -> GenerateRequest {
        let history = self.history.lock().map(|h| h.clone()).unwrap_or_default();
        let mut contents: Vec<Content> = history.iter().map(Content::from).collect();
        contents.push(Content::from(&LLMMessage::user(message)));

        GenerateRequest {
            contents,
            system_instruction: self.options.system_instruction.as_ref().map(|text| SystemInstruction {
                parts: vec![Part { text: text.clone() }],
            }),
            generation_config: GenerationConfig {
                temperature: Some(self.options.temperature),
                max_output_tokens: self.options.max_tokens,
            },
        }
    }
}

/// API request structure
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
    generation_config: GenerationConfig,
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Content {
    #[serde(default)]
    role: String,
    #[serde(default)]
    parts: Vec<Part>,
}

impl From<&LLMMessage> for Content {
    fn from(msg: &LLMMessage) -> Self {
        Self {
            role: msg.role.clone(),
            parts: vec![Part { text: msg.content.clone() }],
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Default)]
struct Part {
    #[serde(default)]
    text: String,
}

#[derive(Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

/// One streamed response chunk
#[derive(Deserialize, Debug)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    error: Option<ApiErrorBody>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    #[serde(default)]
    content: Content,
}

#[derive(Deserialize, Debug)]
struct ApiErrorBody {
    #[serde(default)]
    message: String,
}

/// Text carried by one SSE payload, `None` for chunks without text
fn chunk_text(payload: &str) -> LLMResult<Option<String>> {
    let response: GenerateResponse =
        serde_json::from_str(payload).map_err(|e| LLMError::ParseError(e.to_string()))?;

    if let Some(error) = response.error {
        return Err(LLMError::ApiError(error.message));
    }

    let text: String = response
        .candidates
        .into_iter()
        .next()
        .map(|c| c.content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();

    Ok(if text.is_empty() { None } else { Some(text) })
}

/// Record a completed exchange. Both turns land together; an exchange
/// whose reply has no text is dropped, as the API rejects empty parts.
fn commit_turn(history: &Mutex<Vec<LLMMessage>>, user_turn: LLMMessage, reply: String) {
    if reply.is_empty() {
        tracing::warn!("Reply carried no text, leaving it out of the history");
        return;
    }
    if let Ok(mut history) = history.lock() {
        history.push(user_turn);
        history.push(LLMMessage::model(reply));
    }
}

#[async_trait]
impl LLMChat for GeminiChat {
    async fn send_message_stream(&mut self, message: &str) -> LLMResult<FragmentStream> {
        if self.api_key.is_empty() {
            return Err(LLMError::MissingApiKey);
        }

        let request = self.build_request(message);

        let response = self.client
            .post(self.stream_url())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| LLMError::NetworkError(e.to_string()))?;

        if response.status() == 429 {
            return Err(LLMError::RateLimited);
        }

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(LLMError::ApiError(format!("status: {}, body: {}", status, body)));
        }

        let (tx, rx) = mpsc::channel(STREAM_BUFFER);
        let history = Arc::clone(&self.history);
        let user_turn = LLMMessage::user(message);

        tokio::spawn(async move {
            let mut response = response;
            let mut decoder = SseDecoder::new();
            let mut reply = String::new();

            loop {
                let payloads = match response.chunk().await {
                    Ok(Some(bytes)) => decoder.push(&bytes),
                    Ok(None) => break,
                    Err(e) => {
                        let _ = tx.send(Err(LLMError::NetworkError(e.to_string()))).await;
                        return;
                    }
                };
                for payload in payloads {
                    match chunk_text(&payload) {
                        Ok(Some(text)) => {
                            reply.push_str(&text);
                            if tx.send(Ok(text)).await.is_err() {
                                tracing::debug!("Reply stream dropped before completion");
                                return;
                            }
                        }
                        Ok(None) => {}
                        Err(e) => {
                            let _ = tx.send(Err(e)).await;
                            return;
                        }
                    }
                }
            }

            for payload in decoder.finish() {
                match chunk_text(&payload) {
                    Ok(Some(text)) => {
                        reply.push_str(&text);
                        if tx.send(Ok(text)).await.is_err() {
                            return;
                        }
                    }
                    Ok(None) => {}
                    Err(e) => {
                        let _ = tx.send(Err(e)).await;
                        return;
                    }
                }
            }

            commit_turn(&history, user_turn, reply);
        });

        Ok(FragmentStream::new(rx))
    }

    fn history(&self) -> Vec<LLMMessage> {
        self.history.lock().map(|h| h.clone()).unwrap_or_default()
    }
}
