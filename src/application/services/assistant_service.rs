//! Site assistant: a chat relay holding one model session, and the
//! conversation shown in the chat widget.

use std::sync::Arc;

use crate::domain::entities::ChatMessage;
use crate::infrastructure::llm::{ChatOptions, FragmentStream, LLMChat, LLMError, LLMResult, LLM};

pub const WELCOME_MESSAGE: &str = "Bonjour. Je suis Zetsu AI. Comment puis-je vous aider à sécuriser votre système aujourd'hui ? Je peux analyser des scénarios de risque ou vous expliquer nos fonctionnalités.";
pub const RESET_MESSAGE: &str = "Session réinitialisée. En attente de nouvelles directives de sécurité.";

/// Handle on one assistant conversation. The model session is created on
/// the first send and replaced wholesale on reset.
pub struct ChatRelay {
    provider: Arc<dyn LLM>,
    options: ChatOptions,
    session: Option<Box<dyn LLMChat>>,
}

impl ChatRelay {
    pub fn new(provider: Arc<dyn LLM>, options: ChatOptions) -> Self {
        Self {
            provider,
            options,
            session: None,
        }
    }

    /// Send the next user turn; the reply arrives as a fragment stream
    pub async fn send_message(&mut self, text: &str) -> LLMResult<FragmentStream> {
        let session = self
            .session
            .get_or_insert_with(|| self.provider.create_chat(self.options.clone()));

        session.send_message_stream(text).await.map_err(|e| {
            tracing::error!("Assistant error ({}): {}", self.provider.name(), e);
            e
        })
    }

    /// Drop the session; the next send starts with no memory of prior turns
    pub fn reset(&mut self) {
        self.session = None;
    }

    pub fn has_session(&self) -> bool {
        self.session.is_some()
    }
}

/// Messages displayed in the chat widget, oldest first
pub struct Conversation {
    messages: Vec<ChatMessage>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![ChatMessage::model(WELCOME_MESSAGE).with_id("welcome")],
        }
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Send `input` through the relay, filling a model placeholder as
    /// fragments arrive. `on_fragment` sees each fragment once, in order.
    ///
    /// Blank input is ignored and returns `None`; otherwise returns the id
    /// of the message holding the outcome (the reply, or the error notice).
    pub async fn submit<F>(&mut self, relay: &mut ChatRelay, input: &str, mut on_fragment: F) -> Option<String>
    where
        F: FnMut(&str),
    {
        if input.trim().is_empty() {
            return None;
        }

        self.messages.push(ChatMessage::user(input));
        let placeholder = ChatMessage::placeholder();
        let reply_id = placeholder.id.clone();
        self.messages.push(placeholder);

        let mut stream = match relay.send_message(input).await {
            Ok(stream) => stream,
            Err(e) => return Some(self.fail(&reply_id, &e)),
        };

        let mut full_text = String::new();
        while let Some(fragment) = stream.next().await {
            match fragment {
                Ok(fragment) => {
                    full_text.push_str(&fragment);
                    self.set_text(&reply_id, &full_text);
                    on_fragment(&fragment);
                }
                Err(e) => {
                    tracing::error!("Assistant stream interrupted: {}", e);
                    return Some(self.fail(&reply_id, &e));
                }
            }
        }

        Some(reply_id)
    }

    /// Start over: new session and a single reset notice
    pub fn reset(&mut self, relay: &mut ChatRelay) {
        relay.reset();
        self.messages = vec![ChatMessage::model(RESET_MESSAGE)];
    }

    fn set_text(&mut self, id: &str, text: &str) {
        if let Some(msg) = self.messages.iter_mut().find(|m| m.id == id) {
            msg.text = text.to_string();
        }
    }

    /// Append the error notice, dropping the placeholder if nothing arrived
    fn fail(&mut self, placeholder_id: &str, error: &LLMError) -> String {
        self.messages.retain(|m| !(m.id == placeholder_id && m.text.is_empty()));
        let error = ChatMessage::error(error.user_message());
        let id = error.id.clone();
        self.messages.push(error);
        id
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
