//! The `llm_session` module keeps one agent's side of the conversation:
//! its system prompt, the messages routed to it, its own replies, and the
//! token usage reported by the provider.
//!
//! When the last call reports more tokens than the configured window, the
//! oldest messages are pruned so the next request stays under budget.

use crate::archcouncil::client_wrapper::{ClientError, ClientWrapper, Message, Role, TokenUsage};
use std::sync::Arc;

/// A conversation session with an LLM.
///
/// - `client`: the `ClientWrapper` that performs the requests.
/// - `system_prompt`: the context-steering system message.
/// - `conversation_history`: user & assistant messages (system prompt excluded).
/// - `max_tokens`: context window budget.
/// - `usage`: cumulative token usage across every call in this session.
pub struct LLMSession {
    client: Arc<dyn ClientWrapper>,
    system_prompt: Message,
    conversation_history: Vec<Message>,
    max_tokens: usize,
    usage: TokenUsage,
}

impl LLMSession {
    pub fn new(client: Arc<dyn ClientWrapper>, system_prompt: String, max_tokens: usize) -> Self {
        LLMSession {
            client,
            system_prompt: Message {
                role: Role::System,
                content: system_prompt,
            },
            conversation_history: Vec::new(),
            max_tokens,
            usage: TokenUsage::default(),
        }
    }

    /// Ask the model for a reply to the current history without adding anything first.
    ///
    /// The reply is appended to the history. Returns the reply plus the usage
    /// reported for this single call, if the provider reported one.
    pub async fn complete(&mut self) -> Result<(Message, Option<TokenUsage>), ClientError> {
        let mut request = Vec::with_capacity(self.conversation_history.len() + 1);
        request.push(self.system_prompt.clone());
        request.extend(self.conversation_history.iter().cloned());

        let response = self.client.send_message(&request).await?;

        let last_usage = self.client.get_last_usage();
        if let Some(usage) = &last_usage {
            self.usage.accumulate(usage);
            if usage.total_tokens > self.max_tokens {
                self.trim_history(usage.total_tokens - self.max_tokens);
            }
        }

        self.conversation_history.push(response.clone());
        Ok((response, last_usage))
    }

    /// Add a message to the history without calling the model.
    pub fn inject_message(&mut self, role: Role, content: String) {
        self.conversation_history.push(Message { role, content });
    }

    /// Remove the oldest messages until at least `excess` estimated tokens are gone.
    fn trim_history(&mut self, mut excess: usize) {
        while excess > 0 && !self.conversation_history.is_empty() {
            let msg = self.conversation_history.remove(0);
            let removed = estimate_message_token_count(&msg);
            log::debug!("LLMSession: trimmed {} estimated tokens from history", removed);
            excess = excess.saturating_sub(removed);
        }
    }

    pub fn set_system_prompt(&mut self, prompt: String) {
        self.system_prompt = Message {
            role: Role::System,
            content: prompt,
        };
    }

    pub fn system_prompt_text(&self) -> &str {
        &self.system_prompt.content
    }

    pub fn get_conversation_history(&self) -> &[Message] {
        &self.conversation_history
    }

    /// Cumulative token usage of this session.
    pub fn token_usage(&self) -> TokenUsage {
        self.usage.clone()
    }

    pub fn client(&self) -> &Arc<dyn ClientWrapper> {
        &self.client
    }
}

/// Estimates the number of tokens in a string.
/// Uses an approximate formula: one token per 4 characters.
pub fn estimate_token_count(text: &str) -> usize {
    (text.len() / 4).max(1)
}

/// Estimates the number of tokens in a Message, including one token for the role.
pub fn estimate_message_token_count(message: &Message) -> usize {
    1 + estimate_token_count(&message.content)
}
