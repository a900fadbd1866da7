//! Conversational agents bound to one council [`Participant`].
//!
//! An agent is either LLM-backed (it owns an [`LLMSession`] and asks its
//! [`ClientWrapper`] for every reply) or a human proxy. The human proxy opens
//! the conversation with the task; if it is ever asked to reply it answers
//! with its fixed auto-reply, since it never executes code or prompts a
//! terminal.
//!
//! ```rust,no_run
//! use archcouncil::Agent;
//! use archcouncil::clients::openai::OpenAIClient;
//! use archcouncil::participant::Participant;
//! use std::sync::Arc;
//!
//! let architect = Agent::new(
//!     Participant::CloudArchitect,
//!     Arc::new(OpenAIClient::new_with_model_string("key", "gpt-4o-mini")),
//! )
//! .with_system_message("You design managed-cloud architectures.");
//!
//! let supervisor = Agent::human_proxy(Participant::Supervisor);
//! assert!(supervisor.is_human_proxy());
//! ```

use crate::archcouncil::client_wrapper::{ClientError, ClientWrapper, Role, TokenUsage};
use crate::archcouncil::event::{AgentEvent, EventHandler};
use crate::archcouncil::llm_session::LLMSession;
use crate::archcouncil::participant::Participant;
use std::sync::Arc;

/// Default context budget for an agent's session.
pub const DEFAULT_MAX_TOKENS: usize = 8_192;

/// Reply produced by an agent for one turn.
#[derive(Debug, Clone)]
pub struct AgentResponse {
    pub content: String,
    /// Usage of the LLM call behind this reply, if any.
    pub tokens_used: Option<TokenUsage>,
}

enum AgentKind {
    Llm(LLMSession),
    HumanProxy { default_auto_reply: String },
}

/// A council member.
pub struct Agent {
    /// Role this agent plays. Also the key the group chat routes by.
    pub participant: Participant,
    /// Display name; defaults to the participant's display name.
    pub name: String,
    /// System message steering the agent. Opaque to the group chat.
    pub system_message: String,
    kind: AgentKind,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl Agent {
    /// Create an LLM-backed agent with an empty system message and the
    /// default context budget.
    pub fn new(participant: Participant, client: Arc<dyn ClientWrapper>) -> Self {
        Self {
            participant,
            name: participant.display_name().to_string(),
            system_message: String::new(),
            kind: AgentKind::Llm(LLMSession::new(client, String::new(), DEFAULT_MAX_TOKENS)),
            event_handler: None,
        }
    }

    /// Create a human-proxy agent. Its auto-reply defaults to an empty string.
    pub fn human_proxy(participant: Participant) -> Self {
        Self {
            participant,
            name: participant.display_name().to_string(),
            system_message: String::new(),
            kind: AgentKind::HumanProxy {
                default_auto_reply: String::new(),
            },
            event_handler: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Set the system message; LLM agents receive it as their system prompt.
    pub fn with_system_message(mut self, message: impl Into<String>) -> Self {
        self.system_message = message.into();
        if let AgentKind::Llm(session) = &mut self.kind {
            session.set_system_prompt(self.system_message.clone());
        }
        self
    }

    /// Override the context budget. Recreates the session, so call it before
    /// any message has been routed.
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        if let AgentKind::Llm(session) = &self.kind {
            let client = Arc::clone(session.client());
            self.kind = AgentKind::Llm(LLMSession::new(
                client,
                self.system_message.clone(),
                max_tokens,
            ));
        }
        self
    }

    /// Reply used by a human proxy when it is asked to speak. No-op for LLM agents.
    pub fn with_default_auto_reply(mut self, reply: impl Into<String>) -> Self {
        if let AgentKind::HumanProxy { default_auto_reply } = &mut self.kind {
            *default_auto_reply = reply.into();
        }
        self
    }

    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn set_event_handler(&mut self, handler: Arc<dyn EventHandler>) {
        self.event_handler = Some(handler);
    }

    pub fn id(&self) -> &'static str {
        self.participant.id()
    }

    pub fn is_human_proxy(&self) -> bool {
        matches!(self.kind, AgentKind::HumanProxy { .. })
    }

    /// Messages currently held in the agent's session (0 for human proxies).
    pub fn session_history_len(&self) -> usize {
        match &self.kind {
            AgentKind::Llm(session) => session.get_conversation_history().len(),
            AgentKind::HumanProxy { .. } => 0,
        }
    }

    /// Cumulative token usage of this agent's session.
    pub fn token_usage(&self) -> TokenUsage {
        match &self.kind {
            AgentKind::Llm(session) => session.token_usage(),
            AgentKind::HumanProxy { .. } => TokenUsage::default(),
        }
    }

    async fn emit(&self, event: AgentEvent) {
        if let Some(handler) = &self.event_handler {
            handler.on_agent_event(&event).await;
        }
    }

    /// Route a message from the conversation into this agent's session
    /// without calling the model.
    pub async fn receive_message(&mut self, role: Role, content: String) {
        if let AgentKind::Llm(session) = &mut self.kind {
            session.inject_message(role, content);
        }
        self.emit(AgentEvent::MessageReceived {
            agent_id: self.id().to_string(),
            agent_name: self.name.clone(),
        })
        .await;
    }

    /// Produce this agent's next reply from everything routed to it so far.
    pub async fn generate(&mut self) -> Result<AgentResponse, ClientError> {
        self.emit(AgentEvent::GenerateStarted {
            agent_id: self.id().to_string(),
            agent_name: self.name.clone(),
            history_len: self.session_history_len(),
        })
        .await;

        let response = match &mut self.kind {
            AgentKind::Llm(session) => {
                let (message, usage) = session.complete().await?;
                AgentResponse {
                    content: message.content,
                    tokens_used: usage,
                }
            }
            AgentKind::HumanProxy { default_auto_reply } => AgentResponse {
                content: default_auto_reply.clone(),
                tokens_used: None,
            },
        };

        self.emit(AgentEvent::GenerateCompleted {
            agent_id: self.id().to_string(),
            agent_name: self.name.clone(),
            tokens_used: response.tokens_used.clone(),
            response_length: response.content.len(),
        })
        .await;

        Ok(response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clients::openai::OpenAIClient;

    #[test]
    fn test_llm_agent_builder() {
        let agent = Agent::new(
            Participant::OssArchitect,
            Arc::new(OpenAIClient::new_with_model_string("test-key", "gpt-4o")),
        )
        .with_system_message("Prefer Kubernetes and PostgreSQL.")
        .with_max_tokens(4_096);

        assert_eq!(agent.id(), "oss_architect");
        assert_eq!(agent.name, "OSS Architect");
        assert_eq!(agent.system_message, "Prefer Kubernetes and PostgreSQL.");
        assert!(!agent.is_human_proxy());
        assert_eq!(agent.session_history_len(), 0);
    }

    #[tokio::test]
    async fn test_human_proxy_replies_with_auto_reply() {
        let mut supervisor = Agent::human_proxy(Participant::Supervisor)
            .with_name("Admin")
            .with_default_auto_reply("Carry on.");

        supervisor
            .receive_message(Role::User, "[Cloud Architect]: proposal".to_string())
            .await;
        let reply = supervisor.generate().await.unwrap();

        assert_eq!(reply.content, "Carry on.");
        assert!(reply.tokens_used.is_none());
        assert_eq!(supervisor.session_history_len(), 0);
        assert_eq!(supervisor.name, "Admin");
    }
}
