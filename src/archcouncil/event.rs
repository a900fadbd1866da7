//! Agent and group-chat event system.
//!
//! Implement [`EventHandler`] to be told when the conversation starts, who
//! was selected to speak, when each agent calls its LLM and how the run
//! ended. Both methods default to no-ops, so override only what you need.
//!
//! A handler registered through
//! [`GroupChat::with_event_handler`](crate::group_chat::GroupChat::with_event_handler)
//! is propagated to every agent added afterwards, so agent and chat events
//! arrive through the same callback.
//!
//! # Example
//!
//! ```rust
//! use archcouncil::event::{ChatEvent, EventHandler};
//! use async_trait::async_trait;
//!
//! struct PrintSpeakers;
//!
//! #[async_trait]
//! impl EventHandler for PrintSpeakers {
//!     async fn on_chat_event(&self, event: &ChatEvent) {
//!         if let ChatEvent::SpeakerSelected { agent_name, .. } = event {
//!             println!("next up: {}", agent_name);
//!         }
//!     }
//! }
//! ```

use crate::archcouncil::client_wrapper::TokenUsage;
use async_trait::async_trait;

/// Events emitted by an [`Agent`](crate::Agent) while it produces a reply.
#[derive(Debug, Clone)]
pub enum AgentEvent {
    /// A message from another speaker was routed into the agent's session.
    MessageReceived { agent_id: String, agent_name: String },

    /// The agent is about to produce a reply.
    GenerateStarted {
        agent_id: String,
        agent_name: String,
        /// Messages in the agent's session when generation started.
        history_len: usize,
    },

    /// The agent produced a reply.
    GenerateCompleted {
        agent_id: String,
        agent_name: String,
        /// `None` for human proxies and for providers that report no usage.
        tokens_used: Option<TokenUsage>,
        response_length: usize,
    },
}

/// Events emitted by a [`GroupChat`](crate::group_chat::GroupChat) run.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    RunStarted {
        run_id: String,
        chat_id: String,
        agent_count: usize,
        max_rounds: usize,
    },

    /// The speaker-selection policy chose the next agent.
    SpeakerSelected {
        run_id: String,
        round: usize,
        agent_id: String,
        agent_name: String,
    },

    AgentResponded {
        run_id: String,
        round: usize,
        agent_id: String,
        agent_name: String,
        tokens_used: Option<TokenUsage>,
        response_length: usize,
    },

    AgentFailed {
        run_id: String,
        round: usize,
        agent_id: String,
        agent_name: String,
        error: String,
    },

    /// The round cap stopped the conversation before the policy ended it.
    RoundLimitReached { run_id: String, max_rounds: usize },

    RunCompleted {
        run_id: String,
        chat_id: String,
        rounds: usize,
        total_tokens: usize,
        is_complete: bool,
    },
}

/// Receives agent and chat events. Both methods are no-ops by default.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn on_agent_event(&self, _event: &AgentEvent) {}

    async fn on_chat_event(&self, _event: &ChatEvent) {}
}

/// Forwards every event to the [`log`] facade.
///
/// Run lifecycle and speaker selection go out at `info`, per-agent LLM
/// activity at `debug`, failures at `error`.
#[derive(Debug, Default)]
pub struct LoggingEventHandler;

#[async_trait]
impl EventHandler for LoggingEventHandler {
    async fn on_agent_event(&self, event: &AgentEvent) {
        match event {
            AgentEvent::MessageReceived { agent_id, .. } => {
                log::debug!("[{}] routed message received", agent_id);
            }
            AgentEvent::GenerateStarted {
                agent_id,
                history_len,
                ..
            } => {
                log::debug!("[{}] generating ({} messages in session)", agent_id, history_len);
            }
            AgentEvent::GenerateCompleted {
                agent_id,
                tokens_used,
                response_length,
                ..
            } => {
                log::debug!(
                    "[{}] reply ready: {} chars, {} tokens",
                    agent_id,
                    response_length,
                    tokens_used.as_ref().map_or(0, |u| u.total_tokens)
                );
            }
        }
    }

    async fn on_chat_event(&self, event: &ChatEvent) {
        match event {
            ChatEvent::RunStarted {
                run_id,
                chat_id,
                agent_count,
                max_rounds,
            } => log::info!(
                "run {} of '{}' started: {} agents, at most {} rounds",
                run_id,
                chat_id,
                agent_count,
                max_rounds
            ),
            ChatEvent::SpeakerSelected {
                run_id,
                round,
                agent_name,
                ..
            } => log::info!("run {} round {}: {} speaks", run_id, round, agent_name),
            ChatEvent::AgentResponded {
                run_id,
                round,
                agent_name,
                response_length,
                ..
            } => log::debug!(
                "run {} round {}: {} answered with {} chars",
                run_id,
                round,
                agent_name,
                response_length
            ),
            ChatEvent::AgentFailed {
                run_id,
                round,
                agent_name,
                error,
                ..
            } => log::error!(
                "run {} round {}: {} failed: {}",
                run_id,
                round,
                agent_name,
                error
            ),
            ChatEvent::RoundLimitReached { run_id, max_rounds } => log::warn!(
                "run {} hit the {} round limit before the conversation ended",
                run_id,
                max_rounds
            ),
            ChatEvent::RunCompleted {
                run_id,
                rounds,
                total_tokens,
                is_complete,
                ..
            } => log::info!(
                "run {} finished after {} rounds ({} tokens, complete: {})",
                run_id,
                rounds,
                total_tokens,
                is_complete
            ),
        }
    }
}
