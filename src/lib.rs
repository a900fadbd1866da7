//! # archcouncil
//!
//! An architecture council in a box: a human-proxy Supervisor and three
//! LLM-backed architects (Cloud, OSS, Lead) brainstorm a cloud/on-prem
//! architecture proposal in a fixed speaking order, and the transcript is
//! printed at the end.
//!
//! The crate is layered like this:
//!
//! * [`ClientWrapper`] is the provider seam; [`clients::openai::OpenAIClient`]
//!   implements it for OpenAI compatible Chat Completions endpoints.
//! * [`LLMSession`] keeps each agent's rolling history and token usage.
//! * [`Agent`] binds a [`participant::Participant`] to a session (or acts as a
//!   human proxy).
//! * [`sequencer::TurnSequencer`] decides who speaks after whom:
//!   Supervisor -> Cloud Architect -> OSS Architect -> Lead Architect -> end.
//! * [`group_chat::GroupChat`] drives the conversation under a round cap and
//!   emits [`event`]s along the way.
//! * [`transcript`] turns the recorded turns into plain text.
//!
//! ## Getting started
//!
//! ```rust,no_run
//! use archcouncil::{council, transcript, CouncilConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
//!     archcouncil::init_logger();
//!
//!     let config = CouncilConfig::from_env()?;
//!     let client = council::client_from_config(&config);
//!     let mut chat = council::build_council(&config, client, None)?;
//!
//!     let response = chat.run(council::task_for(&config)).await?;
//!     print!("{}", transcript::format_transcript(&response.messages));
//!     Ok(())
//! }
//! ```

use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialise the global [`env_logger`] subscriber exactly once.
///
/// Diagnostics are driven by `RUST_LOG`, e.g. `RUST_LOG=archcouncil=debug`.
///
/// ```rust
/// archcouncil::init_logger();
/// archcouncil::init_logger();
/// log::info!("Logger is ready");
/// ```
pub fn init_logger() {
    INIT_LOGGER.call_once(|| {
        env_logger::init();
    });
}

// Import the top-level `archcouncil` module.
pub mod archcouncil;

// Re-exporting key items for easier external access.
pub use crate::archcouncil::agent::Agent;
pub use crate::archcouncil::client_wrapper;
pub use crate::archcouncil::client_wrapper::{ClientWrapper, Message, Role, TokenUsage};
pub use crate::archcouncil::clients;
pub use crate::archcouncil::config::{ConfigError, CouncilConfig};
pub use crate::archcouncil::council;
pub use crate::archcouncil::event;
pub use crate::archcouncil::event::{AgentEvent, ChatEvent, EventHandler, LoggingEventHandler};
pub use crate::archcouncil::group_chat;
pub use crate::archcouncil::llm_session::LLMSession;
pub use crate::archcouncil::participant;
pub use crate::archcouncil::sequencer;
pub use crate::archcouncil::transcript;
