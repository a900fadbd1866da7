//! The architecture council: four agents, their instructions, and the
//! group chat that makes them talk in order.
//!
//! ```rust
//! use archcouncil::council::build_council;
//! use archcouncil::participant::Participant;
//! use archcouncil::clients::openai::OpenAIClient;
//! use archcouncil::CouncilConfig;
//! use std::sync::Arc;
//!
//! let config = CouncilConfig::from_lookup(|key| match key {
//!     "OPENAI_API_KEY" => Some("sk-test".to_string()),
//!     "OPENAI_MODEL" => Some("gpt-4o-mini".to_string()),
//!     _ => None,
//! })
//! .unwrap();
//!
//! let client = Arc::new(OpenAIClient::new_with_model_string(&config.api_key, &config.model));
//! let chat = build_council(&config, client, None).unwrap();
//! let order: Vec<Participant> = chat.list_agents().iter().map(|a| a.participant).collect();
//! assert_eq!(order, Participant::ALL.to_vec());
//! ```

use crate::archcouncil::agent::Agent;
use crate::archcouncil::client_wrapper::ClientWrapper;
use crate::archcouncil::clients::openai::OpenAIClient;
use crate::archcouncil::config::CouncilConfig;
use crate::archcouncil::event::EventHandler;
use crate::archcouncil::group_chat::{ChatError, GroupChat};
use crate::archcouncil::participant::Participant;
use crate::archcouncil::sequencer::TurnSequencer;
use std::sync::Arc;

pub const COUNCIL_ID: &str = "architecture-council";
pub const COUNCIL_NAME: &str = "Architecture Council";

/// Task the supervisor opens with when none is configured.
pub const DEFAULT_TASK: &str = "We need an architecture proposal for a new customer-facing \
analytics platform: event ingestion at roughly 50k events per second, a queryable store \
for 13 months of history, dashboards for internal teams and a public API. \
The Cloud Architect proposes a managed-cloud design, the OSS Architect an open-source \
design that can run on-prem, and the Lead Architect compares both and recommends one.";

const SUPERVISOR_PROMPT: &str = "Supervisor. A human admin who states the problem and \
reviews the final recommendation.";

const CLOUD_ARCHITECT_PROMPT: &str = "You are the Cloud Architect. Propose an architecture \
built on managed services from a major public cloud provider. Name concrete services, \
describe how data flows between them, and cover scaling, security, availability and \
an order-of-magnitude monthly cost. Keep it to a structured proposal with short sections.";

const OSS_ARCHITECT_PROMPT: &str = "You are the OSS Architect. Read the Cloud Architect's \
proposal, then propose an alternative built only from open-source components that can run \
on-prem or on any infrastructure. Name concrete projects, explain the operational burden \
they bring, and point out where your design is stronger or weaker than the cloud one.";

const LEAD_ARCHITECT_PROMPT: &str = "You are the Lead Architect. Compare the cloud and the \
open-source proposals on cost, time to market, operational load, vendor lock-in and risk. \
Recommend one option (or a hybrid), list the key decisions and open risks, and finish with \
a short implementation roadmap.";

/// Instructions for each role.
pub fn system_message_for(participant: Participant) -> &'static str {
    match participant {
        Participant::Supervisor => SUPERVISOR_PROMPT,
        Participant::CloudArchitect => CLOUD_ARCHITECT_PROMPT,
        Participant::OssArchitect => OSS_ARCHITECT_PROMPT,
        Participant::LeadArchitect => LEAD_ARCHITECT_PROMPT,
    }
}

/// The task to open with: the configured one, or [`DEFAULT_TASK`].
pub fn task_for(config: &CouncilConfig) -> &str {
    config.task.as_deref().unwrap_or(DEFAULT_TASK)
}

/// Build the OpenAI client described by `config`.
pub fn client_from_config(config: &CouncilConfig) -> Arc<dyn ClientWrapper> {
    match &config.base_url {
        Some(base_url) => Arc::new(OpenAIClient::new_with_base_url(
            &config.api_key,
            &config.model,
            base_url,
        )),
        None => Arc::new(OpenAIClient::new_with_model_string(
            &config.api_key,
            &config.model,
        )),
    }
}

/// Assemble the council: the Supervisor as human proxy and three LLM
/// architects sharing `client`, wired to the [`TurnSequencer`].
pub fn build_council(
    config: &CouncilConfig,
    client: Arc<dyn ClientWrapper>,
    event_handler: Option<Arc<dyn EventHandler>>,
) -> Result<GroupChat, ChatError> {
    let mut chat = GroupChat::new(COUNCIL_ID, COUNCIL_NAME)
        .with_max_rounds(config.max_rounds)
        .with_initiator(Participant::Supervisor)
        .with_speaker_selection(Box::new(TurnSequencer::new()));
    if let Some(handler) = event_handler {
        chat = chat.with_event_handler(handler);
    }

    for participant in Participant::ALL.iter().copied() {
        let agent = match participant {
            Participant::Supervisor => Agent::human_proxy(participant),
            _ => Agent::new(participant, Arc::clone(&client)).with_max_tokens(config.max_tokens),
        }
        .with_system_message(system_message_for(participant));
        chat.add_agent(agent)?;
    }

    log::debug!(
        "built {} with model '{}' and a {} round cap",
        COUNCIL_NAME,
        client.model_name(),
        config.max_rounds
    );
    Ok(chat)
}
