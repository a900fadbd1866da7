//! Group chat driver.
//!
//! A [`GroupChat`] owns the council's agents, a speaker-selection policy and
//! the running transcript. [`GroupChat::run`] seeds the conversation with the
//! initiator's task message, then repeatedly asks the policy who speaks next
//! and lets that agent answer, until the policy says stop or the round cap
//! is reached.
//!
//! # Hub routing
//!
//! Each agent keeps its own [`LLMSession`](crate::LLMSession). Before an agent
//! speaks, the chat injects every turn it has not seen yet from the other
//! speakers as a user message prefixed with `[Speaker Name]: `. A per-agent
//! cursor keeps track of what has already been routed.
//!
//! # Example
//!
//! ```rust,no_run
//! use archcouncil::group_chat::GroupChat;
//! use archcouncil::participant::Participant;
//! use archcouncil::clients::openai::OpenAIClient;
//! use archcouncil::Agent;
//! use std::sync::Arc;
//!
//! # async {
//! let client = || Arc::new(OpenAIClient::new_with_model_string("key", "gpt-4o-mini"));
//!
//! let mut chat = GroupChat::new("council", "Architecture Council").with_max_rounds(6);
//! chat.add_agent(Agent::human_proxy(Participant::Supervisor))?;
//! chat.add_agent(Agent::new(Participant::CloudArchitect, client()))?;
//! chat.add_agent(Agent::new(Participant::OssArchitect, client()))?;
//! chat.add_agent(Agent::new(Participant::LeadArchitect, client()))?;
//!
//! let response = chat.run("Propose an architecture for a telemetry pipeline.").await?;
//! println!("{} turns, complete: {}", response.messages.len(), response.is_complete);
//! # Ok::<(), archcouncil::group_chat::ChatError>(())
//! # };
//! ```

use crate::archcouncil::agent::Agent;
use crate::archcouncil::client_wrapper::Role;
use crate::archcouncil::event::{ChatEvent, EventHandler};
use crate::archcouncil::participant::Participant;
use crate::archcouncil::sequencer::{NextSpeaker, SequencerError, SpeakerSelection, TurnSequencer};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use std::sync::Arc;

/// Round cap used when none is configured.
pub const DEFAULT_MAX_ROUNDS: usize = 6;

/// One message of the conversation, attributed to the agent that produced it.
#[derive(Debug, Clone)]
pub struct Turn {
    /// Participant id of the speaker (e.g. `"cloud_architect"`).
    pub agent_id: String,
    /// Display name of the speaker at the time of the turn.
    pub agent_name: String,
    /// [`Role::User`] for the opening task, [`Role::Assistant`] for replies.
    pub role: Role,
    /// Stored as `Arc<str>` so cloning turns is cheap.
    pub content: Arc<str>,
    pub timestamp: DateTime<Utc>,
    /// 1-based round in which the turn was produced.
    pub round: usize,
}

impl Turn {
    pub fn new(
        agent_id: impl Into<String>,
        agent_name: impl Into<String>,
        role: Role,
        content: impl Into<String>,
        round: usize,
    ) -> Self {
        Self {
            agent_id: agent_id.into(),
            agent_name: agent_name.into(),
            role,
            content: Arc::from(content.into()),
            timestamp: Utc::now(),
            round,
        }
    }
}

/// Result of a [`GroupChat::run`] call.
#[derive(Debug)]
pub struct ChatResponse {
    /// Every turn of this run in order, opening task included.
    pub messages: Vec<Turn>,
    /// Number of rounds (turns) that were played.
    pub rounds: usize,
    /// `true` when the speaker-selection policy ended the conversation,
    /// `false` when the round cap cut it short.
    pub is_complete: bool,
    /// Tokens reported by the LLM clients across the run.
    pub total_tokens_used: usize,
}

/// Errors that can occur while configuring or running a group chat.
#[derive(Debug, Clone)]
pub enum ChatError {
    /// [`GroupChat::run`] was called before any agents were added.
    NoAgents,
    /// The initiator or a selected speaker has no registered agent.
    AgentNotFound(String),
    /// An agent for the same participant is already registered.
    DuplicateAgent(String),
    /// The chat configuration cannot run (e.g. a round cap of zero).
    InvalidConfig(String),
    /// The speaker-selection policy rejected the conversation state.
    Sequencing(SequencerError),
    /// An agent failed to produce its reply. The run is aborted.
    AgentFailed { agent_id: String, error: String },
}

impl fmt::Display for ChatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChatError::NoAgents => write!(f, "No agents in group chat"),
            ChatError::AgentNotFound(id) => write!(f, "Agent not found: {}", id),
            ChatError::DuplicateAgent(id) => write!(f, "Agent '{}' already exists", id),
            ChatError::InvalidConfig(msg) => write!(f, "Invalid configuration: {}", msg),
            ChatError::Sequencing(err) => write!(f, "Speaker selection failed: {}", err),
            ChatError::AgentFailed { agent_id, error } => {
                write!(f, "Agent '{}' failed: {}", agent_id, error)
            }
        }
    }
}

impl Error for ChatError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ChatError::Sequencing(err) => Some(err),
            _ => None,
        }
    }
}

impl From<SequencerError> for ChatError {
    fn from(err: SequencerError) -> Self {
        ChatError::Sequencing(err)
    }
}

/// Sequential multi-agent conversation.
pub struct GroupChat {
    pub id: String,
    pub name: String,
    agents: HashMap<Participant, Agent>,
    /// Registration order, used by [`GroupChat::list_agents`].
    agent_order: Vec<Participant>,
    /// Agent that opens the conversation with the task message.
    initiator: Participant,
    max_rounds: usize,
    speaker_selection: Box<dyn SpeakerSelection>,
    history: Vec<Turn>,
    /// Per-agent index into `history` of the next turn to route.
    agent_cursors: HashMap<Participant, usize>,
    event_handler: Option<Arc<dyn EventHandler>>,
}

impl GroupChat {
    /// Create an empty chat: [`TurnSequencer`] policy, Supervisor as initiator,
    /// [`DEFAULT_MAX_ROUNDS`] round cap.
    ///
    /// ```
    /// use archcouncil::group_chat::GroupChat;
    ///
    /// let chat = GroupChat::new("council", "Architecture Council");
    /// assert_eq!(chat.max_rounds(), 6);
    /// assert!(chat.history().is_empty());
    /// ```
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            agents: HashMap::new(),
            agent_order: Vec::new(),
            initiator: Participant::Supervisor,
            max_rounds: DEFAULT_MAX_ROUNDS,
            speaker_selection: Box::new(TurnSequencer::new()),
            history: Vec::new(),
            agent_cursors: HashMap::new(),
            event_handler: None,
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: usize) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    /// Replace the speaker-selection policy.
    pub fn with_speaker_selection(mut self, policy: Box<dyn SpeakerSelection>) -> Self {
        self.speaker_selection = policy;
        self
    }

    pub fn with_initiator(mut self, initiator: Participant) -> Self {
        self.initiator = initiator;
        self
    }

    /// Attach an [`EventHandler`]. It is also handed to every agent added
    /// after this call.
    pub fn with_event_handler(mut self, handler: Arc<dyn EventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn max_rounds(&self) -> usize {
        self.max_rounds
    }

    async fn emit(&self, event: ChatEvent) {
        if let Some(handler) = &self.event_handler {
            handler.on_chat_event(&event).await;
        }
    }

    /// Register an agent. Each participant may be registered once.
    pub fn add_agent(&mut self, mut agent: Agent) -> Result<(), ChatError> {
        let participant = agent.participant;
        if self.agents.contains_key(&participant) {
            return Err(ChatError::DuplicateAgent(participant.id().to_string()));
        }

        if let Some(handler) = &self.event_handler {
            agent.set_event_handler(Arc::clone(handler));
        }

        self.agent_order.push(participant);
        self.agents.insert(participant, agent);
        Ok(())
    }

    pub fn get_agent(&self, participant: Participant) -> Option<&Agent> {
        self.agents.get(&participant)
    }

    /// Agents in registration order.
    pub fn list_agents(&self) -> Vec<&Agent> {
        self.agent_order
            .iter()
            .filter_map(|p| self.agents.get(p))
            .collect()
    }

    /// Every turn recorded so far, including those of a run that failed.
    pub fn history(&self) -> &[Turn] {
        &self.history
    }

    /// Forget the transcript and routing cursors. Agent sessions are kept.
    pub fn clear_history(&mut self) {
        self.history.clear();
        self.agent_cursors.clear();
    }

    /// Run one conversation about `task`.
    ///
    /// # Errors
    ///
    /// - [`ChatError::NoAgents`] when no agent is registered.
    /// - [`ChatError::InvalidConfig`] when the round cap is zero.
    /// - [`ChatError::AgentNotFound`] when the initiator or a selected speaker
    ///   is not registered.
    /// - [`ChatError::Sequencing`] when the policy rejects the last speaker.
    /// - [`ChatError::AgentFailed`] when an agent cannot produce its reply.
    ///
    /// On error the turns produced before the failure stay in
    /// [`GroupChat::history`].
    pub async fn run(&mut self, task: &str) -> Result<ChatResponse, ChatError> {
        if self.agents.is_empty() {
            return Err(ChatError::NoAgents);
        }
        if self.max_rounds == 0 {
            return Err(ChatError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        let initiator_name = match self.agents.get(&self.initiator) {
            Some(agent) => agent.name.clone(),
            None => return Err(ChatError::AgentNotFound(self.initiator.id().to_string())),
        };

        let run_id = uuid::Uuid::new_v4().to_string();
        let start = self.history.len();

        self.emit(ChatEvent::RunStarted {
            run_id: run_id.clone(),
            chat_id: self.id.clone(),
            agent_count: self.agents.len(),
            max_rounds: self.max_rounds,
        })
        .await;

        // Round 1: the initiator states the task.
        self.history.push(Turn::new(
            self.initiator.id(),
            initiator_name,
            Role::User,
            task,
            1,
        ));
        // The initiator already knows its own task.
        self.agent_cursors.insert(self.initiator, self.history.len());

        let mut total_tokens = 0;
        let mut is_complete = false;

        loop {
            let last_speaker = self.history.last().map(|turn| turn.agent_id.clone());

            let next = self
                .speaker_selection
                .select_next(last_speaker.as_deref(), &self.history[start..])?;

            let participant = match next {
                NextSpeaker::Terminate => {
                    is_complete = true;
                    break;
                }
                NextSpeaker::Speaker(participant) => participant,
            };

            // A speaker is still due but the cap is used up.
            if self.history.len() - start >= self.max_rounds {
                self.emit(ChatEvent::RoundLimitReached {
                    run_id: run_id.clone(),
                    max_rounds: self.max_rounds,
                })
                .await;
                break;
            }

            let round = self.history.len() - start + 1;
            if let Some(tokens) = self.take_turn(&run_id, round, participant).await? {
                total_tokens += tokens;
            }
        }

        let rounds = self.history.len() - start;

        self.emit(ChatEvent::RunCompleted {
            run_id,
            chat_id: self.id.clone(),
            rounds,
            total_tokens,
            is_complete,
        })
        .await;

        Ok(ChatResponse {
            messages: self.history[start..].to_vec(),
            rounds,
            is_complete,
            total_tokens_used: total_tokens,
        })
    }

    /// Route unseen turns to `participant`, let it speak, record the reply.
    /// Returns the total tokens the reply consumed, if reported.
    async fn take_turn(
        &mut self,
        run_id: &str,
        round: usize,
        participant: Participant,
    ) -> Result<Option<usize>, ChatError> {
        let mut agent = self
            .agents
            .remove(&participant)
            .ok_or_else(|| ChatError::AgentNotFound(participant.id().to_string()))?;

        self.emit(ChatEvent::SpeakerSelected {
            run_id: run_id.to_string(),
            round,
            agent_id: participant.id().to_string(),
            agent_name: agent.name.clone(),
        })
        .await;

        let cursor = self.agent_cursors.get(&participant).copied().unwrap_or(0);
        for turn in &self.history[cursor..] {
            if turn.agent_id != participant.id() {
                agent
                    .receive_message(
                        Role::User,
                        format!("[{}]: {}", turn.agent_name, turn.content),
                    )
                    .await;
            }
        }

        // Routed turns are in the session now, whether or not generation succeeds.
        self.agent_cursors.insert(participant, self.history.len());

        let result = agent.generate().await;
        let agent_name = agent.name.clone();
        self.agents.insert(participant, agent);

        match result {
            Ok(response) => {
                self.emit(ChatEvent::AgentResponded {
                    run_id: run_id.to_string(),
                    round,
                    agent_id: participant.id().to_string(),
                    agent_name: agent_name.clone(),
                    tokens_used: response.tokens_used.clone(),
                    response_length: response.content.len(),
                })
                .await;

                self.history.push(Turn::new(
                    participant.id(),
                    agent_name,
                    Role::Assistant,
                    response.content,
                    round,
                ));
                self.agent_cursors.insert(participant, self.history.len());
                Ok(response.tokens_used.map(|usage| usage.total_tokens))
            }
            Err(e) => {
                let error = e.to_string();
                self.emit(ChatEvent::AgentFailed {
                    run_id: run_id.to_string(),
                    round,
                    agent_id: participant.id().to_string(),
                    agent_name,
                    error: error.clone(),
                })
                .await;
                Err(ChatError::AgentFailed {
                    agent_id: participant.id().to_string(),
                    error,
                })
            }
        }
    }
}
