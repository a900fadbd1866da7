//! Speaker selection for the architecture council.
//!
//! The [`TurnSequencer`] is a four-state machine with one terminal state:
//!
//! ```text
//! Supervisor -> CloudArchitect -> OssArchitect -> LeadArchitect -> (terminate)
//! ```
//!
//! It looks only at who spoke last. The history is accepted so that other
//! [`SpeakerSelection`] policies can use it, but the sequencer ignores it.
//!
//! # Example
//!
//! ```
//! use archcouncil::participant::Participant;
//! use archcouncil::sequencer::{NextSpeaker, SpeakerSelection, TurnSequencer};
//!
//! let sequencer = TurnSequencer::new();
//! assert_eq!(
//!     sequencer.select_next(Some("supervisor"), &[]).unwrap(),
//!     NextSpeaker::Speaker(Participant::CloudArchitect)
//! );
//! assert_eq!(
//!     sequencer.select_next(Some("lead_architect"), &[]).unwrap(),
//!     NextSpeaker::Terminate
//! );
//! assert!(sequencer.select_next(Some("intern"), &[]).is_err());
//! ```

use crate::archcouncil::group_chat::Turn;
use crate::archcouncil::participant::Participant;
use std::error::Error;
use std::fmt;

/// Outcome of a speaker-selection step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextSpeaker {
    /// Invoke this participant next.
    Speaker(Participant),
    /// End the conversation.
    Terminate,
}

/// Errors raised while choosing the next speaker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SequencerError {
    /// The last speaker is not one of the known participants.
    InvalidState(String),
}

impl fmt::Display for SequencerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SequencerError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
        }
    }
}

impl Error for SequencerError {}

/// A policy that picks who speaks next.
///
/// `last_speaker` is the agent id of the most recent turn, or `None` before
/// anybody has spoken. Implemented for plain closures so tests and callers
/// can plug in ad-hoc policies.
pub trait SpeakerSelection: Send + Sync {
    fn select_next(
        &self,
        last_speaker: Option<&str>,
        history: &[Turn],
    ) -> Result<NextSpeaker, SequencerError>;
}

impl<F> SpeakerSelection for F
where
    F: Fn(Option<&str>, &[Turn]) -> Result<NextSpeaker, SequencerError> + Send + Sync,
{
    fn select_next(
        &self,
        last_speaker: Option<&str>,
        history: &[Turn],
    ) -> Result<NextSpeaker, SequencerError> {
        self(last_speaker, history)
    }
}

/// Deterministic next-speaker policy: each role hands over to the following
/// role in [`Participant::ALL`], the Lead Architect ends the conversation.
#[derive(Debug, Clone, Copy, Default)]
pub struct TurnSequencer;

impl TurnSequencer {
    pub fn new() -> Self {
        TurnSequencer
    }

    /// Successor of `participant` in the speaking order.
    pub fn next_after(participant: Participant) -> NextSpeaker {
        match participant {
            Participant::Supervisor => NextSpeaker::Speaker(Participant::CloudArchitect),
            Participant::CloudArchitect => NextSpeaker::Speaker(Participant::OssArchitect),
            Participant::OssArchitect => NextSpeaker::Speaker(Participant::LeadArchitect),
            Participant::LeadArchitect => NextSpeaker::Terminate,
        }
    }
}

impl SpeakerSelection for TurnSequencer {
    fn select_next(
        &self,
        last_speaker: Option<&str>,
        _history: &[Turn],
    ) -> Result<NextSpeaker, SequencerError> {
        let last = match last_speaker {
            // Opening turn belongs to the first role.
            None => return Ok(NextSpeaker::Speaker(Participant::Supervisor)),
            Some(id) => id,
        };

        let participant: Participant = last.parse().map_err(|_| {
            SequencerError::InvalidState(format!("unknown last speaker '{}'", last))
        })?;

        let next = Self::next_after(participant);
        log::debug!("TurnSequencer: {} -> {:?}", participant.id(), next);
        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_after_walks_the_table() {
        assert_eq!(
            TurnSequencer::next_after(Participant::Supervisor),
            NextSpeaker::Speaker(Participant::CloudArchitect)
        );
        assert_eq!(
            TurnSequencer::next_after(Participant::CloudArchitect),
            NextSpeaker::Speaker(Participant::OssArchitect)
        );
        assert_eq!(
            TurnSequencer::next_after(Participant::OssArchitect),
            NextSpeaker::Speaker(Participant::LeadArchitect)
        );
        assert_eq!(
            TurnSequencer::next_after(Participant::LeadArchitect),
            NextSpeaker::Terminate
        );
    }

    #[test]
    fn test_next_after_follows_participant_order() {
        for pair in Participant::ALL.windows(2) {
            assert_eq!(
                TurnSequencer::next_after(pair[0]),
                NextSpeaker::Speaker(pair[1])
            );
        }
        assert_eq!(
            TurnSequencer::next_after(Participant::ALL[Participant::ALL.len() - 1]),
            NextSpeaker::Terminate
        );
    }

    #[test]
    fn test_no_previous_speaker_opens_with_supervisor() {
        let next = TurnSequencer::new().select_next(None, &[]).unwrap();
        assert_eq!(next, NextSpeaker::Speaker(Participant::Supervisor));
    }

    #[test]
    fn test_unknown_speaker_is_invalid_state() {
        let err = TurnSequencer::new()
            .select_next(Some("chatgpt"), &[])
            .unwrap_err();
        assert_eq!(
            err,
            SequencerError::InvalidState("unknown last speaker 'chatgpt'".to_string())
        );
        assert_eq!(
            err.to_string(),
            "Invalid state: unknown last speaker 'chatgpt'"
        );
    }

    #[test]
    fn test_closures_are_policies() {
        let always_lead =
            |_: Option<&str>, _: &[Turn]| -> Result<NextSpeaker, SequencerError> {
                Ok(NextSpeaker::Speaker(Participant::LeadArchitect))
            };
        assert_eq!(
            always_lead.select_next(Some("supervisor"), &[]).unwrap(),
            NextSpeaker::Speaker(Participant::LeadArchitect)
        );
    }
}
