//! The four fixed roles of the architecture council.
//!
//! A [`Participant`] is static for the lifetime of the process. Agents are
//! bound to exactly one participant, and turns in the transcript record the
//! participant's [`id`](Participant::id).

use std::fmt;
use std::str::FromStr;

/// One of the four conversational roles.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Participant {
    /// Human proxy that opens the conversation with the task.
    Supervisor,
    /// Proposes a managed-cloud architecture.
    CloudArchitect,
    /// Proposes an open-source / on-prem architecture.
    OssArchitect,
    /// Weighs both proposals and writes the final recommendation.
    LeadArchitect,
}

impl Participant {
    /// Every participant in speaking order.
    pub const ALL: [Participant; 4] = [
        Participant::Supervisor,
        Participant::CloudArchitect,
        Participant::OssArchitect,
        Participant::LeadArchitect,
    ];

    /// Stable identifier recorded in the transcript.
    pub fn id(&self) -> &'static str {
        match self {
            Participant::Supervisor => "supervisor",
            Participant::CloudArchitect => "cloud_architect",
            Participant::OssArchitect => "oss_architect",
            Participant::LeadArchitect => "lead_architect",
        }
    }

    /// Human readable name used when printing.
    pub fn display_name(&self) -> &'static str {
        match self {
            Participant::Supervisor => "Supervisor",
            Participant::CloudArchitect => "Cloud Architect",
            Participant::OssArchitect => "OSS Architect",
            Participant::LeadArchitect => "Lead Architect",
        }
    }
}

impl fmt::Display for Participant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Returned when a speaker identity does not name any of the four roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownParticipant(pub String);

impl fmt::Display for UnknownParticipant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Unknown participant: '{}'", self.0)
    }
}

impl std::error::Error for UnknownParticipant {}

impl FromStr for Participant {
    type Err = UnknownParticipant;

    /// Accepts the id (`"cloud_architect"`) or the display name (`"Cloud Architect"`),
    /// ignoring ASCII case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Participant::ALL
            .iter()
            .copied()
            .find(|p| {
                p.id().eq_ignore_ascii_case(needle) || p.display_name().eq_ignore_ascii_case(needle)
            })
            .ok_or_else(|| UnknownParticipant(s.to_string()))
    }
}
