//! Plain-text transcript rendering.
//!
//! Each turn becomes one block: a header naming the speaker, the message
//! content, then a fixed-width divider line.
//!
//! ```text
//! Cloud Architect (cloud_architect):
//! Use a managed Kafka service ...
//! --------------------------------------------------------------------------------
//! ```

use crate::archcouncil::group_chat::Turn;
use std::io::{self, Write};

/// Width of the divider printed after every message.
pub const DIVIDER_WIDTH: usize = 80;

/// The divider line, without trailing newline.
pub fn divider() -> String {
    "-".repeat(DIVIDER_WIDTH)
}

/// Render one turn as a block terminated by the divider and a newline.
pub fn format_turn(turn: &Turn) -> String {
    format!(
        "{} ({}):\n{}\n{}\n",
        turn.agent_name,
        turn.agent_id,
        turn.content.trim_end(),
        divider()
    )
}

/// Render a full transcript.
pub fn format_transcript(turns: &[Turn]) -> String {
    turns.iter().map(format_turn).collect()
}

/// Write a transcript to `out`, one block per turn.
pub fn write_transcript<W: Write>(out: &mut W, turns: &[Turn]) -> io::Result<()> {
    for turn in turns {
        out.write_all(format_turn(turn).as_bytes())?;
    }
    out.flush()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client_wrapper::Role;

    fn sample() -> Vec<Turn> {
        vec![
            Turn::new("supervisor", "Supervisor", Role::User, "Design it.", 1),
            Turn::new(
                "cloud_architect",
                "Cloud Architect",
                Role::Assistant,
                "Use managed services.\n\n",
                2,
            ),
        ]
    }

    #[test]
    fn test_format_turn_layout() {
        let turns = sample();
        let block = format_turn(&turns[1]);
        let lines: Vec<&str> = block.lines().collect();
        assert_eq!(lines[0], "Cloud Architect (cloud_architect):");
        assert_eq!(lines[1], "Use managed services.");
        assert_eq!(lines[2], "-".repeat(80));
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn test_write_matches_format() {
        let turns = sample();
        let mut buf = Vec::new();
        write_transcript(&mut buf, &turns).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), format_transcript(&turns));
    }

    #[test]
    fn test_empty_transcript_is_empty() {
        assert_eq!(format_transcript(&[]), "");
    }
}
