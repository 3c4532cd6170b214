//! Transcript parsing
//!
//! Raw transcript content is the inner HTML of the transcript body joined
//! with `<br>`. Parsing splits it into lines, attributes every line to a
//! speaker and then merges consecutive lines from the same speaker.
//!
//! # Example
//!
//! ```
//! use transcript_crawler::transcript::{parse_transcript, SpeakerTurn};
//!
//! let turns = parse_transcript("LARRY KING: Good evening.<br>(APPLAUSE)<br>JOHN: Hi there<br>how are you?");
//! assert_eq!(
//!     turns,
//!     vec![
//!         SpeakerTurn::new("assistant", "Good evening."),
//!         SpeakerTurn::new("system", "(APPLAUSE)"),
//!         SpeakerTurn::new("JOHN", "Hi there how are you?"),
//!     ]
//! );
//! ```

mod classify;
mod consolidate;

use serde::{Deserialize, Serialize};
use std::fmt;

pub use classify::{
    classify_line, speaker_for_label, LineKind, ASSISTANT_SPEAKER, HOST_MARKER, SYSTEM_SPEAKER,
};
pub use consolidate::consolidate;

/// Marker separating lines in raw transcript content
pub const LINE_BREAK: &str = "<br>";

/// One attributed span of dialogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpeakerTurn {
    pub speaker: String,
    pub value: String,
}

impl SpeakerTurn {
    pub fn new(speaker: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            value: value.into(),
        }
    }
}

impl fmt::Display for SpeakerTurn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.speaker, self.value)
    }
}

/// Splits raw content into trimmed, non-empty lines
pub fn split_lines(raw: &str) -> impl Iterator<Item = &str> {
    raw.split(LINE_BREAK)
        .map(|line| line.trim_matches(classify::is_blank))
        .filter(|line| !line.is_empty())
}

/// Attributes every line of `raw` to a speaker, one turn per line
///
/// The speaker carried between lines starts as `system`. Speaker lines
/// replace it; annotations are always attributed to `system` and leave it
/// untouched.
pub fn parse_raw_turns(raw: &str) -> Vec<SpeakerTurn> {
    let (_, turns) = split_lines(raw).fold(
        (SYSTEM_SPEAKER.to_string(), Vec::new()),
        |(current, mut turns), line| match classify_line(line) {
            LineKind::Annotation => {
                turns.push(SpeakerTurn::new(SYSTEM_SPEAKER, line));
                (current, turns)
            }
            LineKind::SpeakerLine { label, rest } => {
                let speaker = speaker_for_label(label);
                turns.push(SpeakerTurn::new(speaker.clone(), rest.trim_matches(classify::is_blank)));
                (speaker, turns)
            }
            LineKind::Continuation => {
                turns.push(SpeakerTurn::new(current.clone(), line));
                (current, turns)
            }
        },
    );
    turns
}

/// Parses raw transcript content into consolidated speaker turns
pub fn parse_transcript(raw: &str) -> Vec<SpeakerTurn> {
    let raw_turns = parse_raw_turns(raw);
    tracing::debug!("Parsed {} raw turns: {:?}", raw_turns.len(), raw_turns);

    let turns = consolidate(raw_turns);
    tracing::info!("Consolidated into {} turns", turns.len());
    for turn in &turns {
        tracing::info!("{}", turn);
    }

    turns
}

/// Serializes turns as a 2-space indented JSON array
pub fn to_pretty_json(turns: &[SpeakerTurn]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(turns)
}
