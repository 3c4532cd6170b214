//! Line classification for transcript content
//!
//! Each trimmed line of a transcript is one of three things: a stage
//! annotation such as `(APPLAUSE)`, a line opening with a speaker label such
//! as `LARRY KING: Good evening.`, or a continuation of whoever spoke last.

/// Speaker attributed to annotations and to text before the first label
pub const SYSTEM_SPEAKER: &str = "system";

/// Speaker the show's host is mapped to
pub const ASSISTANT_SPEAKER: &str = "assistant";

/// Labels containing this marker belong to the host
pub const HOST_MARKER: &str = "KING";

/// Classification of a single trimmed transcript line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Upper-case parenthesized stage direction, e.g. `(APPLAUSE)`
    Annotation,

    /// Line opening with a speaker label
    SpeakerLine {
        /// Text before the colon, verbatim
        label: &'a str,
        /// Text after the colon, leading whitespace removed
        rest: &'a str,
    },

    /// Anything else; belongs to the current speaker
    Continuation,
}

/// Classifies one trimmed, non-empty line
///
/// # Examples
///
/// ```
/// use transcript_crawler::transcript::{classify_line, LineKind};
///
/// assert_eq!(classify_line("(APPLAUSE)"), LineKind::Annotation);
/// assert_eq!(
///     classify_line("JOHN: Hi there"),
///     LineKind::SpeakerLine { label: "JOHN", rest: "Hi there" }
/// );
/// assert_eq!(classify_line("how are you?"), LineKind::Continuation);
/// ```
pub fn classify_line(line: &str) -> LineKind<'_> {
    if is_annotation(line) {
        return LineKind::Annotation;
    }

    match split_speaker_prefix(line) {
        Some((label, rest)) => LineKind::SpeakerLine { label, rest },
        None => LineKind::Continuation,
    }
}

/// Maps a speaker label to the speaker name recorded in the transcript
pub fn speaker_for_label(label: &str) -> String {
    if label.contains(HOST_MARKER) {
        ASSISTANT_SPEAKER.to_string()
    } else {
        label.to_string()
    }
}

fn is_annotation(line: &str) -> bool {
    line.starts_with('(') && line.ends_with(')') && line.to_uppercase() == line
}

/// Splits `LABEL: rest` into its parts
///
/// The label is a non-empty run of ASCII word characters, quotes, commas,
/// periods and whitespace ending at the first colon. The remainder may not
/// span a line terminator.
fn split_speaker_prefix(line: &str) -> Option<(&str, &str)> {
    let colon = line.find(':')?;
    let label = &line[..colon];

    if label.is_empty() || !label.chars().all(is_label_char) {
        return None;
    }

    let rest = line[colon + 1..].trim_start_matches(is_blank);
    if rest.contains(is_line_terminator) {
        return None;
    }

    Some((label, rest))
}

fn is_label_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || matches!(c, '_' | '\'' | '"' | ',' | '.') || is_blank(c)
}

/// Whitespace as transcript markup treats it: Unicode white space plus the
/// byte order mark, without NEL (U+0085)
pub(crate) fn is_blank(c: char) -> bool {
    (c.is_whitespace() && c != '\u{85}') || c == '\u{feff}'
}

fn is_line_terminator(c: char) -> bool {
    matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}
