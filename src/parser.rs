//! Reply parser: turn free-form model text into an [`Outline`].
//!
//! Parsing is split in two steps. [`classify_line`] looks at one line in
//! isolation and tags it; [`parse_outline`] folds the tagged lines into an
//! outline, carrying the current topic in the accumulator. Neither step can
//! fail: the reply is untrusted text, and anything that does not look like a
//! bullet is dropped.
//!
//! ## Line rules
//!
//! After trimming, a line is
//!
//! * a **topic** when it starts with `*` and contains `Tópico` anywhere. The
//!   name is the trimmed text after the first `:`; without a `:` it is the
//!   text after the leading `*`.
//! * a **subtopic** when it starts with `+`. The name is the trimmed text
//!   after the first `:`, or after the leading `+` when there is no `:`.
//!   Subtopics only count once a topic is open.
//!
//! A topic that reappears later replaces the list collected so far (last
//! occurrence wins) but keeps its original position.

use crate::outline::Outline;

/// Marker that opens a topic line.
pub const TOPIC_MARKER: char = '*';
/// Marker that opens a subtopic line.
pub const SUBTOPIC_MARKER: char = '+';
/// Heading word a topic line must contain. The prompt asks for exactly this label.
pub const TOPIC_KEYWORD: &str = "Tópico";

/// What a single reply line means for the outline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutlineLine<'a> {
    /// Topic heading with its (possibly empty) name.
    Topic(&'a str),
    /// Subtopic bullet with its (possibly empty) name.
    Subtopic(&'a str),
    /// Blank lines, preambles, diagnostics, malformed bullets.
    Unrecognized,
}

/// Classify one line of a model reply.
pub fn classify_line(line: &str) -> OutlineLine<'_> {
    let line = line.trim();
    if line.is_empty() {
        return OutlineLine::Unrecognized;
    }

    if let Some(after_marker) = line.strip_prefix(TOPIC_MARKER) {
        if line.contains(TOPIC_KEYWORD) {
            let name = match line.split_once(':') {
                Some((_, rest)) => rest,
                None => after_marker,
            };
            return OutlineLine::Topic(name.trim());
        }
    }

    if let Some(after_marker) = line.strip_prefix(SUBTOPIC_MARKER) {
        let name = match line.split_once(':') {
            Some((_, rest)) => rest,
            None => after_marker,
        };
        return OutlineLine::Subtopic(name.trim());
    }

    OutlineLine::Unrecognized
}

/// Fold state: the outline so far plus the topic subtopics attach to.
type ParseState = (Outline, Option<String>);

fn apply_line((mut outline, current): ParseState, line: OutlineLine<'_>) -> ParseState {
    match line {
        // An unnamed heading closes the open topic so stray subtopics are dropped.
        OutlineLine::Topic("") => (outline, None),
        OutlineLine::Topic(name) => {
            outline.open_topic(name);
            (outline, Some(name.to_string()))
        }
        OutlineLine::Subtopic(name) => {
            if let Some(topic) = current.as_deref() {
                if !name.is_empty() {
                    outline.push_subtopic(topic, name);
                }
            }
            (outline, current)
        }
        OutlineLine::Unrecognized => (outline, current),
    }
}

/// Characters that end a line of a reply: `\n`, `\r`, vertical tab, form
/// feed, the file/group/record separators, NEL and the Unicode line and
/// paragraph separators.
pub const LINE_BREAKS: [char; 10] = [
    '\n', '\r', '\u{0b}', '\u{0c}', '\u{1c}', '\u{1d}', '\u{1e}', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Split a reply into lines on any of [`LINE_BREAKS`]. `\r\n` yields an
/// extra empty line, which the classifier ignores.
pub fn reply_lines(reply: &str) -> impl Iterator<Item = &str> {
    reply.split(LINE_BREAKS)
}

/// Parse a model reply into an [`Outline`].
///
/// Never fails. A reply with no topic lines (including an empty string or a
/// diagnostic message) gives an empty outline.
pub fn parse_outline(reply: &str) -> Outline {
    let (outline, _) = reply_lines(reply)
        .map(classify_line)
        .fold((Outline::new(), None), apply_line);
    outline
}
