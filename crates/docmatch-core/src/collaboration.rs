//! Group-author ("the ALICE Collaboration") detection.

use serde::Serialize;

use crate::patterns::{COLLABORATION_RE, COMMA_BEFORE_AND_RE};

/// Where a collaboration sits relative to the individual authors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    Leading,
    Trailing,
}

/// A contiguous group-author phrase inside a raw author list.
///
/// `start` and `len` are byte offsets into the string the span was extracted
/// from; `text` is exactly that slice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CollaborationSpan {
    pub start: usize,
    pub len: usize,
    pub text: String,
}

impl CollaborationSpan {
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// Leading when nothing but separators precedes the span.
    pub fn placement(&self, source: &str) -> Placement {
        let before = &source[..self.start];
        if before.trim_matches(is_list_separator).is_empty() {
            Placement::Leading
        } else {
            Placement::Trailing
        }
    }

    /// The source with the span cut out and the separators left dangling at
    /// the cut trimmed away.
    pub fn excise<'a>(&self, source: &'a str) -> (&'a str, &'a str) {
        let before = source[..self.start].trim_end_matches(is_list_separator);
        let after = source[self.end()..].trim_start_matches(is_list_separator);
        (before, after)
    }
}

pub(crate) fn is_list_separator(c: char) -> bool {
    c == ',' || c == ';' || c.is_whitespace()
}

/// Locate the group author in `text`, as `(offset, length)` in bytes.
///
/// `(0, 0)` means no collaboration was found.
pub fn extract_collaboration(text: &str) -> (usize, usize) {
    find_collaboration(text)
        .map(|span| (span.start, span.len))
        .unwrap_or((0, 0))
}

/// Locate the rightmost group-author phrase in `text`.
///
/// Matching runs over a copy in which every `" and"` is preceded by a comma,
/// so the phrase cannot swallow the conjunction of a neighbouring author. The
/// resulting offsets are mapped back onto `text`. Surrounding whitespace and a
/// leading conjunction are not part of the span.
pub fn find_collaboration(text: &str) -> Option<CollaborationSpan> {
    let (normalized, inserted) = comma_before_and(text);

    let group = COLLABORATION_RE
        .captures_iter(&normalized)
        .filter_map(|caps| caps.name("collaboration"))
        .last()?;

    // Inserted commas never fall inside the group (its class excludes ','),
    // so every one of them lies strictly before it or after it.
    let shift = inserted.iter().filter(|&&pos| pos < group.start()).count();
    let start = group.start() - shift;
    let raw = &text[start..start + group.len()];

    let (lead, trimmed) = trim_connector(raw);
    if trimmed.is_empty() {
        return None;
    }
    let start = start + lead;

    tracing::trace!(start, len = trimmed.len(), text = trimmed, "collaboration found");
    Some(CollaborationSpan {
        start,
        len: trimmed.len(),
        text: trimmed.to_string(),
    })
}

/// Strip surrounding whitespace and a leading `and`/`&` connector, returning
/// the byte offset of what remains.
fn trim_connector(raw: &str) -> (usize, &str) {
    let s = raw.trim_end();
    let rest = s.trim_start();
    let start = s.len() - rest.len();
    for connector in ["and ", "And ", "AND ", "& "] {
        if let Some(stripped) = rest.strip_prefix(connector) {
            let stripped = stripped.trim_start();
            return (start + rest.len() - stripped.len(), stripped);
        }
    }
    (start, rest)
}

/// Rewrite `X and Y` to `X, and Y`, returning the rewritten text and the byte
/// positions (in the rewritten text) of every inserted comma.
fn comma_before_and(text: &str) -> (String, Vec<usize>) {
    let mut out = String::with_capacity(text.len() + 8);
    let mut inserted = Vec::new();
    let mut last = 0;
    for caps in COMMA_BEFORE_AND_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };
        out.push_str(&text[last..whole.start()]);
        if caps.get(1).is_none() {
            inserted.push(out.len());
        }
        out.push(',');
        out.push_str(&caps[2]);
        last = whole.end();
    }
    out.push_str(&text[last..]);
    (out, inserted)
}
