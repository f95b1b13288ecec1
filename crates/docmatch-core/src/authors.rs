//! Author-list normalization: free text in, `"Surname, I; Surname, I"` out.
//!
//! The pipeline is:
//! 1. cut out a group author ([`crate::collaboration`]),
//! 2. collapse conjunctions to commas and fold the remainder to ASCII,
//! 3. classify the name ordering ([`crate::classifier`]),
//! 4. emit one `Surname, Initial` entry per match of the winning convention,
//!    or fall back to weaker heuristics,
//! 5. put the group author back where it was found.
//!
//! Normalization never fails. When nothing can be made of the input, the
//! input is returned as given.

use std::borrow::Cow;
use std::fmt;

use deunicode::deunicode;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

use crate::classifier::{CandidateScores, ClassifierVerdict, classify_with_scores};
use crate::collaboration::{Placement, find_collaboration, is_list_separator};
use crate::config::NormalizerConfig;
use crate::patterns::{AND_HOOK_RE, LAST_NAME_RE, NameOrderingConvention, REMOVE_AND_RE};

/// Separator between author entries in the canonical form.
pub const AUTHOR_SEPARATOR: &str = "; ";

/// One author reduced to surname and a single initial.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CanonicalAuthor {
    pub surname: String,
    pub initial: char,
}

impl fmt::Display for CanonicalAuthor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}, {}", self.surname, self.initial)
    }
}

/// A group author and the side of the list it was found on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Collaboration {
    pub text: String,
    pub placement: Placement,
}

/// What was recovered from the individual-author part of the list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AuthorBody {
    /// Entries built from a recognized naming convention.
    Canonical {
        convention: NameOrderingConvention,
        authors: Vec<CanonicalAuthor>,
    },
    /// A bare-surname chain closed by `and`/`&`, kept verbatim.
    Anchored { text: String },
    /// Every surname-looking token, in order of appearance.
    Surnames { surnames: Vec<String> },
    /// Nothing besides (possibly) a group author.
    Empty,
    /// Nothing recognizable; the raw input stands in for the result.
    Unparsed,
}

impl AuthorBody {
    fn render(&self) -> Option<String> {
        match self {
            AuthorBody::Canonical { authors, .. } => Some(
                authors
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(AUTHOR_SEPARATOR),
            ),
            AuthorBody::Anchored { text } => Some(text.clone()),
            AuthorBody::Surnames { surnames } => Some(surnames.join(AUTHOR_SEPARATOR)),
            AuthorBody::Empty | AuthorBody::Unparsed => None,
        }
    }
}

/// Structured result of normalizing one author list. `Display` renders the
/// canonical string sent to the matching service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NormalizedAuthors {
    raw: String,
    pub collaboration: Option<Collaboration>,
    /// `None` when the list was never classified (empty, or over the size cap).
    pub verdict: Option<ClassifierVerdict>,
    pub scores: Option<CandidateScores>,
    pub body: AuthorBody,
}

impl NormalizedAuthors {
    pub fn raw(&self) -> &str {
        &self.raw
    }
}

impl fmt::Display for NormalizedAuthors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.body == AuthorBody::Unparsed {
            return f.write_str(&self.raw);
        }
        match (&self.collaboration, self.body.render()) {
            (None, None) => Ok(()),
            (None, Some(authors)) => f.write_str(&authors),
            (Some(collab), None) => f.write_str(&collab.text),
            (Some(collab), Some(authors)) => match collab.placement {
                Placement::Leading => write!(f, "{}{AUTHOR_SEPARATOR}{authors}", collab.text),
                Placement::Trailing => write!(f, "{authors}{AUTHOR_SEPARATOR}{}", collab.text),
            },
        }
    }
}

/// Normalize a raw author list to `"Surname1, I1; Surname2, I2"`, keeping a
/// group author where it appeared.
///
/// ```
/// assert_eq!(docmatch_core::normalize("K. Frey, A. Accomazzi"), "Frey, K; Accomazzi, A");
/// ```
pub fn normalize(raw: &str) -> String {
    normalize_author_list(raw, &NormalizerConfig::default()).to_string()
}

/// Config-aware version of [`normalize`].
pub fn normalize_with_config(raw: &str, config: &NormalizerConfig) -> String {
    normalize_author_list(raw, config).to_string()
}

/// Normalize and keep the intermediate decisions.
pub fn normalize_author_list(raw: &str, config: &NormalizerConfig) -> NormalizedAuthors {
    if raw.len() > config.max_input_len {
        tracing::warn!(
            len = raw.len(),
            limit = config.max_input_len,
            "author list over size limit, left unnormalized"
        );
        return NormalizedAuthors {
            raw: raw.to_string(),
            collaboration: None,
            verdict: None,
            scores: None,
            body: AuthorBody::Unparsed,
        };
    }

    let (collaboration, remainder) = match find_collaboration(raw) {
        Some(span) => {
            let (before, after) = span.excise(raw);
            let remainder = match (before.is_empty(), after.is_empty()) {
                (true, _) => Cow::Borrowed(after),
                (false, true) => Cow::Borrowed(before),
                (false, false) => Cow::Owned(format!("{before}, {after}")),
            };
            let collaboration = Collaboration {
                placement: span.placement(raw),
                text: span.text,
            };
            (Some(collaboration), remainder)
        }
        None => (None, Cow::Borrowed(raw)),
    };

    let prepared = prepare(&remainder);
    if prepared.is_empty() {
        // Separators alone are not an empty list.
        let body = if collaboration.is_some() || raw.is_empty() {
            AuthorBody::Empty
        } else {
            AuthorBody::Unparsed
        };
        return NormalizedAuthors {
            raw: raw.to_string(),
            collaboration,
            verdict: None,
            scores: None,
            body,
        };
    }

    let (scores, verdict) = classify_with_scores(&prepared);
    let body = match verdict {
        ClassifierVerdict::Convention(convention) => {
            let authors = canonical_authors(&prepared, convention);
            if authors.is_empty() {
                fallback(&prepared)
            } else {
                AuthorBody::Canonical {
                    convention,
                    authors,
                }
            }
        }
        ClassifierVerdict::Ambiguous | ClassifierVerdict::Conflicting => fallback(&prepared),
    };

    NormalizedAuthors {
        raw: raw.to_string(),
        collaboration,
        verdict: Some(verdict),
        scores: Some(scores),
        body,
    }
}

/// Collapse conjunctions and whitespace runs, transliterate to ASCII and trim
/// dangling separators.
fn prepare(remainder: &str) -> String {
    static WS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").unwrap());

    let text = REMOVE_AND_RE.replace_all(remainder, ",");
    let text = deunicode(&text);
    let text = WS_RE.replace_all(&text, " ");
    text.trim_matches(is_list_separator).to_string()
}

/// One entry per non-overlapping match of `convention`, left to right.
///
/// A `Jr.` suffix is dropped from the surname; the initial is the first
/// letter of the given-name group, uppercased.
pub fn canonical_authors(text: &str, convention: NameOrderingConvention) -> Vec<CanonicalAuthor> {
    convention
        .pattern()
        .captures_iter(text)
        .filter_map(|caps| {
            let last = caps.name("last")?;
            let surname = match caps.name("suffix") {
                Some(suffix) => &text[last.start()..suffix.start()],
                None => last.as_str(),
            };
            let surname = surname.trim_matches(is_list_separator);
            let initial = caps
                .name("first")?
                .as_str()
                .chars()
                .find(|c| c.is_alphabetic())?
                .to_ascii_uppercase();
            if surname.is_empty() {
                return None;
            }
            Some(CanonicalAuthor {
                surname: surname.to_string(),
                initial,
            })
        })
        .collect()
}

/// Last-resort readings of a list no convention explains.
fn fallback(text: &str) -> AuthorBody {
    if let Some(m) = AND_HOOK_RE.find(text) {
        let anchored = m.as_str().trim();
        if !anchored.is_empty() {
            tracing::debug!(text = anchored, "fallback: conjunction-anchored surnames");
            return AuthorBody::Anchored {
                text: anchored.to_string(),
            };
        }
    }

    let surnames: Vec<String> = LAST_NAME_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();
    if !surnames.is_empty() {
        tracing::debug!(count = surnames.len(), "fallback: bare surnames");
        return AuthorBody::Surnames { surnames };
    }

    tracing::debug!("fallback: nothing recognizable");
    AuthorBody::Unparsed
}
