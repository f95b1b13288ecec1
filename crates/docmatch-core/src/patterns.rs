//! Compiled name, conjunction and collaboration patterns.
//!
//! Every pattern is compiled once per process on first use and never mutated
//! afterwards. The name grammar assumes ASCII input: author remainders are
//! transliterated before they are matched (see [`crate::authors`]).

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

/// A single surname token, optionally carrying a particle such as `van der`,
/// `de la`, `Mc` or an apostrophe prefix (`O'`).
const SINGLE_NAME: &str = r"(?:(?:d|de|de la|del|De|des|Des|in '[a-z]|van|van der|van den|van de|von|Mc|[A-Z]')[' ]?)?[A-Z][a-z]['A-Za-z]*";

/// Generational suffix (`Jr.`) attached to a surname. Captured so the
/// canonicalizer can drop it from the emitted surname.
const NAME_SUFFIX: &str = r"(?P<suffix>[,\s]*[Jj][Rr][.,\s]+)?";

/// Same as [`NAME_SUFFIX`] without a capture, for patterns that repeat it.
const NAME_SUFFIX_BARE: &str = r"(?:[,\s]*[Jj][Rr][.,\s]+)?";

/// Initials given name: `J.`, `J. R.`, `J.-P.`.
const INITIALS: &str = r"(?:[A-Z]\.[\s-]*)+";

/// Full given name with optional trailing initials: `John`, `John R.`.
const FULL_GIVEN: &str = r"(?:[A-Z][A-Za-z.]+\s*)(?:[A-Z][.\s])*";

fn last_name_source() -> String {
    format!("{SINGLE_NAME}(?:[- ]{SINGLE_NAME})*")
}

/// A possibly hyphenated or space-joined surname: `Smith`, `Garcia-Lopez`,
/// `van der Berg`.
pub static LAST_NAME_RE: Lazy<Regex> = Lazy::new(|| Regex::new(&last_name_source()).unwrap());

/// Word tokens used by the prefix-walk scoring.
pub(crate) static WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\w+").unwrap());

/// `" and"` with or without a preceding comma. The collaboration extractor
/// rewrites every match to `", and"` so a group name never absorbs the
/// conjunction in front of the next author.
pub(crate) static COMMA_BEFORE_AND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(,)?(\s+and)").unwrap());

/// Conjunction between two authors, collapsed to a bare comma before
/// classification.
pub(crate) static REMOVE_AND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)(,?\s+and\s+)").unwrap());

/// Group author: capitalized words (optionally bracketed) ending in
/// `Collaboration(s)`, optionally followed by initials, then a separator or
/// the end of input.
pub(crate) static COLLABORATION_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?P<collaboration>[(\[]*[A-Za-z\s/-]+\s[Cc]ollaboration[s]?\s*[A-Z.]*)(?:[\s.,;)\]]+|$)",
    )
    .unwrap()
});

/// A chain of bare surnames (each optionally carrying one initial) terminated
/// by `and`/`&` and one more surname, anchored at the start of the text.
pub(crate) static AND_HOOK_RE: Lazy<Regex> = Lazy::new(|| {
    let last = last_name_source();
    let sfx = NAME_SUFFIX_BARE;
    Regex::new(&format!(
        r"^(?:(?:[A-Z][.\s])?{last}{sfx}[,\s]+|{last}{sfx}[,\s]+(?:[A-Z][.\s])?)+(?:\b[Aa]nd|\s&)\s(?:(?:[A-Z][.\s])?{last}{sfx}|{last}{sfx}(?:[A-Z][.\s])?)"
    ))
    .unwrap()
});

static TRAILING_INITIALS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<last>{}{NAME_SUFFIX})\s*,?\s+(?P<first>{INITIALS})",
        last_name_source()
    ))
    .unwrap()
});

static LEADING_INITIALS_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<first>{INITIALS}) (?P<last>{}{NAME_SUFFIX})\s*,?",
        last_name_source()
    ))
    .unwrap()
});

static TRAILING_FULL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<last>{}{NAME_SUFFIX})\s*,?\s+(?P<first>{FULL_GIVEN})",
        last_name_source()
    ))
    .unwrap()
});

static LEADING_FULL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(&format!(
        r"(?P<first>{FULL_GIVEN}) (?P<last>{}{NAME_SUFFIX})\s*,?",
        last_name_source()
    ))
    .unwrap()
});

/// How surname and given name are arranged inside each author entry.
///
/// The declaration order is significant: it is the bit order of the winner
/// mask used by the classifier (first variant is the most significant bit).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NameOrderingConvention {
    /// `Smith, J. R.`
    TrailingInitials,
    /// `J. R. Smith`
    LeadingInitials,
    /// `Smith, John`
    TrailingFullGiven,
    /// `John Smith`
    LeadingFullGiven,
}

impl NameOrderingConvention {
    pub const ALL: [NameOrderingConvention; 4] = [
        NameOrderingConvention::TrailingInitials,
        NameOrderingConvention::LeadingInitials,
        NameOrderingConvention::TrailingFullGiven,
        NameOrderingConvention::LeadingFullGiven,
    ];

    /// Position in [`Self::ALL`].
    pub fn index(self) -> usize {
        match self {
            NameOrderingConvention::TrailingInitials => 0,
            NameOrderingConvention::LeadingInitials => 1,
            NameOrderingConvention::TrailingFullGiven => 2,
            NameOrderingConvention::LeadingFullGiven => 3,
        }
    }

    /// The compiled pattern for this convention. Every pattern exposes the
    /// named groups `last`, `first` and `suffix`.
    pub fn pattern(self) -> &'static Regex {
        match self {
            NameOrderingConvention::TrailingInitials => &TRAILING_INITIALS_RE,
            NameOrderingConvention::LeadingInitials => &LEADING_INITIALS_RE,
            NameOrderingConvention::TrailingFullGiven => &TRAILING_FULL_RE,
            NameOrderingConvention::LeadingFullGiven => &LEADING_FULL_RE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            NameOrderingConvention::TrailingInitials => "trailing initials",
            NameOrderingConvention::LeadingInitials => "leading initials",
            NameOrderingConvention::TrailingFullGiven => "trailing full given name",
            NameOrderingConvention::LeadingFullGiven => "leading full given name",
        }
    }
}

impl fmt::Display for NameOrderingConvention {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn whole(re: &Regex, s: &str) -> bool {
        re.find(s).is_some_and(|m| m.start() == 0 && m.end() == s.len())
    }

    #[test]
    fn test_last_name_particles() {
        assert!(whole(&LAST_NAME_RE, "Smith"));
        assert!(whole(&LAST_NAME_RE, "van der Berg"));
        assert!(whole(&LAST_NAME_RE, "Garcia-Lopez"));
        assert!(whole(&LAST_NAME_RE, "O'Neil"));
        assert!(whole(&LAST_NAME_RE, "McDonald"));
        assert!(!whole(&LAST_NAME_RE, "K"));
    }

    #[test]
    fn test_every_convention_exposes_groups() {
        for convention in NameOrderingConvention::ALL {
            let names: Vec<_> = convention.pattern().capture_names().flatten().collect();
            assert!(names.contains(&"last"), "{convention}");
            assert!(names.contains(&"first"), "{convention}");
            assert!(names.contains(&"suffix"), "{convention}");
        }
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, convention) in NameOrderingConvention::ALL.iter().enumerate() {
            assert_eq!(convention.index(), i);
        }
    }

    #[test]
    fn test_trailing_initials_groups() {
        let caps = NameOrderingConvention::TrailingInitials
            .pattern()
            .captures("Frey, K., Accomazzi, A.")
            .unwrap();
        assert_eq!(&caps["last"], "Frey");
        assert_eq!(&caps["first"], "K.");
    }

    #[test]
    fn test_leading_full_groups() {
        let caps = NameOrderingConvention::LeadingFullGiven
            .pattern()
            .captures("Katie Frey, Alberto Accomazzi")
            .unwrap();
        assert_eq!(&caps["first"], "Katie");
        assert_eq!(&caps["last"], "Frey");
    }

    #[test]
    fn test_suffix_is_captured() {
        let caps = NameOrderingConvention::TrailingInitials
            .pattern()
            .captures("Smith, Jr., J.")
            .unwrap();
        assert!(caps.name("suffix").is_some());
        assert!(caps["last"].starts_with("Smith"));
    }

    #[test]
    fn test_remove_and_is_case_insensitive() {
        assert_eq!(REMOVE_AND_RE.replace_all("Frey AND Accomazzi", ","), "Frey,Accomazzi");
        assert_eq!(REMOVE_AND_RE.replace_all("Frey, and Accomazzi", ","), "Frey,Accomazzi");
    }
}
