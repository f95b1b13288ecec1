use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;

static ERRATUM_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)^errat(?:a|um)\b").unwrap());
static BOOK_REVIEW_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bbooks?[\s-]*review(?:s|ed)?").unwrap());
static THESIS_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)\bthesis\b").unwrap());

/// Kind of document an e-print announces itself as, restricting what the
/// matching service may pair it with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DoctypeHint {
    Erratum,
    BookReview,
    Thesis,
}

impl DoctypeHint {
    /// Doctypes the matching service should restrict candidates to.
    pub fn doctypes(self) -> &'static [&'static str] {
        match self {
            DoctypeHint::Erratum => &["erratum"],
            DoctypeHint::BookReview => &["bookreview"],
            DoctypeHint::Thesis => &["phdthesis", "mastersthesis"],
        }
    }
}

/// Detect a document-type hint. The title is checked for errata and book
/// reviews first; "thesis" may appear in either comments or title.
pub fn doctype_hint(title: &str, comments: &str) -> Option<DoctypeHint> {
    if ERRATUM_RE.is_match(title) {
        Some(DoctypeHint::Erratum)
    } else if BOOK_REVIEW_RE.is_match(title) {
        Some(DoctypeHint::BookReview)
    } else if THESIS_RE.is_match(comments) || THESIS_RE.is_match(title) {
        Some(DoctypeHint::Thesis)
    } else {
        None
    }
}
