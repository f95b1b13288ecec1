//! Normalization of bibliographic metadata ahead of cross-record matching.
//!
//! The centre of the crate is [`normalize`], which turns a free-text author
//! list into `"Surname, I; Surname, I"`. Around it sit DOI extraction from
//! comment lines, a document-type hint and the builder for the payload sent
//! to the matching service.

use thiserror::Error;

pub mod authors;
pub mod classifier;
pub mod collaboration;
pub mod config;
pub mod config_file;
pub mod doctype;
pub mod doi;
pub mod patterns;
pub mod payload;

// Re-export for convenience
pub use authors::{
    AuthorBody, CanonicalAuthor, Collaboration, NormalizedAuthors, normalize,
    normalize_author_list, normalize_with_config,
};
pub use classifier::{CandidateScores, ClassifierVerdict, classify, classify_with_scores};
pub use collaboration::{CollaborationSpan, Placement, extract_collaboration, find_collaboration};
pub use config::{NormalizerConfig, PayloadConfig};
pub use doctype::{DoctypeHint, doctype_hint};
pub use doi::extract_doi;
pub use patterns::NameOrderingConvention;
pub use payload::{MatchPayload, MetadataRecord, RecordSource, build_payload};

#[derive(Error, Debug)]
pub enum PayloadError {
    #[error("required field `{0}` is missing")]
    MissingField(&'static str),
    #[error("invalid pubdate {0:?}: expected a leading four-digit year")]
    InvalidPubdate(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
