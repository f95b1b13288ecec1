use serde::{Deserialize, Serialize};

use crate::PayloadError;
use crate::authors::normalize_with_config;
use crate::config::PayloadConfig;
use crate::doctype::doctype_hint;
use crate::doi::extract_doi;

/// Bibliographic metadata for one record, as handed over by the harvesting
/// side of the pipeline. Every field may be absent; [`build_payload`] decides
/// which ones are required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MetadataRecord {
    pub bibcode: Option<String>,
    pub authors: Option<String>,
    pub title: Option<String>,
    #[serde(rename = "abstract")]
    pub abstract_text: Option<String>,
    pub pubdate: Option<String>,
    #[serde(default)]
    pub comments: Vec<String>,
    pub doi: Option<String>,
    pub keywords: Option<String>,
}

/// Which side of the match the record is on, sent as the payload `doctype`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RecordSource {
    /// An arXiv e-print looking for its published version.
    #[default]
    Eprint,
    /// A published article looking for its e-print.
    Article,
}

/// Request body for the record-matching service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MatchPayload {
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    pub title: String,
    pub author: String,
    pub year: String,
    pub doctype: RecordSource,
    pub bibcode: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doi: Option<Vec<String>>,
    pub mustmatch: bool,
    pub match_doctype: Option<Vec<String>>,
}

impl MatchPayload {
    pub fn to_json(&self) -> Result<String, PayloadError> {
        Ok(serde_json::to_string(self)?)
    }
}

/// Build the matching payload for `record`.
///
/// E-prints additionally carry the must-match flag (keyword categories) and a
/// doctype restriction derived from title and comments.
pub fn build_payload(
    record: &MetadataRecord,
    source: RecordSource,
    config: &PayloadConfig,
) -> Result<MatchPayload, PayloadError> {
    let bibcode = required(&record.bibcode, "bibcode")?;
    let authors = required(&record.authors, "authors")?;
    let title = required(&record.title, "title")?;
    let pubdate = required(&record.pubdate, "pubdate")?;

    let year = pubdate.get(..4).filter(|y| y.bytes().all(|b| b.is_ascii_digit()));
    let Some(year) = year else {
        return Err(PayloadError::InvalidPubdate(pubdate.to_string()));
    };

    let (mustmatch, match_doctype) = match source {
        RecordSource::Eprint => {
            let comments = record.comments.join(" ");
            let hint = doctype_hint(title, &comments);
            let doctypes: Option<Vec<String>> =
                hint.map(|h| h.doctypes().iter().map(|s| s.to_string()).collect());
            (must_match(record.keywords.as_deref(), config), doctypes)
        }
        RecordSource::Article => (false, None),
    };

    let payload = MatchPayload {
        abstract_text: record
            .abstract_text
            .as_deref()
            .unwrap_or_default()
            .replace('\n', " "),
        title: title.replace('\n', " "),
        author: normalize_with_config(authors, &config.normalizer),
        year: year.to_string(),
        doctype: source,
        bibcode: bibcode.to_string(),
        doi: extract_doi(&record.comments, record.doi.as_deref()),
        mustmatch,
        match_doctype,
    };
    tracing::debug!(bibcode, author = %payload.author, mustmatch, "built match payload");
    Ok(payload)
}

fn required<'a>(field: &'a Option<String>, name: &'static str) -> Result<&'a str, PayloadError> {
    field.as_deref().ok_or(PayloadError::MissingField(name))
}

fn must_match(keywords: Option<&str>, config: &PayloadConfig) -> bool {
    keywords.is_some_and(|keywords| {
        config
            .must_match_categories
            .iter()
            .any(|category| keywords.contains(category.as_str()))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn build(rec: &MetadataRecord, source: RecordSource) -> Result<MatchPayload, PayloadError> {
        build_payload(rec, source, &PayloadConfig::default())
    }

    fn record() -> MetadataRecord {
        MetadataRecord {
            bibcode: Some("2018arXiv180101021F".to_string()),
            authors: Some("Frey, Katie; Accomazzi, Alberto".to_string()),
            title: Some("Astrophysics Source Code Library\nversion 2".to_string()),
            abstract_text: Some("We describe\nthe library.".to_string()),
            pubdate: Some("2018-01-03".to_string()),
            comments: vec![
                "Submitted to the Astrophysical Journal Supplements".to_string(),
                "doi:10.3847/1538-4365/aab760".to_string(),
            ],
            doi: Some("10.3847/1538-4365/aab760".to_string()),
            keywords: Some("Astrophysics - Instrumentation and Methods".to_string()),
        }
    }

    #[test]
    fn test_eprint_payload() {
        let payload = build(&record(), RecordSource::Eprint).unwrap();
        assert_eq!(payload.author, "Frey, K; Accomazzi, A");
        assert_eq!(payload.year, "2018");
        assert_eq!(payload.title, "Astrophysics Source Code Library version 2");
        assert_eq!(payload.abstract_text, "We describe the library.");
        assert_eq!(payload.doi, Some(vec!["10.3847/1538-4365/aab760".to_string()]));
        assert!(payload.mustmatch);
        assert_eq!(payload.match_doctype, None);
    }

    #[test]
    fn test_article_payload_has_no_eprint_hints() {
        let mut rec = record();
        rec.comments.push("PhD thesis".to_string());
        let payload = build(&rec, RecordSource::Article).unwrap();
        assert!(!payload.mustmatch);
        assert_eq!(payload.match_doctype, None);
        assert_eq!(payload.doctype, RecordSource::Article);
    }

    #[test]
    fn test_thesis_hint() {
        let mut rec = record();
        rec.comments = vec!["PhD thesis, 120 pages".to_string()];
        let payload = build(&rec, RecordSource::Eprint).unwrap();
        assert_eq!(
            payload.match_doctype,
            Some(vec!["phdthesis".to_string(), "mastersthesis".to_string()])
        );
    }

    #[test]
    fn test_missing_field() {
        let mut rec = record();
        rec.authors = None;
        let err = build(&rec, RecordSource::Eprint).unwrap_err();
        assert!(matches!(err, PayloadError::MissingField("authors")));
        assert_eq!(err.to_string(), "required field `authors` is missing");
    }

    #[test]
    fn test_invalid_pubdate() {
        let mut rec = record();
        rec.pubdate = Some("18".to_string());
        let err = build(&rec, RecordSource::Eprint).unwrap_err();
        assert!(matches!(err, PayloadError::InvalidPubdate(_)));
    }

    #[test]
    fn test_missing_abstract_is_empty() {
        let mut rec = record();
        rec.abstract_text = None;
        let payload = build(&rec, RecordSource::Eprint).unwrap();
        assert_eq!(payload.abstract_text, "");
    }

    #[test]
    fn test_json_omits_absent_doi() {
        let mut rec = record();
        rec.doi = None;
        rec.comments.clear();
        let payload = build(&rec, RecordSource::Eprint).unwrap();
        let json: serde_json::Value = serde_json::from_str(&payload.to_json().unwrap()).unwrap();
        assert!(json.get("doi").is_none());
        assert_eq!(json["doctype"], "eprint");
        assert_eq!(json["abstract"], "We describe the library.");
        assert_eq!(json["match_doctype"], serde_json::Value::Null);
    }

    #[test]
    fn test_record_deserializes_with_defaults() {
        let json =
            r#"{"bibcode": "X", "authors": "Tang, Xiaomin", "title": "T", "pubdate": "2017"}"#;
        let rec: MetadataRecord = serde_json::from_str(json).unwrap();
        assert!(rec.comments.is_empty());
        let payload = build(&rec, RecordSource::Article).unwrap();
        assert_eq!(payload.author, "Tang, X");
        assert_eq!(payload.doi, None);
    }

    #[test]
    fn test_custom_must_match_categories() {
        let config = PayloadConfig {
            must_match_categories: vec!["Quantum".to_string()],
            ..PayloadConfig::default()
        };
        let payload = build_payload(&record(), RecordSource::Eprint, &config).unwrap();
        assert!(!payload.mustmatch);
    }
}
