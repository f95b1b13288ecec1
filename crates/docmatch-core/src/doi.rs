//! DOI collection from free-text comment lines.

/// Collect DOIs from `doi:`-prefixed comment lines and an already known DOI.
///
/// The known DOI comes first, then comment DOIs in line order; duplicates are
/// dropped, keeping the first occurrence. Returns `None` rather than an empty
/// list so the caller can leave the field out of the payload.
///
/// ```
/// let comments = ["Submitted to ApJS", "doi:10.3847/1538-4365/aab760"];
/// assert_eq!(
///     docmatch_core::extract_doi(&comments, None),
///     Some(vec!["10.3847/1538-4365/aab760".to_string()])
/// );
/// ```
pub fn extract_doi<S: AsRef<str>>(comments: &[S], existing: Option<&str>) -> Option<Vec<String>> {
    let mut dois = Vec::new();

    if let Some(existing) = existing {
        push_unique(&mut dois, strip_scheme(existing.trim()));
    }
    for comment in comments {
        if let Some(doi) = doi_from_comment(comment.as_ref()) {
            push_unique(&mut dois, doi);
        }
    }

    tracing::trace!(count = dois.len(), "collected DOIs");
    if dois.is_empty() { None } else { Some(dois) }
}

/// The DOI announced by a comment line, if the line starts with `doi`.
///
/// Only the text between the first and second `doi:` is taken, with
/// whitespace and trailing `;`, `,`, `.` removed.
fn doi_from_comment(line: &str) -> Option<&str> {
    if !line.starts_with("doi") {
        return None;
    }
    let rest = line.split("doi:").nth(1)?;
    Some(clean_doi(rest))
}

fn clean_doi(doi: &str) -> &str {
    doi.trim().trim_matches([';', ',', '.']).trim_end()
}

fn strip_scheme(doi: &str) -> &str {
    let doi = doi
        .strip_prefix("doi:")
        .or_else(|| doi.strip_prefix("DOI:"))
        .unwrap_or(doi);
    clean_doi(doi)
}

fn push_unique(dois: &mut Vec<String>, doi: &str) {
    if !doi.is_empty() && !dois.iter().any(|d| d == doi) {
        dois.push(doi.to_string());
    }
}
