//! Metadata Extractor
//!
//! Turns whatever the document-analysis service returned into form-ready
//! metadata. The service is allowed to answer with a structured object, a
//! JSON string, markdown-fenced JSON, or garbage; only the last of those
//! degrades, and even then to the original payload rather than a crash.

use regex::Regex;
use serde_json::Value;
use std::collections::HashSet;

use docent_models::{
    AnalysisPayload, DocumentMetadata, PendingTagAllocator, Tag, UploadDraft, MAX_SELECTED_TAGS,
};
use docent_utils::{DocentError, DocentResult};

/// Extract structured metadata from an analysis response.
///
/// First match wins: a payload without `rawAnalysis` is already the result;
/// otherwise a JSON-fenced code block inside `rawAnalysis`, then the whole
/// string as JSON. When nothing parses, the payload is used as-is: a
/// recovered parse failure, logged, never surfaced.
pub fn extract_metadata(payload: &Value) -> DocumentMetadata {
    match AnalysisPayload::classify(payload) {
        AnalysisPayload::Structured(metadata) => metadata,
        AnalysisPayload::RawText(raw) => match parse_raw_analysis(&raw) {
            Ok(metadata) => metadata,
            Err(e) => {
                tracing::warn!(error = %e, "analysis response not parseable, keeping raw payload");
                DocumentMetadata::from_value_lenient(payload)
            }
        },
    }
}

/// The two parse attempts on a `rawAnalysis` string.
fn parse_raw_analysis(raw: &str) -> DocentResult<DocumentMetadata> {
    if let Some(inner) = fenced_json_block(raw) {
        if let Ok(value) = serde_json::from_str::<Value>(inner) {
            return Ok(DocumentMetadata::from_value_lenient(&value));
        }
    }
    match serde_json::from_str::<Value>(raw) {
        Ok(value) => Ok(DocumentMetadata::from_value_lenient(&value)),
        Err(e) => Err(DocentError::parse(e.to_string())),
    }
}

/// The interior of the first JSON code fence, if any.
fn fenced_json_block(raw: &str) -> Option<&str> {
    let fence = Regex::new(r"(?s)```json\s*(.*?)```").unwrap();
    fence
        .captures(raw)
        .and_then(|captures| captures.get(1))
        .map(|m| m.as_str())
}

/// Normalize the loosely-typed `keywords` field into at most
/// [`MAX_SELECTED_TAGS`] non-blank, case-insensitively unique strings.
///
/// Arrays are taken element-wise, strings split on commas, anything else
/// stringified and then split as a last resort.
pub fn normalize_keywords(value: Option<&Value>) -> Vec<String> {
    let raw: Vec<String> = match value {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) => s.split(',').map(str::to_string).collect(),
        Some(other) => other
            .to_string()
            .split(',')
            .map(str::to_string)
            .collect(),
    };

    let mut seen = HashSet::new();
    let mut keywords = Vec::new();
    for keyword in raw {
        let keyword = keyword.trim();
        if keyword.is_empty() || !seen.insert(keyword.to_lowercase()) {
            continue;
        }
        keywords.push(keyword.to_string());
        if keywords.len() == MAX_SELECTED_TAGS {
            break;
        }
    }
    keywords
}

/// Match each keyword against the known vocabulary, case-insensitively.
///
/// Misses become pending tags the user can inspect and edit before anything
/// touches the server; the allocator keeps their ids unique within this
/// call.
pub fn reconcile_tags(
    keywords: &[String],
    vocabulary: &[Tag],
    allocator: &mut PendingTagAllocator,
) -> Vec<Tag> {
    keywords
        .iter()
        .map(|keyword| {
            vocabulary
                .iter()
                .find(|tag| tag.name_matches(keyword))
                .cloned()
                .unwrap_or_else(|| Tag::pending(allocator.allocate(keyword.clone()), keyword.clone()))
        })
        .collect()
}

/// Pre-fill the upload form from an analysis response.
///
/// Every target field gets an explicit default when the metadata lacks it:
/// the current year for `year`, empty strings for text fields. Ids are kept
/// in string form for the form controls.
pub fn apply_to_draft(draft: &mut UploadDraft, payload: &Value, vocabulary: &[Tag]) {
    use chrono::Datelike;

    let metadata = extract_metadata(payload);
    let current_year = chrono::Utc::now().year();

    draft.title = metadata.title.clone().unwrap_or_default();
    draft.authors = metadata.authors.clone().unwrap_or_default();
    draft.year = Some(metadata.year_or(current_year));
    draft.publisher = metadata.publisher.clone().unwrap_or_default();
    draft.abstract_full = metadata.abstract_full.clone().unwrap_or_default();
    draft.abstract_short = metadata.abstract_short.clone().unwrap_or_default();
    draft.category_id = metadata.category_id_string();
    draft.subcategory_id = metadata.subcategory_id_string();

    let keywords = normalize_keywords(metadata.keywords.as_ref());
    let mut allocator = PendingTagAllocator::new();
    draft.selected_tags = reconcile_tags(&keywords, vocabulary, &mut allocator);
}
