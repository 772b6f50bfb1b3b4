//! Analysis Service Payload Types
//!
//! The document-analysis service answers with either a structured metadata
//! object or a `rawAnalysis` string that still needs extraction. These types
//! keep the loosely-typed fields loose (`serde_json::Value`) until the
//! moment a form field actually needs a coerced value.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// The analysis response, classified by shape.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisPayload {
    /// The payload itself already is the structured result.
    Structured(DocumentMetadata),
    /// A `rawAnalysis` string the extractor still has to dig into.
    RawText(String),
}

impl AnalysisPayload {
    /// Classify a raw service response.
    ///
    /// A payload without a string `rawAnalysis` field is treated as the
    /// structured result; anything the metadata shape cannot absorb falls
    /// back to empty metadata rather than an error.
    pub fn classify(payload: &Value) -> Self {
        match payload.get("rawAnalysis").and_then(Value::as_str) {
            Some(raw) => Self::RawText(raw.to_string()),
            None => Self::Structured(DocumentMetadata::from_value_lenient(payload)),
        }
    }
}

/// Metadata the analysis service proposes for a document.
///
/// Every field is optional and `year`/`categoryId`/`subcategoryId`/`keywords`
/// stay untyped: the service has been observed returning numbers, numeric
/// strings, arrays and comma-joined strings for them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentMetadata {
    pub title: Option<String>,
    pub authors: Option<String>,
    pub year: Option<Value>,
    pub publisher: Option<String>,
    pub abstract_full: Option<String>,
    pub abstract_short: Option<String>,
    pub category_id: Option<Value>,
    pub subcategory_id: Option<Value>,
    pub keywords: Option<Value>,
}

impl DocumentMetadata {
    /// Deserialize, falling back to the empty metadata on shape mismatch.
    pub fn from_value_lenient(payload: &Value) -> Self {
        serde_json::from_value(payload.clone()).unwrap_or_default()
    }

    /// Year coerced from number or numeric string, else the caller's default.
    pub fn year_or(&self, default: i32) -> i32 {
        match &self.year {
            Some(Value::Number(n)) => n.as_i64().map(|y| y as i32).unwrap_or(default),
            Some(Value::String(s)) => s.trim().parse().unwrap_or(default),
            _ => default,
        }
    }

    /// Category id coerced to the string form a form control binds to.
    pub fn category_id_string(&self) -> String {
        Self::id_string(&self.category_id)
    }

    /// Subcategory id coerced to the string form a form control binds to.
    pub fn subcategory_id_string(&self) -> String {
        Self::id_string(&self.subcategory_id)
    }

    fn id_string(value: &Option<Value>) -> String {
        match value {
            Some(Value::Number(n)) => n.to_string(),
            Some(Value::String(s)) => s.trim().to_string(),
            _ => String::new(),
        }
    }
}
