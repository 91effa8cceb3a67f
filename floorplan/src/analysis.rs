//! Parsing of the vision model's text output into a floorplan.
//!
//! The model is asked for raw JSON but frequently wraps it in Markdown code
//! fences. [`parse_model_output`] strips the fences, trims, and decodes the
//! rest leniently. When decoding fails the error keeps the raw text so the
//! worker can store `{ "raw": ..., "error": "Failed to parse JSON" }` as the
//! job result.

#[cfg(test)]
#[path = "analysis_test.rs"]
mod analysis_test;

use serde_json::{Value, json};

use crate::doc::FloorplanDocument;

/// Error string stored alongside unparseable model output.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse JSON";

/// Errors turning model output into a floorplan.
#[derive(Debug, thiserror::Error)]
pub enum AnalysisError {
    /// Nothing but whitespace and fences.
    #[error("model output is empty")]
    Empty,

    /// The remaining text is not a floorplan object.
    #[error("model output is not valid floorplan JSON: {source}")]
    InvalidJson {
        raw: String,
        #[source]
        source: serde_json::Error,
    },
}

impl AnalysisError {
    /// The unmodified model output, when there was any.
    #[must_use]
    pub fn raw_output(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::InvalidJson { raw, .. } => Some(raw),
        }
    }

    /// The job `result` payload recorded for a failed parse.
    #[must_use]
    pub fn to_result_payload(&self) -> Value {
        json!({
            "raw": self.raw_output().unwrap_or_default(),
            "error": PARSE_FAILURE_MESSAGE,
        })
    }
}

/// Remove every ```` ```json ```` and ```` ``` ```` marker and trim.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_owned()
}

/// Decode model output into a floorplan document.
///
/// # Errors
///
/// Returns [`AnalysisError::Empty`] if nothing remains after stripping fences,
/// or [`AnalysisError::InvalidJson`] (carrying the raw text) if the remainder
/// does not decode.
pub fn parse_model_output(text: &str) -> Result<FloorplanDocument, AnalysisError> {
    let cleaned = strip_code_fences(text);
    if cleaned.is_empty() {
        return Err(AnalysisError::Empty);
    }
    FloorplanDocument::from_json(&cleaned).map_err(|source| AnalysisError::InvalidJson {
        raw: text.to_owned(),
        source,
    })
}
