//! Failures that cross the analysis boundary and their serialized form.
//!
//! Field-level problems never show up here: malformed values degrade to
//! `None` inside the normalizers. What remains is a schema mismatch detected
//! before any row is cleaned, an input the tool refuses to read, and anything
//! that went wrong while reading or decoding the file.

use serde::Serialize;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AnalysisError {
    #[error("CSV is missing required column(s): {}", .missing.join(", "))]
    Schema {
        missing: Vec<String>,
        required: Vec<String>,
        found: Vec<String>,
    },

    #[error("Unsupported input: {0}")]
    UnsupportedInput(String),

    #[error("Failed to process CSV: {0}")]
    Processing(String),
}

impl AnalysisError {
    /// Wraps an upstream failure, keeping the whole context chain in the
    /// message.
    pub fn processing(err: &anyhow::Error) -> Self {
        AnalysisError::Processing(format!("{err:#}"))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Schema { .. } => "SCHEMA_MISMATCH",
            Self::UnsupportedInput(_) => "UNSUPPORTED_INPUT",
            Self::Processing(_) => "PROCESSING_FAILED",
        }
    }

    pub fn to_report(&self) -> ErrorReport {
        match self {
            Self::Schema {
                missing,
                required,
                found,
            } => ErrorReport {
                error: "CSV is missing required columns".to_string(),
                details: ErrorDetails::Schema {
                    missing: missing.clone(),
                    required: required.clone(),
                    found: found.clone(),
                },
            },
            Self::UnsupportedInput(message) => ErrorReport {
                error: "Unsupported file type".to_string(),
                details: ErrorDetails::Message(message.clone()),
            },
            Self::Processing(message) => ErrorReport {
                error: "Failed to process CSV".to_string(),
                details: ErrorDetails::Message(message.clone()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorReport {
    pub error: String,
    pub details: ErrorDetails,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ErrorDetails {
    Schema {
        missing: Vec<String>,
        required: Vec<String>,
        found: Vec<String>,
    },
    Message(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;
    use serde_json::json;

    #[test]
    fn schema_report_serializes_details_object() {
        let err = AnalysisError::Schema {
            missing: vec!["rating".into()],
            required: vec!["product".into(), "rating".into()],
            found: vec!["product".into()],
        };
        let value = serde_json::to_value(err.to_report()).unwrap();
        assert_eq!(
            value,
            json!({
                "error": "CSV is missing required columns",
                "details": {
                    "missing": ["rating"],
                    "required": ["product", "rating"],
                    "found": ["product"]
                }
            })
        );
        assert_eq!(err.error_code(), "SCHEMA_MISMATCH");
    }

    #[test]
    fn processing_report_keeps_context_chain() {
        let source = anyhow!("invalid utf-8").context("Reading row 4");
        let err = AnalysisError::processing(&source);
        let value = serde_json::to_value(err.to_report()).unwrap();
        assert_eq!(value["details"], json!("Reading row 4: invalid utf-8"));
    }
}
