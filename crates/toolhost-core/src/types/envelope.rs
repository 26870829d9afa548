//! Uniform result envelope returned for every tool invocation

use serde::{Deserialize, Serialize};

/// One text entry of an envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvelopeEntry {
    pub text: String,
    /// Whether this entry reports a failure
    #[serde(rename = "isError", default, skip_serializing_if = "std::ops::Not::not")]
    pub is_error: bool,
}

/// Ordered entries returned to the caller, success or failure
///
/// Expected failures never cross the dispatch boundary as errors; they are
/// encoded here with `is_error` set.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ResultEnvelope {
    pub entries: Vec<EnvelopeEntry>,
}

impl ResultEnvelope {
    /// A single successful text entry
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            entries: vec![EnvelopeEntry {
                text: text.into(),
                is_error: false,
            }],
        }
    }

    /// A single error entry, rendered as `Error: {message}`
    pub fn error(message: impl std::fmt::Display) -> Self {
        Self {
            entries: vec![EnvelopeEntry {
                text: format!("Error: {}", message),
                is_error: true,
            }],
        }
    }

    /// Whether any entry reports a failure
    pub fn is_error(&self) -> bool {
        self.entries.iter().any(|e| e.is_error)
    }

    /// Text of the first entry, if any
    pub fn first_text(&self) -> Option<&str> {
        self.entries.first().map(|e| e.text.as_str())
    }
}
