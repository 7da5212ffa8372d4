use serde::{Deserialize, Serialize};

/// Category of a non-fatal parsing problem
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
    /// No segmentation tier found a split point
    StructuralParseFailure,
    /// The members or witnesses span could not be extracted
    FieldExtractionFailure,
    /// A speaker label resolved with a score below the review threshold
    LowConfidenceMatch,
    /// A speaker label could not be matched to anyone
    UnresolvableLabel,
}

/// A problem surfaced for review, retained in the output record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub kind: DiagnosticKind,
    pub message: String,
}

impl Diagnostic {
    pub fn new(kind: DiagnosticKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}
