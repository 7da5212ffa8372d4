use thiserror::Error;

/// Header field extracted independently by the header parser
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Members,
    Witnesses,
}

impl std::fmt::Display for HeaderField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            HeaderField::Members => write!(f, "members"),
            HeaderField::Witnesses => write!(f, "witnesses"),
        }
    }
}

/// Why a header field produced no roster entries
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionFailure {
    #[error("{0} span not found in header text")]
    SpanNotFound(HeaderField),

    #[error("{0} span is empty")]
    EmptySpan(HeaderField),
}

impl ExtractionFailure {
    pub fn field(&self) -> HeaderField {
        match self {
            ExtractionFailure::SpanNotFound(field) | ExtractionFailure::EmptySpan(field) => *field,
        }
    }
}
