use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::{Diagnostic, DiagnosticKind, Roster, SpeakerTable, Utterance};

/// Structured record derived from one hearing document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transcript {
    /// Provenance supplied by the caller, passed through untouched
    pub source_locations: IndexMap<String, String>,
    /// Header text (including panel witness lines) before any normalization
    pub full_header_text_unparsed: String,
    pub members_text: String,
    pub witnesses_text: String,
    /// Header text left over once the members and witnesses spans are removed
    pub header_other_text: String,
    #[serde(flatten)]
    pub roster: Roster,
    pub all_sections: Vec<Utterance>,
    pub speakers_dict: SpeakerTable,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub diagnostics: Vec<Diagnostic>,
}

impl Transcript {
    /// Number of sections attributed to a roster person
    pub fn attributed_count(&self) -> usize {
        self.all_sections
            .iter()
            .filter(|s| s.speaker().is_some())
            .count()
    }

    /// Number of sections that followed neither speaker convention
    pub fn unparsed_count(&self) -> usize {
        self.all_sections.iter().filter(|s| !s.is_spoken()).count()
    }

    /// Diagnostics of one kind
    pub fn diagnostics_of(&self, kind: DiagnosticKind) -> impl Iterator<Item = &Diagnostic> {
        self.diagnostics.iter().filter(move |d| d.kind == kind)
    }
}
