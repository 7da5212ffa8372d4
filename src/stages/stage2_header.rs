use std::sync::LazyLock;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::error::{ExtractionFailure, HeaderField};
use crate::models::{Diagnostic, DiagnosticKind, People, Roster, SpeakerType};
use crate::nlp::{Tagger, extract_people};

/// "Members present:" through the end of its line
static MEMBERS_PRESENT_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)members present[:\s]*.*?(?:\n|$)").expect("valid members present regex")
});

/// An unlabelled roster line naming the chair
static CHAIR_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i).*\(chair.*\).*").expect("valid chair line regex"));

/// From a line starting "Witness" to the end of the header
static WITNESS_BLOCK_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)(?:\A|\n)Witness.*").expect("valid witness block regex")
});

static GAVE_EVIDENCE_LINE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*gave evidence").expect("valid gave evidence regex"));

/// Lines listing written (not oral) submissions
static WRITTEN_EVIDENCE_LINE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^.*(?:written evidence|http).*$").expect("valid written evidence regex")
});

/// Header spans and roster of one transcript
#[derive(Debug, Clone, PartialEq)]
pub struct HeaderParse {
    pub full_header_text_unparsed: String,
    pub members_text: String,
    pub witnesses_text: String,
    pub header_other_text: String,
    pub roster: Roster,
    pub diagnostics: Vec<Diagnostic>,
}

/// A header span and the people extracted from it
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedField {
    pub text: String,
    pub people: People,
}

/// Extract members and witnesses from the header and build the roster
///
/// The two fields are extracted independently; a failure on one side leaves
/// that side empty, records a diagnostic, and does not affect the other.
pub fn parse_header(header_text: &str, tagger: &dyn Tagger) -> HeaderParse {
    let normalized = strip_emphasis(header_text);
    let mut diagnostics = Vec::new();

    let members = extract_members(&normalized, tagger);
    let witnesses = extract_witnesses(&normalized, tagger);

    let mut header_other_text = normalized.clone();
    let members = settle(members, &mut header_other_text, &mut diagnostics);
    let witnesses = settle(witnesses, &mut header_other_text, &mut diagnostics);

    let roster = Roster::build(members.people, witnesses.people);
    info!(
        "Header roster: {} members, {} witnesses, {} entries",
        roster.members.len(),
        roster.witnesses.len(),
        roster.len()
    );

    HeaderParse {
        full_header_text_unparsed: header_text.to_string(),
        members_text: members.text,
        witnesses_text: witnesses.text,
        header_other_text,
        roster,
        diagnostics,
    }
}

/// Locate the members span and extract members from it
pub fn extract_members(
    normalized: &str,
    tagger: &dyn Tagger,
) -> Result<ExtractedField, ExtractionFailure> {
    let header = normalized.trim();
    let span = MEMBERS_PRESENT_REGEX
        .find(header)
        .or_else(|| {
            debug!("No 'Members present' label; looking for a line naming the chair");
            CHAIR_LINE_REGEX.find(header)
        })
        .ok_or(ExtractionFailure::SpanNotFound(HeaderField::Members))?;

    let text = span.as_str().trim().to_string();
    if text.is_empty() {
        return Err(ExtractionFailure::EmptySpan(HeaderField::Members));
    }

    let people = extract_people(&text, SpeakerType::Member, tagger);
    Ok(ExtractedField { text, people })
}

/// Locate the witnesses span and extract witnesses from it
///
/// Written-evidence lines and URLs are removed first; they list written
/// submissions, not people who spoke.
pub fn extract_witnesses(
    normalized: &str,
    tagger: &dyn Tagger,
) -> Result<ExtractedField, ExtractionFailure> {
    let header = normalized.trim();
    let span = WITNESS_BLOCK_REGEX
        .find(header)
        .or_else(|| {
            debug!("No 'Witness' line; looking for a line ending 'gave evidence'");
            GAVE_EVIDENCE_LINE_REGEX.find(header)
        })
        .ok_or(ExtractionFailure::SpanNotFound(HeaderField::Witnesses))?;

    let without_phrase = span.as_str().trim().replace("gave evidence", "");
    let text = WRITTEN_EVIDENCE_LINE_REGEX
        .replace_all(&without_phrase, "")
        .to_string();
    if text.trim().is_empty() {
        return Err(ExtractionFailure::EmptySpan(HeaderField::Witnesses));
    }

    let people = extract_people(&text, SpeakerType::Witness, tagger);
    Ok(ExtractedField { text, people })
}

/// Collapse "_ _" left between adjacent italic runs, then drop all emphasis marks
fn strip_emphasis(text: &str) -> String {
    text.replace("_ _", "__").replace(['_', '*'], "")
}

/// Unwrap a field result, removing its span from the header remainder or
/// recording why it failed
fn settle(
    field: Result<ExtractedField, ExtractionFailure>,
    header_other_text: &mut String,
    diagnostics: &mut Vec<Diagnostic>,
) -> ExtractedField {
    match field {
        Ok(field) => {
            *header_other_text = header_other_text.replace(&field.text, "");
            field
        }
        Err(failure) => {
            warn!("Failed to parse {} from header text: {}", failure.field(), failure);
            diagnostics.push(Diagnostic::new(
                DiagnosticKind::FieldExtractionFailure,
                failure.to_string(),
            ));
            ExtractedField {
                text: String::new(),
                people: People::new(),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CHAIR_ALIAS;
    use crate::nlp::RuleTagger;

    #[test]
    fn test_members_and_witnesses() {
        let header = "Members present: Q Smith (Chair), J Doe\nWitness: Prof A Jones, CEO, ExampleCorp";

        let parse = parse_header(header, &RuleTagger);
        let roster = &parse.roster;

        assert_eq!(parse.members_text, "Members present: Q Smith (Chair), J Doe");
        assert_eq!(parse.witnesses_text, "Witness: Prof A Jones, CEO, ExampleCorp");
        assert_eq!(roster.members["Q Smith"].designation, "(Chair)");
        assert_eq!(roster.members["J Doe"].designation, "");
        assert_eq!(roster.members[CHAIR_ALIAS].name, "Q Smith");
        assert_eq!(
            roster.witnesses["Prof A Jones"].designation,
            "CEO, ExampleCorp"
        );
        assert_eq!(roster.len(), 4);
        assert!(parse.diagnostics.is_empty());
        assert_eq!(parse.header_other_text.trim(), "");
        assert_eq!(parse.full_header_text_unparsed, header);
    }

    #[test]
    fn test_ids_follow_roster_order() {
        let header = "Members present: Q Smith (Chair), J Doe\nWitness: Prof A Jones, CEO";

        let roster = parse_header(header, &RuleTagger).roster;

        let ids: Vec<usize> = roster.all_people.values().map(|p| p.id).collect();
        assert_eq!(ids, (0..roster.len()).collect::<Vec<_>>());
        assert_eq!(roster.witnesses["Prof A Jones"].id, 3);
    }

    #[test]
    fn test_emphasis_is_stripped() {
        let header = "**Members present:** _Q Smith_ _ _(Chair)_, J Doe\n**Witness:** Prof A Jones";

        let parse = parse_header(header, &RuleTagger);

        assert!(parse.roster.members.contains_key("Q Smith"));
        assert!(parse.roster.witnesses.contains_key("Prof A Jones"));
        assert!(!parse.members_text.contains('*'));
    }

    #[test]
    fn test_members_fall_back_to_chair_line() {
        let header = "Oral evidence taken on 1 May\nQ Smith (Chair); J Doe\nWitness: Prof A Jones";

        let parse = parse_header(header, &RuleTagger);

        assert_eq!(parse.members_text, "Q Smith (Chair); J Doe");
        assert!(parse.roster.members.contains_key("Q Smith"));
        assert!(parse.roster.members.contains_key("J Doe"));
        assert!(parse.header_other_text.contains("Oral evidence taken on 1 May"));
    }

    #[test]
    fn test_witnesses_fall_back_to_gave_evidence() {
        let header = "Members present: J Doe\nProf A Jones and Dr Kim Park gave evidence.";

        let parse = parse_header(header, &RuleTagger);

        let names: Vec<&str> = parse.roster.witnesses.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["Prof A Jones", "Dr Kim Park"]);
        assert!(!parse.witnesses_text.contains("gave evidence"));
    }

    #[test]
    fn test_written_evidence_lines_removed() {
        let header = "Members present: J Doe\n\
                      Witness: Prof A Jones, CEO\n\
                      Written evidence from Dr Kim Park (ABC0001)\n\
                      http://example.org/evidence/1.html";

        let parse = parse_header(header, &RuleTagger);

        assert!(!parse.witnesses_text.contains("Written evidence"));
        assert!(!parse.witnesses_text.contains("http"));
        assert!(parse.roster.witnesses.contains_key("Prof A Jones"));
        assert!(!parse.roster.witnesses.contains_key("Dr Kim Park"));
    }

    #[test]
    fn test_brackets_in_witness_span_are_literal() {
        let header = "Members present: J Doe\nWitness: Prof A Jones [Panel (a)], CEO";

        let parse = parse_header(header, &RuleTagger);

        assert_eq!(parse.witnesses_text, "Witness: Prof A Jones [Panel (a)], CEO");
        assert!(!parse.header_other_text.contains("Prof A Jones"));
    }

    #[test]
    fn test_fields_fail_independently() {
        let parse = parse_header("Oral evidence\nWitness: Prof A Jones, CEO", &RuleTagger);

        assert!(parse.roster.members.is_empty());
        assert_eq!(parse.members_text, "");
        assert!(parse.roster.witnesses.contains_key("Prof A Jones"));
        assert_eq!(parse.diagnostics.len(), 1);
        assert_eq!(parse.diagnostics[0].kind, DiagnosticKind::FieldExtractionFailure);
        assert!(parse.diagnostics[0].message.contains("members"));
    }

    #[test]
    fn test_witness_line_opening_the_header() {
        let parse = parse_header("Witnesses: Prof A Jones, CEO, ExampleCorp\n", &RuleTagger);

        assert_eq!(parse.witnesses_text, "Witnesses: Prof A Jones, CEO, ExampleCorp");
        assert!(parse.roster.witnesses.contains_key("Prof A Jones"));
    }

    #[test]
    fn test_both_fields_missing() {
        let parse = parse_header("", &RuleTagger);

        assert!(parse.roster.is_empty());
        assert_eq!(parse.diagnostics.len(), 2);
    }

    #[test]
    fn test_extract_members_reports_missing_span() {
        let result = extract_members("Nothing useful here", &RuleTagger);
        assert_eq!(
            result,
            Err(ExtractionFailure::SpanNotFound(HeaderField::Members))
        );
    }
}
