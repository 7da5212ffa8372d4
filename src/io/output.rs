use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::models::{Transcript, Utterance};

/// Longest section text kept in a summary, in characters
pub const SHORT_SECTION_CHARS: usize = 500;

/// Write a transcript as pretty JSON
pub fn write_transcript_json(transcript: &Transcript, path: &Path) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("Failed to create file: {:?}", path))?;
    serde_json::to_writer_pretty(file, transcript).context("Failed to write JSON")?;
    Ok(())
}

/// A section reduced to its matched speaker name and the start of its text
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ShortSection {
    pub section_id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_string: Option<String>,
    /// Name of the resolved person
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speaker_matched: Option<String>,
    pub text: String,
}

impl ShortSection {
    pub fn from_utterance(utterance: &Utterance) -> Self {
        let question_number = match utterance {
            Utterance::Spoken(turn) => turn.question_number.clone(),
            Utterance::Unparsed(_) => None,
        };
        Self {
            section_id: utterance.section_id(),
            question_number,
            speaker_string: utterance.speaker_string().map(str::to_string),
            speaker_matched: utterance.speaker().map(|p| p.name.clone()),
            text: truncate_chars(utterance.text(), SHORT_SECTION_CHARS),
        }
    }
}

/// Per-label line of the summary
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelSummary {
    pub label: String,
    pub matched: String,
    pub score: u8,
    pub count: usize,
}

/// Key figures of a parsed transcript, for quick review
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TranscriptSummary {
    pub members: Vec<String>,
    pub witnesses: Vec<String>,
    pub total_sections: usize,
    pub parsed_sections: usize,
    pub unparsed_sections: usize,
    pub attributed_sections: usize,
    pub labels: Vec<LabelSummary>,
    pub low_confidence_labels: Vec<String>,
    pub diagnostics: usize,
    pub short_sections: Vec<ShortSection>,
}

impl TranscriptSummary {
    /// Summarise a transcript; labels scoring below `low_confidence_threshold`
    /// are listed for review
    pub fn from_transcript(transcript: &Transcript, low_confidence_threshold: u8) -> Self {
        let labels: Vec<LabelSummary> = transcript
            .speakers_dict
            .iter()
            .map(|(label, resolution)| LabelSummary {
                label: label.clone(),
                matched: resolution.person.name.clone(),
                score: resolution.fuzzy_match_score,
                count: resolution.label_count,
            })
            .collect();
        let low_confidence_labels = labels
            .iter()
            .filter(|l| l.score < low_confidence_threshold)
            .map(|l| l.label.clone())
            .collect();

        let unparsed_sections = transcript.unparsed_count();
        Self {
            members: transcript.roster.members.keys().cloned().collect(),
            witnesses: transcript.roster.witnesses.keys().cloned().collect(),
            total_sections: transcript.all_sections.len(),
            parsed_sections: transcript.all_sections.len() - unparsed_sections,
            unparsed_sections,
            attributed_sections: transcript.attributed_count(),
            labels,
            low_confidence_labels,
            diagnostics: transcript.diagnostics.len(),
            short_sections: transcript
                .all_sections
                .iter()
                .map(ShortSection::from_utterance)
                .collect(),
        }
    }

    /// Plain-text report of the roster, counts and label resolutions
    pub fn format(&self) -> String {
        let mut output = String::new();

        output.push_str("Roster\n------\n");
        output.push_str(&format!("Members: {}\n", self.members.join("; ")));
        output.push_str(&format!("Witnesses: {}\n\n", self.witnesses.join("; ")));

        output.push_str("Sections\n--------\n");
        output.push_str(&format!("Total: {}\n", self.total_sections));
        output.push_str(&format!("Parsed: {}\n", self.parsed_sections));
        output.push_str(&format!("Unparsed: {}\n", self.unparsed_sections));
        output.push_str(&format!("Attributed: {}\n\n", self.attributed_sections));

        output.push_str("Speakers\n--------\n");
        for label in &self.labels {
            output.push_str(&format!(
                "{:<30} -> {:<30} score {:>3}, {} sections\n",
                label.label, label.matched, label.score, label.count
            ));
        }

        if !self.low_confidence_labels.is_empty() {
            output.push_str(&format!(
                "\nLow confidence: {}\n",
                self.low_confidence_labels.join("; ")
            ));
        }
        output.push_str(&format!("Diagnostics: {}\n", self.diagnostics));

        output
    }

    pub fn write_json(&self, path: &Path) -> Result<()> {
        let file = std::fs::File::create(path)
            .with_context(|| format!("Failed to create file: {:?}", path))?;
        serde_json::to_writer_pretty(file, self).context("Failed to write JSON")?;
        Ok(())
    }
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => text[..end].to_string(),
        None => text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stages::TranscriptParser;
    use indexmap::IndexMap;

    const HEARING: &str = "Members present: Q Smith (Chair), J Doe\n\
        Witnesses: Prof A Jones, CEO, ExampleCorp\n\
        **Chair:** Welcome.\n\
        **Prof Jones:** Thank you.\n\
        **The Chair:** Let us begin.\n";

    #[test]
    fn test_truncate_chars() {
        assert_eq!(truncate_chars("abcdef", 3), "abc");
        assert_eq!(truncate_chars("abc", 3), "abc");
        assert_eq!(truncate_chars("ééé", 2), "éé");
    }

    #[test]
    fn test_summary_counts() {
        let transcript = TranscriptParser::default().parse(HEARING, IndexMap::new());

        let summary = TranscriptSummary::from_transcript(&transcript, 95);

        assert_eq!(summary.members, vec!["Q Smith", "Chair", "J Doe"]);
        assert_eq!(summary.witnesses, vec!["Prof A Jones"]);
        assert_eq!(summary.total_sections, 3);
        assert_eq!(summary.attributed_sections, 3);
        assert_eq!(summary.low_confidence_labels, vec!["The Chair"]);
        assert_eq!(
            summary.short_sections[1].speaker_matched.as_deref(),
            Some("Prof A Jones")
        );
        assert!(summary.format().contains("Low confidence: The Chair"));
    }

    #[test]
    fn test_short_section_truncates_text() {
        let long = format!("**Chair:** {}", "word ".repeat(200));
        let utterance = crate::stages::parse_fragment(0, &long);

        let short = ShortSection::from_utterance(&utterance);

        assert_eq!(short.text.chars().count(), SHORT_SECTION_CHARS);
        assert_eq!(short.speaker_matched, None);
        assert_eq!(short.speaker_string.as_deref(), Some("Chair"));
    }

    #[test]
    fn test_write_transcript_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("hearing.json");
        let transcript = TranscriptParser::default().parse(HEARING, IndexMap::new());

        write_transcript_json(&transcript, &path).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert!(value.get("roster").is_none());
        assert_eq!(value["members"]["Chair"]["name"], "Q Smith");
        assert_eq!(value["all_people"]["Prof A Jones"]["id"], 3);
        assert_eq!(value["all_sections"][0]["speaker_string"], "Chair");
        assert_eq!(value["speakers_dict"]["Chair"]["label_count"], 1);

        let round_trip: Transcript = serde_json::from_value(value).unwrap();
        assert_eq!(round_trip, transcript);
    }
}
