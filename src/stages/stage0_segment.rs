use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Runs of "Examination of Witness(es)" heading lines
static EXAMINATION_HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)(?:^\s*\**(?:examination of witness).*\n)+")
        .expect("valid examination heading regex")
});

/// Runs of "Questions 1-20" or "Examination of Witness" heading lines
static QUESTION_HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)(?:^\s*\**(?:questions \[?\d+|examination of witness).*\n)+")
        .expect("valid question heading regex")
});

/// First line opening with a question marker or the chair speaking
static FIRST_SPEAKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*\**(?:Q\s?\d+|Chair)").expect("valid first speaker regex")
});

static DISCLAIMER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)use of the transcript").expect("valid disclaimer regex"));

/// Signs that a witness list follows the disclaimer
static WITNESS_LIST_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\nwitness|gave evidence").expect("valid witness list marker regex")
});

static WRITTEN_EVIDENCE_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^Written evidence").expect("valid written evidence regex")
});

/// Configuration for document segmentation
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SegmentConfig {
    /// A header longer than this (in characters) means the split point was wrong
    pub max_header_chars: usize,
}

impl Default for SegmentConfig {
    fn default() -> Self {
        Self {
            max_header_chars: 3000,
        }
    }
}

/// Heuristic that produced a document split, in order of preference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SplitTier {
    /// "Examination of witness(es)" headings
    ExaminationHeadings,
    /// "Questions N" or "Examination of witness" headings
    QuestionHeadings,
    /// The first question marker or "Chair" line
    FirstSpeaker,
}

impl SplitTier {
    const ALL: [SplitTier; 3] = [
        SplitTier::ExaminationHeadings,
        SplitTier::QuestionHeadings,
        SplitTier::FirstSpeaker,
    ];

    /// Split `text` into header followed by panels; a single fragment means no split
    fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        match self {
            SplitTier::ExaminationHeadings => EXAMINATION_HEADING_REGEX.split(text).collect(),
            SplitTier::QuestionHeadings => QUESTION_HEADING_REGEX.split(text).collect(),
            // The marker stays at the start of the panel so the Q&A parser still sees it
            SplitTier::FirstSpeaker => match FIRST_SPEAKER_REGEX.find(text) {
                Some(m) => vec![&text[..m.start()], &text[m.start()..]],
                None => vec![text],
            },
        }
    }
}

/// Result of splitting a document into header and panels
#[derive(Debug, Clone, PartialEq)]
pub struct Segmentation {
    /// Header text with any trailing transcript-use disclaimer removed
    pub header_text: String,
    /// Panel texts in document order
    pub panels: Vec<String>,
    /// Tier that produced the split, `None` when the whole document is header
    pub tier: Option<SplitTier>,
}

/// Split a document into header text and ordered panel texts
///
/// Tiers are tried in order; a tier is accepted when it splits the document
/// and leaves a plausibly sized header. The last tier is accepted whenever
/// it splits. If nothing splits, the whole document is header with no
/// panels; if only an earlier tier split (with an oversized header), that
/// split is kept. The size check counts the header as split, before the
/// disclaimer is stripped.
pub fn segment_document(text: &str, config: &SegmentConfig) -> Segmentation {
    let mut oversized: Option<(SplitTier, Vec<&str>)> = None;
    let mut accepted: Option<(SplitTier, Vec<&str>)> = None;

    for (i, tier) in SplitTier::ALL.iter().enumerate() {
        let fragments = tier.split(text);
        if fragments.len() < 2 {
            debug!("Segmentation tier {:?} found no split", tier);
            continue;
        }

        let header_chars = fragments[0].chars().count();
        let is_last = i + 1 == SplitTier::ALL.len();
        if header_chars <= config.max_header_chars || is_last {
            accepted = Some((*tier, fragments));
            break;
        }
        debug!(
            "Segmentation tier {:?} left a {} character header, trying next tier",
            tier, header_chars
        );
        oversized = Some((*tier, fragments));
    }

    let Some((tier, fragments)) = accepted.or(oversized) else {
        return Segmentation {
            header_text: strip_disclaimer(text).to_string(),
            panels: vec![],
            tier: None,
        };
    };

    let header = strip_disclaimer(fragments[0]);
    if WRITTEN_EVIDENCE_REGEX.is_match(header) {
        info!("Header lists written evidence; it is ignored when extracting witnesses");
    }

    Segmentation {
        header_text: header.to_string(),
        panels: fragments[1..].iter().map(|p| p.to_string()).collect(),
        tier: Some(tier),
    }
}

/// Remove the "use of the transcript" notes from the header
///
/// The notes run to the end of the header, so a disclaimer followed by a
/// witness list is kept rather than taking the witnesses with it.
fn strip_disclaimer(header: &str) -> &str {
    for m in DISCLAIMER_REGEX.find_iter(header) {
        if !WITNESS_LIST_MARKER_REGEX.is_match(&header[m.end()..]) {
            debug!("Stripping transcript-use disclaimer at offset {}", m.start());
            return &header[..m.start()];
        }
    }
    header
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examination_headings_split_panels() {
        let text = "Members present: Q Smith (Chair)\n\
                    Examination of Witnesses\n\
                    Witnesses: Prof A Jones\n\
                    **Chair:** Welcome.\n\
                    Examination of Witness\n\
                    Witness: Dr Kim Park\n\
                    **Chair:** Hello again.\n";

        let seg = segment_document(text, &SegmentConfig::default());

        assert_eq!(seg.tier, Some(SplitTier::ExaminationHeadings));
        assert_eq!(seg.header_text, "Members present: Q Smith (Chair)\n");
        assert_eq!(seg.panels.len(), 2);
        assert!(seg.panels[0].starts_with("Witnesses: Prof A Jones"));
        assert!(seg.panels[1].starts_with("Witness: Dr Kim Park"));
    }

    #[test]
    fn test_question_headings_split_panels() {
        let text = "Members present: Q Smith (Chair)\n\
                    Questions 1-20\n\
                    Witnesses: Prof A Jones\n\
                    Q1 **Chair:** Welcome.\n\
                    Questions 21-40\n\
                    Witness: Dr Kim Park\n";

        let seg = segment_document(text, &SegmentConfig::default());

        assert_eq!(seg.tier, Some(SplitTier::QuestionHeadings));
        assert_eq!(seg.panels.len(), 2);
    }

    #[test]
    fn test_first_speaker_split_keeps_marker() {
        let text = "Members present: Q Smith (Chair)\nWitnesses: Prof A Jones\n**Chair:** Welcome.\n";

        let seg = segment_document(text, &SegmentConfig::default());

        assert_eq!(seg.tier, Some(SplitTier::FirstSpeaker));
        assert_eq!(
            seg.header_text,
            "Members present: Q Smith (Chair)\nWitnesses: Prof A Jones\n"
        );
        assert_eq!(seg.panels, vec!["**Chair:** Welcome.\n"]);
    }

    #[test]
    fn test_first_speaker_split_on_question_marker() {
        let text = "Witnesses: Prof A Jones\nQ1 **Mr Lee:** Welcome.\n";

        let seg = segment_document(text, &SegmentConfig::default());

        assert_eq!(seg.panels, vec!["Q1 **Mr Lee:** Welcome.\n"]);
    }

    #[test]
    fn test_no_split_is_all_header() {
        let text = "A note with no hearing structure at all.";

        let seg = segment_document(text, &SegmentConfig::default());

        assert_eq!(seg.tier, None);
        assert_eq!(seg.header_text, text);
        assert!(seg.panels.is_empty());
    }

    #[test]
    fn test_oversized_header_falls_through() {
        let filler = "x".repeat(40);
        let text = format!(
            "Members present: Q Smith (Chair)\n{}\nExamination of Witnesses\n**Chair:** Hi.\n",
            filler
        );
        let config = SegmentConfig {
            max_header_chars: 20,
        };

        let seg = segment_document(&text, &config);

        // Tiers 1 and 2 leave a long header; tier 3 splits at the chair line
        assert_eq!(seg.tier, Some(SplitTier::FirstSpeaker));
        assert_eq!(seg.panels, vec!["**Chair:** Hi.\n"]);
    }

    #[test]
    fn test_oversized_split_kept_when_nothing_else_splits() {
        let text = "Members present: Q Smith\nlong header\nExamination of Witnesses\nWitnesses: Prof A Jones\n";
        let config = SegmentConfig {
            max_header_chars: 5,
        };

        let seg = segment_document(text, &config);

        assert_eq!(seg.tier, Some(SplitTier::QuestionHeadings));
        assert_eq!(seg.panels, vec!["Witnesses: Prof A Jones\n"]);
    }

    #[test]
    fn test_header_size_counts_disclaimer() {
        let text = "Members present: Q Smith (Chair)\n\
                    Use of the transcript\n\
                    Uncorrected and not for publication at all.\n\
                    Examination of Witnesses\n\
                    **Chair:** Hi.\n";
        let config = SegmentConfig {
            max_header_chars: 60,
        };

        let seg = segment_document(text, &config);

        // Stripped, the heading split would fit; unstripped it does not
        assert_eq!(seg.tier, Some(SplitTier::FirstSpeaker));
        assert_eq!(seg.header_text, "Members present: Q Smith (Chair)\n");
        assert_eq!(seg.panels, vec!["**Chair:** Hi.\n"]);
    }

    #[test]
    fn test_disclaimer_stripped() {
        let text = "Members present: Q Smith (Chair)\n\
                    Use of the transcript\n\
                    This is an uncorrected transcript.\n\
                    Examination of Witnesses\n\
                    **Chair:** Welcome.\n";

        let seg = segment_document(text, &SegmentConfig::default());

        assert_eq!(seg.header_text, "Members present: Q Smith (Chair)\n");
    }

    #[test]
    fn test_disclaimer_kept_before_witness_list() {
        let text = "Members present: Q Smith (Chair)\n\
                    Use of the transcript\n\
                    Uncorrected.\n\
                    Witnesses: Prof A Jones\n\
                    Examination of Witnesses\n\
                    **Chair:** Welcome.\n";

        let seg = segment_document(text, &SegmentConfig::default());

        assert!(seg.header_text.contains("Witnesses: Prof A Jones"));
        assert!(seg.header_text.contains("Use of the transcript"));
    }

    #[test]
    fn test_no_characters_lost_without_disclaimer() {
        let text = "Members present: Q Smith (Chair)\nWitnesses: Prof A Jones\n**Chair:** Welcome.\nQ2 **Prof Jones:** Thanks.\n";

        let seg = segment_document(text, &SegmentConfig::default());

        let rebuilt = format!("{}{}", seg.header_text, seg.panels.concat());
        assert_eq!(rebuilt, text);
    }
}
