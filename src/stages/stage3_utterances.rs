use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{SpokenTurn, UnparsedSection, Utterance};

/// A line opening with a question marker or an emphasis marker
static SPEAKER_BOUNDARY_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\n(?:Q\s?\d+|_?\*\*)").expect("valid speaker boundary regex")
});

/// Optional question marker, then a bold (optionally italic-wrapped) label
/// closed by the first closing bold marker
static LEADING_LABEL_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^\s*((?:Q\s?\d+\s?)?_?\*\*.*?\*\*_?)(.*)$")
        .expect("valid leading label regex")
});

static QUESTION_NUMBER_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)^(Q[\s.]?\d+)(.*)$").expect("valid question number regex")
});

/// Split the Q&A text into ordered utterances
///
/// Every fragment gets a section id equal to its position, whether or not it
/// carried a speaker label.
pub fn segment_utterances(qna_text: &str) -> Vec<Utterance> {
    let utterances: Vec<Utterance> = split_fragments(qna_text)
        .into_iter()
        .enumerate()
        .map(|(section_id, fragment)| parse_fragment(section_id, fragment))
        .collect();

    debug!(
        "Segmented {} utterances ({} unparsed)",
        utterances.len(),
        utterances.iter().filter(|u| !u.is_spoken()).count()
    );
    utterances
}

/// Cut the trimmed Q&A text in front of each line that starts a new speaker
///
/// The fragments are contiguous: concatenated, they give back the trimmed
/// input. Empty input has no fragments.
pub fn split_fragments(qna_text: &str) -> Vec<&str> {
    let text = qna_text.trim();
    if text.is_empty() {
        return vec![];
    }

    let mut fragments = Vec::new();
    let mut start = 0;
    for boundary in SPEAKER_BOUNDARY_REGEX.find_iter(text) {
        // Cut after the newline so the marker opens the next fragment
        let cut = boundary.start() + 1;
        fragments.push(&text[start..cut]);
        start = cut;
    }
    fragments.push(&text[start..]);
    fragments
}

/// Parse one fragment into a spoken turn, or keep it as unparsed text
pub fn parse_fragment(section_id: usize, fragment: &str) -> Utterance {
    let Some(caps) = LEADING_LABEL_REGEX.captures(fragment) else {
        return Utterance::Unparsed(UnparsedSection {
            section_id,
            unparsed_text: fragment.trim().to_string(),
        });
    };

    let name_text = caps[1].replace(['_', '*', ':'], "");
    let name_text = name_text.trim();
    let (question_number, speaker) = match QUESTION_NUMBER_REGEX.captures(name_text) {
        Some(q) => (Some(q[1].to_string()), q[2].to_string()),
        None => (None, name_text.to_string()),
    };

    let spoken_text = caps[2].trim();
    let spoken_text = spoken_text.strip_prefix(':').unwrap_or(spoken_text).trim();

    Utterance::Spoken(SpokenTurn {
        section_id,
        question_number,
        speaker_string: collapse_whitespace(&speaker),
        spoken_text: spoken_text.to_string(),
        speaker: None,
    })
}

fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}
