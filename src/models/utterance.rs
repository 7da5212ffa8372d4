use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::Person;

/// Best-guess match of a raw speaker label to a roster person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    /// Copy of the matched person, detached from the roster
    pub person: Person,
    /// Fuzzy match score (0-100)
    pub fuzzy_match_score: u8,
    /// Number of utterances carrying this label
    pub label_count: usize,
}

/// Resolutions keyed by whitespace-normalized speaker label, in first-seen order
pub type SpeakerTable = IndexMap<String, Resolution>;

/// A turn that opened with a recognised speaker label
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpokenTurn {
    pub section_id: usize,
    /// Question marker such as "Q12", when the label carried one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub question_number: Option<String>,
    /// Raw speaker label with markup removed and whitespace collapsed
    pub speaker_string: String,
    pub spoken_text: String,
    /// Copy of the resolution for `speaker_string`, if it resolved
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speaker: Option<Resolution>,
}

/// A fragment that followed neither speaker convention (stage directions etc.)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UnparsedSection {
    pub section_id: usize,
    pub unparsed_text: String,
}

/// One contiguous turn of the Q&A, in segmentation order
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Utterance {
    Spoken(SpokenTurn),
    Unparsed(UnparsedSection),
}

impl Utterance {
    pub fn section_id(&self) -> usize {
        match self {
            Utterance::Spoken(turn) => turn.section_id,
            Utterance::Unparsed(section) => section.section_id,
        }
    }

    /// The raw speaker label, for spoken turns
    pub fn speaker_string(&self) -> Option<&str> {
        match self {
            Utterance::Spoken(turn) => Some(turn.speaker_string.as_str()),
            Utterance::Unparsed(_) => None,
        }
    }

    /// The matched person, for spoken turns whose label resolved
    pub fn speaker(&self) -> Option<&Person> {
        match self {
            Utterance::Spoken(turn) => turn.speaker.as_ref().map(|r| &r.person),
            Utterance::Unparsed(_) => None,
        }
    }

    /// Spoken or unparsed text of this section
    pub fn text(&self) -> &str {
        match self {
            Utterance::Spoken(turn) => &turn.spoken_text,
            Utterance::Unparsed(section) => &section.unparsed_text,
        }
    }

    pub fn is_spoken(&self) -> bool {
        matches!(self, Utterance::Spoken(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SpeakerType;

    #[test]
    fn test_untagged_shapes() {
        let spoken = Utterance::Spoken(SpokenTurn {
            section_id: 0,
            question_number: None,
            speaker_string: "Chair".to_string(),
            spoken_text: "Welcome.".to_string(),
            speaker: None,
        });
        let json = serde_json::to_value(&spoken).unwrap();
        assert_eq!(json["speaker_string"], "Chair");
        assert!(json.get("question_number").is_none());
        assert!(json.get("unparsed_text").is_none());

        let unparsed: Utterance =
            serde_json::from_str(r#"{"section_id": 3, "unparsed_text": "[Interruption.]"}"#)
                .unwrap();
        assert_eq!(unparsed.section_id(), 3);
        assert!(!unparsed.is_spoken());
        assert_eq!(unparsed.text(), "[Interruption.]");
    }

    #[test]
    fn test_speaker_accessor() {
        let person = Person::new("Q Smith", "(Chair)", SpeakerType::Member);
        let turn = Utterance::Spoken(SpokenTurn {
            section_id: 1,
            question_number: Some("Q1".to_string()),
            speaker_string: "Chair".to_string(),
            spoken_text: "Good morning.".to_string(),
            speaker: Some(Resolution {
                person: person.clone(),
                fuzzy_match_score: 100,
                label_count: 2,
            }),
        });

        assert_eq!(turn.speaker(), Some(&person));
        assert_eq!(turn.speaker_string(), Some("Chair"));
    }
}
