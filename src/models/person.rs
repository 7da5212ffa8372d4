use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Roster key under which the chairing member is aliased
pub const CHAIR_ALIAS: &str = "Chair";

/// Which side of the hearing a participant sits on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpeakerType {
    /// Committee member (asks the questions)
    Member,
    /// Witness giving oral evidence
    Witness,
}

impl std::fmt::Display for SpeakerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SpeakerType::Member => write!(f, "member"),
            SpeakerType::Witness => write!(f, "witness"),
        }
    }
}

/// A named participant identified in the header of a transcript
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Person {
    /// Display name, e.g. "Prof A Jones"
    pub name: String,
    /// Free-text position and affiliation, e.g. "CEO, ExampleCorp"
    pub designation: String,
    /// Member or witness
    pub speaker_type: SpeakerType,
    /// Position in the merged roster; only meaningful once the roster is built
    pub id: usize,
}

impl Person {
    pub fn new(
        name: impl Into<String>,
        designation: impl Into<String>,
        speaker_type: SpeakerType,
    ) -> Self {
        Self {
            name: name.into(),
            designation: designation.into(),
            speaker_type,
            id: 0,
        }
    }

    /// Whether the designation names this person as chair of the meeting
    pub fn is_chair(&self) -> bool {
        self.designation
            .trim_start_matches(|c: char| c == '(' || c.is_whitespace())
            .to_lowercase()
            .starts_with("chair")
    }
}

/// Insertion-ordered mapping from display name to person
pub type People = IndexMap<String, Person>;

/// The deduplicated participants of one transcript
///
/// Built once per document and never mutated afterwards. `all_people` holds
/// members first, then witnesses; every person's `id` is its position there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Roster {
    pub members: People,
    pub witnesses: People,
    pub all_people: People,
}

impl Roster {
    /// Merge members and witnesses and assign ids by enumeration order
    ///
    /// A witness whose key duplicates a member key replaces the member's
    /// entry in `all_people` but keeps the member's position.
    pub fn build(members: People, witnesses: People) -> Self {
        let mut all_people = People::with_capacity(members.len() + witnesses.len());
        for (key, person) in members.iter().chain(witnesses.iter()) {
            all_people.insert(key.clone(), person.clone());
        }
        for (id, person) in all_people.values_mut().enumerate() {
            person.id = id;
        }

        Self {
            members: with_roster_ids(members, &all_people),
            witnesses: with_roster_ids(witnesses, &all_people),
            all_people,
        }
    }

    /// Display names in roster order
    pub fn names(&self) -> Vec<&str> {
        self.all_people.keys().map(String::as_str).collect()
    }

    /// Person at a roster position
    pub fn person_at(&self, index: usize) -> Option<&Person> {
        self.all_people.get_index(index).map(|(_, person)| person)
    }

    pub fn get(&self, name: &str) -> Option<&Person> {
        self.all_people.get(name)
    }

    pub fn len(&self) -> usize {
        self.all_people.len()
    }

    pub fn is_empty(&self) -> bool {
        self.all_people.is_empty()
    }
}

fn with_roster_ids(side: People, all_people: &People) -> People {
    side.into_iter()
        .map(|(key, mut person)| {
            if let Some(id) = all_people.get_index_of(&key) {
                person.id = id;
            }
            (key, person)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn people(entries: &[(&str, &str, SpeakerType)]) -> People {
        entries
            .iter()
            .map(|(name, designation, kind)| {
                (name.to_string(), Person::new(*name, *designation, *kind))
            })
            .collect()
    }

    #[test]
    fn test_build_assigns_contiguous_ids() {
        let members = people(&[
            ("Q Smith", "(Chair)", SpeakerType::Member),
            ("J Doe", "", SpeakerType::Member),
        ]);
        let witnesses = people(&[("Prof A Jones", "CEO", SpeakerType::Witness)]);

        let roster = Roster::build(members, witnesses);

        let ids: Vec<usize> = roster.all_people.values().map(|p| p.id).collect();
        assert_eq!(ids, vec![0, 1, 2]);
        assert_eq!(roster.witnesses["Prof A Jones"].id, 2);
        assert_eq!(roster.members["J Doe"].id, 1);
        assert_eq!(roster.names(), vec!["Q Smith", "J Doe", "Prof A Jones"]);
    }

    #[test]
    fn test_duplicate_key_keeps_member_position() {
        let members = people(&[
            ("Sam Lee", "", SpeakerType::Member),
            ("J Doe", "", SpeakerType::Member),
        ]);
        let witnesses = people(&[("Sam Lee", "Director", SpeakerType::Witness)]);

        let roster = Roster::build(members, witnesses);

        assert_eq!(roster.len(), 2);
        let first = roster.person_at(0).unwrap();
        assert_eq!(first.name, "Sam Lee");
        assert_eq!(first.speaker_type, SpeakerType::Witness);
        assert_eq!(first.id, 0);
    }

    #[test]
    fn test_is_chair() {
        assert!(Person::new("Q Smith", "(Chair)", SpeakerType::Member).is_chair());
        assert!(Person::new("Q Smith", "Chairman", SpeakerType::Member).is_chair());
        assert!(!Person::new("Q Smith", "Vice-Chair", SpeakerType::Member).is_chair());
        assert!(!Person::new("Q Smith", "", SpeakerType::Member).is_chair());
    }
}
