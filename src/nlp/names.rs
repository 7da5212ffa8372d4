use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

use crate::models::{CHAIR_ALIAS, People, Person, SpeakerType};

use super::{TaggedToken, Tagger};

/// Separators between "Honorific First Last, designation" groups
static GROUP_SEPARATOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[\n:;,]+|\band\b").expect("valid group separator regex"));

/// A parenthesised aside, possibly left unclosed by a separator inside it
static PARENTHETICAL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\([^()]*\)?").expect("valid parenthetical regex"));

/// The span's own labels ("Witnesses:", "Members present")
static SPAN_LABEL_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)witness|members").expect("valid span label regex"));

/// Roman-numeral panel number in front of a panel's first witness ("II. ")
static PANEL_MARKER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s?[IV]+\.?\s").expect("valid panel marker regex"));

/// Extract people and their designations from a members or witnesses span
///
/// Each group that the tagger sees a person in starts a new person; the
/// groups after it, up to the next person, form that person's designation.
/// People are deduplicated by display name (first occurrence wins). For
/// members, the first person designated as chair is also aliased under
/// [`CHAIR_ALIAS`].
pub fn extract_people(text: &str, speaker_type: SpeakerType, tagger: &dyn Tagger) -> People {
    let mut people: Vec<Person> = Vec::new();
    let mut name_parts: Vec<String> = Vec::new();
    let mut designation_parts: Vec<String> = Vec::new();

    for group in candidate_groups(text) {
        if SPAN_LABEL_REGEX.is_match(&group) {
            continue;
        }

        let tokens = tagger.tag(&group);
        if starts_new_person(&tokens) {
            if !name_parts.is_empty() {
                push_person(&name_parts, &designation_parts, speaker_type, &mut people);
            }
            name_parts = tokens
                .iter()
                .filter(|t| t.is_proper_noun() || t.is_person() || t.text == "Davies")
                .map(|t| t.text.clone())
                .collect();
            designation_parts.clear();
        } else {
            designation_parts.push(group);
        }
    }

    if !name_parts.is_empty() {
        push_person(&name_parts, &designation_parts, speaker_type, &mut people);
    }

    deduplicate(people, speaker_type)
}

/// Split a span into trimmed, non-empty groups; parenthesised asides become
/// groups of their own
pub fn candidate_groups(text: &str) -> Vec<String> {
    let mut groups = Vec::new();
    for piece in GROUP_SEPARATOR_REGEX.split(text) {
        let mut rest = 0;
        for aside in PARENTHETICAL_REGEX.find_iter(piece) {
            groups.push(piece[rest..aside.start()].trim().to_string());
            groups.push(aside.as_str().trim().to_string());
            rest = aside.end();
        }
        groups.push(piece[rest..].trim().to_string());
    }
    groups.retain(|g| !g.is_empty());
    groups
}

/// A group starts a new person when the tagger finds a PERSON entity
///
/// The tagger reliably misses the surname "Davies", so it is accepted on
/// sight. Groups mentioning "Foundation" are organisations named after
/// someone ("Elton John Foundation") and never start a person.
fn starts_new_person(tokens: &[TaggedToken]) -> bool {
    let has_person = tokens.iter().any(|t| t.is_person() || t.text == "Davies");
    let is_foundation = tokens.iter().any(|t| t.text == "Foundation");
    has_person && !is_foundation
}

fn push_person(
    name_parts: &[String],
    designation_parts: &[String],
    speaker_type: SpeakerType,
    people: &mut Vec<Person>,
) {
    let joined = name_parts.join(" ");
    let name = PANEL_MARKER_REGEX.replace(&joined, "").trim().to_string();
    if name.is_empty() {
        debug!("Dropping empty name (tokens: {:?})", name_parts);
        return;
    }
    people.push(Person::new(name, designation_parts.join(", "), speaker_type));
}

fn deduplicate(people: Vec<Person>, speaker_type: SpeakerType) -> People {
    let mut deduplicated = People::with_capacity(people.len());
    for person in people {
        // Witnesses may chair their own organisations; only members chair the hearing
        let alias = (speaker_type == SpeakerType::Member
            && person.is_chair()
            && !deduplicated.contains_key(CHAIR_ALIAS))
        .then(|| person.clone());

        deduplicated.entry(person.name.clone()).or_insert(person);
        if let Some(alias) = alias {
            deduplicated.insert(CHAIR_ALIAS.to_string(), alias);
        }
    }
    deduplicated
}
