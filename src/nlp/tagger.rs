use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Words, numbers, or any other single non-space character
static TOKEN_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\p{L}[\p{L}\p{M}'’\-]*\.?|\d+(?:[.,]\d+)*|\S").expect("valid token regex")
});

/// Coarse part-of-speech classes the name extractor cares about
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PartOfSpeech {
    ProperNoun,
    Word,
    Number,
    Punctuation,
}

/// Named-entity classes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Person,
    Organisation,
}

/// A token annotated by a [`Tagger`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken {
    pub text: String,
    pub part_of_speech: PartOfSpeech,
    pub entity_type: Option<EntityType>,
}

impl TaggedToken {
    pub fn is_proper_noun(&self) -> bool {
        self.part_of_speech == PartOfSpeech::ProperNoun
    }

    pub fn is_person(&self) -> bool {
        self.entity_type == Some(EntityType::Person)
    }
}

/// Entity and part-of-speech tagging over a short span of text
pub trait Tagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken>;
}

/// Titles that introduce a personal name
const HONORIFICS: &[&str] = &[
    "mr", "mrs", "ms", "miss", "mx", "dr", "doctor", "prof", "professor", "sir", "dame", "lord",
    "lady", "baroness", "baron", "viscount", "earl", "countess", "rt", "right", "hon",
    "honourable", "rev", "revd", "reverend", "canon", "bishop", "archbishop", "cllr",
    "councillor", "judge", "justice", "general", "lieutenant", "lt", "colonel", "col", "major",
    "captain", "capt", "brigadier", "commodore", "admiral", "marshal", "commander", "cdr",
    "sergeant", "sgt",
];

/// Letters after a name that are not part of it for entity purposes
const POST_NOMINALS: &[&str] = &[
    "MP", "MSP", "MS", "AM", "MEP", "MLA", "QC", "KC", "JP", "CBE", "OBE", "MBE", "KBE", "DBE",
    "FRS", "FREng", "FRSE", "PhD",
];

/// Words that make a capitalised run an organisation
const ORG_KEYWORDS: &[&str] = &[
    "ltd", "limited", "plc", "llp", "llc", "inc", "corp", "corporation", "company", "co",
    "group", "holdings", "council", "university", "college", "school", "institute",
    "institution", "foundation", "trust", "association", "society", "union", "federation",
    "confederation", "alliance", "network", "partnership", "centre", "center", "agency",
    "authority", "office", "department", "ministry", "service", "services", "commission",
    "board", "bank", "fund", "forum", "campaign", "charity", "party", "parliament", "house",
    "committee", "police", "hospital", "church", "academy", "club", "consortium",
    "organisation", "organization", "industries", "industry", "government", "advice",
    "systems", "solutions", "technologies", "media", "news", "energy", "water", "airways",
    "airlines", "rail", "health", "care", "airport", "airports", "port", "ports", "mail",
    "post", "transport", "logistics", "railways", "motors", "insurance", "capital", "partners",
    "associates", "consulting", "museum", "library", "gallery", "press", "telecom",
];

/// Job titles and roles, which are designations rather than names
const ROLE_KEYWORDS: &[&str] = &[
    "chair", "chairman", "chairwoman", "chairperson", "chief", "executive", "director",
    "deputy", "officer", "secretary", "minister", "president", "vice", "manager", "head",
    "lead", "adviser", "advisor", "member", "members", "witness", "witnesses", "policy",
    "commissioner", "governor", "partner", "principal", "founder", "editor", "correspondent",
    "analyst", "economist", "researcher", "fellow", "lecturer", "senior", "permanent",
    "parliamentary", "assistant", "treasurer", "spokesperson", "representative", "national",
    "affairs", "relations", "operations", "strategy", "research", "finance", "development",
    "programme", "communications", "engagement", "evidence", "present", "questions",
    "examination", "oral", "written", "transcript", "state", "trustee", "registrar",
];

/// Capitalised words that are still not proper nouns
const FUNCTION_WORDS: &[&str] = &[
    "the", "an", "of", "for", "and", "or", "to", "in", "on", "at", "by", "with", "from", "this",
    "that", "these", "those", "we", "they", "he", "she", "it", "our", "their", "his", "her",
    "its", "my", "your", "yes", "no", "well", "what", "how", "why", "when", "where", "who",
    "do", "does", "is", "are", "was", "were", "can", "could", "would", "should", "will",
    "there", "here", "so", "but", "if", "as", "not", "all", "thank",
];

/// Lowercase connectives inside surnames ("von der Leyen", "de Souza")
const NAME_PARTICLES: &[&str] = &[
    "de", "da", "das", "dos", "del", "della", "di", "du", "van", "von", "der", "den", "ter",
    "la", "le", "bin", "al",
];

/// Dictionary and shape based tagger for roster lines
///
/// Capitalised words are proper nouns. A run of proper nouns is a PERSON when
/// it opens with an honorific, or when it has two to five name-like tokens
/// with no role words or acronyms among them. Runs containing organisation
/// words are ORGANISATION.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleTagger;

impl Tagger for RuleTagger {
    fn tag(&self, text: &str) -> Vec<TaggedToken> {
        let mut tokens: Vec<TaggedToken> = Vec::new();
        for m in TOKEN_REGEX.find_iter(text) {
            // A full stop stays on initials and titles; elsewhere it ends the sentence
            match m.as_str().strip_suffix('.') {
                Some(stem) if !stem.is_empty() && !keeps_full_stop(stem) => {
                    tokens.push(untagged(stem));
                    tokens.push(untagged("."));
                }
                _ => tokens.push(untagged(m.as_str())),
            }
        }

        let mut i = 0;
        while i < tokens.len() {
            if !tokens[i].is_proper_noun() {
                i += 1;
                continue;
            }
            let end = run_end(&tokens, i);
            classify_run(&mut tokens[i..end]);
            i = end;
        }

        tokens
    }
}

fn untagged(text: &str) -> TaggedToken {
    TaggedToken {
        text: text.to_string(),
        part_of_speech: part_of_speech(text),
        entity_type: None,
    }
}

fn keeps_full_stop(stem: &str) -> bool {
    stem.chars().count() == 1 || HONORIFICS.contains(&stem.to_lowercase().as_str())
}

fn part_of_speech(text: &str) -> PartOfSpeech {
    let Some(first) = text.chars().next() else {
        return PartOfSpeech::Punctuation;
    };
    if first.is_alphabetic() {
        if first.is_uppercase() && !FUNCTION_WORDS.contains(&bare(text).as_str()) {
            PartOfSpeech::ProperNoun
        } else {
            PartOfSpeech::Word
        }
    } else if first.is_ascii_digit() {
        PartOfSpeech::Number
    } else {
        PartOfSpeech::Punctuation
    }
}

/// End (exclusive) of the capitalised run starting at `start`
fn run_end(tokens: &[TaggedToken], start: usize) -> usize {
    let mut end = start + 1;
    while end < tokens.len() {
        if tokens[end].is_proper_noun() {
            end += 1;
            continue;
        }
        let mut next = end;
        while next < tokens.len() && is_particle(&tokens[next].text) {
            next += 1;
        }
        if next > end && tokens.get(next).is_some_and(TaggedToken::is_proper_noun) {
            end = next + 1;
        } else {
            break;
        }
    }
    end
}

fn classify_run(run: &mut [TaggedToken]) {
    if run.iter().any(|t| ORG_KEYWORDS.contains(&bare(&t.text).as_str())) {
        for token in run.iter_mut() {
            token.entity_type = Some(EntityType::Organisation);
        }
        return;
    }

    let mut start = 0;
    while start < run.len() && is_roman_numeral(&run[start].text) {
        start += 1;
    }
    let honorifics = run[start..]
        .iter()
        .take_while(|t| HONORIFICS.contains(&bare(&t.text).as_str()))
        .count();

    let core: Vec<usize> = (start + honorifics..run.len())
        .filter(|&i| !POST_NOMINALS.contains(&run[i].text.trim_end_matches('.')))
        .collect();
    if core.is_empty()
        || core
            .iter()
            .any(|&i| ROLE_KEYWORDS.contains(&bare(&run[i].text).as_str()))
    {
        return;
    }

    let is_person = honorifics > 0
        || ((2..=5).contains(&core.len())
            && core.iter().all(|&i| !is_acronym(&run[i].text))
            && core.iter().any(|&i| !is_initial(&run[i].text)));

    if is_person {
        for i in core {
            run[i].entity_type = Some(EntityType::Person);
        }
    }
}

fn bare(text: &str) -> String {
    text.trim_end_matches('.').to_lowercase()
}

fn is_particle(text: &str) -> bool {
    NAME_PARTICLES.contains(&text)
}

fn is_initial(text: &str) -> bool {
    let letters = text.trim_end_matches('.');
    letters.chars().count() == 1 && letters.chars().all(char::is_uppercase)
}

fn is_acronym(text: &str) -> bool {
    let letters = text.trim_end_matches('.');
    letters.chars().count() >= 2 && letters.chars().all(char::is_uppercase)
}

fn is_roman_numeral(text: &str) -> bool {
    let letters = text.trim_end_matches('.');
    !letters.is_empty()
        && letters.chars().all(|c| matches!(c, 'I' | 'V' | 'X'))
        && (letters.len() >= 2 || text.ends_with('.'))
}
