use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::models::{Diagnostic, DiagnosticKind, Resolution, Roster, SpeakerTable};
use crate::nlp::FuzzyMatcher;

/// Configuration for speaker resolution
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Lowest score at which the best candidate is accepted
    pub score_floor: u8,
    /// Accepted matches scoring below this are flagged for review
    pub low_confidence_threshold: u8,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            score_floor: 10,
            low_confidence_threshold: 95,
        }
    }
}

/// Resolution table plus the problems found while building it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResolutionOutcome {
    pub speakers: SpeakerTable,
    pub diagnostics: Vec<Diagnostic>,
}

impl ResolutionOutcome {
    /// Labels whose accepted match scored below the review threshold
    pub fn low_confidence_labels(&self, config: &ResolverConfig) -> Vec<&str> {
        self.speakers
            .iter()
            .filter(|(_, r)| r.fuzzy_match_score < config.low_confidence_threshold)
            .map(|(label, _)| label.as_str())
            .collect()
    }
}

/// Resolve raw speaker labels against the roster
///
/// Each distinct label is matched once; later occurrences only bump its
/// `label_count`. Single-character labels are never matched.
pub fn resolve_speakers<'a>(
    labels: impl IntoIterator<Item = &'a str>,
    roster: &Roster,
    matcher: &dyn FuzzyMatcher,
    config: &ResolverConfig,
) -> ResolutionOutcome {
    let candidates = roster.names();
    let mut outcome = ResolutionOutcome::default();
    let mut unresolved: HashSet<&str> = HashSet::new();

    for label in labels {
        if let Some(resolution) = outcome.speakers.get_mut(label) {
            resolution.label_count += 1;
            continue;
        }
        if unresolved.contains(label) {
            continue;
        }

        if label.chars().count() <= 1 {
            debug!("Label {:?} is too short to resolve", label);
            unresolved.insert(label);
            outcome.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnresolvableLabel,
                format!("speaker label {:?} is too short to match", label),
            ));
            continue;
        }

        let best = matcher
            .best_match(label, &candidates)
            .filter(|m| m.score >= config.score_floor);
        let Some((person, score)) =
            best.and_then(|m| roster.person_at(m.index).map(|p| (p, m.score)))
        else {
            warn!("Could not match speaker label {:?} to anyone in the roster", label);
            unresolved.insert(label);
            outcome.diagnostics.push(Diagnostic::new(
                DiagnosticKind::UnresolvableLabel,
                format!("speaker label {:?} matched nobody in the roster", label),
            ));
            continue;
        };

        if score < config.low_confidence_threshold {
            warn!(
                "Low confidence match: {:?} -> {:?} (score {})",
                label, person.name, score
            );
            outcome.diagnostics.push(Diagnostic::new(
                DiagnosticKind::LowConfidenceMatch,
                format!(
                    "speaker label {:?} matched {:?} with score {}",
                    label, person.name, score
                ),
            ));
        } else {
            debug!("Matched {:?} -> {:?} (score {})", label, person.name, score);
        }

        outcome.speakers.insert(
            label.to_string(),
            Resolution {
                person: person.clone(),
                fuzzy_match_score: score,
                label_count: 1,
            },
        );
    }

    outcome
}
