use std::path::Path;

use anyhow::{Context, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::models::{Diagnostic, DiagnosticKind, Transcript, Utterance};
use crate::nlp::{FuzzyMatcher, RuleTagger, Tagger, WeightedRatio};

use super::{
    PanelConfig, ResolverConfig, SegmentConfig, parse_header, resolve_speakers, segment_document,
    segment_utterances, split_panel,
};

/// Configuration for the whole parsing pipeline
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub segment: SegmentConfig,
    pub panel: PanelConfig,
    pub resolver: ResolverConfig,
}

impl PipelineConfig {
    /// Load a config from a JSON file; missing fields take their defaults
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}

/// Turns hearing documents into structured transcripts
pub struct TranscriptParser {
    config: PipelineConfig,
    tagger: Box<dyn Tagger + Send + Sync>,
    matcher: Box<dyn FuzzyMatcher + Send + Sync>,
}

impl TranscriptParser {
    /// Parser using the built-in tagger and matcher
    pub fn new(config: PipelineConfig) -> Self {
        Self {
            config,
            tagger: Box::new(RuleTagger),
            matcher: Box::new(WeightedRatio),
        }
    }

    pub fn with_tagger(mut self, tagger: impl Tagger + Send + Sync + 'static) -> Self {
        self.tagger = Box::new(tagger);
        self
    }

    pub fn with_matcher(mut self, matcher: impl FuzzyMatcher + Send + Sync + 'static) -> Self {
        self.matcher = Box::new(matcher);
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Parse one document
    ///
    /// Never fails: every problem found along the way is logged and kept in
    /// the transcript's diagnostics. `source_locations` is passed through.
    pub fn parse(&self, text: &str, source_locations: IndexMap<String, String>) -> Transcript {
        let mut diagnostics = Vec::new();

        let segmentation = segment_document(text, &self.config.segment);
        match segmentation.tier {
            Some(tier) => debug!(
                "Split document with {:?} into {} panels",
                tier,
                segmentation.panels.len()
            ),
            None => {
                warn!("No segmentation heuristic found a split; treating the document as header");
                diagnostics.push(Diagnostic::new(
                    DiagnosticKind::StructuralParseFailure,
                    "no header/Q&A split point found",
                ));
            }
        }

        // Panel witness lines belong with the header; Q&A bodies run on
        let mut header_text = segmentation.header_text;
        let mut qna_text = String::new();
        for (i, panel) in segmentation.panels.iter().enumerate() {
            let split = split_panel(panel, &self.config.panel);
            if split.witness_line.is_none() && split.qna_body.is_none() {
                debug!("Panel {} has no recognisable structure, skipping", i);
                continue;
            }
            if let Some(witness_line) = split.witness_line {
                header_text.push('\n');
                header_text.push_str(&witness_line);
            }
            if let Some(qna_body) = split.qna_body {
                qna_text.push_str(&qna_body);
            }
        }

        let header = parse_header(&header_text, self.tagger.as_ref());
        diagnostics.extend(header.diagnostics);

        let mut sections = segment_utterances(&qna_text);
        let labels = sections.iter().filter_map(Utterance::speaker_string);
        let outcome = resolve_speakers(
            labels,
            &header.roster,
            self.matcher.as_ref(),
            &self.config.resolver,
        );
        diagnostics.extend(outcome.diagnostics);

        for section in &mut sections {
            if let Utterance::Spoken(turn) = section {
                turn.speaker = outcome.speakers.get(&turn.speaker_string).cloned();
            }
        }

        let transcript = Transcript {
            source_locations,
            full_header_text_unparsed: header.full_header_text_unparsed,
            members_text: header.members_text,
            witnesses_text: header.witnesses_text,
            header_other_text: header.header_other_text,
            roster: header.roster,
            all_sections: sections,
            speakers_dict: outcome.speakers,
            diagnostics,
        };

        info!(
            "Parsed transcript: {} people, {} sections ({} attributed, {} unparsed), {} diagnostics",
            transcript.roster.len(),
            transcript.all_sections.len(),
            transcript.attributed_count(),
            transcript.unparsed_count(),
            transcript.diagnostics.len()
        );

        transcript
    }
}

impl Default for TranscriptParser {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}
