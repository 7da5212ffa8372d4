pub mod error;
pub mod io;
pub mod models;
pub mod nlp;
pub mod stages;

pub use error::{ExtractionFailure, HeaderField};
pub use io::{
    collect_source_files, read_source_file, write_transcript_json, SourceDocument,
    TranscriptSummary,
};
pub use models::{
    Diagnostic, DiagnosticKind, People, Person, Resolution, Roster, SpeakerType, Transcript,
    Utterance,
};
pub use nlp::{FuzzyMatcher, RuleTagger, Tagger, WeightedRatio};
pub use stages::{
    PanelConfig, PipelineConfig, ResolverConfig, SegmentConfig, TranscriptParser,
};
