use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A "Witnesses:" heading line, or a line ending "gave evidence"
static WITNESS_HEADING_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)witness(?:es)?:.*\n|.*gave evidence\.{0,4}")
        .expect("valid witness heading regex")
});

/// A line where the Q&A begins: the chair speaking or a question marker
static QNA_START_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\**(?:Chair|Q\s?\d+)").expect("valid Q&A start regex")
});

/// Prefix that lets the header parser find an unlabelled witness line
pub const UNLABELLED_WITNESS_PREFIX: &str = "Witnesses without a heading: ";

/// Configuration for panel splitting
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PanelConfig {
    /// A witness heading found further into the panel than this is not a heading
    pub witness_heading_window: usize,
}

impl Default for PanelConfig {
    fn default() -> Self {
        Self {
            witness_heading_window: 200,
        }
    }
}

/// Witness line and Q&A body of one panel
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PanelSplit {
    pub witness_line: Option<String>,
    /// Q&A text, always newline-terminated
    pub qna_body: Option<String>,
}

/// Separate a panel's witness-list line from its Q&A body
///
/// A panel that opens with the chair or a question marker is all Q&A.
/// Otherwise an explicit witness heading near the top of the panel is
/// preferred, then the first line is taken as an unlabelled witness list and
/// the Q&A starts at the first later line opened by the chair or a question
/// marker. A panel matching none of these yields nothing.
pub fn split_panel(panel_text: &str, config: &PanelConfig) -> PanelSplit {
    let lead = panel_text.len() - panel_text.trim_start().len();
    if QNA_START_REGEX
        .find(&panel_text[lead..])
        .is_some_and(|m| m.start() == 0)
    {
        // Split at the first speaker: the panel is all Q&A, whatever the turn says
        return PanelSplit {
            witness_line: None,
            qna_body: Some(format!("{}\n", &panel_text[lead..])),
        };
    }

    if let Some(heading) = WITNESS_HEADING_REGEX.find(panel_text) {
        if heading.start() < config.witness_heading_window {
            return PanelSplit {
                witness_line: Some(heading.as_str().to_string()),
                qna_body: Some(format!("{}\n", &panel_text[heading.end()..])),
            };
        }
        debug!(
            "Witness heading at offset {} is too far into the panel",
            heading.start()
        );
    }

    let Some(line_len) = panel_text[lead..].find('\n') else {
        debug!("Panel has a single line and no Q&A");
        return PanelSplit::default();
    };
    let first_line_end = lead + line_len + 1;

    match QNA_START_REGEX.find_at(panel_text, first_line_end) {
        Some(start) => PanelSplit {
            witness_line: Some(format!(
                "{}{}",
                UNLABELLED_WITNESS_PREFIX,
                panel_text[lead..first_line_end].trim_end()
            )),
            qna_body: Some(format!("{}\n", &panel_text[start.start()..])),
        },
        None => {
            debug!("Panel has neither a witness heading nor a Q&A start");
            PanelSplit::default()
        }
    }
}
