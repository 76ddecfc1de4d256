//! # Tender Analysis
//!
//! Sends tender text to the LLM with the fixed analysis prompt and splits the
//! answer into named sections.

use crate::{
    constants::MAX_TENDER_TEXT_CHARS,
    errors::AnalysisError,
    prompts::tender::{build_analysis_prompt, TENDER_ANALYSIS_SYSTEM_PROMPT},
    providers::ai::AiProvider,
    types::AnalysisResult,
};
use std::collections::HashMap;
use tracing::{debug, info, instrument};

/// Runs the structured analysis of a tender against an `AiProvider`.
#[derive(Clone, Debug)]
pub struct TenderAnalyzer {
    ai_provider: Box<dyn AiProvider>,
}

impl TenderAnalyzer {
    pub fn new(ai_provider: Box<dyn AiProvider>) -> Self {
        Self { ai_provider }
    }

    /// Analyzes `text` with a single LLM call.
    ///
    /// Text beyond [`MAX_TENDER_TEXT_CHARS`] characters is dropped without notice.
    #[instrument(skip_all)]
    pub async fn analyze(&self, text: &str) -> Result<AnalysisResult, AnalysisError> {
        let text = truncate_chars(text, MAX_TENDER_TEXT_CHARS);
        let user_prompt = build_analysis_prompt(text);
        debug!(prompt_len = user_prompt.len(), "Built tender analysis prompt.");

        let full_analysis = self
            .ai_provider
            .generate(TENDER_ANALYSIS_SYSTEM_PROMPT, &user_prompt)
            .await?;
        let structured_data = parse_sections(&full_analysis);
        info!(
            sections = structured_data.len(),
            "Tender analysis complete."
        );

        Ok(AnalysisResult {
            full_analysis,
            structured_data,
        })
    }
}

/// Returns the first `max_chars` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

enum SectionState<'a> {
    Outside,
    Inside { name: String, body: Vec<&'a str> },
}

/// Splits an LLM response into sections keyed by heading.
///
/// A line starting with `"# "` opens a section named by the rest of the line,
/// trimmed. Every following line up to the next heading belongs to its body,
/// untrimmed and newline-joined. Lines before the first heading are dropped,
/// a repeated heading replaces the earlier body, and a trailing heading with
/// no body lines is not recorded. A heading with a blank name is not a
/// section: it and its body are dropped.
pub fn parse_sections(text: &str) -> HashMap<String, String> {
    let mut sections = HashMap::new();
    let mut state = SectionState::Outside;

    for line in text.split('\n') {
        if let Some(heading) = line.strip_prefix("# ") {
            if let SectionState::Inside { name, body } = state {
                sections.insert(name, body.join("\n"));
            }
            let name = heading.trim();
            state = if name.is_empty() {
                SectionState::Outside
            } else {
                SectionState::Inside {
                    name: name.to_string(),
                    body: Vec::new(),
                }
            };
        } else if let SectionState::Inside { body, .. } = &mut state {
            body.push(line);
        }
    }

    if let SectionState::Inside { name, body } = state {
        if !body.is_empty() {
            sections.insert(name, body.join("\n"));
        }
    }

    sections
}
