//! Extraction pipeline configuration.

/// Character budget for HTML embedded into the extraction prompt.
pub const DEFAULT_MAX_PROMPT_HTML_CHARS: usize = 125_000;

/// Tuning knobs for the extraction pipeline.
#[derive(Debug, Clone)]
pub struct ExtractionConfig {
    /// Maximum number of cleaned-HTML characters included in the prompt.
    pub max_prompt_html_chars: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            max_prompt_html_chars: DEFAULT_MAX_PROMPT_HTML_CHARS,
        }
    }
}
