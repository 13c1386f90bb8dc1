//! LLM prompt for instruction-driven field extraction.

use crate::types::config::ExtractionConfig;

use super::preprocess::{clean_html, truncate_html};

/// Prompt for extracting named fields from page HTML.
pub const EXTRACT_PROMPT: &str = r#"You are an expert web data extraction AI. Your task is to analyze HTML content and extract specific information based on natural language instructions.

INSTRUCTION: "{instruction}"

HTML CONTENT:
{html}

EXTRACTION GUIDELINES:
1. Carefully analyze the instruction to understand what data needs to be extracted
2. Look for the most relevant and prominent elements that match the requested information
3. When multiple similar elements exist, prioritize:
   - Elements that appear to be the main/primary content (larger, more prominent)
   - Elements in the main content area rather than sidebars, headers, or footers
   - Current/active values over historical or alternative values
4. For prices: Focus on the current selling price, not crossed-out or "was" prices
5. For text content: Extract clean text without HTML tags or excessive whitespace
6. For numerical values: Include relevant units or currency symbols when present
7. Assign confidence scores based on how certain you are about the extraction accuracy

RESPONSE FORMAT:
Return ONLY a valid JSON object with this exact structure:

{
  "parsed_fields": ["field1", "field2"],
  "extracted": {
    "field1": "extracted_value1",
    "field2": "extracted_value2"
  },
  "confidence": {
    "field1": 0.95,
    "field2": 0.87
  }
}

CRITICAL RULES:
- Return ONLY the JSON object, no additional text, explanations, or markdown formatting
- If a requested field cannot be found, set its value to null and confidence to 0.0
- Field names should be descriptive and match the instruction intent
- Confidence scores must be between 0.0 and 1.0
- Extract clean, formatted values without HTML tags
- Prioritize data in HTML tags over embedded JSON data

Extract the requested data now:"#;

/// Clean, truncate and embed the page HTML, then fill the template.
pub fn format_extract_prompt(instruction: &str, html: &str, config: &ExtractionConfig) -> String {
    let cleaned = clean_html(html);
    let truncated = truncate_html(&cleaned, config.max_prompt_html_chars);

    EXTRACT_PROMPT
        .replace("{instruction}", instruction)
        .replace("{html}", &truncated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::preprocess::TRUNCATION_MARKER;

    #[test]
    fn embeds_instruction_and_html() {
        let prompt = format_extract_prompt(
            "get the product name",
            "<html><body><h1>Widget</h1></body></html>",
            &ExtractionConfig::default(),
        );
        assert!(prompt.contains("INSTRUCTION: \"get the product name\""));
        assert!(prompt.contains("<h1>Widget</h1>"));
        assert!(prompt.contains("parsed_fields"));
    }

    #[test]
    fn cleans_html_before_embedding() {
        let prompt = format_extract_prompt(
            "get the title",
            "<html><script>secret()</script><h1>Title</h1></html>",
            &ExtractionConfig::default(),
        );
        assert!(!prompt.contains("secret()"));
        assert!(prompt.contains("<h1>Title</h1>"));
    }

    #[test]
    fn truncates_oversized_html() {
        let config = ExtractionConfig {
            max_prompt_html_chars: 50,
        };
        let html = format!("<body>{}</body>", "a".repeat(500));
        let prompt = format_extract_prompt("get it", &html, &config);
        assert!(prompt.contains(TRUNCATION_MARKER));
    }
}
