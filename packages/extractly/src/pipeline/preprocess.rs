//! HTML preprocessing before prompt construction.
//!
//! Strips markup that never carries extractable data (scripts, styles,
//! comments, noscript fallbacks) and collapses whitespace so the character
//! budget is spent on content.

use std::sync::LazyLock;

use regex::Regex;

static SCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script\b[^>]*>.*?</script>").expect("script regex is valid")
});

static STYLE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<style\b[^>]*>.*?</style>").expect("style regex is valid")
});

static COMMENT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)<!--.*?-->").expect("comment regex is valid"));

static NOSCRIPT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<noscript\b[^>]*>.*?</noscript>").expect("noscript regex is valid")
});

static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("whitespace regex is valid"));

static INTER_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("inter-tag regex is valid"));

/// Marker appended when cleaned HTML exceeds the prompt budget.
pub const TRUNCATION_MARKER: &str = " ...[truncated]";

/// Strip script/style/comment/noscript blocks and collapse whitespace.
pub fn clean_html(html: &str) -> String {
    let cleaned = SCRIPT_RE.replace_all(html, "");
    let cleaned = STYLE_RE.replace_all(&cleaned, "");
    let cleaned = COMMENT_RE.replace_all(&cleaned, "");
    let cleaned = NOSCRIPT_RE.replace_all(&cleaned, "");
    let cleaned = WHITESPACE_RE.replace_all(&cleaned, " ");
    let cleaned = INTER_TAG_RE.replace_all(&cleaned, "><");
    cleaned.trim().to_string()
}

/// Truncate to at most `max_chars` characters, appending the truncation
/// marker when anything was dropped.
pub fn truncate_html(html: &str, max_chars: usize) -> String {
    if html.chars().count() <= max_chars {
        return html.to_string();
    }
    let mut truncated: String = html.chars().take(max_chars).collect();
    truncated.push_str(TRUNCATION_MARKER);
    truncated
}
