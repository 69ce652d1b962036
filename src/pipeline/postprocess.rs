//! Post-processing: deterministic cleanup of model-generated summaries.
//!
//! Chat models regularly return text that is right in content but awkward in
//! form: wrapped in a ```` ``` ```` fence, carrying `\r\n` line endings, or
//! padded with runs of empty lines. [`clean_summary`] fixes those without
//! touching the words.
//!
//! [`speech_text`] goes one step further for the synthesis stage: Markdown
//! markers that a reader skips silently would otherwise be spoken aloud
//! ("asterisk asterisk key points"), so they are removed.
//!
//! ## Rule Order
//!
//! Fences are stripped before line endings are normalised so the fence regex
//! sees the original input; invisible characters go last so earlier passes
//! never reintroduce them.

use once_cell::sync::Lazy;
use regex::Regex;

/// Apply all cleanup rules to a raw summary.
///
/// Rules (applied in order):
/// 1. Strip an outer code fence
/// 2. Normalise line endings (CRLF → LF)
/// 3. Trim trailing whitespace per line
/// 4. Collapse runs of blank lines to a single blank line
/// 5. Strip invisible Unicode (zero-width spaces, BOM, soft hyphens)
/// 6. Trim leading and trailing blank space
pub fn clean_summary(input: &str) -> String {
    let s = strip_outer_fence(input);
    let s = normalise_line_endings(&s);
    let s = trim_trailing_whitespace(&s);
    let s = collapse_blank_lines(&s);
    let s = remove_invisible_chars(&s);
    s.trim().to_string()
}

/// Turn a (possibly Markdown-formatted) summary into plain text for speech.
///
/// Headings, bullet markers, emphasis, inline code and link targets are
/// dropped; the visible words are kept.
pub fn speech_text(input: &str) -> String {
    let s = clean_summary(input);
    let s = RE_LINK.replace_all(&s, "$1");
    let s = RE_HEADING.replace_all(&s, "");
    let s = RE_BULLET.replace_all(&s, "");
    let s = RE_STRONG.replace_all(&s, "$2");
    let s = RE_EMPHASIS.replace_all(&s, "$1");
    s.replace('`', "")
}

// ── Rule 1: Strip outer fence ────────────────────────────────────────────

static RE_OUTER_FENCE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)^```[a-zA-Z]*\r?\n(.*?)\r?\n```\s*$").expect("valid fence regex")
});

fn strip_outer_fence(input: &str) -> String {
    match RE_OUTER_FENCE.captures(input.trim()) {
        Some(caps) => caps[1].to_string(),
        None => input.to_string(),
    }
}

// ── Rule 2: Normalise line endings ───────────────────────────────────────

fn normalise_line_endings(input: &str) -> String {
    input.replace("\r\n", "\n").replace('\r', "\n")
}

// ── Rule 3: Trim trailing whitespace ─────────────────────────────────────

fn trim_trailing_whitespace(input: &str) -> String {
    input
        .lines()
        .map(str::trim_end)
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Rule 4: Collapse blank lines ─────────────────────────────────────────

static RE_BLANK_LINES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("valid blank-line regex"));

fn collapse_blank_lines(input: &str) -> String {
    RE_BLANK_LINES.replace_all(input, "\n\n").into_owned()
}

// ── Rule 5: Invisible characters ─────────────────────────────────────────

fn remove_invisible_chars(input: &str) -> String {
    input.replace(
        ['\u{200B}', '\u{FEFF}', '\u{00AD}', '\u{200C}', '\u{200D}', '\u{2060}'],
        "",
    )
}

// ── Speech-only rules ────────────────────────────────────────────────────

static RE_LINK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\]]+)\]\([^)]*\)").expect("valid link regex"));

static RE_HEADING: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]{0,3}#{1,6}[ \t]+").expect("valid heading regex"));

static RE_BULLET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^[ \t]*(?:[-*+]|\d+[.)])[ \t]+").expect("valid bullet regex"));

static RE_STRONG: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(\*\*|__)(.+?)(\*\*|__)").expect("valid strong regex"));

static RE_EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*([^*\n]+)\*").expect("valid emphasis regex"));

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_fence_with_language_tag() {
        let input = "```markdown\nPlants make sugar.\n```";
        assert_eq!(clean_summary(input), "Plants make sugar.");
    }

    #[test]
    fn unfenced_text_passes_through() {
        assert_eq!(clean_summary("Cells divide."), "Cells divide.");
    }

    #[test]
    fn normalises_crlf_and_trailing_spaces() {
        assert_eq!(clean_summary("a  \r\nb\rc"), "a\nb\nc");
    }

    #[test]
    fn collapses_paragraph_gaps() {
        let input = "First paragraph.\n\n\n\n\nSecond paragraph.";
        assert_eq!(clean_summary(input), "First paragraph.\n\nSecond paragraph.");
    }

    #[test]
    fn removes_invisible_characters() {
        assert_eq!(clean_summary("\u{FEFF}photo\u{200B}synthesis"), "photosynthesis");
    }

    #[test]
    fn empty_after_cleanup_is_empty() {
        assert_eq!(clean_summary("  \n\n \u{200B}"), "");
    }

    #[test]
    fn speech_text_drops_markdown_markers() {
        let input = "## Key Points\n\n- **Chlorophyll** absorbs light\n- See [notes](https://x.test/n)\n1. Uses `CO2` and *water*";
        let spoken = speech_text(input);
        assert_eq!(
            spoken,
            "Key Points\n\nChlorophyll absorbs light\nSee notes\nUses CO2 and water"
        );
    }

    #[test]
    fn speech_text_keeps_plain_prose() {
        let input = "Newton's laws describe motion. Force equals mass times acceleration.";
        assert_eq!(speech_text(input), input);
    }
}
