//! Prompts for LLM summarization.
//!
//! Every prompt lives here so prompt changes never touch request or
//! error-handling code, and so tests can inspect them without a live model.

use crate::config::SummaryLength;

/// Persona shared by every summary request; the length instruction is appended.
pub const SYSTEM_PROMPT_BASE: &str = "You are an educational assistant that creates clear, engaging summaries for students. Focus on key concepts, important details, and educational value.";

/// Prefix placed before the user's content.
pub const USER_PROMPT_PREFIX: &str = "Please summarize this educational content:";

/// System message for the requested summary length.
pub fn system_prompt(length: SummaryLength) -> String {
    format!("{} {}", SYSTEM_PROMPT_BASE, length.instruction())
}

/// User message wrapping the text to summarize.
pub fn user_prompt(text: &str) -> String {
    format!("{}\n\n{}", USER_PROMPT_PREFIX, text)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn system_prompt_carries_length_instruction() {
        let short = system_prompt(SummaryLength::Short);
        let long = system_prompt(SummaryLength::Long);
        assert!(short.starts_with(SYSTEM_PROMPT_BASE));
        assert!(short.ends_with("2-3 sentence summary."));
        assert!(long.contains("key points and insights"));
        assert_ne!(short, long);
    }

    #[test]
    fn user_prompt_keeps_text_verbatim() {
        let p = user_prompt("Mitochondria\nare organelles.");
        assert_eq!(
            p,
            "Please summarize this educational content:\n\nMitochondria\nare organelles."
        );
    }
}
