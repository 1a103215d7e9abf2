//! System prompt assembly.
//!
//! A character session prompt is the no-parentheses directive, the
//! character's prompt text, and the operator's guidance, separated by blank
//! lines. Loading the character prompt from disk happens in persona-infra.

/// Opens every character prompt.
pub const NO_PARENTHESES_DIRECTIVE: &str =
    "Do not include anything in parentheses in your response.";

/// Prompt used when no character is selected.
pub const DEFAULT_ASSISTANT_PROMPT: &str = "You are a personal assistant that is helpful.
You are part of a realtime voice to voice interaction with the human.
Make your responses sound natural, like a human. Respond with fill words like 'hmm', 'ohh', and similar wherever relevant to make your responses sound natural.";

/// Builds system prompts from their parts.
pub struct SystemPromptBuilder;

impl SystemPromptBuilder {
    /// Compose a character prompt.
    ///
    /// Both `character_prompt` and `guidance` are trimmed; empty parts still
    /// occupy their section so the layout is stable.
    pub fn build(character_prompt: &str, guidance: &str) -> String {
        format!(
            "{NO_PARENTHESES_DIRECTIVE}\n\n{}\n\n{}",
            character_prompt.trim(),
            guidance.trim()
        )
    }

    /// The generic voice-assistant prompt.
    pub fn assistant() -> String {
        DEFAULT_ASSISTANT_PROMPT.to_string()
    }
}
