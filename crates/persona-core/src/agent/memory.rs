//! Append-only conversation memory.

use persona_types::chat::Turn;
use persona_types::llm::Message;

/// Ordered log of completed turns for one conversation.
///
/// Turns are only ever appended; nothing is evicted or reordered.
#[derive(Debug, Clone, Default)]
pub struct ConversationMemory {
    turns: Vec<Turn>,
}

impl ConversationMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a completed exchange at the end of the log.
    pub fn append(&mut self, input: impl Into<String>, output: impl Into<String>) {
        self.turns.push(Turn::new(input, output));
    }

    /// Current turns, oldest first.
    pub fn snapshot(&self) -> &[Turn] {
        &self.turns
    }

    /// Replay the log as alternating user/assistant messages.
    pub fn to_messages(&self) -> Vec<Message> {
        self.turns
            .iter()
            .flat_map(|turn| {
                [
                    Message::user(turn.input.clone()),
                    Message::assistant(turn.output.clone()),
                ]
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use persona_types::llm::MessageRole;

    #[test]
    fn test_append_preserves_order() {
        let mut memory = ConversationMemory::new();
        memory.append("first", "one");
        memory.append("second", "two");

        let turns = memory.snapshot();
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0], Turn::new("first", "one"));
        assert_eq!(turns[1], Turn::new("second", "two"));
    }

    #[test]
    fn test_empty_memory() {
        let memory = ConversationMemory::new();
        assert!(memory.is_empty());
        assert!(memory.snapshot().is_empty());
        assert!(memory.to_messages().is_empty());
    }

    #[test]
    fn test_to_messages_alternates_roles() {
        let mut memory = ConversationMemory::new();
        memory.append("Hello!", "Hi there!");
        memory.append("How are you?", "Fine.");

        let messages = memory.to_messages();
        assert_eq!(messages.len(), 4);
        assert_eq!(messages[0].role, MessageRole::User);
        assert_eq!(messages[0].content, "Hello!");
        assert_eq!(messages[1].role, MessageRole::Assistant);
        assert_eq!(messages[1].content, "Hi there!");
        assert_eq!(messages[2].content, "How are you?");
        assert_eq!(messages[3].role, MessageRole::Assistant);
    }
}
