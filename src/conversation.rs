//! Conversation state: an ordered, append-only sequence of turns

use crate::llm::MessageRole;

/// Who produced a turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    System,
    User,
    Assistant,
    Tool,
}

impl Role {
    /// Map onto the completion endpoint's role vocabulary.
    ///
    /// Total: roles the endpoint does not know (tool results) are sent as
    /// `user`.
    pub fn wire_role(self) -> MessageRole {
        match self {
            Role::System => MessageRole::System,
            Role::User | Role::Tool => MessageRole::User,
            Role::Assistant => MessageRole::Assistant,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::Tool => "tool",
        }
    }
}

/// One message in a conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

impl Turn {
    pub fn new(role: Role, text: impl Into<String>) -> Self {
        Self {
            role,
            text: text.into(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self::new(Role::User, text)
    }

    pub fn assistant(text: impl Into<String>) -> Self {
        Self::new(Role::Assistant, text)
    }

    pub fn tool(text: impl Into<String>) -> Self {
        Self::new(Role::Tool, text)
    }

    #[allow(dead_code)] // Constructor for API completeness
    pub fn system(text: impl Into<String>) -> Self {
        Self::new(Role::System, text)
    }
}

/// The session: every turn in the order it was appended.
///
/// No validation, deduplication or size bound.
#[derive(Debug, Clone, Default)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(&mut self, turn: Turn) {
        self.turns.push(turn);
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    /// Most recent assistant turn, skipping any tool or user turns after it
    pub fn last_assistant(&self) -> Option<&Turn> {
        self.turns.iter().rev().find(|t| t.role == Role::Assistant)
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// Drop all history (stateless sessions send each input alone)
    pub fn clear(&mut self) {
        self.turns.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_role_mapping_is_total() {
        assert_eq!(Role::System.wire_role(), MessageRole::System);
        assert_eq!(Role::User.wire_role(), MessageRole::User);
        assert_eq!(Role::Assistant.wire_role(), MessageRole::Assistant);
        assert_eq!(Role::Tool.wire_role(), MessageRole::User);
    }

    #[test]
    fn test_last_assistant_skips_tool_turns() {
        let mut conv = Conversation::new();
        conv.append(Turn::user("Add 40 + 12"));
        conv.append(Turn::assistant("add(40, 12)"));
        conv.append(Turn::tool("add(40, 12) = 52"));

        assert_eq!(conv.last().unwrap().role, Role::Tool);
        assert_eq!(conv.last_assistant().unwrap().text, "add(40, 12)");
    }

    #[test]
    fn test_clear() {
        let mut conv = Conversation::new();
        conv.append(Turn::user("hi"));
        conv.clear();
        assert!(conv.turns().is_empty());
        assert!(conv.last().is_none());
    }

    fn arb_turn() -> impl Strategy<Value = Turn> {
        (
            prop_oneof![
                Just(Role::System),
                Just(Role::User),
                Just(Role::Assistant),
                Just(Role::Tool),
            ],
            "[a-zA-Z0-9 ()+,]{0,40}",
        )
            .prop_map(|(role, text)| Turn::new(role, text))
    }

    proptest! {
        #[test]
        fn prop_append_preserves_order(turns in proptest::collection::vec(arb_turn(), 0..30)) {
            let mut conv = Conversation::new();
            for turn in &turns {
                conv.append(turn.clone());
            }
            prop_assert_eq!(conv.len(), turns.len());
            prop_assert_eq!(conv.turns(), turns.as_slice());
        }
    }
}
