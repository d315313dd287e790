use serde::Serialize;

/// Who produced a chat turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Speaker {
    User,
    Assistant,
}

/// One question or answer in the session.
#[derive(Debug, Clone, Serialize)]
pub struct ChatTurn {
    pub speaker: Speaker,
    pub text: String,
}

/// Append-only, session-scoped chat log. Owned by the presentation layer
/// and passed into rendering; turns are never mutated or removed.
#[derive(Debug, Default, Serialize)]
pub struct ChatLog {
    turns: Vec<ChatTurn>,
}

impl ChatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn {
            speaker: Speaker::User,
            text: text.into(),
        });
    }

    pub fn push_assistant(&mut self, text: impl Into<String>) {
        self.turns.push(ChatTurn {
            speaker: Speaker::Assistant,
            text: text.into(),
        });
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
