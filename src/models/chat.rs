use serde::{Deserialize, Serialize};

use super::enums::ChatRole;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    /// Monotonic index within the transcript, starting at 0.
    pub position: usize,
}

/// Append-only ordered chat history of one session.
///
/// Turns can only be added at the end; positions are assigned on append.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    turns: Vec<ChatTurn>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a turn and return its position.
    pub fn push(&mut self, role: ChatRole, content: impl Into<String>) -> usize {
        let position = self.turns.len();
        self.turns.push(ChatTurn {
            role,
            content: content.into(),
            position,
        });
        position
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&ChatTurn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn patient_turns(&self) -> impl Iterator<Item = &ChatTurn> {
        self.turns.iter().filter(|t| t.role == ChatRole::Patient)
    }
}
