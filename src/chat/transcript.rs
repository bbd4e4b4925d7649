use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::User => f.write_str("user"),
            Self::Assistant => f.write_str("assistant"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

/// Append-only history of one chat session.
///
/// Messages are never edited or removed. A completed turn adds a user
/// message immediately followed by its assistant reply; a failed turn leaves
/// only the user message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transcript {
    messages: Vec<Message>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_user(&mut self, content: impl Into<String>) {
        self.messages.push(Message {
            role: Role::User,
            content: content.into(),
        });
    }

    /// Appends a reply to the most recent user message.
    ///
    /// Returns `false` and leaves the transcript unchanged if the last
    /// message is not an unanswered user message.
    pub fn push_assistant(&mut self, content: impl Into<String>) -> bool {
        if !self.awaiting_reply() {
            return false;
        }
        self.messages.push(Message {
            role: Role::Assistant,
            content: content.into(),
        });
        true
    }

    /// Returns `true` if the last message is from the user.
    pub fn awaiting_reply(&self) -> bool {
        self.messages
            .last()
            .is_some_and(|message| message.role == Role::User)
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
